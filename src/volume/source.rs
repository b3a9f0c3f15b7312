//! ボリュームの Source / Leaf / Action

use super::{Completion, Mount, VolumeMonitor};
use crate::action::Action;
use crate::desktop::Desktop;
use crate::error::Result;
use crate::file::Show;
use crate::leaf::{Leaf, LeafObject};
use crate::object::CatalogObject;
use crate::source::{DirectorySource, Items, Source, SourceCache};
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// マウント済みボリュームの Source
///
/// マウント状態は外部で変わるため動的。
pub struct VolumesSource {
    desktop: Arc<Desktop>,
    cache: SourceCache,
}

impl VolumesSource {
    pub fn new(desktop: Arc<Desktop>) -> Self {
        Self {
            desktop,
            cache: SourceCache::new(),
        }
    }
}

impl CatalogObject for VolumesSource {
    fn name(&self) -> &str {
        "Volumes and Disks"
    }

    fn description(&self) -> Option<String> {
        Some("Mounted volumes and disks".to_string())
    }

    fn icon_name(&self) -> &str {
        "drive-removable-media"
    }
}

impl Source for VolumesSource {
    fn items(&self) -> Items<'_> {
        Box::new(self.desktop.volumes.mounts().into_iter().map(move |mount| {
            Arc::new(VolumeLeaf::new(mount, Arc::clone(&self.desktop))) as Arc<dyn Leaf>
        }))
    }

    fn cache(&self) -> &SourceCache {
        &self.cache
    }

    fn is_dynamic(&self) -> bool {
        true
    }
}

/// マウント済みボリュームの Leaf（実体はマウントポイント）
pub struct VolumeLeaf {
    mount: Mount,
    desktop: Arc<Desktop>,
}

impl VolumeLeaf {
    pub fn new(mount: Mount, desktop: Arc<Desktop>) -> Self {
        Self {
            mount,
            desktop,
        }
    }

    pub fn mount(&self) -> &Mount {
        &self.mount
    }

    fn monitor(&self) -> &Arc<dyn VolumeMonitor> {
        &self.desktop.volumes
    }
}

impl CatalogObject for VolumeLeaf {
    fn name(&self) -> &str {
        &self.mount.name
    }

    fn description(&self) -> Option<String> {
        Some(format!("Volume mounted at {}", self.mount.root.display()))
    }

    fn icon_name(&self) -> &str {
        "drive-removable-media"
    }
}

impl Leaf for VolumeLeaf {
    fn object(&self) -> LeafObject<'_> {
        LeafObject::Path(&self.mount.root)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn actions(&self) -> Vec<Arc<dyn Action>> {
        let mut actions: Vec<Arc<dyn Action>> = vec![Arc::new(Show::named(
            "Open",
            Arc::clone(&self.desktop.spawner),
        ))];
        if self.mount.can_eject {
            actions.push(Arc::new(Unmount::eject()));
        } else if self.mount.can_unmount {
            actions.push(Arc::new(Unmount::new()));
        }
        actions
    }

    fn has_content(&self) -> bool {
        true
    }

    fn content_source(&self, alternate: bool) -> Result<Arc<dyn Source>> {
        Ok(Arc::new(DirectorySource::new(
            &self.mount.root,
            alternate,
            Arc::clone(&self.desktop),
        )))
    }

    fn is_valid(&self) -> bool {
        self.monitor().is_mounted(&self.mount.id)
    }
}

/// ボリュームを取り外す（取り出せるなら取り出す）
pub struct Unmount {
    name: &'static str,
    description: &'static str,
}

impl Unmount {
    pub fn new() -> Self {
        Self {
            name: "Unmount",
            description: "Unmount this volume",
        }
    }

    pub fn eject() -> Self {
        Self {
            name: "Eject",
            description: "Unmount and eject this media",
        }
    }
}

impl Default for Unmount {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogObject for Unmount {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> Option<String> {
        Some(self.description.to_string())
    }

    fn icon_name(&self) -> &str {
        "media-eject"
    }
}

impl Action for Unmount {
    fn activate(&self, leaf: &dyn Leaf) {
        let Some(volume) = leaf.as_any().downcast_ref::<VolumeLeaf>() else {
            warn!(leaf = leaf.name(), "{} needs a volume", self.name);
            return;
        };
        if !volume.is_valid() {
            debug!(volume = volume.name(), "volume is already gone");
            return;
        }

        let mount = volume.mount();
        let name = mount.name.clone();
        let done: Completion = Box::new(move |result| match result {
            Ok(()) => info!(volume = %name, "volume removed"),
            Err(e) => warn!(volume = %name, "failed to remove volume: {}", e),
        });

        if mount.can_eject {
            volume.monitor().eject(mount, done);
        } else if mount.can_unmount {
            volume.monitor().unmount(mount, done);
        }
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
