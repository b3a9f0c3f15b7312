//! マウント済みのボリュームとディスク

use super::{Plugin, PluginContext, PluginManifest};
use crate::error::{QuarryError, Result};
use crate::source::Source;
use crate::volume::VolumesSource;
use std::sync::Arc;

const MANIFEST: &str = r#"
id = "volumes"
name = "Volumes and Disks"
description = "Mounted volumes and disks"
version = "1.0"
sources = ["VolumesSource"]
"#;

pub struct VolumesPlugin {
    manifest: PluginManifest,
}

impl VolumesPlugin {
    pub fn new() -> Result<Self> {
        Ok(Self {
            manifest: PluginManifest::parse(MANIFEST)?,
        })
    }
}

impl Plugin for VolumesPlugin {
    fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    fn create_source(&self, factory: &str, ctx: &PluginContext) -> Result<Arc<dyn Source>> {
        match factory {
            "VolumesSource" => Ok(Arc::new(VolumesSource::new(Arc::clone(&ctx.desktop)))),
            _ => Err(QuarryError::UnknownSource {
                plugin: self.manifest.id.clone(),
                factory: factory.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desktop::mock::TestDesktop;
    use crate::plugin::build_settings;
    use crate::source::mock::leaf_names;
    use crate::volume::mock::usb_stick;

    #[test]
    fn test_volumes_source_tracks_monitor() {
        let test = TestDesktop::new();
        let plugin = VolumesPlugin::new().unwrap();
        let ctx = PluginContext {
            desktop: Arc::clone(&test.desktop),
            settings: build_settings(plugin.manifest()).unwrap(),
        };
        let source = plugin.create_source("VolumesSource", &ctx).unwrap();
        assert!(source.leaves().is_empty());

        test.volumes.attach(usb_stick("STICK", false));

        assert_eq!(leaf_names(&source.leaves()), vec!["STICK"]);
    }
}
