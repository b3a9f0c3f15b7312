//! アプリケーションの Source / Leaf / Action

use super::DesktopEntry;
use crate::action::Action;
use crate::desktop::{Desktop, Spawner};
use crate::leaf::{Leaf, LeafObject};
use crate::object::CatalogObject;
use crate::source::{Items, Source, SourceCache};
use std::any::Any;
use std::sync::Arc;
use tracing::warn;

/// インストール済みアプリケーションの Source
pub struct AppSource {
    desktop: Arc<Desktop>,
    cache: SourceCache,
}

impl AppSource {
    pub fn new(desktop: Arc<Desktop>) -> Self {
        Self {
            desktop,
            cache: SourceCache::new(),
        }
    }
}

impl CatalogObject for AppSource {
    fn name(&self) -> &str {
        "Applications"
    }

    fn description(&self) -> Option<String> {
        Some("All installed applications".to_string())
    }

    fn icon_name(&self) -> &str {
        "applications-other"
    }
}

impl Source for AppSource {
    fn items(&self) -> Items<'_> {
        let launch: Arc<dyn Action> = Arc::new(Launch::new(
            Arc::clone(&self.desktop.spawner),
            self.desktop.terminal.clone(),
        ));
        Box::new(
            self.desktop
                .apps
                .applications()
                .into_iter()
                .map(move |entry| {
                    Arc::new(AppLeaf::new(entry, Arc::clone(&launch))) as Arc<dyn Leaf>
                }),
        )
    }

    fn cache(&self) -> &SourceCache {
        &self.cache
    }
}

/// アプリケーションの Leaf
pub struct AppLeaf {
    entry: DesktopEntry,
    name: String,
    launch: Arc<dyn Action>,
}

impl AppLeaf {
    pub fn new(entry: DesktopEntry, launch: Arc<dyn Action>) -> Self {
        Self {
            name: entry.name.clone(),
            entry,
            launch,
        }
    }

    pub fn entry(&self) -> &DesktopEntry {
        &self.entry
    }
}

impl CatalogObject for AppLeaf {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<String> {
        let entry = self.entry();
        entry.comment.clone().or_else(|| entry.generic_name.clone())
    }

    fn icon_name(&self) -> &str {
        self.entry()
            .icon
            .as_deref()
            .unwrap_or("application-x-executable")
    }
}

impl Leaf for AppLeaf {
    fn object(&self) -> LeafObject<'_> {
        LeafObject::Application(&self.entry)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn actions(&self) -> Vec<Arc<dyn Action>> {
        vec![Arc::clone(&self.launch)]
    }
}

/// アプリケーションを起動する
pub struct Launch {
    spawner: Arc<dyn Spawner>,
    terminal: Vec<String>,
}

impl Launch {
    pub fn new(spawner: Arc<dyn Spawner>, terminal: Vec<String>) -> Self {
        Self { spawner, terminal }
    }
}

impl CatalogObject for Launch {
    fn name(&self) -> &str {
        "Launch"
    }

    fn icon_name(&self) -> &str {
        "system-run"
    }
}

impl Action for Launch {
    fn activate(&self, leaf: &dyn Leaf) {
        let Some(entry) = leaf.object().as_application() else {
            warn!(leaf = leaf.name(), "Launch needs an application");
            return;
        };
        for command in entry.command_lines(&[]) {
            // Terminal=true のエントリは端末の中で起動する
            let argv = if entry.terminal {
                let mut argv = self.terminal.clone();
                argv.push("-e".to_string());
                argv.extend(command);
                argv
            } else {
                command
            };
            if let Err(e) = self.spawner.spawn(&argv, entry.path.as_deref()) {
                warn!(application = %entry.id, "failed to launch: {}", e);
            }
        }
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
