//! ファイルとディレクトリの Leaf

mod actions;

pub use actions::{Dragbox, Echo, OpenTerminal, OpenWith, Show};

use crate::action::Action;
use crate::desktop::Desktop;
use crate::error::{QuarryError, Result};
use crate::leaf::{Leaf, LeafObject};
use crate::object::CatalogObject;
use crate::path_ext::PathExt;
use crate::source::{DirectorySource, Source};
use std::any::Any;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// ファイルシステム上のパスを表す Leaf
pub struct FileLeaf {
    path: PathBuf,
    name: String,
    desktop: Arc<Desktop>,
}

impl FileLeaf {
    /// ファイル名を表示名にする
    pub fn new(path: PathBuf, desktop: Arc<Desktop>) -> Self {
        let name = path.display_name();
        Self::with_name(path, name, desktop)
    }

    pub fn with_name(path: PathBuf, name: impl Into<String>, desktop: Arc<Desktop>) -> Self {
        Self {
            path,
            name: name.into(),
            desktop,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_dir(&self) -> bool {
        self.desktop.fs.is_dir(self.path())
    }

    fn file_actions(&self) -> Vec<Arc<dyn Action>> {
        let apps = &self.desktop.apps;
        let spawner = &self.desktop.spawner;
        let mut seen = HashSet::new();

        let default: Arc<dyn Action> = match apps.default_application(self.path()) {
            Ok(entry) => {
                seen.insert(entry.id.clone());
                Arc::new(OpenWith::new(entry, Arc::clone(spawner)))
            }
            Err(_) => Arc::new(Show::new(Arc::clone(spawner))),
        };

        let mut actions: Vec<Arc<dyn Action>> = vec![
            default,
            Arc::new(Echo),
            Arc::new(Dragbox::new(Arc::clone(spawner))),
        ];
        for entry in apps.applications_for(self.path()) {
            if seen.insert(entry.id.clone()) {
                actions.push(Arc::new(OpenWith::new(entry, Arc::clone(spawner))));
            }
        }
        actions
    }
}

impl CatalogObject for FileLeaf {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<String> {
        Some(self.path().display().to_string())
    }

    fn icon_name(&self) -> &str {
        if self.is_dir() {
            "folder"
        } else {
            "text-x-generic"
        }
    }
}

impl Leaf for FileLeaf {
    fn object(&self) -> LeafObject<'_> {
        LeafObject::Path(&self.path)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn actions(&self) -> Vec<Arc<dyn Action>> {
        if !self.is_dir() {
            return self.file_actions();
        }
        let spawner = &self.desktop.spawner;
        vec![
            Arc::new(Show::named("Open", Arc::clone(spawner))),
            Arc::new(Echo),
            Arc::new(Dragbox::new(Arc::clone(spawner))),
            Arc::new(OpenTerminal::new(
                self.desktop.terminal.clone(),
                Arc::clone(spawner),
            )),
        ]
    }

    fn has_content(&self) -> bool {
        self.is_dir()
    }

    fn content_source(&self, alternate: bool) -> Result<Arc<dyn Source>> {
        if !self.has_content() {
            return Err(QuarryError::NoContent(self.name.clone()));
        }
        Ok(Arc::new(DirectorySource::new(
            self.path(),
            alternate,
            Arc::clone(&self.desktop),
        )))
    }

    fn is_valid(&self) -> bool {
        self.desktop.fs.exists(self.path())
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;
