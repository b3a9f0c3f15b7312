//! ファイル向けの Action

use crate::action::Action;
use crate::application::DesktopEntry;
use crate::desktop::Spawner;
use crate::leaf::Leaf;
use crate::object::CatalogObject;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// 既定のビューアで開く（`xdg-open`）
pub struct Show {
    name: String,
    spawner: Arc<dyn Spawner>,
}

impl Show {
    pub fn new(spawner: Arc<dyn Spawner>) -> Self {
        Self::named("Show", spawner)
    }

    pub fn named(name: impl Into<String>, spawner: Arc<dyn Spawner>) -> Self {
        Self {
            name: name.into(),
            spawner,
        }
    }
}

impl CatalogObject for Show {
    fn name(&self) -> &str {
        &self.name
    }

    fn icon_name(&self) -> &str {
        "document-open"
    }
}

impl Action for Show {
    fn activate(&self, leaf: &dyn Leaf) {
        let Some(path) = leaf.object().as_path() else {
            warn!(leaf = leaf.name(), "Show needs a path");
            return;
        };
        let argv = vec!["xdg-open".to_string(), path.display().to_string()];
        if let Err(e) = self.spawner.spawn(&argv, None) {
            warn!(path = %path.display(), "failed to show: {}", e);
        }
    }
}

/// 指定のアプリケーションで開く
pub struct OpenWith {
    entry: DesktopEntry,
    spawner: Arc<dyn Spawner>,
}

impl OpenWith {
    pub fn new(entry: DesktopEntry, spawner: Arc<dyn Spawner>) -> Self {
        Self { entry, spawner }
    }

    pub fn entry(&self) -> &DesktopEntry {
        &self.entry
    }

    fn launch(&self, files: &[&Path]) {
        for argv in self.entry.command_lines(files) {
            if let Err(e) = self.spawner.spawn(&argv, None) {
                warn!(application = %self.entry.id, "failed to launch: {}", e);
            }
        }
    }
}

impl CatalogObject for OpenWith {
    fn name(&self) -> &str {
        &self.entry.name
    }

    fn description(&self) -> Option<String> {
        Some(format!("Open with {}", self.entry.name))
    }

    fn icon_name(&self) -> &str {
        self.entry.icon.as_deref().unwrap_or("application-x-executable")
    }
}

impl Action for OpenWith {
    fn activate(&self, leaf: &dyn Leaf) {
        match leaf.object().as_path() {
            Some(path) => self.launch(&[path]),
            None => warn!(leaf = leaf.name(), "OpenWith needs a path"),
        }
    }

    /// 全ファイルをまとめて渡す
    fn activate_many(&self, leaves: &[Arc<dyn Leaf>]) {
        let files: Vec<&Path> = leaves
            .iter()
            .filter_map(|leaf| leaf.object().as_path())
            .collect();
        if !files.is_empty() {
            self.launch(&files);
        }
    }
}

/// ディレクトリで端末を開く
pub struct OpenTerminal {
    terminal: Vec<String>,
    spawner: Arc<dyn Spawner>,
}

impl OpenTerminal {
    pub fn new(terminal: Vec<String>, spawner: Arc<dyn Spawner>) -> Self {
        Self { terminal, spawner }
    }
}

impl CatalogObject for OpenTerminal {
    fn name(&self) -> &str {
        "Open Terminal here"
    }

    fn icon_name(&self) -> &str {
        "utilities-terminal"
    }
}

impl Action for OpenTerminal {
    fn activate(&self, leaf: &dyn Leaf) {
        let Some(dir) = leaf.object().as_path() else {
            warn!(leaf = leaf.name(), "Open Terminal needs a directory");
            return;
        };
        if let Err(e) = self.spawner.spawn(&self.terminal, Some(dir)) {
            warn!(directory = %dir.display(), "failed to open terminal: {}", e);
        }
    }
}

/// dragbox に置く（`dragbox --file <path>`）
pub struct Dragbox {
    spawner: Arc<dyn Spawner>,
}

impl Dragbox {
    pub fn new(spawner: Arc<dyn Spawner>) -> Self {
        Self { spawner }
    }
}

impl CatalogObject for Dragbox {
    fn name(&self) -> &str {
        "Put on dragbox"
    }
}

impl Action for Dragbox {
    fn activate(&self, leaf: &dyn Leaf) {
        let Some(path) = leaf.object().as_path() else {
            warn!(leaf = leaf.name(), "Put on dragbox needs a path");
            return;
        };
        let argv = vec![
            "dragbox".to_string(),
            "--file".to_string(),
            path.display().to_string(),
        ];
        if let Err(e) = self.spawner.spawn(&argv, None) {
            warn!(path = %path.display(), "failed to put on dragbox: {}", e);
        }
    }
}

/// Leaf の実体をログに出す
pub struct Echo;

impl CatalogObject for Echo {
    fn name(&self) -> &str {
        "Echo"
    }
}

impl Action for Echo {
    fn activate(&self, leaf: &dyn Leaf) {
        info!("Echo: {}", leaf.object());
    }
}
