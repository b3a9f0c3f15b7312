//! ファイルとフォルダ

use super::{Plugin, PluginContext, PluginManifest};
use crate::error::{QuarryError, Result};
use crate::settings::{PluginSettings, SettingChanged};
use crate::source::{DirectorySource, FileSource, FileSourceOptions, Source};
use std::sync::{Arc, Weak};
use tracing::warn;

const MANIFEST: &str = r#"
id = "files"
name = "Files"
description = "Files and folders in the home directory"
version = "1.0"
sources = ["FileSource", "HomeSource"]

[[settings]]
key = "show_hidden"
type = "bool"
value = false
label = "Show hidden files"

[[settings]]
key = "depth"
type = "int"
value = 0
label = "Depth"
alternatives = [0, 1, 2, 3]
tooltip = "How many levels of subfolders to include"
"#;

pub const SHOW_HIDDEN: &str = "show_hidden";
pub const DEPTH: &str = "depth";

pub struct FilesPlugin {
    manifest: PluginManifest,
}

impl FilesPlugin {
    pub fn new() -> Result<Self> {
        Ok(Self {
            manifest: PluginManifest::parse(MANIFEST)?,
        })
    }
}

/// 設定から走査オプションを組み立てる（負の深さは 0）
pub fn file_source_options(settings: &PluginSettings) -> Result<FileSourceOptions> {
    let show_hidden = settings.get(SHOW_HIDDEN)?.as_bool().unwrap_or(false);
    let depth = settings.get(DEPTH)?.as_int().unwrap_or(0).max(0);
    Ok(FileSourceOptions {
        depth: usize::try_from(depth).unwrap_or(usize::MAX),
        show_hidden,
    })
}

/// 設定が変わったらソースのオプションを差し替える
///
/// ソースと設定はどちらも弱参照で持つ。
fn follow_settings(source: &Arc<FileSource>, settings: &Arc<PluginSettings>) {
    let weak_source: Weak<FileSource> = Arc::downgrade(source);
    let weak_settings = Arc::downgrade(settings);
    settings.subscribe(move |change: &SettingChanged| {
        if change.key != SHOW_HIDDEN && change.key != DEPTH {
            return;
        }
        let (Some(source), Some(settings)) = (weak_source.upgrade(), weak_settings.upgrade())
        else {
            return;
        };
        match file_source_options(&settings) {
            Ok(options) => source.set_options(options),
            Err(e) => warn!(key = %change.key, "failed to apply file settings: {}", e),
        }
    });
}

impl Plugin for FilesPlugin {
    fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    fn create_source(&self, factory: &str, ctx: &PluginContext) -> Result<Arc<dyn Source>> {
        let home = ctx.desktop.home.clone();
        match factory {
            "FileSource" => {
                let source = Arc::new(FileSource::new(
                    "Files",
                    vec![home],
                    file_source_options(&ctx.settings)?,
                    Arc::clone(&ctx.desktop),
                ));
                follow_settings(&source, &ctx.settings);
                Ok(source as Arc<dyn Source>)
            }
            "HomeSource" => Ok(Arc::new(DirectorySource::new(
                home,
                false,
                Arc::clone(&ctx.desktop),
            ))),
            _ => Err(QuarryError::UnknownSource {
                plugin: self.manifest.id.clone(),
                factory: factory.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "files_test.rs"]
mod tests;
