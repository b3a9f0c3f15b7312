//! インストール済みアプリケーション

use super::{Plugin, PluginContext, PluginManifest};
use crate::application::AppSource;
use crate::error::{QuarryError, Result};
use crate::source::Source;
use std::sync::Arc;

const MANIFEST: &str = r#"
id = "applications"
name = "Applications"
description = "All applications and preferences"
version = "1.0"
sources = ["AppSource"]
"#;

pub struct ApplicationsPlugin {
    manifest: PluginManifest,
}

impl ApplicationsPlugin {
    pub fn new() -> Result<Self> {
        Ok(Self {
            manifest: PluginManifest::parse(MANIFEST)?,
        })
    }
}

impl Plugin for ApplicationsPlugin {
    fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    fn create_source(&self, factory: &str, ctx: &PluginContext) -> Result<Arc<dyn Source>> {
        match factory {
            "AppSource" => Ok(Arc::new(AppSource::new(Arc::clone(&ctx.desktop)))),
            _ => Err(QuarryError::UnknownSource {
                plugin: self.manifest.id.clone(),
                factory: factory.to_string(),
            }),
        }
    }
}
