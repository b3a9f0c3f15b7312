use crate::cli::Command;
use quarry::catalog::Catalog;
use quarry::desktop::Desktop;
use quarry::env;
use quarry::plugin::builtin_plugins;
use quarry::settings::controller::CONFIG_FILE;
use quarry::settings::{SecretBackend, SettingsController};
use std::sync::Arc;

pub mod browse;
pub mod plugins;
pub mod settings;
pub mod sources;
pub mod volumes;

pub fn dispatch(cli: crate::cli::Cli) -> Result<(), String> {
    match cli.command {
        Command::Sources(args) => sources::run(args),
        Command::Browse(args) => browse::run(args),
        Command::Plugins(args) => plugins::run(args),
        Command::Settings(args) => settings::run(args),
        Command::Volumes(args) => volumes::run(args),
    }
}

/// 実行環境とロード済みのカタログ
pub struct Session {
    pub desktop: Arc<Desktop>,
    pub catalog: Catalog,
}

impl Session {
    /// 設定ディレクトリの設定を読み込み、組み込みプラグインをロードする
    pub fn open() -> Result<Self, String> {
        let desktop = Desktop::system().map_err(|e| e.to_string())?;
        let config_dir = env::config_dir().map_err(|e| e.to_string())?;
        let secrets = SecretBackend::from_env().map_err(|e| e.to_string())?;
        let controller = SettingsController::load(config_dir.join(CONFIG_FILE), secrets)
            .map_err(|e| format!("Failed to load settings: {}", e))?;
        let plugins = builtin_plugins().map_err(|e| e.to_string())?;

        let catalog = Catalog::load(Arc::clone(&desktop), Arc::new(controller), plugins);
        Ok(Self { desktop, catalog })
    }
}
