use thiserror::Error;

/// quarry 統一エラー型
#[derive(Debug, Error)]
pub enum QuarryError {
    #[error("Source '{0}' has no parent")]
    NoParent(String),

    #[error("Leaf '{0}' has no content")]
    NoContent(String),

    #[error("No application found for {0}")]
    NoApplication(String),

    #[error("Plugin setting missing keys: {}", .0.join(", "))]
    MissingSettingKeys(Vec<&'static str>),

    #[error("Setting key '{0}' uses the reserved 'quarry_' prefix")]
    ReservedSettingKey(String),

    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Invalid desktop entry '{id}': {message}")]
    InvalidDesktopEntry { id: String, message: String },

    #[error("Plugin not found: {0}")]
    PluginNotFound(String),

    #[error("Unknown source factory '{factory}' in plugin '{plugin}'")]
    UnknownSource { plugin: String, factory: String },

    #[error("{0} is not available")]
    Unavailable(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, QuarryError>;

impl QuarryError {
    /// 能力の欠如を表すシグナルかどうか
    ///
    /// `has_parent()` / `has_content()` などの述語を確認せずに
    /// アクセサを呼んだ場合に返る。障害ではなく制御フロー上の結果。
    pub fn is_capability_absence(&self) -> bool {
        matches!(
            self,
            QuarryError::NoParent(_) | QuarryError::NoContent(_) | QuarryError::NoApplication(_)
        )
    }

    /// プラグインのロード時に検出される設定エラーかどうか
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            QuarryError::MissingSettingKeys(_)
                | QuarryError::ReservedSettingKey(_)
                | QuarryError::InvalidManifest(_)
                | QuarryError::UnknownSource { .. }
                | QuarryError::InvalidValue { .. }
        )
    }
}
