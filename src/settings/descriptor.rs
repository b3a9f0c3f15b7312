//! 設定の記述子

use super::{SettingType, SettingValue};
use crate::error::{QuarryError, Result};
use serde::Deserialize;

/// マニフェストに書かれたままの設定記述
///
/// 必須項目の欠落を検出できるよう、すべて省略可能として読む。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSetting {
    pub key: Option<String>,
    #[serde(rename = "type")]
    pub value_type: Option<SettingType>,
    pub value: Option<toml::Value>,
    pub label: Option<String>,
    pub alternatives: Option<Vec<toml::Value>>,
    pub tooltip: Option<String>,
}

/// 1 つの設定項目の記述
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDescriptor {
    pub key: String,
    pub value_type: SettingType,
    /// 既定値（コレクションに入った後は現在値）
    pub value: SettingValue,
    pub label: String,
    pub alternatives: Option<Vec<SettingValue>>,
    pub tooltip: Option<String>,
}

impl SettingDescriptor {
    pub fn new(
        key: impl Into<String>,
        value_type: SettingType,
        value: SettingValue,
        label: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value_type,
            value,
            label: label.into(),
            alternatives: None,
            tooltip: None,
        }
    }

    pub fn with_alternatives(mut self, alternatives: Vec<SettingValue>) -> Self {
        self.alternatives = Some(alternatives);
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}

impl TryFrom<RawSetting> for SettingDescriptor {
    type Error = QuarryError;

    fn try_from(raw: RawSetting) -> Result<Self> {
        let missing = missing_keys(&raw);
        let (Some(key), Some(value_type), Some(value), Some(label)) =
            (raw.key, raw.value_type, raw.value, raw.label)
        else {
            return Err(QuarryError::MissingSettingKeys(missing));
        };

        let convert = |value: &toml::Value| {
            SettingValue::from_toml(value).ok_or_else(|| QuarryError::InvalidValue {
                key: key.clone(),
                message: format!("unsupported value {}", value),
            })
        };

        let value = convert(&value)?;
        let alternatives = raw
            .alternatives
            .map(|values| values.iter().map(convert).collect::<Result<Vec<_>>>())
            .transpose()?;

        Ok(Self {
            key,
            value_type,
            value,
            label,
            alternatives,
            tooltip: raw.tooltip,
        })
    }
}

/// 欠けている必須項目（key, type, value, label の順）
fn missing_keys(raw: &RawSetting) -> Vec<&'static str> {
    [
        ("key", raw.key.is_none()),
        ("type", raw.value_type.is_none()),
        ("value", raw.value.is_none()),
        ("label", raw.label.is_none()),
    ]
    .into_iter()
    .filter(|(_, missing)| *missing)
    .map(|(name, _)| name)
    .collect()
}
