//! 設定値と型変換

use super::credentials::UserNamePassword;
use crate::error::{QuarryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 設定値の型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    Bool,
    Int,
    Str,
    /// ユーザー名とパスワード（パスワードは秘密情報ストアに保存）
    Credentials,
}

impl SettingType {
    /// 値をこの型に変換する
    ///
    /// - `Bool`: bool、整数（0 以外は true）、"true/yes/on/1"・"false/no/off/0/"
    /// - `Int`: 整数、bool（0/1）、10 進数の文字列
    /// - `Str`: 任意のスカラー値
    /// - `Credentials`: 資格情報、またはユーザー名の文字列
    pub fn coerce(self, key: &str, value: SettingValue) -> Result<SettingValue> {
        let invalid = |value: &SettingValue| QuarryError::InvalidValue {
            key: key.to_string(),
            message: format!("cannot convert {} to {}", value.kind(), self),
        };

        match (self, value) {
            (SettingType::Bool, SettingValue::Bool(b)) => Ok(SettingValue::Bool(b)),
            (SettingType::Bool, SettingValue::Int(i)) => Ok(SettingValue::Bool(i != 0)),
            (SettingType::Bool, SettingValue::Str(s)) => {
                match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => Ok(SettingValue::Bool(true)),
                    "false" | "no" | "off" | "0" | "" => Ok(SettingValue::Bool(false)),
                    _ => Err(invalid(&SettingValue::Str(s))),
                }
            }
            (SettingType::Int, SettingValue::Int(i)) => Ok(SettingValue::Int(i)),
            (SettingType::Int, SettingValue::Bool(b)) => Ok(SettingValue::Int(i64::from(b))),
            (SettingType::Int, SettingValue::Str(s)) => match s.trim().parse::<i64>() {
                Ok(i) => Ok(SettingValue::Int(i)),
                Err(_) => Err(invalid(&SettingValue::Str(s))),
            },
            (SettingType::Str, SettingValue::Str(s)) => Ok(SettingValue::Str(s)),
            (SettingType::Str, SettingValue::Bool(b)) => Ok(SettingValue::Str(b.to_string())),
            (SettingType::Str, SettingValue::Int(i)) => Ok(SettingValue::Str(i.to_string())),
            (SettingType::Credentials, SettingValue::Credentials(c)) => {
                Ok(SettingValue::Credentials(c))
            }
            (SettingType::Credentials, SettingValue::Str(username)) => Ok(
                SettingValue::Credentials(UserNamePassword::new(username, None)),
            ),
            (_, other) => Err(invalid(&other)),
        }
    }

    /// 文字列入力（CLI など）をこの型に変換する
    pub fn parse(self, key: &str, text: &str) -> Result<SettingValue> {
        self.coerce(key, SettingValue::Str(text.to_string()))
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingType::Bool => "bool",
            SettingType::Int => "int",
            SettingType::Str => "str",
            SettingType::Credentials => "credentials",
        };
        f.write_str(name)
    }
}

/// 設定値
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Credentials(UserNamePassword),
}

impl SettingValue {
    fn kind(&self) -> &'static str {
        match self {
            SettingValue::Bool(_) => "bool",
            SettingValue::Int(_) => "int",
            SettingValue::Str(_) => "str",
            SettingValue::Credentials(_) => "credentials",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_credentials(&self) -> Option<&UserNamePassword> {
        match self {
            SettingValue::Credentials(c) => Some(c),
            _ => None,
        }
    }

    /// TOML の値から読み取る（対応しない値は None）
    ///
    /// `username` キーを持つテーブルは資格情報として読む（パスワードは含まない）。
    pub fn from_toml(value: &toml::Value) -> Option<Self> {
        match value {
            toml::Value::Boolean(b) => Some(SettingValue::Bool(*b)),
            toml::Value::Integer(i) => Some(SettingValue::Int(*i)),
            toml::Value::String(s) => Some(SettingValue::Str(s.clone())),
            toml::Value::Table(table) => table
                .get("username")
                .and_then(toml::Value::as_str)
                .map(|username| {
                    SettingValue::Credentials(UserNamePassword::new(username, None))
                }),
            _ => None,
        }
    }

    /// 設定ファイルに書く値（資格情報はユーザー名のみ）
    pub fn to_toml(&self) -> toml::Value {
        match self {
            SettingValue::Bool(b) => toml::Value::Boolean(*b),
            SettingValue::Int(i) => toml::Value::Integer(*i),
            SettingValue::Str(s) => toml::Value::String(s.clone()),
            SettingValue::Credentials(c) => toml::Value::String(c.username.clone()),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::Int(i) => write!(f, "{}", i),
            SettingValue::Str(s) => f.write_str(s),
            SettingValue::Credentials(c) => f.write_str(&c.username),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Int(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Str(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Str(value)
    }
}

impl From<UserNamePassword> for SettingValue {
    fn from(value: UserNamePassword) -> Self {
        SettingValue::Credentials(value)
    }
}

#[cfg(test)]
#[path = "value_test.rs"]
mod tests;

#[cfg(test)]
#[path = "value_proptests.rs"]
mod proptests;
