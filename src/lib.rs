//! quarry: デスクトップ・ランチャーのカタログエンジン
//!
//! プラグインが提供する Source から Leaf を集め、Leaf ごとに Action を提示する。
//! 詳細は各モジュールを参照。

pub mod action;
pub mod application;
pub mod catalog;
pub mod desktop;
pub mod env;
pub mod error;
pub mod file;
pub mod fs;
pub mod leaf;
pub mod object;
pub mod path_ext;
pub mod plugin;
pub mod settings;
pub mod source;
pub mod volume;
