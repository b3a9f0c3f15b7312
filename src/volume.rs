//! リムーバブルボリューム
//!
//! マウント済みボリュームの列挙と取り外しを `VolumeMonitor` に抽象化する。
//! 取り外しは完了コールバック付きで発行し、呼び出し側は完了を待たない。
//! コールバックはホストのループが `dispatch_completions()` を呼んだときにだけ実行される。

mod monitor;
mod source;

pub use monitor::{parse_mounts, ProcMountsMonitor};
pub use source::{Unmount, VolumeLeaf, VolumesSource};

use crate::error::Result;
use serde::Serialize;
use std::path::PathBuf;

/// マウント済みボリューム
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mount {
    /// 監視側での識別子（マウントポイント）
    pub id: String,
    pub name: String,
    pub root: PathBuf,
    pub device: String,
    pub can_eject: bool,
    pub can_unmount: bool,
}

/// 取り外しの完了通知
pub type Completion = Box<dyn FnOnce(Result<()>) + Send>;

/// ボリュームの監視と操作
pub trait VolumeMonitor: Send + Sync {
    /// 現在マウントされているボリューム
    fn mounts(&self) -> Vec<Mount>;

    /// アンマウントして取り出す
    fn eject(&self, mount: &Mount, done: Completion);

    /// アンマウントする
    fn unmount(&self, mount: &Mount, done: Completion);

    /// 完了した操作のコールバックを実行し、未完了の操作数を返す
    fn dispatch_completions(&self) -> usize {
        0
    }

    /// `id` のボリュームがまだマウントされているか
    fn is_mounted(&self, id: &str) -> bool {
        self.mounts().iter().any(|m| m.id == id)
    }
}

#[cfg(test)]
pub mod mock;
