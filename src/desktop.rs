//! デスクトップ環境へのアクセス
//!
//! ファイルシステム、プロセス起動、アプリケーション索引、ボリューム監視を
//! ひとまとめにして Source / Leaf / Action に渡す。

use crate::application::{ApplicationIndex, XdgApplications};
use crate::env::{self, EnvVar};
use crate::error::{QuarryError, Result};
use crate::fs::{FileSystem, RealFs};
use crate::volume::{ProcMountsMonitor, VolumeMonitor};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

/// 端末エミュレータが指定されていない場合の既定値
const DEFAULT_TERMINAL: &str = "x-terminal-emulator";

/// 外部プロセスの起動
///
/// 起動したプロセスは待たない。
pub trait Spawner: Send + Sync {
    fn spawn(&self, argv: &[String], working_dir: Option<&Path>) -> Result<()>;
}

/// 実プロセスを起動する Spawner
///
/// 起動した子プロセスはそれぞれ専用のスレッドが終了を待って回収する。
pub struct ProcessSpawner;

impl ProcessSpawner {
    /// 起動して pid を返す
    pub fn start(&self, argv: &[String], working_dir: Option<&Path>) -> Result<u32> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| QuarryError::Operation("empty command line".to_string()))?;

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dir) = working_dir {
            command.current_dir(dir);
        }

        let child = command
            .spawn()
            .map_err(|e| QuarryError::Operation(format!("failed to start {}: {}", program, e)))?;
        let pid = child.id();
        debug!(pid, ?argv, "spawned process");
        reap(child);
        Ok(pid)
    }
}

impl Spawner for ProcessSpawner {
    fn spawn(&self, argv: &[String], working_dir: Option<&Path>) -> Result<()> {
        self.start(argv, working_dir).map(|_| ())
    }
}

/// 子プロセスの終了をバックグラウンドで待つ
fn reap(mut child: Child) {
    let pid = child.id();
    let spawned = thread::Builder::new()
        .name(format!("reap-{}", pid))
        .spawn(move || match child.wait() {
            Ok(status) => debug!(pid, %status, "process exited"),
            Err(e) => warn!(pid, "failed to wait for process: {}", e),
        });
    if let Err(e) = spawned {
        warn!(pid, "failed to start reaper thread: {}", e);
    }
}

/// 外部プロバイダ一式
pub struct Desktop {
    pub fs: Arc<dyn FileSystem>,
    pub spawner: Arc<dyn Spawner>,
    pub apps: Arc<dyn ApplicationIndex>,
    pub volumes: Arc<dyn VolumeMonitor>,
    /// 端末エミュレータの起動コマンド
    pub terminal: Vec<String>,
    pub home: PathBuf,
}

impl Desktop {
    /// 実環境のプロバイダで構築
    pub fn system() -> Result<Arc<Self>> {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFs);
        let apps = Arc::new(
            XdgApplications::new(Arc::clone(&fs), env::data_dirs())
                .with_mimeapps(vec![env::xdg_config_home()?.join("mimeapps.list")]),
        );
        let volumes = Arc::new(ProcMountsMonitor::new(Arc::clone(&fs)));

        Ok(Arc::new(Self {
            fs,
            spawner: Arc::new(ProcessSpawner),
            apps,
            volumes,
            terminal: terminal_command(EnvVar::get("TERMINAL").as_deref()),
            home: env::home_dir()?,
        }))
    }
}

/// `TERMINAL` の値から端末の起動コマンドを組み立てる
pub fn terminal_command(value: Option<&str>) -> Vec<String> {
    let argv: Vec<String> = value
        .unwrap_or_default()
        .split_whitespace()
        .map(String::from)
        .collect();
    if argv.is_empty() {
        vec![DEFAULT_TERMINAL.to_string()]
    } else {
        argv
    }
}

#[cfg(test)]
pub mod mock;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_command_default() {
        assert_eq!(terminal_command(None), vec!["x-terminal-emulator"]);
        assert_eq!(terminal_command(Some("  ")), vec!["x-terminal-emulator"]);
    }

    #[test]
    fn test_terminal_command_with_args() {
        assert_eq!(
            terminal_command(Some("kitty --single-instance")),
            vec!["kitty", "--single-instance"]
        );
    }

    #[test]
    fn test_process_spawner_rejects_empty_argv() {
        let err = ProcessSpawner.spawn(&[], None).unwrap_err();
        assert!(matches!(err, QuarryError::Operation(_)));
    }

    #[test]
    fn test_process_spawner_reports_missing_program() {
        let argv = vec!["quarry-no-such-program-xyz".to_string()];
        let err = ProcessSpawner.spawn(&argv, None).unwrap_err();
        assert!(err.to_string().contains("quarry-no-such-program-xyz"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_process_spawner_reaps_exited_children() {
        use std::time::{Duration, Instant};

        let argv = vec!["true".to_string()];
        let pids: Vec<u32> = (0..5)
            .map(|_| ProcessSpawner.start(&argv, None).unwrap())
            .collect();

        // 回収されればゾンビとしても /proc に残らない
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut left = pids.clone();
        while !left.is_empty() && Instant::now() < deadline {
            left.retain(|pid| Path::new(&format!("/proc/{}", pid)).exists());
            thread::sleep(Duration::from_millis(20));
        }
        assert!(left.is_empty(), "unreaped children: {:?}", left);
    }
}
