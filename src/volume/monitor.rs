//! `/proc/self/mounts` を読むボリューム監視

use super::{Completion, Mount, VolumeMonitor};
use crate::error::{QuarryError, Result};
use crate::fs::FileSystem;
use crate::path_ext::PathExt;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use tracing::{debug, warn};

const MOUNTS_FILE: &str = "/proc/self/mounts";

/// リムーバブルメディアのマウント先
const REMOVABLE_ROOTS: &[&str] = &["/media", "/run/media", "/mnt"];

/// 光学メディアのファイルシステム
const OPTICAL_FS: &[&str] = &["iso9660", "udf"];

enum Pending {
    Running { child: Child, label: String },
    Finished(Result<()>),
}

/// `/proc/self/mounts` と外部コマンドによる `VolumeMonitor`
///
/// 取り外しコマンドは子プロセスとして起動し、`dispatch_completions()` で
/// 終了をポーリングする（待ち合わせはしない）。
pub struct ProcMountsMonitor {
    fs: Arc<dyn FileSystem>,
    mounts_file: PathBuf,
    unmount_command: Vec<String>,
    eject_command: Vec<String>,
    pending: Mutex<Vec<(Pending, Completion)>>,
}

impl ProcMountsMonitor {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            mounts_file: PathBuf::from(MOUNTS_FILE),
            unmount_command: vec![
                "udisksctl".to_string(),
                "unmount".to_string(),
                "--no-user-interaction".to_string(),
                "--block-device".to_string(),
            ],
            eject_command: vec!["eject".to_string()],
            pending: Mutex::new(Vec::new()),
        }
    }

    /// 取り外しに使うコマンドを差し替える（デバイスパスが末尾に付く）
    pub fn with_commands(mut self, unmount: Vec<String>, eject: Vec<String>) -> Self {
        self.unmount_command = unmount;
        self.eject_command = eject;
        self
    }

    pub fn with_mounts_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.mounts_file = path.into();
        self
    }

    fn start(&self, command: &[String], mount: &Mount, done: Completion) {
        let label = format!("{} {}", command.join(" "), mount.device);
        let state = match spawn(command, &mount.device) {
            Ok(child) => {
                debug!(pid = child.id(), command = %label, "started volume operation");
                Pending::Running { child, label }
            }
            Err(e) => Pending::Finished(Err(e)),
        };
        self.pending.lock().push((state, done));
    }
}

fn spawn(command: &[String], device: &str) -> Result<Child> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| QuarryError::Operation("empty volume command".to_string()))?;
    Command::new(program)
        .args(args)
        .arg(device)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| QuarryError::Operation(format!("failed to start {}: {}", program, e)))
}

impl VolumeMonitor for ProcMountsMonitor {
    fn mounts(&self) -> Vec<Mount> {
        match self.fs.read_to_string(&self.mounts_file) {
            Ok(content) => parse_mounts(&content),
            Err(e) => {
                warn!(path = %self.mounts_file.display(), "failed to read mounts: {}", e);
                Vec::new()
            }
        }
    }

    fn eject(&self, mount: &Mount, done: Completion) {
        self.start(&self.eject_command, mount, done);
    }

    fn unmount(&self, mount: &Mount, done: Completion) {
        self.start(&self.unmount_command, mount, done);
    }

    fn dispatch_completions(&self) -> usize {
        let mut ready = Vec::new();
        let remaining = {
            let mut pending = self.pending.lock();
            let mut still_running = Vec::new();
            for (state, done) in pending.drain(..) {
                match poll(state) {
                    Pending::Finished(result) => ready.push((result, done)),
                    running => still_running.push((running, done)),
                }
            }
            *pending = still_running;
            pending.len()
        };

        // コールバック中はロックを持たない
        for (result, done) in ready {
            done(result);
        }
        remaining
    }
}

fn poll(state: Pending) -> Pending {
    match state {
        Pending::Running { mut child, label } => match child.try_wait() {
            Ok(Some(status)) if status.success() => Pending::Finished(Ok(())),
            Ok(Some(status)) => Pending::Finished(Err(QuarryError::Operation(format!(
                "{} exited with {}",
                label, status
            )))),
            Ok(None) => Pending::Running { child, label },
            Err(e) => Pending::Finished(Err(e.into())),
        },
        finished => finished,
    }
}

/// `/proc/self/mounts` 形式からリムーバブルメディアのマウントを取り出す
pub fn parse_mounts(content: &str) -> Vec<Mount> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let device = unescape_octal(fields.next()?);
            let root = PathBuf::from(unescape_octal(fields.next()?));
            let fstype = fields.next()?;
            if !is_removable_root(&root) {
                return None;
            }
            Some(Mount {
                id: root.display().to_string(),
                name: root.display_name(),
                can_eject: device.starts_with("/dev/sr") || OPTICAL_FS.contains(&fstype),
                can_unmount: true,
                device,
                root,
            })
        })
        .collect()
}

fn is_removable_root(path: &Path) -> bool {
    REMOVABLE_ROOTS
        .iter()
        .any(|base| path != Path::new(base) && path.starts_with(base))
}

/// `\040` 形式の 8 進エスケープを戻す
fn unescape_octal(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            if let Some(value) = bytes.get(i + 1..i + 4).and_then(octal_byte) {
                out.push(value);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn octal_byte(digits: &[u8]) -> Option<u8> {
    let value = digits.iter().try_fold(0u32, |acc, &d| {
        (b'0'..=b'7').contains(&d).then(|| acc * 8 + u32::from(d - b'0'))
    })?;
    u8::try_from(value).ok()
}

#[cfg(test)]
#[path = "monitor_test.rs"]
mod tests;
