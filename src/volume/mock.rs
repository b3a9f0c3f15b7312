//! テスト用ボリューム監視

use super::*;
use parking_lot::Mutex;

/// 要求された操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Eject(String),
    Unmount(String),
}

/// マウントを手で付け外しできる監視
///
/// `dispatch_completions()` で保留中の操作をすべて成功させ、対象を外す。
#[derive(Default)]
pub struct MockVolumeMonitor {
    mounts: Mutex<Vec<Mount>>,
    requests: Mutex<Vec<Request>>,
    pending: Mutex<Vec<(String, Completion)>>,
}

impl MockVolumeMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, mount: Mount) {
        self.mounts.lock().push(mount);
    }

    pub fn detach(&self, id: &str) {
        self.mounts.lock().retain(|m| m.id != id);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }
}

impl VolumeMonitor for MockVolumeMonitor {
    fn mounts(&self) -> Vec<Mount> {
        self.mounts.lock().clone()
    }

    fn eject(&self, mount: &Mount, done: Completion) {
        self.requests.lock().push(Request::Eject(mount.id.clone()));
        self.pending.lock().push((mount.id.clone(), done));
    }

    fn unmount(&self, mount: &Mount, done: Completion) {
        self.requests.lock().push(Request::Unmount(mount.id.clone()));
        self.pending.lock().push((mount.id.clone(), done));
    }

    fn dispatch_completions(&self) -> usize {
        let ready: Vec<_> = self.pending.lock().drain(..).collect();
        for (id, done) in ready {
            self.detach(&id);
            done(Ok(()));
        }
        0
    }
}

/// テスト用のマウント
pub fn usb_stick(name: &str, can_eject: bool) -> Mount {
    let root = PathBuf::from(format!("/media/user/{}", name));
    Mount {
        id: root.display().to_string(),
        name: name.to_string(),
        root,
        device: "/dev/sdb1".to_string(),
        can_eject,
        can_unmount: true,
    }
}
