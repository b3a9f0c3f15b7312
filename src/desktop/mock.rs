//! テスト用のデスクトップ環境

use super::*;
use crate::fs::mock::MockFs;
use crate::volume::mock::MockVolumeMonitor;
use parking_lot::Mutex;

/// 起動要求を記録するだけの Spawner
#[derive(Default)]
pub struct RecordingSpawner {
    pub calls: Mutex<Vec<(Vec<String>, Option<PathBuf>)>>,
}

impl RecordingSpawner {
    /// 記録されたコマンドライン
    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.calls.lock().iter().map(|(argv, _)| argv.clone()).collect()
    }
}

impl Spawner for RecordingSpawner {
    fn spawn(&self, argv: &[String], working_dir: Option<&Path>) -> Result<()> {
        self.calls
            .lock()
            .push((argv.to_vec(), working_dir.map(Path::to_path_buf)));
        Ok(())
    }
}

/// モック一式を組み込んだ Desktop
///
/// アプリケーション索引は `/usr/share/applications` を MockFs 上で読む。
pub struct TestDesktop {
    pub fs: Arc<MockFs>,
    pub spawner: Arc<RecordingSpawner>,
    pub volumes: Arc<MockVolumeMonitor>,
    pub desktop: Arc<Desktop>,
}

impl TestDesktop {
    pub fn new() -> Self {
        let fs = Arc::new(MockFs::new());
        fs.add_dir("/");
        fs.add_dir("/home");
        fs.add_dir("/home/user");
        let spawner = Arc::new(RecordingSpawner::default());
        let volumes = Arc::new(MockVolumeMonitor::new());
        let shared_fs: Arc<dyn FileSystem> = fs.clone();
        let apps = Arc::new(XdgApplications::new(
            Arc::clone(&shared_fs),
            vec![PathBuf::from("/usr/share")],
        ));

        let desktop = Arc::new(Desktop {
            fs: shared_fs,
            spawner: spawner.clone(),
            apps,
            volumes: volumes.clone(),
            terminal: vec!["xterm".to_string()],
            home: PathBuf::from("/home/user"),
        });

        Self {
            fs,
            spawner,
            volumes,
            desktop,
        }
    }
}

impl Default for TestDesktop {
    fn default() -> Self {
        Self::new()
    }
}
