use super::*;
use crate::desktop::mock::TestDesktop;
use crate::source::mock::{leaf_names, RecordingListener};
use crate::source::RefreshListener;
use std::collections::HashSet;
use std::sync::Weak;

fn home_with_files() -> TestDesktop {
    let env = TestDesktop::new();
    env.fs.add_file("/home/user/notes.txt", "notes");
    env.fs.add_file("/home/user/.bashrc", "");
    env.fs.add_dir("/home/user/Documents");
    env.fs.add_file("/home/user/Documents/report.pdf", "");
    env.fs.add_dir("/home/user/Documents/.cache");
    env.fs.add_file("/home/user/Documents/.cache/blob", "");
    env.fs.add_dir("/home/user/.config");
    env.fs.add_file("/home/user/.config/app.toml", "");
    env
}

#[test]
fn test_directory_listing_hides_dot_entries() {
    let env = home_with_files();
    let source = DirectorySource::new("/home/user", false, env.desktop.clone());

    assert_eq!(
        leaf_names(&source.leaves()),
        vec!["Documents/", "notes.txt"]
    );
    assert_eq!(source.name(), "user");
}

#[test]
fn test_alternate_listing_is_superset() {
    let env = home_with_files();
    let plain = DirectorySource::new("/home/user", false, env.desktop.clone());
    let hidden = DirectorySource::new("/home/user", true, env.desktop.clone());

    let plain: HashSet<String> = leaf_names(&plain.leaves()).into_iter().collect();
    let all: HashSet<String> = leaf_names(&hidden.leaves()).into_iter().collect();

    assert!(all.is_superset(&plain));
    assert_eq!(
        all.difference(&plain).cloned().collect::<HashSet<_>>(),
        HashSet::from([".bashrc".to_string(), ".config/".to_string()])
    );
}

#[test]
fn test_parent_is_normalized_parent_directory() {
    let env = home_with_files();
    let source = DirectorySource::new("/home/user/Documents/../Documents", false, env.desktop.clone());
    assert_eq!(source.directory(), Path::new("/home/user/Documents"));

    let parent = source.parent().unwrap();
    assert_eq!(parent.name(), "user");
    assert_eq!(leaf_names(&parent.leaves()), vec!["Documents/", "notes.txt"]);
}

#[test]
fn test_parent_chain_terminates_at_root() {
    let env = home_with_files();
    let mut source: Arc<dyn Source> =
        Arc::new(DirectorySource::new("/home/user/Documents", true, env.desktop.clone()));

    let mut steps = 0;
    while source.has_parent() {
        source = source.parent().unwrap();
        steps += 1;
        assert!(steps < 10, "parent chain does not terminate");
    }

    assert_eq!(steps, 3);
    assert_eq!(source.name(), "/");
    assert!(matches!(source.parent(), Err(QuarryError::NoParent(_))));
}

#[test]
fn test_parent_does_not_inherit_hidden_flag() {
    let env = home_with_files();
    let source = DirectorySource::new("/home/user/Documents", true, env.desktop.clone());
    let parent = source.parent().unwrap();

    assert!(!leaf_names(&parent.leaves()).contains(&".bashrc".to_string()));
}

#[test]
fn test_directory_listing_is_cached_until_invalidated() {
    let env = home_with_files();
    let source = DirectorySource::new("/home/user", false, env.desktop.clone());
    source.leaves();

    env.fs.add_file("/home/user/new.txt", "");
    assert_eq!(source.leaves().len(), 2);

    source.invalidate();
    assert_eq!(
        leaf_names(&source.leaves()),
        vec!["Documents/", "new.txt", "notes.txt"]
    );
}

#[test]
fn test_unreadable_directory_yields_nothing() {
    let env = home_with_files();
    let source = DirectorySource::new("/home/user/notes.txt", false, env.desktop.clone());
    assert!(source.leaves().is_empty());
}

#[test]
fn test_relative_directory_is_absolutized() {
    let env = TestDesktop::new();
    let source = DirectorySource::new("some/relative/..", false, env.desktop.clone());
    assert!(source.directory().is_absolute());
    assert!(source.directory().ends_with("some"));
}

fn file_source(env: &TestDesktop, options: FileSourceOptions) -> FileSource {
    FileSource::new(
        "Home",
        vec![PathBuf::from("/home/user"), PathBuf::from("/home/user/Documents")],
        options,
        env.desktop.clone(),
    )
}

#[test]
fn test_file_source_flattens_roots() {
    let env = home_with_files();
    let source = file_source(&env, FileSourceOptions::default());

    assert_eq!(
        leaf_names(&source.leaves()),
        vec!["Documents", "notes.txt", "report.pdf"]
    );
}

#[test]
fn test_file_source_depth_and_hidden() {
    let env = home_with_files();
    let options = FileSourceOptions {
        depth: 1,
        show_hidden: true,
    };
    let source = FileSource::new(
        "Home",
        vec![PathBuf::from("/home/user")],
        options,
        env.desktop.clone(),
    );

    let names: HashSet<String> = leaf_names(&source.leaves()).into_iter().collect();

    assert!(names.contains("app.toml"));
    assert!(names.contains(".cache"));
    assert!(!names.contains("blob"));
}

#[test]
fn test_set_options_requests_refresh() {
    let env = home_with_files();
    let source = file_source(&env, FileSourceOptions::default());
    let listener = Arc::new(RecordingListener::default());
    source.set_refresh_callback(Arc::downgrade(&listener) as Weak<dyn RefreshListener>);
    assert_eq!(source.leaves().len(), 3);

    source.set_options(FileSourceOptions {
        depth: 0,
        show_hidden: true,
    });

    assert_eq!(*listener.changed.lock(), vec!["Home"]);
    assert_eq!(source.leaves().len(), 6);
}

#[test]
fn test_set_same_options_is_noop() {
    let env = home_with_files();
    let source = file_source(&env, FileSourceOptions::default());
    let listener = Arc::new(RecordingListener::default());
    source.set_refresh_callback(Arc::downgrade(&listener) as Weak<dyn RefreshListener>);
    let first = source.leaves();

    source.set_options(FileSourceOptions::default());

    assert!(listener.changed.lock().is_empty());
    assert!(Arc::ptr_eq(&first, &source.leaves()));
}
