use super::*;
use crate::desktop::mock::TestDesktop;
use crate::source::mock::leaf_names;

fn names(actions: &[Arc<dyn Action>]) -> Vec<String> {
    actions.iter().map(|a| a.name().to_string()).collect()
}

fn install_app(env: &TestDesktop, id: &str, name: &str, exec: &str, mime: &str) {
    env.fs.add_dir("/usr/share/applications");
    env.fs.add_file(
        &format!("/usr/share/applications/{}", id),
        &format!(
            "[Desktop Entry]\nType=Application\nName={}\nExec={}\nMimeType={}\n",
            name, exec, mime
        ),
    );
}

fn leaf(env: &TestDesktop, path: &str) -> FileLeaf {
    FileLeaf::new(PathBuf::from(path), env.desktop.clone())
}

#[test]
fn test_directory_actions() {
    let env = TestDesktop::new();
    env.fs.add_dir("/home/user/Music");
    let leaf = leaf(&env, "/home/user/Music");

    assert_eq!(
        names(&leaf.actions()),
        vec!["Open", "Echo", "Put on dragbox", "Open Terminal here"]
    );
    assert_eq!(leaf.icon_name(), "folder");
}

#[test]
fn test_file_without_applications_defaults_to_show() {
    let env = TestDesktop::new();
    env.fs.add_file("/home/user/README", "");
    let leaf = leaf(&env, "/home/user/README");

    assert_eq!(names(&leaf.actions()), vec!["Show", "Echo", "Put on dragbox"]);
}

#[test]
fn test_file_actions_use_default_application_first() {
    let env = TestDesktop::new();
    install_app(&env, "gedit.desktop", "Text Editor", "gedit %U", "text/plain;");
    install_app(&env, "vim.desktop", "Vim", "vim %F", "text/plain;");
    env.fs.add_file(
        "/usr/share/applications/mimeapps.list",
        "[Default Applications]\ntext/plain=vim.desktop\n",
    );
    env.fs.add_file("/home/user/notes.txt", "");
    let leaf = leaf(&env, "/home/user/notes.txt");

    assert_eq!(names(&leaf.actions()), vec!["Vim", "Echo", "Put on dragbox", "Text Editor"]);
}

#[test]
fn test_file_actions_without_default_application() {
    let env = TestDesktop::new();
    install_app(&env, "gedit.desktop", "Text Editor", "gedit %U", "text/plain;");
    env.fs.add_file("/home/user/notes.txt", "");
    let leaf = leaf(&env, "/home/user/notes.txt");

    assert_eq!(names(&leaf.actions()), vec!["Show", "Echo", "Put on dragbox", "Text Editor"]);
}

#[test]
fn test_default_action_opens_file() {
    let env = TestDesktop::new();
    env.fs.add_file("/home/user/README", "");
    let leaf = leaf(&env, "/home/user/README");

    leaf.default_action().unwrap().activate(&leaf);

    assert_eq!(
        env.spawner.argvs(),
        vec![vec!["xdg-open", "/home/user/README"]]
    );
}

#[test]
fn test_open_with_launches_once_for_many_files() {
    let env = TestDesktop::new();
    install_app(&env, "gimp.desktop", "GIMP", "gimp %U", "image/png;");
    env.fs.add_file("/home/user/a.png", "");
    env.fs.add_file("/home/user/b.png", "");
    let leaves: Vec<Arc<dyn Leaf>> = vec![
        Arc::new(leaf(&env, "/home/user/a.png")),
        Arc::new(leaf(&env, "/home/user/b.png")),
    ];

    let actions = leaves[0].actions();
    let action = &actions[3];
    assert_eq!(action.name(), "GIMP");
    action.activate_many(&leaves);

    assert_eq!(
        env.spawner.argvs(),
        vec![vec!["gimp", "/home/user/a.png", "/home/user/b.png"]]
    );
}

#[test]
fn test_open_terminal_in_directory() {
    let env = TestDesktop::new();
    env.fs.add_dir("/home/user/src");
    let leaf = leaf(&env, "/home/user/src");

    leaf.actions()[3].activate(&leaf);

    let calls = env.spawner.calls.lock();
    assert_eq!(calls[0].0, vec!["xterm"]);
    assert_eq!(calls[0].1.as_deref(), Some(Path::new("/home/user/src")));
}

#[test]
fn test_dragbox_receives_path() {
    let env = TestDesktop::new();
    env.fs.add_file("/home/user/README", "");
    let leaf = leaf(&env, "/home/user/README");

    let actions = leaf.actions();
    assert_eq!(actions[2].name(), "Put on dragbox");
    actions[2].activate(&leaf);

    assert_eq!(
        env.spawner.argvs(),
        vec![vec!["dragbox", "--file", "/home/user/README"]]
    );
}

#[test]
fn test_content_source_for_directory() {
    let env = TestDesktop::new();
    env.fs.add_dir("/home/user/src");
    env.fs.add_file("/home/user/src/main.rs", "");
    env.fs.add_file("/home/user/src/.hidden", "");
    let leaf = leaf(&env, "/home/user/src");

    assert!(leaf.has_content());
    assert_eq!(
        leaf_names(&leaf.content_source(false).unwrap().leaves()),
        vec!["main.rs"]
    );
    assert_eq!(
        leaf_names(&leaf.content_source(true).unwrap().leaves()),
        vec![".hidden", "main.rs"]
    );
}

#[test]
fn test_alternate_content_is_never_reused() {
    let env = TestDesktop::new();
    env.fs.add_dir("/home/user/src");
    let leaf = leaf(&env, "/home/user/src");

    let first = leaf.content_source(true).unwrap();
    let second = leaf.content_source(true).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_file_has_no_content() {
    let env = TestDesktop::new();
    env.fs.add_file("/home/user/notes.txt", "");
    let leaf = leaf(&env, "/home/user/notes.txt");

    assert!(!leaf.has_content());
    let err = leaf.content_source(false).unwrap_err();
    assert!(matches!(err, QuarryError::NoContent(ref name) if name == "notes.txt"));
}

#[test]
fn test_validity_follows_filesystem() {
    let env = TestDesktop::new();
    env.fs.add_file("/home/user/notes.txt", "");
    let leaf = leaf(&env, "/home/user/notes.txt");
    assert!(leaf.is_valid());

    env.fs.remove("/home/user/notes.txt");

    assert!(!leaf.is_valid());
}

#[test]
fn test_echo_accepts_any_leaf() {
    Echo.activate(&crate::leaf::TextLeaf::new("payload", "Label"));
}
