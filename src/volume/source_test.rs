use super::*;
use crate::desktop::mock::TestDesktop;
use crate::source::mock::leaf_names;
use crate::volume::mock::{usb_stick, Request};

fn names(actions: &[Arc<dyn Action>]) -> Vec<String> {
    actions.iter().map(|a| a.name().to_string()).collect()
}

#[test]
fn test_volumes_source_is_dynamic() {
    let env = TestDesktop::new();
    let source = VolumesSource::new(env.desktop.clone());
    assert!(source.is_dynamic());
    assert!(source.leaves().is_empty());

    env.volumes.attach(usb_stick("STICK", false));

    assert_eq!(leaf_names(&source.leaves()), vec!["STICK"]);
}

#[test]
fn test_volume_leaf_actions() {
    let env = TestDesktop::new();
    let stick = VolumeLeaf::new(usb_stick("STICK", false), env.desktop.clone());
    let dvd = VolumeLeaf::new(usb_stick("DVD", true), env.desktop.clone());

    assert_eq!(names(&stick.actions()), vec!["Open", "Unmount"]);
    assert_eq!(names(&dvd.actions()), vec!["Open", "Eject"]);
    assert_eq!(
        stick.description().as_deref(),
        Some("Volume mounted at /media/user/STICK")
    );
}

#[test]
fn test_volume_leaf_content_is_mount_root() {
    let env = TestDesktop::new();
    env.fs.add_dir("/media/user/STICK");
    env.fs.add_file("/media/user/STICK/photo.jpg", "");
    env.fs.add_file("/media/user/STICK/.Trash", "");
    let leaf = VolumeLeaf::new(usb_stick("STICK", false), env.desktop.clone());

    assert!(leaf.has_content());
    assert_eq!(
        leaf_names(&leaf.content_source(false).unwrap().leaves()),
        vec!["photo.jpg"]
    );
    assert_eq!(
        leaf_names(&leaf.content_source(true).unwrap().leaves()),
        vec![".Trash", "photo.jpg"]
    );
}

#[test]
fn test_volume_leaf_validity_follows_monitor() {
    let env = TestDesktop::new();
    let mount = usb_stick("STICK", false);
    env.volumes.attach(mount.clone());
    let leaf = VolumeLeaf::new(mount, env.desktop.clone());
    assert!(leaf.is_valid());

    env.volumes.detach("/media/user/STICK");

    assert!(!leaf.is_valid());
}

#[test]
fn test_unmount_is_fire_and_forget() {
    let env = TestDesktop::new();
    let mount = usb_stick("STICK", false);
    env.volumes.attach(mount.clone());
    let leaf = VolumeLeaf::new(mount, env.desktop.clone());

    Unmount::new().activate(&leaf);

    assert_eq!(
        env.volumes.requests(),
        vec![Request::Unmount("/media/user/STICK".to_string())]
    );
    // 完了はホストのループが配送するまで反映されない
    assert!(leaf.is_valid());
    env.volumes.dispatch_completions();
    assert!(!leaf.is_valid());
}

#[test]
fn test_eject_prefers_eject() {
    let env = TestDesktop::new();
    let mount = usb_stick("DVD", true);
    env.volumes.attach(mount.clone());
    let leaf = VolumeLeaf::new(mount, env.desktop.clone());

    let actions = leaf.actions();
    actions[1].activate(&leaf);

    assert_eq!(
        env.volumes.requests(),
        vec![Request::Eject("/media/user/DVD".to_string())]
    );
}

#[test]
fn test_unmount_skips_invalid_leaf() {
    let env = TestDesktop::new();
    let leaf = VolumeLeaf::new(usb_stick("GONE", false), env.desktop.clone());

    Unmount::new().activate(&leaf);

    assert!(env.volumes.requests().is_empty());
}

#[test]
fn test_unmount_ignores_other_leaves() {
    let env = TestDesktop::new();
    Unmount::new().activate(&crate::leaf::TextLeaf::new("x", "x"));
    assert!(env.volumes.requests().is_empty());
}
