//! quarry volumes コマンド
//!
//! マウント済みのボリュームを表示する。`--unmount` では取り外し Action を実行し、
//! 完了通知が届くまで待つ。

use super::Session;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use owo_colors::OwoColorize;
use quarry::leaf::Leaf;
use quarry::object::CatalogObject;
use quarry::volume::VolumeLeaf;
use std::sync::Arc;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const UNMOUNT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Parser)]
pub struct Args {
    /// Unmount (or eject) the volume with this name
    #[arg(long, value_name = "NAME")]
    pub unmount: Option<String>,
}

pub fn run(args: Args) -> Result<(), String> {
    let session = Session::open()?;
    let plugin = session
        .catalog
        .plugin("volumes")
        .map_err(|e| e.to_string())?;
    let leaves: Vec<Arc<dyn Leaf>> = plugin
        .sources()
        .iter()
        .flat_map(|source| source.leaves().iter().cloned().collect::<Vec<_>>())
        .collect();

    match args.unmount {
        Some(name) => unmount(&session, &leaves, &name),
        None => {
            print_table(&leaves);
            Ok(())
        }
    }
}

fn print_table(leaves: &[Arc<dyn Leaf>]) {
    if leaves.is_empty() {
        println!("No volumes mounted");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Mounted at", "Device", "Actions"]);
    for leaf in leaves {
        let Some(volume) = leaf.as_any().downcast_ref::<VolumeLeaf>() else {
            continue;
        };
        let mount = volume.mount();
        let actions: Vec<String> = leaf.actions().iter().map(|a| a.to_string()).collect();
        table.add_row(vec![
            mount.name.clone(),
            mount.root.display().to_string(),
            mount.device.clone(),
            actions.join(", "),
        ]);
    }
    println!("{table}");
}

fn unmount(session: &Session, leaves: &[Arc<dyn Leaf>], name: &str) -> Result<(), String> {
    let leaf = leaves
        .iter()
        .find(|leaf| leaf.name() == name)
        .ok_or_else(|| format!("Volume not found: {}", name))?;
    // 先頭は Open、その次が Eject / Unmount
    let actions = leaf.actions();
    let action = actions
        .get(1)
        .ok_or_else(|| format!("Volume '{}' cannot be unmounted", name))?;

    action.activate(leaf.as_ref());

    let monitor = &session.desktop.volumes;
    let started = Instant::now();
    while monitor.dispatch_completions() > 0 {
        if started.elapsed() > UNMOUNT_TIMEOUT {
            return Err(format!("Timed out waiting for '{}' to unmount", name));
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    if leaf.is_valid() {
        return Err(format!("Failed to {} '{}'", action.name().to_lowercase(), name));
    }
    println!("{} {} {}", "✓".green(), action, name);
    Ok(())
}
