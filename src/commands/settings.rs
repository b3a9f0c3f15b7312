//! quarry settings コマンド
//!
//! プラグイン設定の表示と変更。変更はコントローラ経由で保存され、
//! ロード済みのソースにもその場で反映される。

use super::Session;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use owo_colors::OwoColorize;

#[derive(Debug, Parser)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the settings of a plugin
    List {
        /// Plugin id
        plugin: String,
    },

    /// Change a setting and save it
    Set {
        /// Plugin id
        plugin: String,
        /// Setting key
        key: String,
        /// New value (converted to the setting's type)
        value: String,
    },
}

pub fn run(args: Args) -> Result<(), String> {
    let session = Session::open()?;
    match args.command {
        Command::List { plugin } => list(&session, &plugin),
        Command::Set { plugin, key, value } => set(&session, &plugin, &key, &value),
    }
}

fn list(session: &Session, plugin_id: &str) -> Result<(), String> {
    let plugin = session
        .catalog
        .plugin(plugin_id)
        .map_err(|e| e.to_string())?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Key", "Type", "Value", "Label", "Alternatives"]);
    for desc in plugin.settings().descriptors() {
        let alternatives = desc
            .alternatives
            .as_ref()
            .map(|alts| {
                alts.iter()
                    .map(|alt| alt.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        table.add_row(vec![
            desc.key.clone(),
            desc.value_type.to_string(),
            desc.value.to_string(),
            desc.label.clone(),
            alternatives,
        ]);
    }
    println!("{table}");
    Ok(())
}

fn set(session: &Session, plugin_id: &str, key: &str, text: &str) -> Result<(), String> {
    let plugin = session
        .catalog
        .plugin(plugin_id)
        .map_err(|e| e.to_string())?;
    let value_type = plugin.settings().value_type(key).map_err(|e| e.to_string())?;
    let value = value_type.parse(key, text).map_err(|e| e.to_string())?;

    let controller = session.catalog.controller();
    controller
        .set_plugin_config(plugin_id, key, value, value_type)
        .map_err(|e| e.to_string())?;
    controller
        .save()
        .map_err(|e| format!("Failed to save settings: {}", e))?;

    let current = plugin.settings().get(key).map_err(|e| e.to_string())?;
    println!("{} {}.{} = {}", "✓".green(), plugin_id, key, current);
    Ok(())
}
