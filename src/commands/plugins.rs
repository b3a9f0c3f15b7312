//! quarry plugins コマンド
//!
//! ロード済みのプラグインと、無効化されたプラグインの理由を表示する。

use super::Session;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use owo_colors::OwoColorize;

#[derive(Debug, Parser)]
pub struct Args {
    /// Output only plugin ids
    #[arg(long)]
    pub simple: bool,
}

pub fn run(args: Args) -> Result<(), String> {
    let session = Session::open()?;
    let catalog = &session.catalog;

    if args.simple {
        for plugin in catalog.plugins() {
            println!("{}", plugin.id());
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Name", "Version", "Sources", "Description"]);
    for plugin in catalog.plugins() {
        let manifest = plugin.manifest();
        table.add_row(vec![
            manifest.id.clone(),
            manifest.name.clone(),
            manifest.version.clone().unwrap_or_else(|| "-".to_string()),
            manifest.sources.join(", "),
            manifest.description.clone().unwrap_or_default(),
        ]);
    }
    println!("{table}");

    if !catalog.disabled().is_empty() {
        println!("\n{}", "Disabled plugins:".red().bold());
        for disabled in catalog.disabled() {
            println!("  {} {}: {}", "✗".red(), disabled.id, disabled.reason);
        }
    }
    Ok(())
}
