//! quarry sources コマンド
//!
//! ロード済みプラグインのソースを一覧表示する。

use super::Session;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use owo_colors::OwoColorize;
use quarry::object::CatalogObject;

#[derive(Debug, Parser)]
pub struct Args {
    /// Also count the items of each source
    #[arg(long)]
    pub count: bool,
}

pub fn run(args: Args) -> Result<(), String> {
    let session = Session::open()?;
    let catalog = &session.catalog;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    let mut header = vec!["Source", "Plugin", "Description", "Top level"];
    if args.count {
        header.push("Items");
    }
    table.set_header(header);

    for plugin in catalog.plugins() {
        let top_level = if plugin.show_in_catalog() { "yes" } else { "no" };
        for source in plugin.sources() {
            let mut row = vec![
                source.name().to_string(),
                plugin.id().to_string(),
                source.description().unwrap_or_default(),
                top_level.to_string(),
            ];
            if args.count {
                row.push(source.leaves().len().to_string());
            }
            table.add_row(row);
        }
    }

    println!("{table}");
    if !catalog.disabled().is_empty() {
        println!(
            "{} plugin(s) disabled (see `quarry plugins`)",
            catalog.disabled().len().to_string().yellow()
        );
    }
    Ok(())
}
