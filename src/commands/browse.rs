//! quarry browse コマンド
//!
//! ディレクトリをカタログと同じ形で表示する（Leaf とその Action）。

use super::Session;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use quarry::leaf::Leaf;
use quarry::object::CatalogObject;
use quarry::source::{DirectorySource, Source};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
pub struct Args {
    /// Directory to browse (defaults to the home directory)
    pub path: Option<PathBuf>,

    /// Include hidden entries
    #[arg(long)]
    pub hidden: bool,

    /// Walk up this many parent directories first
    #[arg(long, default_value_t = 0)]
    pub up: usize,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// 出力用の Leaf 情報
#[derive(Debug, Serialize)]
struct LeafRow {
    name: String,
    object: String,
    has_content: bool,
    actions: Vec<String>,
}

impl LeafRow {
    fn new(leaf: &Arc<dyn Leaf>) -> Self {
        Self {
            name: leaf.name().to_string(),
            object: leaf.object().to_string(),
            has_content: leaf.has_content(),
            actions: leaf.actions().iter().map(|a| a.to_string()).collect(),
        }
    }
}

pub fn run(args: Args) -> Result<(), String> {
    let session = Session::open()?;
    let path = args
        .path
        .unwrap_or_else(|| session.desktop.home.clone());

    let mut source: Arc<dyn Source> = Arc::new(DirectorySource::new(
        path,
        args.hidden,
        Arc::clone(&session.desktop),
    ));
    for _ in 0..args.up {
        if !source.has_parent() {
            break;
        }
        source = source.parent().map_err(|e| e.to_string())?;
    }

    let rows: Vec<LeafRow> = source.leaves().iter().map(LeafRow::new).collect();

    if args.json {
        let json = serde_json::to_string_pretty(&rows)
            .map_err(|e| format!("Failed to serialize leaves: {}", e))?;
        println!("{json}");
        return Ok(());
    }

    println!(
        "{} ({})",
        source.name(),
        source.description().unwrap_or_default()
    );
    if rows.is_empty() {
        println!("No items");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Default action", "Other actions"]);
    for row in &rows {
        let (default, others) = match row.actions.split_first() {
            Some((first, rest)) => (first.clone(), rest.join(", ")),
            None => (String::new(), String::new()),
        };
        table.add_row(vec![row.name.clone(), default, others]);
    }
    println!("{table}");
    println!("{} item(s)", rows.len());
    Ok(())
}
