//! gsw-sheet
//!
//! Spreadsheet sink boundary. A finished [`SheetTable`] is published as two
//! range updates: the header row at `A{line}` and the data rows from
//! `A{line+1}`. The live spreadsheet API sits behind [`SheetWriter`]; this
//! crate ships the file-backed writer used for runs and tests.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use gsw_table::{SheetTable, SheetValue};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// One range write: `values` land starting at the `range` anchor cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetUpdate {
    pub range: String,
    pub values: Vec<Vec<SheetValue>>,
}

/// Header update at `A{line}` followed by the data update at `A{line+1}`.
pub fn table_updates(table: &SheetTable, line: u32) -> Vec<SheetUpdate> {
    let header = table
        .header
        .iter()
        .map(|h| SheetValue::Text(h.clone()))
        .collect();
    vec![
        SheetUpdate {
            range: format!("A{line}"),
            values: vec![header],
        },
        SheetUpdate {
            range: format!("A{}", line + 1),
            values: table.rows.clone(),
        },
    ]
}

/// Destination for range updates on a named worksheet.
pub trait SheetWriter {
    fn update(&mut self, sheet: &str, update: &SheetUpdate) -> Result<()>;
}

/// Write `table` to `sheet`, header first.
pub fn publish(
    writer: &mut dyn SheetWriter,
    sheet: &str,
    table: &SheetTable,
    line: u32,
) -> Result<()> {
    for update in table_updates(table, line) {
        writer
            .update(sheet, &update)
            .with_context(|| format!("sheet update failed: {sheet}!{}", update.range))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Run directory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: i32,
    pub run_id: Uuid,
    pub workbook: String,
    pub resource: String,
    pub config_hash: String,
    pub created_at_utc: DateTime<Utc>,
}

pub struct InitRunDirArgs<'a> {
    pub out_root: &'a Path,
    pub run_id: Uuid,
    pub workbook: &'a str,
    pub resource: &'a str,
    pub config_hash: &'a str,
}

/// `<out_root>/<run_id>/` with its `manifest.json`.
pub fn init_run_dir(args: InitRunDirArgs<'_>) -> Result<PathBuf> {
    let run_dir = args.out_root.join(args.run_id.to_string());
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("create run dir failed: {}", run_dir.display()))?;

    let manifest = RunManifest {
        schema_version: 1,
        run_id: args.run_id,
        workbook: args.workbook.to_string(),
        resource: args.resource.to_string(),
        config_hash: args.config_hash.to_string(),
        created_at_utc: Utc::now(),
    };

    let manifest_path = run_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(&manifest).context("serialize manifest failed")?;
    fs::write(&manifest_path, format!("{json}\n"))
        .with_context(|| format!("write manifest failed: {}", manifest_path.display()))?;

    Ok(run_dir)
}

// ---------------------------------------------------------------------------
// File-backed writer
// ---------------------------------------------------------------------------

/// Appends every update as one JSON line to `<dir>/<sheet>.jsonl`.
#[derive(Debug, Clone)]
pub struct FileSheetWriter {
    dir: PathBuf,
}

impl FileSheetWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn sheet_path(&self, sheet: &str) -> PathBuf {
        self.dir.join(format!("{}.jsonl", sanitize_file_stem(sheet)))
    }
}

impl SheetWriter for FileSheetWriter {
    fn update(&mut self, sheet: &str, update: &SheetUpdate) -> Result<()> {
        let path = self.sheet_path(sheet);
        let line = serde_json::to_string(update).context("serialize sheet update failed")?;
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open sheet file failed: {}", path.display()))?;
        writeln!(f, "{line}").with_context(|| format!("append failed: {}", path.display()))?;

        info!(
            sheet,
            range = %update.range,
            rows = update.values.len(),
            "sheet range written"
        );
        Ok(())
    }
}

/// Sheet names may contain characters that are not valid in file names.
fn sanitize_file_stem(sheet: &str) -> String {
    sheet
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
