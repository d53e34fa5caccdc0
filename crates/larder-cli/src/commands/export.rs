//! Export command implementation

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use larder_core::{db::Database, ExportFormat, ExportKind};

pub fn cmd_export(db: &Database, kind: &str, format: &str, output: Option<PathBuf>) -> Result<()> {
    let kind: ExportKind = kind.parse().map_err(anyhow::Error::msg)?;
    let format: ExportFormat = format.parse().map_err(anyhow::Error::msg)?;
    tracing::debug!(?kind, ?format, "Exporting");

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let count = db.export(kind, format, BufWriter::new(file))?;
            println!("✅ Exported {} record(s) to {}", count, path.display());
        }
        None => {
            // Write to stdout
            db.export(kind, format, io::stdout().lock())?;
        }
    }

    Ok(())
}
