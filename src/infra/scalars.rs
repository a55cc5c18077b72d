// ============================================================
// Layer 6 - Scalar Log Writer
// ============================================================
// Directory-based log of named scalar series.
//
// Every call to add_scalar appends one row to
// <logdir>/scalars.csv:
//
//   tag,step,value
//   train/loss,0,2.302585
//   eval/accuracy,0,0.000000
//
// The header is written only when the file is new, so several
// runs against the same directory append to one log.
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// One logged point of a scalar series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarRecord {
    pub tag:   String,
    pub step:  u64,
    pub value: f64,
}

pub struct ScalarWriter {
    csv_path: PathBuf,
}

impl ScalarWriter {
    /// Create the log directory and the CSV header if needed.
    pub fn new(logdir: impl Into<PathBuf>) -> Result<Self> {
        let logdir = logdir.into();
        fs::create_dir_all(&logdir)
            .with_context(|| format!("Cannot create log directory '{}'", logdir.display()))?;

        let csv_path = logdir.join("scalars.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "tag,step,value")?;
            tracing::debug!("Created scalar log: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one point to the `tag` series.
    pub fn add_scalar(&self, tag: &str, value: f64, step: u64) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(f, "{},{},{:.6}", tag, step, value)?;
        tracing::trace!("scalar {}@{} = {:.6}", tag, step, value);
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

/// Read every row back from a scalar log.
pub fn read_scalars(csv_path: &Path) -> Result<Vec<ScalarRecord>> {
    let text = fs::read_to_string(csv_path)
        .with_context(|| format!("Cannot read '{}'", csv_path.display()))?;

    text.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            // Tags may not contain commas, so the last two fields are fixed.
            let mut fields = line.rsplitn(3, ',');
            let value = fields.next().unwrap_or_default().parse::<f64>();
            let step  = fields.next().unwrap_or_default().parse::<u64>();
            let tag   = fields.next().unwrap_or_default().to_string();
            match (step, value) {
                (Ok(step), Ok(value)) => Ok(ScalarRecord { tag, step, value }),
                _ => anyhow::bail!("Malformed scalar row: '{line}'"),
            }
        })
        .collect()
}
