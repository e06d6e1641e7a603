//! Instance files: JSON (`heights`, `damages`, `divisor`) or CSV (`h`, `d`).

use anyhow::{bail, Context, Result};
use lichao::api::Instance;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// On-disk JSON shape. `divisor` may be omitted and supplied on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceFile {
    pub heights: Vec<i64>,
    pub damages: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divisor: Option<i64>,
}

impl InstanceFile {
    pub fn from_instance(inst: &Instance) -> Self {
        Self {
            heights: inst.heights().to_vec(),
            damages: inst.damages().to_vec(),
            divisor: Some(inst.divisor()),
        }
    }

    /// Validate into an `Instance`; a command-line divisor overrides the file's.
    pub fn into_instance(self, divisor: Option<i64>) -> Result<Instance> {
        let divisor = divisor
            .or(self.divisor)
            .context("no divisor: pass --divisor or add \"divisor\" to the file")?;
        Ok(Instance::new(self.heights, self.damages, divisor)?)
    }
}

/// Load an instance file, dispatching on the extension.
pub fn load(path: &str, divisor: Option<i64>) -> Result<Instance> {
    let file = if path.ends_with(".json") {
        read_json(path)?
    } else if path.ends_with(".csv") {
        read_csv(path)?
    } else {
        bail!("unsupported input {path}: expected .json or .csv");
    };
    tracing::info!(
        path,
        entities = file.heights.len(),
        "input_loaded"
    );
    file.into_instance(divisor)
        .with_context(|| format!("validating {path}"))
}

fn read_json(path: &str) -> Result<InstanceFile> {
    let bytes = fs::read(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {path}"))
}

fn read_csv(path: &str) -> Result<InstanceFile> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()?
        .collect()
        .with_context(|| format!("reading {path}"))?;
    tracing::info!(rows = df.height(), cols = df.width(), "input_csv_shape");
    Ok(InstanceFile {
        heights: int_column(&df, "h")?,
        damages: int_column(&df, "d")?,
        divisor: None,
    })
}

fn int_column(df: &DataFrame, name: &str) -> Result<Vec<i64>> {
    let series = df
        .column(name)
        .with_context(|| format!("missing column {name}"))?
        .cast(&DataType::Int64)?;
    series
        .i64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.with_context(|| format!("column {name}: row {row} is empty")))
        .collect()
}

/// Write `inst` as pretty JSON, creating parent directories.
pub fn write_json(path: &Path, inst: &Instance) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let doc = serde_json::to_vec_pretty(&InstanceFile::from_instance(inst))?;
    fs::write(path, doc).with_context(|| format!("writing {}", path.display()))
}
