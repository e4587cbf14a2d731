//! Cell list files: JSON (`{"dim": 2, "cells": [[a, b, c, d], ...]}`) and CSV
//! with columns `v0,v1,v2,v3`.

use anyhow::{bail, Context, Result};
use cellorient::prelude::{VertexId, SUPPORTED_DIM};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// On-disk mesh: dimension plus one vertex list per cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellFile {
    #[serde(default = "default_dim")]
    pub dim: usize,
    pub cells: Vec<Vec<VertexId>>,
}

fn default_dim() -> usize {
    SUPPORTED_DIM
}

const CSV_COLUMNS: [&str; 4] = ["v0", "v1", "v2", "v3"];

pub fn read_cells(path: &Path) -> Result<CellFile> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => read_csv(path),
        _ => {
            let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
        }
    }
}

fn read_csv(path: &Path) -> Result<CellFile> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()?
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::info!(rows = df.height(), cols = df.width(), "input_csv_shape");

    let mut columns: Vec<Vec<Option<u32>>> = Vec::with_capacity(CSV_COLUMNS.len());
    for name in CSV_COLUMNS {
        let series = df
            .column(name)
            .with_context(|| format!("{} has no column {name}", path.display()))?
            .cast(&DataType::UInt32)?;
        columns.push(series.u32()?.into_iter().collect());
    }

    let mut cells = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let mut cell = Vec::with_capacity(CSV_COLUMNS.len());
        for (col, name) in columns.iter().zip(CSV_COLUMNS) {
            match col[row] {
                Some(v) => cell.push(v),
                None => bail!("row {row}: missing or non-integer {name}"),
            }
        }
        cells.push(cell);
    }
    Ok(CellFile {
        dim: SUPPORTED_DIM,
        cells,
    })
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}
