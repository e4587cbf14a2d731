mod cells_io;
mod provenance;

use anyhow::{Context, Result};
use cellorient::prelude::*;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

use cells_io::{read_cells, write_json, CellFile};
use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Orient quadrilateral meshes and generate test meshes")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Solve rotations for a cell list and write the result as JSON
    Solve {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputForm::Cells)]
        form: OutputForm,
        /// Step budget for the search; 0 disables the limit
        #[arg(long)]
        max_steps: Option<u64>,
    },
    /// Write a sample mesh, optionally scrambled
    Gen {
        #[arg(long, value_enum, default_value_t = MeshKind::Grid)]
        kind: MeshKind,
        #[arg(long, default_value_t = 4)]
        nx: usize,
        #[arg(long, default_value_t = 4)]
        ny: usize,
        /// Scramble with this seed (cells are left as generated otherwise)
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 0)]
        index: u64,
        #[arg(long)]
        shuffle: bool,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum OutputForm {
    /// One rotation amount (0-3) per input cell
    Rotations,
    /// The rotated cell list
    Cells,
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum MeshKind {
    Grid,
    Ring,
    Mobius,
}

#[derive(Serialize)]
struct StatsOut {
    steps: u64,
    backtracks: u64,
    max_depth: usize,
}

impl From<SearchStats> for StatsOut {
    fn from(s: SearchStats) -> Self {
        Self {
            steps: s.steps,
            backtracks: s.backtracks,
            max_depth: s.max_depth,
        }
    }
}

#[derive(Serialize)]
struct SolveOut {
    form: OutputForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    rotations: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cells: Option<Vec<QuadVertices>>,
    stats: StatsOut,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Solve {
            input,
            out,
            form,
            max_steps,
        } => solve(&input, &out, form, max_steps),
        Action::Gen {
            kind,
            nx,
            ny,
            seed,
            index,
            shuffle,
            out,
        } => gen(kind, nx, ny, seed, index, shuffle, &out),
        Action::Report => report(),
    }
}

fn search_cfg(max_steps: Option<u64>) -> SearchCfg {
    match max_steps {
        None => SearchCfg::default(),
        Some(0) => SearchCfg::unbounded(),
        Some(n) => SearchCfg { max_steps: Some(n) },
    }
}

fn solve(input: &Path, out: &Path, form: OutputForm, max_steps: Option<u64>) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), ?form, "solve");
    let file = read_cells(input)?;
    let cfg = search_cfg(max_steps);
    let solution = find_rotations(file.dim, &file.cells, cfg)
        .with_context(|| format!("orienting {}", input.display()))?;
    tracing::info!(
        cells = file.cells.len(),
        steps = solution.stats.steps,
        backtracks = solution.stats.backtracks,
        "solved"
    );

    let result = match form {
        OutputForm::Rotations => SolveOut {
            form,
            rotations: Some(solution.rotations.iter().map(|r| r.get()).collect()),
            cells: None,
            stats: solution.stats.into(),
        },
        OutputForm::Cells => {
            // find_rotations already checked that every cell has four vertices
            let quads: Vec<QuadVertices> = file
                .cells
                .iter()
                .filter_map(|c| QuadVertices::try_from(c.as_slice()).ok())
                .collect();
            SolveOut {
                form,
                rotations: None,
                cells: Some(solution.rotated(&quads)),
                stats: solution.stats.into(),
            }
        }
    };
    write_json(out, &result)?;

    let params = serde_json::json!({
        "input": input.to_string_lossy(),
        "form": form,
        "max_steps": cfg.max_steps,
    });
    let stats = serde_json::to_value(&result.stats)?;
    write_sidecar(out, Payload::new(params).with_stats(stats))?;
    Ok(())
}

fn gen(
    kind: MeshKind,
    nx: usize,
    ny: usize,
    seed: Option<u64>,
    index: u64,
    shuffle: bool,
    out: &Path,
) -> Result<()> {
    tracing::info!(?kind, nx, ny, seed, index, shuffle, out = %out.display(), "gen");
    let base = match kind {
        MeshKind::Grid => structured_grid(nx, ny),
        MeshKind::Ring => ring(nx.max(3)),
        MeshKind::Mobius => mobius_strip(nx.max(3)),
    };
    let cells = match seed {
        Some(seed) => scramble(&base, ReplayToken::new(seed, index), shuffle).cells,
        None => base,
    };
    let file = CellFile {
        dim: SUPPORTED_DIM,
        cells: cells.iter().map(|c| c.to_vec()).collect(),
    };
    write_json(out, &file)?;

    let params = serde_json::json!({
        "kind": kind,
        "nx": nx,
        "ny": ny,
        "seed": seed,
        "index": index,
        "shuffle": shuffle,
    });
    write_sidecar(out, Payload::new(params))?;
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::code_revision(),
        "lib_version": cellorient::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
