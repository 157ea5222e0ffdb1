use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};
use vislayout::force::{ForceConfig, GraphData, Simulation};
use vislayout::treemap::{Padding, TreeNode, Treemap, TreemapLayout};
use vislayout::{Canvas, LayoutEngine};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the force simulation on a RON graph and print the final snapshot
    Graph {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
        /// Stop after this many ticks instead of running to rest
        #[arg(long)]
        ticks: Option<usize>,
        /// RON file with a partial `ForceConfig`
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Lay out a RON tree as a treemap and print its rectangles
    Treemap {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
        #[arg(long, default_value_t = 3.0)]
        outer: f64,
        #[arg(long, default_value_t = 20.0)]
        top: f64,
        #[arg(long, default_value_t = 1.0)]
        inner: f64,
        /// Keep fractional coordinates
        #[arg(long)]
        no_round: bool,
    },
}

/// One treemap rectangle as printed by the driver
#[derive(Debug, Serialize)]
struct Cell {
    label: String,
    depth: usize,
    parent: Option<usize>,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    value: f64,
    percentage: Option<f64>,
}

fn cells(treemap: &Treemap<'_>) -> Vec<Cell> {
    treemap
        .iter()
        .map(|(id, rect)| Cell {
            label: rect.label(),
            depth: rect.depth,
            parent: rect.parent.map(|p| p.index()),
            x0: rect.x0,
            y0: rect.y0,
            x1: rect.x1,
            y1: rect.y1,
            value: rect.value,
            percentage: treemap.percentage_of_parent(id),
        })
        .collect()
}

fn read_ron<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    ron::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn to_ron<T: Serialize>(value: &T) -> Result<String> {
    ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
        .context("serializing layout")
}

fn run(command: Command) -> Result<String> {
    match command {
        Command::Graph {
            input,
            width,
            height,
            ticks,
            config,
        } => {
            let graph: GraphData = read_ron(&input)?;
            let config: ForceConfig = match config {
                Some(path) => read_ron(&path)?,
                None => ForceConfig::default(),
            };
            let canvas = Canvas::new(width, height)?;
            let mut simulation =
                Simulation::new(&graph, canvas, config).context("building simulation")?;
            let performed = match ticks {
                Some(n) => {
                    for _ in 0..n {
                        simulation.tick();
                    }
                    n
                }
                None => simulation.run(),
            };
            info!(nodes = graph.nodes.len(), ticks = performed, "graph layout done");
            to_ron(&simulation.snapshot())
        }
        Command::Treemap {
            input,
            width,
            height,
            outer,
            top,
            inner,
            no_round,
        } => {
            let tree: TreeNode = read_ron(&input)?;
            let layout =
                TreemapLayout::new(Padding { outer, top, inner }).with_round(!no_round);
            let canvas = Canvas::new(width, height)?;
            let treemap = layout.layout(&tree, canvas).context("computing treemap")?;
            info!(rects = treemap.len(), "treemap layout done");
            to_ron(&cells(&treemap))
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let output = run(args.command)?;
    debug!(bytes = output.len(), "writing layout");
    println!("{output}");
    Ok(())
}
