//! `decograph` - inspect detector error models and their decoding graphs.
//!
//! # Usage
//!
//! ```bash
//! # Counts, warnings and topology checks
//! decograph inspect model.dem
//!
//! # Minimum-weight logical error
//! decograph distance model.dem --unweighted
//!
//! # Plain graph as JSON
//! decograph json model.dem --output graph.json
//!
//! # Hyperedges rewritten as plain `a b weight` lines
//! decograph decompose model.dem --scheme pairwise
//!
//! # Sampled syndromes with their logical flips
//! decograph sample model.dem --shots 1000 --seed 7
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use decograph_core::dem::{ParsedDem, ParserOptions, parse_dem_with_options};
use decograph_core::graph::{DecodingCode, Logicals, NxDecodingGraph};
use decograph_core::sampler::ErrorSampler;
use decograph_core::tools::{
    BoundaryStar, DecompositionScheme, ExistingEdgeCover, PairwiseCover, compute_graph_distance,
    compute_graph_distance_for_logical, filter_to_data_edges, filter_to_measure_edges,
    graph_to_json, has_contiguous_nodes, hypergraph_to_weighted_edge_list,
    is_single_connected_component, single_boundary_is_last_node, unweight_graph,
    worst_case_num_detectors,
};

#[derive(Parser, Debug)]
#[command(name = "decograph")]
#[command(about = "Detector error models to decoding graphs", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print counts, parser warnings and topology checks
    Inspect(DemArgs),

    /// Compute the code distance of the plain decoding graph
    Distance {
        #[command(flatten)]
        dem: DemArgs,

        /// Only this logical (default: minimum over all logicals)
        #[arg(long)]
        logical: Option<usize>,

        /// Count edges instead of summing weights
        #[arg(long)]
        unweighted: bool,
    },

    /// Write the plain decoding graph as JSON
    Json {
        #[command(flatten)]
        dem: DemArgs,

        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Rewrite every hyperedge as plain edges and print `a b weight` lines
    Decompose {
        #[command(flatten)]
        dem: DemArgs,

        /// Which plain edges cover a hyperedge
        #[arg(long, value_enum, default_value_t = Scheme::Pairwise)]
        scheme: Scheme,
    },

    /// Sample syndromes and logical flips
    Sample {
        #[command(flatten)]
        dem: DemArgs,

        /// Number of shots
        #[arg(long, default_value_t = 10)]
        shots: usize,

        /// Random seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Args, Debug)]
struct DemArgs {
    /// Path to a DEM file
    dem: PathBuf,

    /// Drop instruction tags
    #[arg(long)]
    no_tags: bool,

    /// Skip unknown instructions with a warning instead of failing
    #[arg(long)]
    lenient: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Scheme {
    /// Lexicographically first perfect pairing
    Pairwise,
    /// First pairing made only of edges already in the graph
    Existing,
    /// Every detector joined to the boundary
    Star,
}

impl Scheme {
    fn build(self) -> Box<dyn DecompositionScheme> {
        match self {
            Self::Pairwise => Box::new(PairwiseCover::default()),
            Self::Existing => Box::new(ExistingEdgeCover::default()),
            Self::Star => Box::new(BoundaryStar),
        }
    }
}

impl DemArgs {
    fn parse(&self) -> Result<ParsedDem> {
        let text = fs::read_to_string(&self.dem)
            .with_context(|| format!("failed to read {}", self.dem.display()))?;
        let mut options = ParserOptions::default().with_strict_instructions(!self.lenient);
        if self.no_tags {
            options = options.with_tags_enabled(false);
        }
        let parsed = parse_dem_with_options(&text, options)
            .with_context(|| format!("failed to parse {}", self.dem.display()))?;
        info!(
            path = %self.dem.display(),
            errors = parsed.errors.len(),
            detectors = parsed.num_detectors,
            logicals = parsed.logicals.len(),
            "dem loaded"
        );
        Ok(parsed)
    }

    fn decoding_graph(&self) -> Result<(NxDecodingGraph, Logicals)> {
        self.parse()?
            .to_decoding_graph()
            .context("DEM has undecomposed hyperedges; decompose them first")
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,decograph_core=info,decograph=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match cli.command {
        Command::Inspect(dem) => inspect(&dem, &mut out)?,
        Command::Distance {
            dem,
            logical,
            unweighted,
        } => distance(&dem, logical, unweighted, &mut out)?,
        Command::Json { dem, output } => json(&dem, output.as_deref(), &mut out)?,
        Command::Decompose { dem, scheme } => decompose(&dem, scheme, &mut out)?,
        Command::Sample { dem, shots, seed } => sample(&dem, shots, seed, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn inspect(args: &DemArgs, out: &mut impl Write) -> Result<()> {
    let parsed = args.parse()?;
    let (hyper, _) = parsed.to_hypergraph();

    writeln!(out, "errors:      {}", parsed.errors.len())?;
    writeln!(out, "detectors:   {}", parsed.num_detectors)?;
    writeln!(out, "with coords: {}", parsed.detector_records.len())?;
    writeln!(out, "logicals:    {}", parsed.logicals.len())?;
    writeln!(out, "max degree:  {}", hyper.max_degree())?;
    for warning in &parsed.warnings {
        writeln!(out, "warning: {warning}")?;
    }

    let (graph, _) = match parsed.to_decoding_graph() {
        Ok(built) => built,
        Err(e) => {
            writeln!(out, "plain graph: unavailable ({e})")?;
            return Ok(());
        }
    };
    writeln!(out, "plain edges: {}", graph.num_edges())?;
    writeln!(out, "connected:   {}", is_single_connected_component(&graph))?;
    writeln!(out, "contiguous:  {}", has_contiguous_nodes(&graph))?;
    writeln!(out, "boundary last: {}", single_boundary_is_last_node(&graph))?;
    writeln!(
        out,
        "data / measure edges: {} / {}",
        filter_to_data_edges(&graph).graph.num_edges(),
        filter_to_measure_edges(&graph).graph.num_edges()
    )?;
    Ok(())
}

fn distance(
    args: &DemArgs,
    logical: Option<usize>,
    unweighted: bool,
    out: &mut impl Write,
) -> Result<()> {
    let (graph, logicals) = args.decoding_graph()?;
    let graph = if unweighted { unweight_graph(&graph) } else { graph };

    let found = match logical {
        Some(index) => compute_graph_distance_for_logical(&graph, &logicals, index),
        None => compute_graph_distance(&graph, &logicals),
    }
    .context("distance search failed")?;

    writeln!(out, "logical:   L{}", found.logical)?;
    writeln!(out, "edges:     {}", found.num_edges())?;
    writeln!(out, "weight:    {}", found.weight)?;
    if !unweighted {
        let bound = worst_case_num_detectors(&graph, &logicals)?;
        writeln!(out, "detectors: <= {bound}")?;
    }
    for id in &found.edges {
        if let Some(edge) = graph.edge(*id) {
            writeln!(out, "  {id}: {} {}", edge.first(), edge.second())?;
        }
    }
    Ok(())
}

fn json(args: &DemArgs, output: Option<&Path>, out: &mut impl Write) -> Result<()> {
    let (graph, logicals) = args.decoding_graph()?;
    let document = graph_to_json(&graph, &logicals)?;
    match output {
        Some(path) => {
            fs::write(path, document)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "graph written");
        }
        None => writeln!(out, "{document}")?,
    }
    Ok(())
}

fn decompose(args: &DemArgs, scheme: Scheme, out: &mut impl Write) -> Result<()> {
    let parsed = args.parse()?;
    let (hyper, _) = parsed.to_hypergraph();
    let boundary = parsed.num_detectors;
    let scheme = scheme.build();
    let edges = hypergraph_to_weighted_edge_list(&hyper, scheme.as_ref(), boundary)
        .with_context(|| format!("{} decomposition failed", scheme.name()))?;

    writeln!(out, "# boundary {boundary}")?;
    for (a, b, weight) in edges {
        writeln!(out, "{a} {b} {weight}")?;
    }
    Ok(())
}

fn sample(args: &DemArgs, shots: usize, seed: u64, out: &mut impl Write) -> Result<()> {
    if shots == 0 {
        bail!("--shots must be positive");
    }
    let (graph, logicals) = args.decoding_graph()?;
    let mut sampler = ErrorSampler::new(&graph, &logicals, seed);
    for shot in sampler.sample_batch(shots) {
        let flips: String = shot
            .flipped_logicals
            .iter()
            .map(|&f| if f { '1' } else { '0' })
            .collect();
        writeln!(out, "{} {flips}", shot.syndrome)?;
    }
    Ok(())
}
