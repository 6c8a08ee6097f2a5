use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::eyre;

use circuit_proof::circuit::{Circuit, ComponentDef, SubCircuitDef};
use circuit_proof::dot::{to_dot, DotConfig};
use circuit_proof::engine::{analyze, AnalysisConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Graph {
    Proof,
    Circuit,
}

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Circuit file, one component per line:
    /// `SUB; NAME; IN1,IN2; OUT; DELAY; OUT = FORMULA`.
    /// Without a file, a built-in two-component circuit is analyzed.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Number of simulated time steps.
    #[clap(long, value_name = "INT", default_value = "3")]
    steps: usize,

    /// Decision diagram node limit (in bits, so the limit is `2^bits` nodes).
    #[clap(long, value_name = "INT", default_value = "20")]
    size: usize,

    /// Simplification cube limit (in bits, so the limit is `2^bits` cubes).
    #[clap(long, value_name = "INT", default_value = "16")]
    cubes: usize,

    /// Print a DOT rendering of the given graph.
    #[clap(long, value_enum)]
    dot: Option<Graph>,

    /// Enable debug logging.
    #[clap(short, long)]
    verbose: bool,
}

fn builtin() -> Vec<SubCircuitDef> {
    vec![SubCircuitDef::new(
        "SC1",
        vec![
            ComponentDef::new("C1", &["A", "B"], "Y1", "Y1 = And(A,B)", 0),
            ComponentDef::new("C2", &["Y1", "C"], "Y2", "Y2 = Or(Y1,C)", 1),
        ],
    )]
}

fn read_circuit(text: &str) -> color_eyre::Result<Vec<SubCircuitDef>> {
    let mut defs: Vec<SubCircuitDef> = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.splitn(6, ';').map(str::trim).collect();
        let [sub, name, inputs, output, delay, expression] = fields[..] else {
            color_eyre::eyre::bail!("line {}: expected 6 fields separated by `;`", lineno + 1);
        };
        let inputs: Vec<&str> = inputs.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
        let component = ComponentDef::new(name, &inputs, output, expression, delay.parse()?);
        match defs.iter_mut().find(|sc| sc.name == sub) {
            Some(sc) => sc.components.push(component),
            None => defs.push(SubCircuitDef::new(sub, vec![component])),
        }
    }
    Ok(defs)
}

/// `2^bits`, or an error if it does not fit in `usize`.
fn limit(bits: usize, what: &str) -> color_eyre::Result<usize> {
    u32::try_from(bits)
        .ok()
        .and_then(|s| 1usize.checked_shl(s))
        .ok_or_else(|| eyre!("--{} {} is too large: 2^{} does not fit in usize", what, bits, bits))
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let defs = match &args.input {
        Some(path) => read_circuit(&std::fs::read_to_string(path)?)?,
        None => builtin(),
    };
    let circuit = Circuit::new(defs)?;
    println!("circuit: {}", circuit.top_level_text());

    let config = AnalysisConfig {
        steps: args.steps,
        node_limit: Some(limit(args.size, "size")?),
        cube_limit: Some(limit(args.cubes, "cubes")?),
    };
    let analysis = analyze(&circuit, &config)?;
    print!("{}", analysis);

    match args.dot {
        Some(Graph::Proof) => print!("{}", to_dot(&analysis.proof.to_graph(), &DotConfig::default())?),
        Some(Graph::Circuit) => {
            let config = DotConfig {
                rank_dir: "LR",
                node_shape: "ellipse",
                ..DotConfig::default()
            };
            print!("{}", to_dot(&circuit.to_graph(), &config)?)
        }
        None => {
            for node in analysis.proof.nodes() {
                println!("{} {}: {}", node.anchor(), node.label, node.explanation);
            }
        }
    }

    let time_total = time_total.elapsed();
    println!("\nAll done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
