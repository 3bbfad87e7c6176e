use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use net_probe_sim::domain::probe::jitter::{JitterSource, UniformJitter};
use net_probe_sim::domain::routing::session::BuildMode;
use net_probe_sim::domain::utils::id::VertexId;
use net_probe_sim::terminal::pacer::{NoPacer, Pacer, RealTimePacer};
use net_probe_sim::terminal::{Flow, Terminal};
use net_probe_sim::{generate_network_session, logger};

#[derive(Parser, Debug)]
#[command(author, version, about = "Simulates ping and traceroute over a static packet network.", long_about = None)]
struct Args {
    /// Topology JSON file. The built-in campus network is used when omitted.
    #[arg(short, long)]
    topology: Option<PathBuf>,

    /// Vertex the terminal starts on.
    #[arg(short, long, default_value = "H1")]
    start: String,

    /// Seed for the measurement noise, for reproducible sessions.
    #[arg(long)]
    seed: Option<u64>,

    /// Print probe results immediately instead of pacing them.
    #[arg(long)]
    no_pacing: bool,

    /// Wall-clock milliseconds slept per simulated millisecond.
    #[arg(long, default_value_t = 100.0)]
    pace_scale: f64,

    /// Compute routing tables on a single thread.
    #[arg(long)]
    sequential: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init();
    log::info!("Logger initialized. Starting network construction.");

    let mode = if args.sequential { BuildMode::Sequential } else { BuildMode::Parallel };
    let session = generate_network_session(args.topology.as_deref(), mode).context("could not build the network")?;

    let jitter: Box<dyn JitterSource> = match args.seed {
        Some(seed) => Box::new(UniformJitter::seeded(seed)),
        None => Box::new(UniformJitter::from_entropy()),
    };
    let pacer: Box<dyn Pacer> = if args.no_pacing { Box::new(NoPacer) } else { Box::new(RealTimePacer::new(args.pace_scale)) };

    let mut terminal = Terminal::new(Arc::new(session), VertexId::new(args.start), jitter, pacer, io::stdout())
        .context("the start vertex is not part of the network")?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", terminal.prompt().green().bold());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };

        if terminal.execute(&line?)? == Flow::Exit {
            break;
        }
    }

    log::info!("Terminal closed on {}.", terminal.current());
    Ok(())
}
