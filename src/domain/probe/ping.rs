use crate::domain::probe::jitter::JitterSource;
use crate::domain::probe::report::{PingOutcome, PingReport, RouteFailure};
use crate::domain::routing::routing_table::RoutingTables;
use crate::domain::routing::shortest_path::PACKET_SIZE_BYTES;
use crate::domain::utils::id::VertexId;
use crate::error::{Error, Result};
use tokio_util::sync::CancellationToken;

/// Number of echo requests sent by a ping.
pub const DEFAULT_PING_TRIALS: usize = 4;

#[derive(Debug, Clone)]
pub struct PingOptions {
    pub trials: usize,
    /// Checked before every trial.
    pub cancel: Option<CancellationToken>,
}

impl Default for PingOptions {
    fn default() -> Self {
        Self { trials: DEFAULT_PING_TRIALS, cancel: None }
    }
}

/// Follows the routing tables from `from` to `to` and sums the delay of every hop (seconds).
///
/// Gives up as soon as a vertex on the way has no usable route, or after more hops than there
/// are tables, which can only happen with inconsistent tables.
pub fn walk_leg(tables: &RoutingTables, from: &VertexId, to: &VertexId) -> std::result::Result<f64, RouteFailure> {
    let mut elapsed = 0.0;
    let mut pointer = from;
    let mut hops = 0;

    while pointer != to {
        let failure = || RouteFailure { from: pointer.clone(), to: to.clone() };

        if hops > tables.len() {
            log::warn!("RoutingLoop: walk from {} to {} exceeded {} hops.", from, to, tables.len());
            return Err(failure());
        }

        let table = tables.table(pointer).map_err(|_| failure())?;
        let entry = table.lookup(to).map_err(|_| failure())?;
        let next = entry.next_hop.as_ref().ok_or_else(failure)?;

        elapsed += entry.hop_cost;
        pointer = next;
        hops += 1;
    }

    Ok(elapsed)
}

/// Simulates `ping` from `source` to `destination`.
///
/// Every trial adds the going leg and the return leg, each walked through the tables on its
/// own, plus one noise sample. An unreachable destination is reported as 100% loss.
/// Only ids unknown to the tables are errors.
pub fn ping(tables: &RoutingTables, source: &VertexId, destination: &VertexId, jitter: &mut dyn JitterSource, options: &PingOptions) -> Result<PingReport> {
    for vertex in [source, destination] {
        if !tables.contains(vertex) {
            return Err(Error::UnknownVertex(vertex.clone()));
        }
    }

    let mut times_ms = Vec::with_capacity(options.trials);
    let mut outcome = PingOutcome::Completed;

    for _ in 0..options.trials {
        if options.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            outcome = PingOutcome::Cancelled;
            break;
        }

        let round_trip = walk_leg(tables, source, destination).and_then(|going| Ok(going + walk_leg(tables, destination, source)?));

        match round_trip {
            Ok(seconds) => times_ms.push(seconds * 1000.0 + jitter.sample_ms()),
            Err(failure) => {
                log::debug!("Ping {} => {} failed: no route from {} to {}.", source, destination, failure.from, failure.to);
                outcome = PingOutcome::Unreachable(failure);
                break;
            }
        }
    }

    // An unreachable host answers nothing, whatever was measured before the failure.
    let (transmitted, received) = match &outcome {
        PingOutcome::Unreachable(_) => {
            times_ms.clear();
            (options.trials, 0)
        }
        _ => (times_ms.len(), times_ms.len()),
    };

    let report = PingReport {
        source: source.clone(),
        destination: destination.clone(),
        packet_size_bytes: PACKET_SIZE_BYTES,
        transmitted,
        received,
        times_ms,
        outcome,
    };

    tracing::info!(
        source = %report.source,
        destination = %report.destination,
        transmitted = report.transmitted,
        received = report.received,
        loss_percent = report.loss_percent(),
        outcome = ?report.outcome,
        "Ping finished"
    );

    Ok(report)
}
