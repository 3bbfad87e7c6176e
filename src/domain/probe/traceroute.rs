use crate::domain::probe::jitter::JitterSource;
use crate::domain::probe::report::{HopReport, RouteFailure, TraceOutcome, TraceReport};
use crate::domain::routing::routing_table::RoutingTables;
use crate::domain::utils::id::VertexId;
use crate::error::{Error, Result};
use tokio_util::sync::CancellationToken;

/// Hop limit of a traceroute.
pub const DEFAULT_MAX_HOPS: usize = 30;
/// Probes sent per hop.
pub const DEFAULT_SAMPLES_PER_HOP: usize = 3;

#[derive(Debug, Clone)]
pub struct TraceOptions {
    pub max_hops: usize,
    pub samples_per_hop: usize,
    /// Checked before every hop.
    pub cancel: Option<CancellationToken>,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self { max_hops: DEFAULT_MAX_HOPS, samples_per_hop: DEFAULT_SAMPLES_PER_HOP, cancel: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum WalkState {
    Idle,
    /// About to compute hop `hop`, standing at `at` with `elapsed_ms` accumulated so far.
    Accumulating { hop: usize, at: VertexId, elapsed_ms: f64 },
    Finished(TraceOutcome),
}

/// Step-by-step traceroute.
///
/// Each call to `next` moves from `Accumulating(hop)` through emitting one [`HopReport`] to
/// `Accumulating(hop + 1)`, until the walk finishes as completed, unreachable, capped by the hop
/// limit or cancelled. [`TraceWalk::outcome`] tells which, once `next` returned `None`.
/// Finishing emits the `Traceroute finished` summary event.
#[derive(Debug)]
pub struct TraceWalk<'a> {
    tables: &'a RoutingTables,
    source: VertexId,
    destination: VertexId,
    jitter: &'a mut dyn JitterSource,
    options: TraceOptions,
    state: WalkState,
    emitted: usize,
}

impl<'a> TraceWalk<'a> {
    pub fn new(tables: &'a RoutingTables, source: &VertexId, destination: &VertexId, jitter: &'a mut dyn JitterSource, options: TraceOptions) -> Result<Self> {
        for vertex in [source, destination] {
            if !tables.contains(vertex) {
                return Err(Error::UnknownVertex(vertex.clone()));
            }
        }

        Ok(Self { tables, source: source.clone(), destination: destination.clone(), jitter, options, state: WalkState::Idle, emitted: 0 })
    }

    pub fn max_hops(&self) -> usize {
        self.options.max_hops
    }

    /// Terminal outcome, `None` while the walk is still running.
    pub fn outcome(&self) -> Option<&TraceOutcome> {
        match &self.state {
            WalkState::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Resolves the link leaving `at` towards the destination.
    ///
    /// The hop's time covers the forward link and the answer back over the link as the next hop
    /// routes it.
    fn step(&self, at: &VertexId) -> std::result::Result<(VertexId, f64), RouteFailure> {
        let failure = |from: &VertexId| RouteFailure { from: from.clone(), to: self.destination.clone() };

        let table = self.tables.table(at).map_err(|_| failure(at))?;
        let entry = table.lookup(&self.destination).map_err(|_| failure(at))?;
        let next = entry.next_hop.as_ref().ok_or_else(|| failure(at))?;

        let back = self
            .tables
            .table(next)
            .and_then(|table| table.lookup(at))
            .map_err(|_| RouteFailure { from: next.clone(), to: at.clone() })?;

        Ok((next.clone(), (entry.hop_cost + back.hop_cost) * 1000.0))
    }

    fn finish(&mut self, outcome: TraceOutcome) {
        tracing::info!(
            source = %self.source,
            destination = %self.destination,
            hops = self.emitted,
            outcome = ?outcome,
            "Traceroute finished"
        );
        self.state = WalkState::Finished(outcome);
    }
}

impl Iterator for TraceWalk<'_> {
    type Item = HopReport;

    fn next(&mut self) -> Option<HopReport> {
        if self.state == WalkState::Idle {
            self.state = WalkState::Accumulating { hop: 1, at: self.source.clone(), elapsed_ms: 0.0 };
        }

        let (hop, at, elapsed_ms) = match &self.state {
            WalkState::Accumulating { hop, at, elapsed_ms } => (*hop, at.clone(), *elapsed_ms),
            _ => return None,
        };

        if at == self.destination {
            self.finish(TraceOutcome::Completed);
            return None;
        }

        if hop > self.options.max_hops {
            self.finish(TraceOutcome::MaxHopsReached);
            return None;
        }

        if self.options.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            self.finish(TraceOutcome::Cancelled);
            return None;
        }

        match self.step(&at) {
            Ok((reached, leg_ms)) => {
                let elapsed_ms = elapsed_ms + leg_ms;
                let samples_ms = (0..self.options.samples_per_hop).map(|_| elapsed_ms + self.jitter.sample_ms()).collect();

                self.state = WalkState::Accumulating { hop: hop + 1, at: reached.clone(), elapsed_ms };
                self.emitted += 1;
                Some(HopReport { hop, samples_ms, reached })
            }
            Err(failure) => {
                log::debug!("Traceroute {} => {} failed at hop {}: no route from {} to {}.", self.source, self.destination, hop, failure.from, failure.to);
                self.finish(TraceOutcome::Unreachable(failure));
                None
            }
        }
    }
}

/// Simulates `traceroute` from `source` to `destination` and collects every hop.
pub fn traceroute(tables: &RoutingTables, source: &VertexId, destination: &VertexId, jitter: &mut dyn JitterSource, options: TraceOptions) -> Result<TraceReport> {
    let mut walk = TraceWalk::new(tables, source, destination, jitter, options)?;
    let hops: Vec<HopReport> = walk.by_ref().collect();
    let outcome = walk.outcome().cloned().unwrap_or(TraceOutcome::Completed);

    Ok(TraceReport { source: source.clone(), destination: destination.clone(), max_hops: walk.max_hops(), hops, outcome })
}
