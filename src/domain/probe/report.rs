use crate::domain::utils::id::VertexId;

/// A vertex that had no route towards `to` while a probe was walking through it.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteFailure {
    pub from: VertexId,
    pub to: VertexId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PingOutcome {
    Completed,
    Unreachable(RouteFailure),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceOutcome {
    /// The destination was reached.
    Completed,
    Unreachable(RouteFailure),
    /// The hop limit was hit before reaching the destination. Not a failure.
    MaxHopsReached,
    Cancelled,
}

/// Summary statistics over the round-trip times of a ping, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RttStats {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
    /// Population standard deviation.
    pub mdev: f64,
}

impl RttStats {
    /// `None` for an empty sample.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let n = samples.len() as f64;
        let avg = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|t| (t - avg).powi(2)).sum::<f64>() / n;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self { min, avg, max, mdev: variance.sqrt() })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PingReport {
    pub source: VertexId,
    pub destination: VertexId,
    pub packet_size_bytes: usize,
    pub transmitted: usize,
    pub received: usize,
    /// Round-trip time of every answered trial, in milliseconds.
    pub times_ms: Vec<f64>,
    pub outcome: PingOutcome,
}

impl PingReport {
    pub fn stats(&self) -> Option<RttStats> {
        RttStats::from_samples(&self.times_ms)
    }

    pub fn loss_percent(&self) -> f64 {
        if self.transmitted == 0 {
            return 0.0;
        }
        (self.transmitted - self.received) as f64 * 100.0 / self.transmitted as f64
    }

    pub fn total_time_ms(&self) -> f64 {
        self.times_ms.iter().fold(0.0, |total, time| total + time)
    }
}

/// One line of a traceroute.
#[derive(Debug, Clone, PartialEq)]
pub struct HopReport {
    /// 1-based hop index.
    pub hop: usize,
    /// Cumulative round-trip time up to this hop, one value per probe sent (ms).
    pub samples_ms: Vec<f64>,
    /// Vertex reached by this hop.
    pub reached: VertexId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraceReport {
    pub source: VertexId,
    pub destination: VertexId,
    pub max_hops: usize,
    pub hops: Vec<HopReport>,
    pub outcome: TraceOutcome,
}
