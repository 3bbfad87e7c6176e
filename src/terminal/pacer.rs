use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Turns simulated latency into wall-clock pauses between lines of output.
pub trait Pacer: std::fmt::Debug + Send + Sync {
    /// Pause for a simulated duration given in milliseconds.
    fn pause_ms(&self, simulated_ms: f64);
}

/// Sleeps `scale` times the simulated duration.
#[derive(Debug, Clone, Copy)]
pub struct RealTimePacer {
    scale: f64,
}

impl RealTimePacer {
    pub fn new(scale: f64) -> Self {
        Self { scale: if scale.is_finite() && scale > 0.0 { scale } else { 1.0 } }
    }
}

impl Pacer for RealTimePacer {
    fn pause_ms(&self, simulated_ms: f64) {
        if !(simulated_ms.is_finite() && simulated_ms > 0.0) {
            return;
        }

        match Duration::try_from_secs_f64(simulated_ms * self.scale / 1000.0) {
            Ok(pause) => thread::sleep(pause),
            Err(err) => log::warn!("Skipping pause of {} ms at scale {}: {}", simulated_ms, self.scale, err),
        }
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacer;

impl Pacer for NoPacer {
    fn pause_ms(&self, _simulated_ms: f64) {}
}

/// Records requested pauses instead of sleeping.
#[derive(Debug, Clone, Default)]
pub struct RecordingPacer {
    pub pauses: Arc<Mutex<Vec<f64>>>,
}

impl RecordingPacer {
    pub fn recorded(&self) -> Vec<f64> {
        self.pauses.lock().map(|pauses| pauses.clone()).unwrap_or_default()
    }
}

impl Pacer for RecordingPacer {
    fn pause_ms(&self, simulated_ms: f64) {
        if let Ok(mut pauses) = self.pauses.lock() {
            pauses.push(simulated_ms);
        }
    }
}
