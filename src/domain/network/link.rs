use crate::error::{Error, Result};

/// Propagation speed of a signal in optical fiber (m/s).
pub const SPEED_OF_LIGHT_FIBER: f64 = 2e8;

/// A point-to-point connection between two vertices.
///
/// A `transmission_rate` of `0` marks a connection inside the same device: it
/// contributes no transmission delay at all instead of an infinite one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Physical length of the link in meters.
    distance: f64,

    /// Transmission rate in bits per second.
    transmission_rate: f64,
}

impl Link {
    pub fn new(distance: f64, transmission_rate: f64) -> Result<Self> {
        if !distance.is_finite() || distance < 0.0 {
            return Err(Error::InvalidLink(format!("distance must be a non-negative number of meters, got {}", distance)));
        }

        if !transmission_rate.is_finite() || transmission_rate < 0.0 {
            return Err(Error::InvalidLink(format!("transmission rate must be a non-negative number of bits/s, got {}", transmission_rate)));
        }

        Ok(Self { distance, transmission_rate })
    }

    /// Builds a link from optionally present attributes, as found in topology files.
    pub fn from_parts(distance: Option<f64>, transmission_rate: Option<f64>) -> Result<Self> {
        match (distance, transmission_rate) {
            (Some(distance), Some(transmission_rate)) => Link::new(distance, transmission_rate),
            _ => Err(Error::InvalidLink("both distance and transmission rate must be provided".to_string())),
        }
    }

    /// A zero-cost link between two ports of the same device.
    pub fn same_device() -> Self {
        Self { distance: 0.0, transmission_rate: 0.0 }
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn transmission_rate(&self) -> f64 {
        self.transmission_rate
    }

    /// Time in seconds to push all bits of a packet onto the link.
    pub fn transmission_delay(&self, packet_size_bits: f64) -> f64 {
        if self.transmission_rate == 0.0 {
            return 0.0;
        }
        packet_size_bits / self.transmission_rate
    }

    /// Time in seconds for the signal to travel the length of the link.
    pub fn propagation_delay(&self) -> f64 {
        self.distance / SPEED_OF_LIGHT_FIBER
    }

    /// One-way delay in seconds for a packet of the given size.
    pub fn delay(&self, packet_size_bits: f64) -> f64 {
        self.transmission_delay(packet_size_bits) + self.propagation_delay()
    }
}
