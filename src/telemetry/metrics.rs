//! Prometheus Metrics Module.

use eyre::Result;
use lazy_static::lazy_static;
use prometheus_exporter::{
    prometheus::{register_int_gauge, IntGauge},
    start,
};

lazy_static! {
    /// Tracks the most recently computed beacon slot.
    pub static ref BEACON_SLOT: IntGauge =
        register_int_gauge!("beacon_slot", "most recent beacon slot computed from an L1 timestamp").unwrap();
    /// Counts beacon fetch failures (transport errors, non-2xx responses, decode errors).
    pub static ref BEACON_FETCH_ERRORS: IntGauge =
        register_int_gauge!("beacon_fetch_errors", "total beacon fetch failures").unwrap();
    /// Counts execution payload decode failures.
    pub static ref PAYLOAD_DECODE_ERRORS: IntGauge =
        register_int_gauge!("payload_decode_errors", "total execution payload decode failures").unwrap();
}

/// Starts the metrics server on port 9200
pub fn init() -> Result<()> {
    match start("0.0.0.0:9200".parse()) {
        Ok(_) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
