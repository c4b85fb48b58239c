//! Polls an L1 beacon node for blob sidecars and decodes each one into an
//! execution payload.

use std::future::Future;
use std::time::Duration;

use tokio::select;
use tokio::sync::watch::{channel, Receiver};
use tokio::time::sleep;

use crate::config::BeaconConfig;
use crate::l1::{BeaconFetcher, BlobError, BlockId, FetchError};
use crate::ssz::{self, CodecError, ExecutionPayload, PayloadVersion};
use crate::telemetry::metrics::{BEACON_FETCH_ERRORS, BEACON_SLOT, PAYLOAD_DECODE_ERRORS};

/// Errors produced while polling for and fetching a slot's blob sidecars.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Fetching genesis/spec/sidecars from the beacon node failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Errors produced while turning a single blob sidecar into an execution
/// payload.
#[derive(Debug, thiserror::Error)]
pub enum SidecarDecodeError {
    /// The blob failed to reassemble into batcher calldata.
    #[error("blob reassembly failed: {0}")]
    Blob(#[from] BlobError),

    /// The reassembled calldata failed to decode as an execution payload.
    #[error("payload decode failed: {0}")]
    Payload(#[from] CodecError),
}

/// Polls L1 for the blob sidecars that carry batcher calldata, decoding each
/// into an [`ExecutionPayload`].
///
/// Reconstructing a single logical batch that spans multiple blobs or
/// frames is out of scope here; each sidecar's blob is decoded
/// independently into at most one payload.
pub struct Runner {
    fetcher: BeaconFetcher,
    config: BeaconConfig,
    version: PayloadVersion,
    shutdown_recv: Receiver<bool>,
}

/// The outcome of decoding a single blob sidecar.
#[derive(Debug)]
pub struct DecodedSidecar {
    /// Index of the sidecar within its slot.
    pub index: u64,
    /// The decoded payload, or the error that prevented decoding it.
    pub payload: Result<ExecutionPayload, SidecarDecodeError>,
}

impl Runner {
    /// Creates a [`Runner`] from a [`BeaconConfig`] and registers the
    /// shutdown signal handler.
    pub fn from_config(config: BeaconConfig, version: PayloadVersion) -> Self {
        let (shutdown_sender, shutdown_recv) = channel(false);
        ctrlc::set_handler(move || {
            tracing::info!("shutting down");
            shutdown_sender
                .send(true)
                .expect("could not send shutdown signal");
        })
        .expect("could not register shutdown handler");

        let fetcher = BeaconFetcher::new(config.beacon_url.clone());
        Self {
            fetcher,
            config,
            version,
            shutdown_recv,
        }
    }

    /// Races `fut` against the shutdown signal: if shutdown fires first, the
    /// request is abandoned (dropping `fut` aborts its in-flight HTTP call)
    /// and `FetchError::Cancelled` is returned instead of the request's own
    /// result.
    async fn cancellable<T>(
        &self,
        fut: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        let mut shutdown = self.shutdown_recv.clone();
        select! {
            res = fut => res,
            _ = shutdown.changed() => Err(FetchError::Cancelled),
        }
    }

    /// Computes the beacon slot for `l1_timestamp`, fetches its blob
    /// sidecars, and decodes each blob into an execution payload.
    ///
    /// A sidecar that fails to decode does not fail the whole call; its
    /// error is carried alongside the sidecars that did decode. Both
    /// beacon-node requests are scoped to the shutdown signal: if shutdown
    /// fires while either is in flight, it is aborted and this returns
    /// `FetchError::Cancelled` rather than waiting for completion.
    pub async fn run_once(&self, l1_timestamp: u64) -> Result<Vec<DecodedSidecar>, RunnerError> {
        let slot = match self
            .cancellable(self.fetcher.slot_from_time(l1_timestamp))
            .await
        {
            Ok(slot) => slot,
            Err(err) => {
                BEACON_FETCH_ERRORS.inc();
                return Err(err.into());
            }
        };
        BEACON_SLOT.set(slot as i64);

        let sidecars = match self
            .cancellable(self.fetcher.blob_sidecars(
                BlockId::Slot(slot),
                self.config.default_blob_indices.as_deref(),
            ))
            .await
        {
            Ok(sidecars) => sidecars,
            Err(err) => {
                BEACON_FETCH_ERRORS.inc();
                return Err(err.into());
            }
        };

        let mut decoded = Vec::with_capacity(sidecars.len());
        for sidecar in sidecars {
            let payload = crate::l1::decode_blob_data(&sidecar.blob)
                .map_err(SidecarDecodeError::from)
                .and_then(|calldata| ssz::decode(&calldata, self.version).map_err(SidecarDecodeError::from));

            if payload.is_err() {
                PAYLOAD_DECODE_ERRORS.inc();
            }

            decoded.push(DecodedSidecar {
                index: sidecar.index,
                payload,
            });
        }

        Ok(decoded)
    }

    /// Polls `run_once` against the advancing L1 head every `poll_interval`
    /// until the shutdown signal fires.
    pub async fn run(&self, poll_interval: Duration) {
        loop {
            if *self.shutdown_recv.borrow() {
                tracing::info!("runner shut down");
                return;
            }

            let now = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs();

            match self.run_once(now).await {
                Ok(decoded) => {
                    tracing::info!(count = decoded.len(), "decoded sidecars");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "run_once failed");
                }
            }

            let mut shutdown = self.shutdown_recv.clone();
            select! {
                _ = sleep(poll_interval) => {}
                _ = shutdown.changed() => {}
            }
        }
    }
}
