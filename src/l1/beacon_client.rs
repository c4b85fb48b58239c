//! A client for the consensus-layer beacon API: genesis/spec lookups, slot
//! arithmetic, and blob sidecar retrieval.

use async_trait::async_trait;
use tokio::sync::OnceCell;

use super::error::FetchError;
use super::types::{BeaconGenesis, BeaconSpec, BlobSidecar, DataEnvelope};

/// Identifies a beacon block for the `blob_sidecars` endpoint: either a slot
/// number or a block root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockId {
    /// A slot number.
    Slot(u64),
    /// A `0x`-prefixed beacon block root.
    Root(String),
}

impl BlockId {
    fn path_segment(&self) -> String {
        match self {
            BlockId::Slot(slot) => slot.to_string(),
            BlockId::Root(root) => root.clone(),
        }
    }
}

/// Abstracts the HTTP transport so [`BeaconFetcher`]'s slot/cache logic can
/// be driven from tests without a live beacon node.
///
/// `path` is relative to the beacon base URL (e.g. `"eth/v1/beacon/genesis"`);
/// `query` is an ordered list of key/value pairs appended as a query string.
#[async_trait]
pub trait BeaconTransport: Send + Sync {
    /// Performs a `GET` request and parses the response body as JSON.
    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, FetchError>;
}

/// Production [`BeaconTransport`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport rooted at `base_url` (no trailing slash expected).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl BeaconTransport for ReqwestTransport {
    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, FetchError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let resp = self.client.get(&url).query(query).send().await?;

        if !resp.status().is_success() {
            let code = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::HttpStatus { code, body });
        }

        let bytes = resp.bytes().await?;
        let value = serde_json::from_slice(&bytes)?;
        Ok(value)
    }
}

/// Retrieves beacon genesis/spec data and blob sidecars, memoizing the
/// `(genesis_time, seconds_per_slot)` pair used for slot arithmetic.
///
/// Long-lived and safe for concurrent use: the memoized pair is published
/// atomically through a [`tokio::sync::OnceCell`], so concurrent callers on
/// a cold cache either both race to populate it (benign; the results are
/// identical and one publication wins) or one observes the already-published
/// value. No caller ever sees a half-initialized pair.
pub struct BeaconFetcher<T: BeaconTransport = ReqwestTransport> {
    transport: T,
    slot_params: OnceCell<(u64, u64)>,
}

impl BeaconFetcher<ReqwestTransport> {
    /// Creates a fetcher talking to the beacon node at `beacon_url`.
    pub fn new(beacon_url: impl Into<String>) -> Self {
        Self::with_transport(ReqwestTransport::new(beacon_url))
    }
}

impl<T: BeaconTransport> BeaconFetcher<T> {
    /// Creates a fetcher using a caller-supplied transport (for tests, a
    /// fake implementing [`BeaconTransport`]).
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            slot_params: OnceCell::new(),
        }
    }

    /// Fetches the beacon genesis timestamp.
    pub async fn genesis_timestamp(&self) -> Result<u64, FetchError> {
        let (genesis_time, _) = self.slot_params().await?;
        Ok(genesis_time)
    }

    /// Fetches the beacon spec (currently only `seconds_per_slot` is parsed).
    pub async fn spec(&self) -> Result<BeaconSpec, FetchError> {
        let value = self.transport.get_json("eth/v1/config/spec", &[]).await?;
        let envelope: DataEnvelope<BeaconSpec> = serde_json::from_value(value)?;
        Ok(envelope.data)
    }

    /// Computes the beacon slot for L1 timestamp `t`.
    ///
    /// On the first call this fetches and caches `(genesis_time,
    /// seconds_per_slot)`; every later call reuses the cached pair without
    /// touching the network.
    pub async fn slot_from_time(&self, t: u64) -> Result<u64, FetchError> {
        let (genesis_time, seconds_per_slot) = self.slot_params().await?;
        if t < genesis_time {
            return Err(FetchError::ClockSkew {
                timestamp: t,
                genesis_time,
            });
        }
        Ok((t - genesis_time) / seconds_per_slot)
    }

    /// Fetches the blob sidecars for `block_id`, optionally restricted to
    /// `indices`. An empty or absent `indices` yields every sidecar for the
    /// slot.
    pub async fn blob_sidecars(
        &self,
        block_id: BlockId,
        indices: Option<&[u64]>,
    ) -> Result<Vec<BlobSidecar>, FetchError> {
        let path = format!(
            "eth/v1/beacon/blob_sidecars/{}",
            block_id.path_segment()
        );

        let query_value;
        let query: &[(&str, String)] = match indices {
            Some(idx) if !idx.is_empty() => {
                let joined = idx
                    .iter()
                    .map(u64::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                query_value = [("indices", joined)];
                &query_value
            }
            _ => &[],
        };

        let value = self.transport.get_json(&path, query).await?;
        let envelope: DataEnvelope<Vec<BlobSidecar>> = serde_json::from_value(value)?;
        Ok(envelope.data)
    }

    async fn slot_params(&self) -> Result<(u64, u64), FetchError> {
        self.slot_params
            .get_or_try_init(|| async {
                let genesis_value = self.transport.get_json("eth/v1/beacon/genesis", &[]).await?;
                let genesis: DataEnvelope<BeaconGenesis> = serde_json::from_value(genesis_value)?;

                let spec = self.spec().await?;

                Ok((genesis.data.genesis_time, spec.seconds_per_slot))
            })
            .await
            .map(|pair| *pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct FakeTransport {
        genesis_calls: Arc<AtomicUsize>,
        spec_calls: Arc<AtomicUsize>,
        genesis_time: u64,
        seconds_per_slot: u64,
        sidecars_response: serde_json::Value,
        last_query: Arc<std::sync::Mutex<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl BeaconTransport for FakeTransport {
        async fn get_json(
            &self,
            path: &str,
            query: &[(&str, String)],
        ) -> Result<serde_json::Value, FetchError> {
            *self.last_query.lock().unwrap() = query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect();

            if path == "eth/v1/beacon/genesis" {
                self.genesis_calls.fetch_add(1, Ordering::SeqCst);
                return Ok(serde_json::json!({
                    "data": { "genesis_time": self.genesis_time.to_string() }
                }));
            }
            if path == "eth/v1/config/spec" {
                self.spec_calls.fetch_add(1, Ordering::SeqCst);
                return Ok(serde_json::json!({
                    "data": { "SECONDS_PER_SLOT": self.seconds_per_slot.to_string() }
                }));
            }
            if path.starts_with("eth/v1/beacon/blob_sidecars/") {
                return Ok(self.sidecars_response.clone());
            }
            panic!("unexpected path: {path}");
        }
    }

    #[tokio::test]
    async fn slot_from_time_computes_expected_slots() {
        let transport = FakeTransport {
            genesis_time: 1000,
            seconds_per_slot: 12,
            ..Default::default()
        };
        let fetcher = BeaconFetcher::with_transport(transport);

        assert_eq!(fetcher.slot_from_time(1024).await.unwrap(), 2);
        assert_eq!(fetcher.slot_from_time(1036).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn slot_params_are_cached_after_first_fetch() {
        let transport = FakeTransport {
            genesis_time: 1000,
            seconds_per_slot: 12,
            ..Default::default()
        };
        let genesis_calls = transport.genesis_calls.clone();
        let spec_calls = transport.spec_calls.clone();
        let fetcher = BeaconFetcher::with_transport(transport);

        fetcher.slot_from_time(1024).await.unwrap();
        fetcher.slot_from_time(1036).await.unwrap();
        fetcher.genesis_timestamp().await.unwrap();

        assert_eq!(genesis_calls.load(Ordering::SeqCst), 1);
        assert_eq!(spec_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejects_timestamps_before_genesis() {
        let transport = FakeTransport {
            genesis_time: 1000,
            seconds_per_slot: 12,
            ..Default::default()
        };
        let fetcher = BeaconFetcher::with_transport(transport);

        let err = fetcher.slot_from_time(999).await.unwrap_err();
        assert!(matches!(err, FetchError::ClockSkew { .. }));
    }

    #[tokio::test]
    async fn blob_sidecars_projects_indices_into_query_string() {
        let transport = FakeTransport {
            sidecars_response: serde_json::json!({ "data": [] }),
            ..Default::default()
        };
        let last_query = transport.last_query.clone();
        let fetcher = BeaconFetcher::with_transport(transport);

        fetcher
            .blob_sidecars(BlockId::Slot(42), Some(&[1, 2, 3]))
            .await
            .unwrap();

        assert_eq!(
            *last_query.lock().unwrap(),
            vec![("indices".to_string(), "1,2,3".to_string())]
        );
    }

    #[tokio::test]
    async fn blob_sidecars_with_no_indices_omits_query() {
        let transport = FakeTransport {
            sidecars_response: serde_json::json!({ "data": [] }),
            ..Default::default()
        };
        let last_query = transport.last_query.clone();
        let fetcher = BeaconFetcher::with_transport(transport);

        fetcher.blob_sidecars(BlockId::Slot(42), None).await.unwrap();

        assert!(last_query.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blob_sidecars_parses_returned_sidecars() {
        let transport = FakeTransport {
            sidecars_response: serde_json::json!({
                "data": [
                    { "index": "0", "blob": "0xaa", "kzg_commitment": "0xbb", "kzg_proof": "0xcc" }
                ]
            }),
            ..Default::default()
        };
        let fetcher = BeaconFetcher::with_transport(transport);

        let sidecars = fetcher
            .blob_sidecars(BlockId::Root("0xdead".to_string()), None)
            .await
            .unwrap();

        assert_eq!(sidecars.len(), 1);
        assert_eq!(sidecars[0].index, 0);
    }
}
