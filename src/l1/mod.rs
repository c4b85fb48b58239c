//! Ingests L1 consensus-layer data: beacon genesis/spec lookups, slot
//! arithmetic, blob sidecar retrieval, and blob-to-calldata reassembly.

pub mod beacon_client;
pub mod blob;
pub mod error;
pub mod types;

pub use beacon_client::{BeaconFetcher, BeaconTransport, BlockId, ReqwestTransport};
pub use blob::decode_blob_data;
pub use error::{BlobError, FetchError};
pub use types::{BeaconGenesis, BeaconSpec, BlobSidecar, Bytes, DataEnvelope};
