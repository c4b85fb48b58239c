//! Wire types for the consensus-layer beacon API.
//!
//! Beacon API responses wrap their payload in a `{ "data": ... }` envelope
//! and frequently encode integers as decimal strings; these types parse
//! both tolerantly and ignore unknown fields, per the beacon API's own
//! forward-compatibility contract.

use serde::{de, Deserialize, Deserializer};

fn deserialize_decimal_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse::<u64>().map_err(de::Error::custom)
}

/// Envelope used by every beacon API response: `{ "data": T }`.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    /// The wrapped payload.
    pub data: T,
}

/// `GET /eth/v1/beacon/genesis` response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BeaconGenesis {
    /// Unix timestamp of the beacon chain genesis.
    #[serde(rename = "genesis_time", deserialize_with = "deserialize_decimal_u64")]
    pub genesis_time: u64,
}

/// `GET /eth/v1/config/spec` response body.
///
/// The beacon spec has dozens of fields; only `SECONDS_PER_SLOT` is
/// required here, and unknown fields are ignored rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BeaconSpec {
    /// Length of a single slot, in seconds.
    #[serde(
        rename = "SECONDS_PER_SLOT",
        deserialize_with = "deserialize_decimal_u64"
    )]
    pub seconds_per_slot: u64,
}

/// A single blob sidecar as returned by `/eth/v1/beacon/blob_sidecars`.
///
/// Opaque beyond the fields the fetcher actually forwards: KZG commitment
/// verification and inclusion-proof checking are left to a separate
/// verifier.
#[derive(Debug, Clone, Deserialize)]
pub struct BlobSidecar {
    /// Index of this blob within its slot.
    #[serde(deserialize_with = "deserialize_decimal_u64")]
    pub index: u64,
    /// The raw blob bytes (~128 KiB), hex-encoded on the wire.
    pub blob: Bytes,
    /// KZG commitment over the blob, hex-encoded on the wire.
    pub kzg_commitment: Bytes,
    /// KZG proof attesting to the commitment, hex-encoded on the wire.
    pub kzg_proof: Bytes,
}

pub use bytes_wrapper::Bytes;

/// A thin wrapper so `0x`-prefixed hex strings decode straight into bytes.
mod bytes_wrapper {
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;
    use std::ops::Deref;

    /// Hex-encoded byte string, as the beacon API represents blobs,
    /// commitments, and proofs.
    #[derive(Clone, PartialEq, Eq, Default)]
    pub struct Bytes(pub Vec<u8>);

    impl Deref for Bytes {
        type Target = [u8];

        fn deref(&self) -> &[u8] {
            &self.0
        }
    }

    impl fmt::Debug for Bytes {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "0x{}", hex::encode(&self.0))
        }
    }

    impl Serialize for Bytes {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&format!("0x{}", hex::encode(&self.0)))
        }
    }

    impl<'de> Deserialize<'de> for Bytes {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            let stripped = s.strip_prefix("0x").unwrap_or(&s);
            Ok(Bytes(hex::decode(stripped).map_err(de::Error::custom)?))
        }
    }
}
