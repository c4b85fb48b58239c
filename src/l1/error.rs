//! The beacon fetch error taxonomy.

/// Errors produced while talking to the L1 beacon node.
///
/// The fetcher never retries internally; every error is surfaced to the
/// caller verbatim so the derivation pipeline can decide whether and how to
/// retry.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// A network-level failure: connection refused, DNS failure, TLS error, timeout.
    #[error("beacon transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The beacon node responded with a non-2xx status.
    #[error("beacon node returned HTTP {code}: {body}")]
    HttpStatus {
        /// The HTTP status code.
        code: u16,
        /// The response body, for diagnostics.
        body: String,
    },

    /// The response body could not be parsed as the expected JSON shape.
    #[error("failed to decode beacon response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The in-flight request was cancelled before completion.
    #[error("beacon request cancelled")]
    Cancelled,

    /// The caller asked for a slot at a timestamp before genesis.
    #[error("timestamp {timestamp} precedes genesis {genesis_time}")]
    ClockSkew {
        /// The timestamp the caller supplied.
        timestamp: u64,
        /// The cached genesis time.
        genesis_time: u64,
    },
}

/// Errors produced while reassembling batcher-transaction bytes from a blob.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlobError {
    /// The blob was shorter than the fixed EIP-4844 blob size.
    #[error("blob truncated: needed {needed} bytes, had {available}")]
    Truncated {
        /// Bytes required.
        needed: usize,
        /// Bytes actually present.
        available: usize,
    },

    /// The blob's encoding version byte was not the one this decoder understands.
    #[error("invalid blob encoding version: got {got}, want 0")]
    InvalidVersion {
        /// The version byte actually found.
        got: u8,
    },

    /// The blob declared an output length beyond what a single blob can hold.
    #[error("invalid blob output length: {len} exceeds maximum {max}")]
    InvalidLength {
        /// The declared length.
        len: usize,
        /// The maximum a single blob can encode.
        max: usize,
    },

    /// A field element's two high-order bits were not zero.
    #[error("invalid field element at blob position {position}")]
    InvalidFieldElement {
        /// Byte offset of the offending field element within the blob.
        position: usize,
    },

    /// Non-zero padding bytes were found where the encoding requires zeros.
    #[error("extraneous data in field element at position {field_element}")]
    ExtraneousData {
        /// Byte offset of the first non-zero padding byte.
        field_element: usize,
    },
}
