//! The codec error taxonomy.

/// Errors produced while decoding an SSZ-encoded execution payload or one of
/// its sub-containers.
///
/// Every decode path returns a [`CodecError`] rather than panicking: a
/// malformed payload is expected input, not a bug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The buffer was shorter than a read required, including the fixed part.
    #[error("buffer truncated: needed {needed} bytes, had {available}")]
    Truncated {
        /// Bytes the read required.
        needed: usize,
        /// Bytes actually remaining.
        available: usize,
    },

    /// A declared offset disagreed with the position it must equal, or broke
    /// monotonicity between declared offsets.
    #[error("unexpected offset: {reason}")]
    UnexpectedOffset {
        /// Human-readable explanation of which offset and why.
        reason: String,
    },

    /// A transaction offset was not a multiple of 4, or pointed outside the
    /// transactions sub-buffer.
    #[error("invalid transaction offset: {reason}")]
    InvalidOffset {
        /// Human-readable explanation.
        reason: String,
    },

    /// `extra_data` would be longer than 32 bytes.
    #[error("extra_data too large: {len} bytes (max 32)")]
    ExtraDataTooLarge {
        /// The length that was rejected.
        len: usize,
    },

    /// More than 2^20 transactions were declared.
    #[error("too many transactions: {count} (max 1048576)")]
    TooManyTransactions {
        /// The declared count.
        count: usize,
    },

    /// More than 16 withdrawals were declared.
    #[error("too many withdrawals: {count} (max 16)")]
    TooManyWithdrawals {
        /// The declared count.
        count: usize,
    },

    /// The withdrawals buffer length was not a multiple of 44.
    #[error("invalid withdrawals buffer length: {len} is not a multiple of 44")]
    InvalidLength {
        /// The buffer length that was rejected.
        len: usize,
    },

    /// Bytes remained after a nominally complete decode.
    #[error("trailing bytes: {remaining} unconsumed of {total}")]
    TrailingBytes {
        /// Bytes left over.
        remaining: usize,
        /// Total input length.
        total: usize,
    },
}
