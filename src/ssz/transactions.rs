//! Decodes an SSZ list-of-variable-length-bytes using the offset-table-prefix
//! convention: the first element's offset doubles as the element count,
//! since offsets are packed 4-to-an-element ahead of the payload bytes.

use super::error::CodecError;
use super::reader::Reader;

/// Protocol maximum number of transactions in a single payload.
pub const MAX_TRANSACTIONS: usize = 1 << 20;

/// Decodes the transactions sub-buffer into an ordered list of opaque
/// byte strings.
///
/// Each declared offset must exactly cover real bytes: a short or
/// over-long final slot relative to the end of buffer sentinel is rejected,
/// rather than tolerated as a defensive fallback.
pub fn decode_transactions(buf: &[u8]) -> Result<Vec<Vec<u8>>, CodecError> {
    let total_len = buf.len();
    if total_len == 0 {
        return Ok(Vec::new());
    }
    if total_len < 4 {
        return Err(CodecError::Truncated {
            needed: 4,
            available: total_len,
        });
    }

    let mut r = Reader::new(buf);
    let first_offset = r.read_u32()? as usize;

    if first_offset % 4 != 0 {
        return Err(CodecError::InvalidOffset {
            reason: format!("first offset {first_offset} is not a multiple of 4"),
        });
    }
    if first_offset > total_len {
        return Err(CodecError::InvalidOffset {
            reason: format!("first offset {first_offset} exceeds buffer length {total_len}"),
        });
    }

    // A first offset of 0 would mean "zero transactions", but we already
    // know total_len >= 4: there is no valid tiling of a non-empty
    // sub-buffer with an empty offset table, so this is malformed rather
    // than a legitimate empty list (that case is handled by the
    // `total_len == 0` check above).
    if first_offset == 0 {
        return Err(CodecError::InvalidOffset {
            reason: format!(
                "first offset 0 encodes zero transactions, but the sub-buffer is {total_len} bytes"
            ),
        });
    }

    let count = first_offset / 4;
    if count > MAX_TRANSACTIONS {
        return Err(CodecError::TooManyTransactions { count });
    }

    let mut offsets = Vec::with_capacity(count);
    offsets.push(first_offset);
    for _ in 1..count {
        offsets.push(r.read_u32()? as usize);
    }
    offsets.push(total_len);

    if r.position() != first_offset {
        return Err(CodecError::TrailingBytes {
            remaining: total_len - r.position(),
            total: total_len,
        });
    }

    let mut transactions = Vec::with_capacity(count);
    for i in 0..count {
        let start = offsets[i];
        let end = offsets[i + 1];
        if end < start {
            return Err(CodecError::InvalidOffset {
                reason: format!("offset {i} ({end}) precedes offset {i} ({start})"),
            });
        }
        if end > total_len {
            return Err(CodecError::InvalidOffset {
                reason: format!("offset {i} ({end}) exceeds buffer length {total_len}"),
            });
        }
        transactions.push(buf[start..end].to_vec());
    }

    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_yields_empty_list() {
        assert_eq!(decode_transactions(&[]).unwrap(), Vec::<Vec<u8>>::new());
    }

    #[test]
    fn single_zero_byte_transaction() {
        // one offset (4) pointing at the end of a 4-byte buffer -> one empty transaction
        let buf = 4u32.to_le_bytes().to_vec();
        let txs = decode_transactions(&buf).unwrap();
        assert_eq!(txs, vec![Vec::<u8>::new()]);
    }

    #[test]
    fn three_transactions_round_trip() {
        // offsets: 12, 13, 15; payload bytes: aa bb cc dd
        let mut buf = Vec::new();
        buf.extend_from_slice(&12u32.to_le_bytes());
        buf.extend_from_slice(&13u32.to_le_bytes());
        buf.extend_from_slice(&15u32.to_le_bytes());
        buf.extend_from_slice(&[0xaa, 0xbb, 0xcc, 0xdd]);

        let txs = decode_transactions(&buf).unwrap();
        assert_eq!(txs, vec![vec![0xaa], vec![0xbb, 0xcc], vec![0xdd]]);
    }

    #[test]
    fn rejects_offset_not_a_multiple_of_four() {
        let buf = 5u32.to_le_bytes().to_vec();
        assert!(matches!(
            decode_transactions(&buf).unwrap_err(),
            CodecError::InvalidOffset { .. }
        ));
    }

    #[test]
    fn rejects_first_offset_beyond_buffer() {
        let buf = 100u32.to_le_bytes().to_vec();
        assert!(matches!(
            decode_transactions(&buf).unwrap_err(),
            CodecError::InvalidOffset { .. }
        ));
    }

    #[test]
    fn rejects_truncated_offset_table() {
        let buf = vec![0u8, 1, 2];
        assert!(matches!(
            decode_transactions(&buf).unwrap_err(),
            CodecError::Truncated { .. }
        ));
    }

    #[test]
    fn rejects_non_monotonic_offsets() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&8u32.to_le_bytes());
        buf.extend_from_slice(&[0u8; 8]);
        assert!(matches!(
            decode_transactions(&buf).unwrap_err(),
            CodecError::InvalidOffset { .. }
        ));
    }

    #[test]
    fn rejects_zero_first_offset_with_trailing_bytes() {
        // first_offset == 0 claims zero transactions, but 4 more bytes follow.
        let mut buf = Vec::new();
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&[0xaa, 0xbb, 0xcc, 0xdd]);
        assert!(matches!(
            decode_transactions(&buf).unwrap_err(),
            CodecError::InvalidOffset { .. }
        ));
    }

    #[test]
    fn rejects_zero_first_offset_with_no_further_bytes() {
        // Exactly 4 bytes, all zero: first_offset == 0 and total_len == 4.
        let buf = 0u32.to_le_bytes().to_vec();
        assert!(matches!(
            decode_transactions(&buf).unwrap_err(),
            CodecError::InvalidOffset { .. }
        ));
    }

    #[test]
    fn decode_transactions_never_panics_on_arbitrary_bytes() {
        for len in 0..40 {
            for fill in [0x00u8, 0xab] {
                let buf = vec![fill; len];
                let _ = decode_transactions(&buf);
            }
        }
    }
}
