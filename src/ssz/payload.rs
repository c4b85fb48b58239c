//! Decodes the versioned top-level SSZ execution payload container.

use alloy_primitives::U256;

use super::error::CodecError;
use super::reader::Reader;
use super::transactions::decode_transactions;
use super::withdrawals::{decode_withdrawals, Withdrawal};

/// The execution payload version.
///
/// Modeled as an open enum rather than a raw integer compared against a
/// magic constant: a later fork that extends the wire format (Ecotone's
/// blob gas fields, say) adds a new variant and a new match arm here, it
/// never reinterprets what `Capella`'s bytes mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadVersion {
    /// Pre-withdrawals (Bellatrix-era) payload layout.
    Bellatrix,
    /// With-withdrawals (Capella-era) payload layout.
    Capella,
}

impl PayloadVersion {
    /// Size of the fixed part of the container, in bytes, for this version.
    pub fn fixed_part_len(self) -> usize {
        match self {
            // 32 + 20 + 32 + 32 + 256 + 32 + 8*4 + 4 + 32 + 32 + 4
            PayloadVersion::Bellatrix => 508,
            // Bellatrix + one more u32 offset for withdrawals
            PayloadVersion::Capella => 512,
        }
    }

    /// Whether this version carries a withdrawals list.
    pub fn has_withdrawals(self) -> bool {
        matches!(self, PayloadVersion::Capella)
    }
}

/// A decoded execution payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPayload {
    /// Hash of the parent payload.
    pub parent_hash: [u8; 32],
    /// State root after applying this payload.
    pub state_root: [u8; 32],
    /// Receipts root after applying this payload.
    pub receipts_root: [u8; 32],
    /// Beacon-chain randomness value (`prevRandao`).
    pub prev_randao: [u8; 32],
    /// Hash of this payload.
    pub block_hash: [u8; 32],
    /// Fee recipient address.
    pub fee_recipient: [u8; 20],
    /// Bloom filter over the logs emitted in this payload.
    pub logs_bloom: [u8; 256],
    /// Block number.
    pub block_number: u64,
    /// Gas limit.
    pub gas_limit: u64,
    /// Gas used.
    pub gas_used: u64,
    /// Block timestamp.
    pub timestamp: u64,
    /// Base fee per gas.
    pub base_fee_per_gas: U256,
    /// Extra data, 0-32 bytes.
    pub extra_data: Vec<u8>,
    /// Ordered, opaque transaction byte strings.
    pub transactions: Vec<Vec<u8>>,
    /// Withdrawals; `None` for `Bellatrix`, `Some` (possibly empty) for `Capella`.
    pub withdrawals: Option<Vec<Withdrawal>>,
}

/// Maximum permitted `extra_data` length, in bytes.
pub const MAX_EXTRA_DATA_LEN: usize = 32;

/// Decodes `data` as an [`ExecutionPayload`] of the given `version`.
///
/// A successful decode consumes every byte of `data`; trailing bytes are a
/// `CodecError::TrailingBytes`.
pub fn decode(data: &[u8], version: PayloadVersion) -> Result<ExecutionPayload, CodecError> {
    let total_len = data.len();
    let fixed_len = version.fixed_part_len();

    if total_len < fixed_len {
        return Err(CodecError::Truncated {
            needed: fixed_len,
            available: total_len,
        });
    }

    let mut r = Reader::new(data);

    let parent_hash = r.read_hash()?;
    let fee_recipient = r.read_address()?;
    let state_root = r.read_hash()?;
    let receipts_root = r.read_hash()?;
    let logs_bloom = read_bloom(&mut r)?;
    let prev_randao = r.read_hash()?;
    let block_number = r.read_u64()?;
    let gas_limit = r.read_u64()?;
    let gas_used = r.read_u64()?;
    let timestamp = r.read_u64()?;

    let extra_data_offset = r.read_u32()? as usize;
    if extra_data_offset != fixed_len {
        return Err(CodecError::UnexpectedOffset {
            reason: format!(
                "extra_data_offset {extra_data_offset} must equal the fixed part length {fixed_len}"
            ),
        });
    }

    let base_fee_per_gas = r.read_u256()?;
    let block_hash = r.read_hash()?;

    let transactions_offset = r.read_u32()? as usize;
    if transactions_offset < extra_data_offset || transactions_offset > total_len {
        return Err(CodecError::UnexpectedOffset {
            reason: format!(
                "transactions_offset {transactions_offset} must be within [{extra_data_offset}, {total_len}]"
            ),
        });
    }
    let extra_data_len = transactions_offset - extra_data_offset;
    if extra_data_len > MAX_EXTRA_DATA_LEN {
        return Err(CodecError::ExtraDataTooLarge { len: extra_data_len });
    }

    let withdrawals_offset = if version.has_withdrawals() {
        let offset = r.read_u32()? as usize;
        if offset < transactions_offset || offset > total_len {
            return Err(CodecError::UnexpectedOffset {
                reason: format!(
                    "withdrawals_offset {offset} must be within [{transactions_offset}, {total_len}]"
                ),
            });
        }
        offset
    } else {
        total_len
    };

    debug_assert_eq!(r.position(), fixed_len);

    let extra_data = data[extra_data_offset..transactions_offset].to_vec();
    let transactions = decode_transactions(&data[transactions_offset..withdrawals_offset])?;

    let withdrawals = if version.has_withdrawals() {
        Some(decode_withdrawals(&data[withdrawals_offset..total_len])?)
    } else {
        None
    };

    Ok(ExecutionPayload {
        parent_hash,
        state_root,
        receipts_root,
        prev_randao,
        block_hash,
        fee_recipient,
        logs_bloom,
        block_number,
        gas_limit,
        gas_used,
        timestamp,
        base_fee_per_gas,
        extra_data,
        transactions,
        withdrawals,
    })
}

fn read_bloom(r: &mut Reader<'_>) -> Result<[u8; 256], CodecError> {
    let slice = r.read_fixed(256)?;
    let mut out = [0u8; 256];
    out.copy_from_slice(slice);
    Ok(out)
}
