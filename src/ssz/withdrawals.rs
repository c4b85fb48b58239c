//! Decodes the fixed-stride withdrawal list carried by Capella-era payloads.

use super::error::CodecError;
use super::reader::Reader;

/// Wire size of a single withdrawal record.
pub const WITHDRAWAL_STRIDE: usize = 44;

/// Protocol maximum number of withdrawals in a single payload.
pub const MAX_WITHDRAWALS: usize = 16;

/// A single beacon-chain withdrawal, as carried by a Capella execution
/// payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Withdrawal {
    /// Global withdrawal index.
    pub index: u64,
    /// Index of the validator the withdrawal originates from.
    pub validator_index: u64,
    /// Recipient address.
    pub address: [u8; 20],
    /// Amount withdrawn, in Gwei.
    pub amount: u64,
}

/// Decodes a withdrawal list from its wire buffer.
///
/// `buf` must be an exact multiple of [`WITHDRAWAL_STRIDE`] bytes; the
/// decoded list preserves input order.
pub fn decode_withdrawals(buf: &[u8]) -> Result<Vec<Withdrawal>, CodecError> {
    if buf.len() % WITHDRAWAL_STRIDE != 0 {
        return Err(CodecError::InvalidLength { len: buf.len() });
    }

    let count = buf.len() / WITHDRAWAL_STRIDE;
    if count > MAX_WITHDRAWALS {
        return Err(CodecError::TooManyWithdrawals { count });
    }

    let mut withdrawals = Vec::with_capacity(count);
    for i in 0..count {
        let start = i * WITHDRAWAL_STRIDE;
        let mut r = Reader::new(&buf[start..start + WITHDRAWAL_STRIDE]);
        let index = r.read_u64()?;
        let validator_index = r.read_u64()?;
        let address = r.read_address()?;
        let amount = r.read_u64()?;
        withdrawals.push(Withdrawal {
            index,
            validator_index,
            address,
            amount,
        });
    }

    Ok(withdrawals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn withdrawal_bytes(index: u64, validator_index: u64, address: [u8; 20], amount: u64) -> Vec<u8> {
        let mut out = Vec::with_capacity(WITHDRAWAL_STRIDE);
        out.extend_from_slice(&index.to_le_bytes());
        out.extend_from_slice(&validator_index.to_le_bytes());
        out.extend_from_slice(&address);
        out.extend_from_slice(&amount.to_le_bytes());
        out
    }

    #[test]
    fn decodes_empty_buffer_to_empty_list() {
        assert_eq!(decode_withdrawals(&[]).unwrap(), vec![]);
    }

    #[test]
    fn decodes_two_withdrawals_in_order() {
        let mut addr_a = [0u8; 20];
        addr_a[19] = 0x0a;
        let mut addr_b = [0u8; 20];
        addr_b[19] = 0x0b;

        let mut buf = withdrawal_bytes(1, 2, addr_a, 1000);
        buf.extend(withdrawal_bytes(2, 3, addr_b, 2000));

        let withdrawals = decode_withdrawals(&buf).unwrap();
        assert_eq!(
            withdrawals,
            vec![
                Withdrawal {
                    index: 1,
                    validator_index: 2,
                    address: addr_a,
                    amount: 1000
                },
                Withdrawal {
                    index: 2,
                    validator_index: 3,
                    address: addr_b,
                    amount: 2000
                },
            ]
        );
    }

    #[test]
    fn rejects_length_not_a_multiple_of_stride() {
        let buf = vec![0u8; WITHDRAWAL_STRIDE + 1];
        assert_eq!(
            decode_withdrawals(&buf).unwrap_err(),
            CodecError::InvalidLength {
                len: WITHDRAWAL_STRIDE + 1
            }
        );
    }

    #[test]
    fn rejects_more_than_sixteen_withdrawals() {
        let buf = vec![0u8; WITHDRAWAL_STRIDE * (MAX_WITHDRAWALS + 1)];
        assert_eq!(
            decode_withdrawals(&buf).unwrap_err(),
            CodecError::TooManyWithdrawals {
                count: MAX_WITHDRAWALS + 1
            }
        );
    }
}
