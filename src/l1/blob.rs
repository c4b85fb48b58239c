//! Reassembles an L1 EIP-4844 blob back into the batcher-transaction bytes
//! it encodes.
//!
//! Blob-to-payload reassembly is distinct from the execution payload codec
//! (`ssz`): a blob carries batcher calldata, which the derivation pipeline
//! later turns into one or more `ssz::ExecutionPayload`s. KZG commitment
//! verification of the blob itself is a separate concern (Non-goal) and is
//! not performed here.

use bytes::Bytes;

use super::error::BlobError;

const MAX_BLOB_DATA_SIZE: usize = (4 * 31 + 3) * 1024 - 4;
const ENCODING_VERSION: u8 = 0;
const VERSION_OFFSET: usize = 1;
const ROUNDS: usize = 1024;
const BLOB_SIZE: usize = 4096 * 32;

/// Decodes the batcher-transaction bytes encoded into a single blob.
pub fn decode_blob_data(blob: &[u8]) -> Result<Bytes, BlobError> {
    if blob.len() < BLOB_SIZE {
        return Err(BlobError::Truncated {
            needed: BLOB_SIZE,
            available: blob.len(),
        });
    }

    let mut output = vec![0u8; MAX_BLOB_DATA_SIZE];

    if blob[VERSION_OFFSET] != ENCODING_VERSION {
        return Err(BlobError::InvalidVersion {
            got: blob[VERSION_OFFSET],
        });
    }

    // decode the 3-byte big-endian length value into a 4-byte integer
    let output_len = u32::from_be_bytes([0, blob[2], blob[3], blob[4]]) as usize;
    if output_len > MAX_BLOB_DATA_SIZE {
        return Err(BlobError::InvalidLength {
            len: output_len,
            max: MAX_BLOB_DATA_SIZE,
        });
    }

    output[0..27].copy_from_slice(&blob[5..32]);

    let mut output_pos = 28;
    let mut input_pos = 32;

    // buffer for the 4 6-bit chunks
    let mut encoded_byte = [0u8; 4];

    encoded_byte[0] = blob[0];
    for byte in encoded_byte.iter_mut().skip(1) {
        *byte = decode_field_element(&mut output_pos, &mut input_pos, blob, &mut output)?;
    }
    reassemble_bytes(&mut output_pos, encoded_byte, &mut output);

    for _ in 1..ROUNDS {
        if output_pos >= output_len {
            break;
        }

        for byte in encoded_byte.iter_mut() {
            *byte = decode_field_element(&mut output_pos, &mut input_pos, blob, &mut output)?;
        }
        reassemble_bytes(&mut output_pos, encoded_byte, &mut output);
    }

    for (i, output_byte) in output.iter().take(MAX_BLOB_DATA_SIZE).skip(output_len).enumerate() {
        if *output_byte != 0 {
            return Err(BlobError::ExtraneousData {
                field_element: output_len + i,
            });
        }
    }

    output.truncate(output_len);

    for byte in blob.iter().skip(input_pos) {
        if *byte != 0 {
            return Err(BlobError::ExtraneousData {
                field_element: input_pos,
            });
        }
    }

    Ok(output.into())
}

fn decode_field_element(
    output_pos: &mut usize,
    input_pos: &mut usize,
    blob: &[u8],
    output: &mut [u8],
) -> Result<u8, BlobError> {
    let result = blob[*input_pos];

    // two highest order bits of the first byte of each field element should always be 0
    if result & 0b1100_0000 != 0 {
        return Err(BlobError::InvalidFieldElement {
            position: *input_pos,
        });
    }

    output[*output_pos..*output_pos + 31].copy_from_slice(&blob[*input_pos + 1..*input_pos + 32]);

    *output_pos += 32;
    *input_pos += 32;

    Ok(result)
}

fn reassemble_bytes(output_pos: &mut usize, encoded_byte: [u8; 4], output: &mut [u8]) {
    *output_pos -= 1;

    let x = (encoded_byte[0] & 0b0011_1111) | ((encoded_byte[1] & 0b0011_0000) << 2);
    let y = (encoded_byte[1] & 0b0000_1111) | ((encoded_byte[3] & 0b0000_1111) << 4);
    let z = (encoded_byte[2] & 0b0011_1111) | ((encoded_byte[3] & 0b0011_0000) << 2);

    output[*output_pos - 32] = z;
    output[*output_pos - (32 * 2)] = y;
    output[*output_pos - (32 * 3)] = x;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blobs_shorter_than_one_blob() {
        let err = decode_blob_data(&[0u8; 10]).unwrap_err();
        assert!(matches!(err, BlobError::Truncated { .. }));
    }

    #[test]
    fn rejects_unknown_encoding_version() {
        let mut blob = vec![0u8; BLOB_SIZE];
        blob[VERSION_OFFSET] = 7;
        let err = decode_blob_data(&blob).unwrap_err();
        assert!(matches!(err, BlobError::InvalidVersion { got: 7 }));
    }

    #[test]
    fn decodes_an_all_zero_blob_to_empty_output() {
        let blob = vec![0u8; BLOB_SIZE];
        let decoded = decode_blob_data(&blob).unwrap();
        assert_eq!(decoded.len(), 0);
    }
}
