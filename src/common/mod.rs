//! Block reference types shared across the fetcher and runner.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// Identifies a block by hash and number, independent of which chain it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockId {
    /// The block hash.
    pub hash: B256,
    /// The block number.
    pub number: u64,
}

impl BlockId {
    /// Builds a [`BlockId`] from its fields.
    pub fn new(hash: B256, number: u64) -> Self {
        Self { hash, number }
    }
}

/// A reference to an L2 block, carrying enough of its header to anchor it to
/// the L1 block (`l1_origin`) it was derived from.
///
/// A pure value record: equality is field-wise and there is no behavior
/// beyond construction, accessors, equality, and hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct L2BlockRef {
    /// The L2 block hash.
    pub hash: B256,
    /// The L2 block number.
    pub number: u64,
    /// The parent L2 block hash.
    pub parent_hash: B256,
    /// The block timestamp.
    pub timestamp: u64,
    /// The L1 block this L2 block was derived from.
    pub l1_origin: BlockId,
    /// Position of this block within its L1 origin's epoch.
    pub sequence_number: u64,
}

impl L2BlockRef {
    /// Builds an [`L2BlockRef`] from its fields.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        hash: B256,
        number: u64,
        parent_hash: B256,
        timestamp: u64,
        l1_origin: BlockId,
        sequence_number: u64,
    ) -> Self {
        Self {
            hash,
            number,
            parent_hash,
            timestamp,
            l1_origin,
            sequence_number,
        }
    }

    /// Projects this reference down to its [`BlockId`].
    pub fn to_id(self) -> BlockId {
        BlockId::new(self.hash, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_id_projects_hash_and_number() {
        let l1_origin = BlockId::new(B256::repeat_byte(0x11), 7);
        let block_ref = L2BlockRef::new(
            B256::repeat_byte(0xaa),
            42,
            B256::repeat_byte(0xbb),
            1_700_000_000,
            l1_origin,
            3,
        );

        assert_eq!(block_ref.to_id(), BlockId::new(B256::repeat_byte(0xaa), 42));
    }

    #[test]
    fn equality_is_field_wise() {
        let l1_origin = BlockId::new(B256::repeat_byte(0x11), 7);
        let a = L2BlockRef::new(
            B256::repeat_byte(0xaa),
            42,
            B256::repeat_byte(0xbb),
            1_700_000_000,
            l1_origin,
            3,
        );
        let mut b = a;
        assert_eq!(a, b);

        b.sequence_number = 4;
        assert_ne!(a, b);
    }
}
