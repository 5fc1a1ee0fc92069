//! In-memory chain of decoded blocks with lookup by block hash

use log::debug;
use std::collections::HashMap;

use crate::block::Block;
use crate::error::{DecodeError, Domain, ErrorKind, Result};
use crate::types::BlockHash;

/// Ordered sequence of blocks, each extending the one before it.
///
/// Holds no chain state beyond the blocks themselves.
#[derive(Debug, Clone, Default)]
pub struct Chain {
    blocks: Vec<Block>,
    by_hash: HashMap<BlockHash, usize>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `block` to the tip.
    ///
    /// The first block is accepted as the chain's base; every later block must
    /// name the current tip as its previous block.
    pub fn push(&mut self, block: Block) -> Result<()> {
        if let Some(tip) = self.tip() {
            let tip_hash = tip.hash();
            if block.header().prev_block_hash != tip_hash {
                return Err(DecodeError::new(
                    Domain::Chain,
                    ErrorKind::DisconnectedBlock,
                    format!(
                        "block {} builds on {}, tip is {}",
                        block.hash(),
                        block.header().prev_block_hash,
                        tip_hash
                    ),
                ));
            }
        }

        let hash = block.hash();
        debug!("chain height {} -> {}", self.blocks.len(), hash);
        self.by_hash.insert(hash, self.blocks.len());
        self.blocks.push(block);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn at(&self, idx: usize) -> Result<&Block> {
        self.blocks.get(idx).ok_or_else(|| {
            DecodeError::new(
                Domain::Chain,
                ErrorKind::IndexOutOfRange,
                format!("height {} out of range ({} blocks)", idx, self.blocks.len()),
            )
        })
    }

    pub fn tip(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Position of the block with `hash`, if it is part of the chain
    pub fn find(&self, hash: &BlockHash) -> Option<usize> {
        self.by_hash.get(hash).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
