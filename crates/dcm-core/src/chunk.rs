//! Chunk assignment.
//!
//! Chunk membership is computed once, when an agent table is built, from the
//! row number the agent was given at that time:
//!
//! ```text
//! chunk_of(row, 0)    = ChunkId(0)          (chunking disabled)
//! chunk_of(row, size) = ChunkId(row / size)
//! ```
//!
//! A chunk index that does not fit below `ChunkId::INVALID` is an error.
//!
//! Draws never depend on the chunk id, so any chunk size yields the same
//! choices; the chunk id only bounds how many rows are materialised at once.

use crate::{ChunkId, CoreError, CoreResult};

/// Map a table row number to its chunk for a configured `chunk_size`.
///
/// A `chunk_size` of zero means "one chunk holds the whole population".
#[inline]
pub fn chunk_of(row_number: usize, chunk_size: usize) -> CoreResult<ChunkId> {
    if chunk_size == 0 {
        return Ok(ChunkId(0));
    }
    ChunkId::try_from(row_number / chunk_size)
        .ok()
        .filter(|&id| id != ChunkId::INVALID)
        .ok_or(CoreError::ChunkOverflow { row: row_number, chunk_size })
}
