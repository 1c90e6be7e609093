//! Partitioning of the flattened `N × N` iteration space into tiles.

use std::ops::Range;

use crate::error::{HeatError, Result};

/// A contiguous run of linear cell indices handed to one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub start: usize,
    pub len: usize,
    pub ordinal: usize,
}

impl Tile {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Split `[0, total)` into `tile_count` contiguous tiles.
///
/// Every tile gets `total / tile_count` cells and the last one also takes
/// the remainder, so it is the only tile that may be longer than the rest.
pub fn partition(total: usize, tile_count: usize) -> Result<Vec<Tile>> {
    if tile_count == 0 || tile_count > total {
        return Err(HeatError::InvalidPartition {
            total,
            tiles: tile_count,
        });
    }

    let base = total / tile_count;
    let remainder = total % tile_count;

    let tiles = (0..tile_count)
        .map(|t| {
            let len = if t == tile_count - 1 {
                base + remainder
            } else {
                base
            };
            Tile {
                start: t * base,
                len,
                ordinal: t,
            }
        })
        .collect();

    Ok(tiles)
}
