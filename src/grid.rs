use std::ops::Range;

use crate::error::{HeatError, Result};
use crate::tile::Tile;

/// Depth of the halo around the `old` buffer.
pub const GHOST_CELLS: usize = 1;

/// Selects one of the two grid buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Buffer {
    /// Haloed `(N+2g) × (N+2g)` buffer holding the current state.
    Old,
    /// Un-haloed `N × N` buffer receiving the next state.
    New,
}

/// The two row-major buffers of the solver.
///
/// `old` carries the ghost halo, `new` covers the interior only. After
/// [`Grid::swap`] the interior of `old` equals `new`.
#[derive(Clone, Debug)]
pub struct Grid {
    ncells: usize,
    old: Vec<f64>,
    new: Vec<f64>,
}

fn zeroed(cells: usize) -> Result<Vec<f64>> {
    let mut data = Vec::new();
    data.try_reserve_exact(cells)
        .map_err(|e| HeatError::Allocation {
            cells,
            reason: e.to_string(),
        })?;
    data.resize(cells, 0.0);
    Ok(data)
}

impl Grid {
    /// Allocate both buffers zero-filled for an `ncells × ncells` interior.
    pub fn new(ncells: usize) -> Result<Self> {
        let overflow = |cells| HeatError::Allocation {
            cells,
            reason: "requested extents overflow the address space".to_string(),
        };

        let side = ncells
            .checked_add(2 * GHOST_CELLS)
            .ok_or_else(|| overflow(usize::MAX))?;
        let haloed = side.checked_mul(side).ok_or_else(|| overflow(usize::MAX))?;
        let interior = ncells
            .checked_mul(ncells)
            .ok_or_else(|| overflow(usize::MAX))?;

        Ok(Grid {
            ncells,
            old: zeroed(haloed)?,
            new: zeroed(interior)?,
        })
    }

    /// Interior cells per side.
    pub fn ncells(&self) -> usize {
        self.ncells
    }

    /// Cells per side of the haloed buffer.
    pub fn side(&self) -> usize {
        self.ncells + 2 * GHOST_CELLS
    }

    /// Size of the flattened interior iteration space.
    pub fn interior_len(&self) -> usize {
        self.ncells * self.ncells
    }

    pub fn old(&self) -> &[f64] {
        &self.old
    }

    pub fn new_buffer(&self) -> &[f64] {
        &self.new
    }

    pub fn old_mut(&mut self) -> &mut [f64] {
        &mut self.old
    }

    /// Checked read of `old(i, j)` in haloed coordinates.
    pub fn old_at(&self, i: usize, j: usize) -> f64 {
        self.old[i * self.side() + j]
    }

    /// Checked read of `new(i, j)`.
    pub fn new_at(&self, i: usize, j: usize) -> f64 {
        self.new[i * self.ncells + j]
    }

    /// Unchecked mutable access to a cell of either buffer.
    ///
    /// # Safety
    ///
    /// `i` and `j` must lie within the extent of the selected buffer:
    /// `side()` for [`Buffer::Old`], `ncells()` for [`Buffer::New`].
    pub unsafe fn at(&mut self, buffer: Buffer, i: usize, j: usize) -> &mut f64 {
        match buffer {
            Buffer::Old => {
                let idx = i * self.side() + j;
                unsafe { self.old.get_unchecked_mut(idx) }
            }
            Buffer::New => {
                let idx = i * self.ncells + j;
                unsafe { self.new.get_unchecked_mut(idx) }
            }
        }
    }

    /// Row-major copy of the interior of `old`.
    pub fn interior(&self) -> Vec<f64> {
        let side = self.side();
        (0..self.ncells)
            .flat_map(|i| {
                let row = (i + GHOST_CELLS) * side + GHOST_CELLS;
                self.old[row..row + self.ncells].iter().copied()
            })
            .collect()
    }

    /// Copy `new` back into the interior of `old`.
    pub fn swap(&mut self) {
        if self.interior_len() == 0 {
            return;
        }
        let whole = Tile {
            start: 0,
            len: self.interior_len(),
            ordinal: 0,
        };
        let (new, mut segments) = self.copy_back_views(&[whole]);
        for segment in segments.iter_mut() {
            segment.copy_from(new);
        }
    }

    /// Read-only `old` plus one mutable slice of `new` per tile.
    ///
    /// Tiles must be ordered and non-overlapping, as produced by
    /// [`crate::tile::partition`].
    pub fn stencil_views(&mut self, tiles: &[Tile]) -> (&[f64], Vec<(Tile, &mut [f64])>) {
        let ranges: Vec<Range<usize>> = tiles.iter().map(Tile::range).collect();
        let slices = split_disjoint(&mut self.new, &ranges);
        (&self.old, tiles.iter().copied().zip(slices).collect())
    }

    /// One writable segment of `old` per tile, covering the tile's interior cells.
    pub fn interior_segments(&mut self, tiles: &[Tile]) -> Vec<InteriorSegment<'_>> {
        segments(&mut self.old, self.ncells, tiles)
    }

    /// Read-only `new` plus the `old` segments it is copied back into.
    pub fn copy_back_views(&mut self, tiles: &[Tile]) -> (&[f64], Vec<InteriorSegment<'_>>) {
        let segs = segments(&mut self.old, self.ncells, tiles);
        (&self.new, segs)
    }
}

/// Offset in the haloed buffer of interior linear index `pos`.
#[inline(always)]
pub fn haloed_offset(pos: usize, ncells: usize) -> usize {
    let side = ncells + 2 * GHOST_CELLS;
    (GHOST_CELLS + pos / ncells) * side + GHOST_CELLS + pos % ncells
}

/// The part of `old` that holds the interior cells of one tile.
///
/// The segment spans from the tile's first to its last interior cell, so
/// it also covers the halo cells between rows. Those are never written
/// through it. Segments of ordered tiles never overlap.
pub struct InteriorSegment<'a> {
    tile: Tile,
    cells: &'a mut [f64],
    offset: usize,
    ncells: usize,
}

impl InteriorSegment<'_> {
    pub fn tile(&self) -> Tile {
        self.tile
    }

    /// Write interior linear index `pos`, which must belong to this tile.
    #[inline]
    pub fn set(&mut self, pos: usize, value: f64) {
        debug_assert!(self.tile.range().contains(&pos));
        self.cells[haloed_offset(pos, self.ncells) - self.offset] = value;
    }

    /// Copy this tile's cells from the un-haloed buffer.
    pub fn copy_from(&mut self, new: &[f64]) {
        for pos in self.tile.range() {
            self.set(pos, new[pos]);
        }
    }
}

fn segments<'a>(old: &'a mut [f64], ncells: usize, tiles: &[Tile]) -> Vec<InteriorSegment<'a>> {
    let ranges: Vec<Range<usize>> = tiles
        .iter()
        .map(|t| haloed_offset(t.start, ncells)..haloed_offset(t.end() - 1, ncells) + 1)
        .collect();

    split_disjoint(old, &ranges)
        .into_iter()
        .zip(tiles.iter().zip(ranges.iter()))
        .map(|(cells, (&tile, range))| InteriorSegment {
            tile,
            cells,
            offset: range.start,
            ncells,
        })
        .collect()
}

/// Carve ordered, non-overlapping ranges out of `buf` as independent slices.
fn split_disjoint<'a>(buf: &'a mut [f64], ranges: &[Range<usize>]) -> Vec<&'a mut [f64]> {
    let mut rest = buf;
    let mut consumed = 0;
    let mut out = Vec::with_capacity(ranges.len());

    for range in ranges {
        let (_, tail) = std::mem::take(&mut rest).split_at_mut(range.start - consumed);
        let (head, tail) = tail.split_at_mut(range.end - range.start);
        out.push(head);
        rest = tail;
        consumed = range.end;
    }

    out
}
