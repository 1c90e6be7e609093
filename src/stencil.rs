use crate::grid::GHOST_CELLS;
use crate::tile::Tile;

/// Scalar factors of the explicit 5-point update.
#[derive(Debug, Clone, Copy)]
pub struct Stencil {
    pub alpha: f64,
    pub dt: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Stencil {
    pub fn new(alpha: f64, dt: f64, dx: f64, dy: f64) -> Self {
        Self { alpha, dt, dx, dy }
    }

    /// Jacobi update of one cell from its four orthogonal neighbours.
    #[inline(always)]
    pub fn apply(&self, center: f64, up: f64, down: f64, left: f64, right: f64) -> f64 {
        center
            + self.alpha
                * self.dt
                * ((down - 2.0 * center + up) / (self.dx * self.dx)
                    + (right - 2.0 * center + left) / (self.dy * self.dy))
    }

    /// Update every cell of `tile`, reading `old` and writing `out`.
    ///
    /// `out` is the tile's slice of the un-haloed buffer, so `out[0]` is
    /// linear index `tile.start`.
    pub fn update_tile(&self, old: &[f64], ncells: usize, tile: Tile, out: &mut [f64]) {
        let side = ncells + 2 * GHOST_CELLS;
        assert_eq!(out.len(), tile.len);
        assert!(old.len() >= side * side);

        for (k, pos) in tile.range().enumerate() {
            let i = GHOST_CELLS + pos / ncells;
            let j = GHOST_CELLS + pos % ncells;
            let idx = i * side + j;

            // SAFETY: 1 <= i, j <= ncells, so idx ± 1 and idx ± side stay
            // inside the haloed buffer checked above; k < out.len().
            unsafe {
                *out.get_unchecked_mut(k) = self.apply(
                    *old.get_unchecked(idx),
                    *old.get_unchecked(idx - side),
                    *old.get_unchecked(idx + side),
                    *old.get_unchecked(idx - 1),
                    *old.get_unchecked(idx + 1),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_field_is_stationary() {
        let stencil = Stencil::new(0.5, 1e-3, 0.25, 0.25);
        let old = vec![3.0; 25];
        let tile = Tile { start: 0, len: 9, ordinal: 0 };
        let mut out = vec![0.0; 9];
        stencil.update_tile(&old, 3, tile, &mut out);
        assert!(out.iter().all(|&v| v == 3.0));
    }

    #[test]
    fn single_hot_cell_spreads() {
        let stencil = Stencil::new(1.0, 0.1, 1.0, 1.0);
        // ncells = 3, side = 5, hot centre at (2, 2)
        let mut old = vec![0.0; 25];
        old[2 * 5 + 2] = 1.0;
        let tile = Tile { start: 0, len: 9, ordinal: 0 };
        let mut out = vec![0.0; 9];
        stencil.update_tile(&old, 3, tile, &mut out);

        assert!((out[4] - 0.6).abs() < 1e-12);
        for k in [1, 3, 5, 7] {
            assert!((out[k] - 0.1).abs() < 1e-12);
        }
        for k in [0, 2, 6, 8] {
            assert_eq!(out[k], 0.0);
        }
    }

    #[test]
    fn partial_tile_writes_offset_slice() {
        let stencil = Stencil::new(1.0, 0.1, 1.0, 1.0);
        let old: Vec<f64> = (0..25).map(|k| k as f64).collect();
        let whole = Tile { start: 0, len: 9, ordinal: 0 };
        let part = Tile { start: 4, len: 5, ordinal: 1 };

        let mut full = vec![0.0; 9];
        let mut tail = vec![0.0; 5];
        stencil.update_tile(&old, 3, whole, &mut full);
        stencil.update_tile(&old, 3, part, &mut tail);

        assert_eq!(&full[4..], &tail[..]);
    }
}
