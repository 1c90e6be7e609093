//! Ghost-cell fill for the haloed buffer.
//!
//! Each ghost row takes the values of the nearest interior row, then each
//! ghost column takes the values of the nearest interior column. Rows are
//! copied across the full width and columns across the full height, so the
//! corner cells are written twice and the column pass decides their value.
//! With a halo of depth one that leaves every corner equal to its diagonal
//! interior neighbour.

/// Replicate the outermost interior rows and columns into the halo.
///
/// `side` is the haloed side length, `ghosts` the halo depth.
pub fn fill(haloed: &mut [f64], side: usize, ghosts: usize) {
    debug_assert_eq!(haloed.len(), side * side);
    if side <= 2 * ghosts {
        return;
    }

    let first = ghosts;
    let last = side - ghosts - 1;

    for g in 0..ghosts {
        copy_row(haloed, side, first, g);
        copy_row(haloed, side, last, side - 1 - g);
    }

    for g in 0..ghosts {
        for i in 0..side {
            let row = i * side;
            haloed[row + g] = haloed[row + first];
            haloed[row + side - 1 - g] = haloed[row + last];
        }
    }
}

fn copy_row(haloed: &mut [f64], side: usize, from: usize, to: usize) {
    haloed.copy_within(from * side..(from + 1) * side, to * side);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(side: usize) -> Vec<f64> {
        (0..side * side).map(|k| k as f64 * 1.5 + 1.0).collect()
    }

    #[test]
    fn edges_replicate_interior() {
        let side = 6;
        let mut grid = numbered(side);
        fill(&mut grid, side, 1);

        let at = |i: usize, j: usize| grid[i * side + j];
        for k in 0..side {
            assert_eq!(at(0, k), at(1, k));
            assert_eq!(at(side - 1, k), at(side - 2, k));
            assert_eq!(at(k, 0), at(k, 1));
            assert_eq!(at(k, side - 1), at(k, side - 2));
        }
    }

    #[test]
    fn corners_take_diagonal_interior_value() {
        let side = 5;
        let mut grid = numbered(side);
        let before = grid.clone();
        fill(&mut grid, side, 1);

        let at = |g: &[f64], i: usize, j: usize| g[i * side + j];
        assert_eq!(at(&grid, 0, 0), at(&before, 1, 1));
        assert_eq!(at(&grid, 0, 4), at(&before, 1, 3));
        assert_eq!(at(&grid, 4, 0), at(&before, 3, 1));
        assert_eq!(at(&grid, 4, 4), at(&before, 3, 3));
    }

    #[test]
    fn interior_untouched() {
        let side = 5;
        let mut grid = numbered(side);
        let before = grid.clone();
        fill(&mut grid, side, 1);

        for i in 1..side - 1 {
            for j in 1..side - 1 {
                assert_eq!(grid[i * side + j], before[i * side + j]);
            }
        }
    }
}
