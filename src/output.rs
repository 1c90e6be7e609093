//! Console text for `--print-grid` and `--print-time`.

use std::fmt::Write;
use std::time::Duration;

/// Row-major, two decimals, comma separated, one line per row.
pub fn format_grid(values: &[f64], side: usize) -> String {
    let mut out = String::new();
    if side == 0 {
        return out;
    }
    for row in values.chunks(side) {
        let line = row
            .iter()
            .map(|v| format!("{:.2}", v))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "{}", line);
    }
    out
}

pub fn format_elapsed(elapsed: Duration) -> String {
    format!("Time: {:.3} ms", elapsed.as_secs_f64() * 1e3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_rows() {
        let text = format_grid(&[1.0, 2.005, 1.5, -0.25], 2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "1.50, -0.25");
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1.00, "));
    }

    #[test]
    fn elapsed_in_milliseconds() {
        assert_eq!(format_elapsed(Duration::from_micros(1500)), "Time: 1.500 ms");
    }
}
