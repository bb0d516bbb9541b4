//! Small math helpers shared by the scenes and the battle simulation.
//!
//! Min/max/abs come straight from `f64`; only the helpers the standard
//! library does not provide live here.

/// Side length used by the hex-grid lookup, in canvas pixels.
pub const HEXAGON_SIZE: i32 = 20;

/// Squared distance between two points.
pub fn squared_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x2 - x1).powi(2) + (y2 - y1).powi(2)
}

/// Euclidean distance between two points.
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    squared_distance(x1, y1, x2, y2).sqrt()
}

/// Remainder that always carries the sign of the divisor.
pub fn modulus(value: f64, divisor: f64) -> f64 {
    ((value % divisor) + divisor) % divisor
}

/// Cubic ease between `start` and `stop`.
///
/// `per` is first normalised against the range and clamped to `[0, 1]`.
/// A zero-width range yields `start`.
pub fn smooth_step(per: f64, start: f64, stop: f64) -> f64 {
    let span = (stop - start).abs();
    if span == 0.0 {
        return start;
    }

    let t = ((per - start.min(stop)) / span).clamp(0.0, 1.0);
    start + (stop - start) * (t * t * (3.0 - 2.0 * t))
}

/// [`smooth_step`] over the unit range.
pub fn smooth_step01(per: f64) -> f64 {
    smooth_step(per, 0.0, 1.0)
}

/// Returns the `(row, column)` of the hexagon containing the point.
///
/// Rows run along `y` in steps of [`HEXAGON_SIZE`], columns along `x` in steps
/// of twice that; odd cells are shifted by parity.
pub fn hexagon_at(x: f64, y: f64) -> (i32, i32) {
    let size = HEXAGON_SIZE;

    let mut row = (y / size as f64).trunc() as i32;
    let mut column = (x / (size << 1) as f64).trunc() as i32;

    let offset_x = x - (column * (size << 1)) as f64;
    let right = i32::from(offset_x > size as f64);

    row += (column ^ row ^ right) & 1;
    column += right;

    (row, column)
}

/// Wraps an index into `0..len`, stepping past either end.
pub fn wrap_index(index: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    modulus(index as f64, len as f64) as usize
}
