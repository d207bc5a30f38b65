/// Lagrange polynomial through `(xs[i], ys[i])`, evaluated at `x`.
pub fn lagrange_interpolate(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let n = xs.len();
    let mut result = 0.0;

    for i in 0..n {
        let mut basis = 1.0;
        for j in 0..n {
            if i != j {
                basis *= (x - xs[j]) / (xs[i] - xs[j]);
            }
        }
        result += ys[i] * basis;
    }

    result
}

/// Start index of a `size`-point window centred on `center`, clamped so the
/// window stays inside `0..len`.
pub fn centered_window(center: usize, size: usize, len: usize) -> usize {
    let size = size.min(len);
    let half = size / 2;
    center.saturating_sub(half).min(len - size)
}
