/**
Calculates the arithmetic mean of a slice of f64 values.

## Arguments
- `values`: A slice of f64 values.

## Returns
The mean, or `None` for an empty slice.
 */
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Approximate float equality, scaled to the magnitude of the operands.
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance * a.abs().max(b.abs()).max(1.0)
}
