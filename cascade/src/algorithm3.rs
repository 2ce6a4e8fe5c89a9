//! Algorithm 3: closed-form fallback with no failure modes.

/// `1.3498·z + 2.2362·y − 2.348·x·y`.
pub fn algorithm3(x: f64, y: f64, z: f64) -> f64 {
    1.3498 * z + 2.2362 * y - 2.348 * x * y
}
