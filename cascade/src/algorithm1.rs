//! Algorithm 1: floor-based layered computation over the table.
//!
//! ```text
//! algorithm1 ─► Grl ─► Nrl ─► Krl ─► Tbl
//! ```
//!
//! - `Krl` absorbs a vanishing divisor itself and never reports it upward.
//! - `Grl` aborts with a request for Algorithm 2 when `floor(x + y) == floor(z)`.
//! - At the boundary, a load failure becomes a request for Algorithm 3 and a
//!   range violation a request for Algorithm 2. Requests raised by `Grl`
//!   pass through as they are. The controller runs Algorithm 2 after any
//!   request from this level.

use crate::context::{in_domain, Context, DIVISOR_TOLERANCE};
use crate::diagnostics::Site;
use crate::error::{Algorithm, LevelError, TableError};

/// `Krl(x, y, z)`: `floor(Tbl(a) + Tbl(b) / c)` for a branch-dependent
/// permutation of the arguments.
///
/// | Condition | a | b | c |
/// |-----------|---|---|---|
/// | `x > 0 && y <= 1` | x | y | z |
/// | `y > 1` | y | z | x |
/// | `x <= 0` | z | x | y |
///
/// # Errors
///
/// Propagates table failures; a near-zero divisor is recovered locally.
pub fn krl(ctx: &Context<'_>, x: f64, y: f64, z: f64) -> Result<f64, TableError> {
    let (a, b, divisor) = if x > 0.0 && y <= 1.0 {
        (x, y, z)
    } else if y > 1.0 {
        (y, z, x)
    } else if x <= 0.0 {
        (z, x, y)
    } else {
        // Only reachable with a NaN argument.
        return Ok(0.0);
    };

    if divisor.abs() < DIVISOR_TOLERANCE {
        return Ok(ctx.recover_divide_by_zero(Site::Krl, x, y, z));
    }

    Ok((ctx.tbl(a)? + ctx.tbl(b)? / divisor).floor())
}

/// `Nrl(x, y)`.
///
/// # Errors
///
/// Propagates table failures from [`krl`].
pub fn nrl(ctx: &Context<'_>, x: f64, y: f64) -> Result<f64, TableError> {
    if x > y {
        Ok(0.42 * krl(ctx, x, y, x)?)
    } else {
        Ok(0.57 * krl(ctx, y, x, y)? - 0.42 * krl(ctx, y, y, y)?)
    }
}

/// `Grl(x, y, z)`.
///
/// # Errors
///
/// - [`LevelError::Escalate`] to Algorithm 2 when `floor(x + y) == floor(z)`.
/// - [`LevelError::Fault`] wrapping any table failure from [`nrl`].
pub fn grl(ctx: &Context<'_>, x: f64, y: f64, z: f64) -> Result<f64, LevelError> {
    let base = (x + y).floor();
    if base == z.floor() {
        return Err(LevelError::Escalate(Algorithm::Second));
    }

    if x + y >= z {
        Ok(base + 0.4 * nrl(ctx, x, z)? + 0.6 * nrl(ctx, y, z)?)
    } else {
        let lead = nrl(ctx, x, z)?;
        let damped = nrl(ctx, y * nrl(ctx, y, 1.0)?, z)?;
        Ok(base + 1.4 * lead - 0.4 * damped)
    }
}

/// Algorithm 1: `x·Grl(x,y,z) + y·Grl(y,z,x) + z·Grl(z,x,y)`.
///
/// # Errors
///
/// Only ever returns [`LevelError::Escalate`] for range and load failures:
///
/// - x outside `[-10, 10)`: Algorithm 2, without computing anything.
/// - range violation below: Algorithm 2.
/// - load failure below: Algorithm 3.
///
/// Other table failures are returned as [`LevelError::Fault`].
pub fn algorithm1(ctx: &Context<'_>, x: f64, y: f64, z: f64) -> Result<f64, LevelError> {
    if !in_domain(x) {
        return Err(LevelError::Escalate(Algorithm::Second));
    }
    weighted_sum(ctx, x, y, z).map_err(translate)
}

fn weighted_sum(ctx: &Context<'_>, x: f64, y: f64, z: f64) -> Result<f64, LevelError> {
    Ok(x * grl(ctx, x, y, z)? + y * grl(ctx, y, z, x)? + z * grl(ctx, z, x, y)?)
}

fn translate(err: LevelError) -> LevelError {
    match err {
        LevelError::Fault(e) if e.is_load() => LevelError::Escalate(Algorithm::Third),
        LevelError::Fault(e) if e.is_range() => LevelError::Escalate(Algorithm::Second),
        other => other,
    }
}
