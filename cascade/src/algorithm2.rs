//! Algorithm 2: continuous-valued variant of Algorithm 1.
//!
//! ```text
//! algorithm2 ─► Gr12 ─► Nr12 ─► Kr12 ─► Tbl
//! ```
//!
//! Nothing is floored except the divide-by-zero substitute, `Gr12` has no
//! escalation test, and an out-of-domain x is answered locally with `|x|/10`.
//! The only escalation leaving this level is a load failure, which requests
//! Algorithm 3.

use crate::context::{in_domain, Context, DIVISOR_TOLERANCE};
use crate::diagnostics::{Diagnostic, Site};
use crate::error::{Algorithm, LevelError, TableError};

/// Returned by [`nr12`] for a zero-length `(x, y)`.
pub const DEGENERATE_NORM_SENTINEL: f64 = -0.05;

/// `Kr12(x, y, z)`: `Tbl(a) + Tbl(b) / c` without flooring.
///
/// Branches are tested in order; each one already requires its divisor to be
/// non-zero, so "no branch matched" is the divide-by-zero condition.
///
/// # Errors
///
/// Propagates table failures.
pub fn kr12(ctx: &Context<'_>, x: f64, y: f64, z: f64) -> Result<f64, TableError> {
    let branch = if x > 0.0 && z.abs() > DIVISOR_TOLERANCE {
        Some((x, y, z))
    } else if x < 0.0 && y > 1.0 && x.abs() > DIVISOR_TOLERANCE {
        Some((y, z, x))
    } else if x <= 0.0 && y <= 1.0 && y.abs() > DIVISOR_TOLERANCE {
        Some((z, x, y))
    } else {
        None
    };

    match branch {
        Some((a, b, divisor)) => Ok(ctx.tbl(a)? + ctx.tbl(b)? / divisor),
        None => Ok(ctx.recover_divide_by_zero(Site::Kr12, x, y, z)),
    }
}

/// `Nr12(x, y)`: [`kr12`] on the unit vector along `(x, y)`.
///
/// # Errors
///
/// Propagates table failures from [`kr12`].
pub fn nr12(ctx: &Context<'_>, x: f64, y: f64) -> Result<f64, TableError> {
    let norm = (x * x + y * y).sqrt();
    if norm.abs() < DIVISOR_TOLERANCE {
        ctx.report(Diagnostic::DegenerateNorm {
            substitute: DEGENERATE_NORM_SENTINEL,
        });
        return Ok(DEGENERATE_NORM_SENTINEL);
    }

    let (ux, uy) = (x / norm, y / norm);
    if x > y {
        Ok(0.42 * kr12(ctx, ux, uy, ux)?)
    } else {
        Ok(0.57 * kr12(ctx, uy, ux, uy)?)
    }
}

/// `Gr12(x, y, z)`.
///
/// # Errors
///
/// Propagates table failures from [`nr12`].
pub fn gr12(ctx: &Context<'_>, x: f64, y: f64, z: f64) -> Result<f64, TableError> {
    let (a, b) = if x + y >= z { (0.3, 0.7) } else { (1.3, -0.3) };
    Ok(x + y + a * nr12(ctx, x, z)? + b * nr12(ctx, y, z)?)
}

/// Algorithm 2:
/// `x·Gr12(x,y,z) + y·Gr12(x,y,z) + y·Gr12(z,y,x) − x·y·z·Gr12(y,x,z)`.
///
/// # Errors
///
/// - [`LevelError::Escalate`] to Algorithm 3 on a load failure.
/// - [`LevelError::Fault`] for any other table failure.
pub fn algorithm2(ctx: &Context<'_>, x: f64, y: f64, z: f64) -> Result<f64, LevelError> {
    if !in_domain(x) {
        let substitute = x.abs() / 10.0;
        ctx.report(Diagnostic::DomainFallback { x, substitute });
        return Ok(substitute);
    }

    combine(ctx, x, y, z).map_err(|err| {
        if err.is_load() {
            LevelError::Escalate(Algorithm::Third)
        } else {
            LevelError::Fault(err)
        }
    })
}

fn combine(ctx: &Context<'_>, x: f64, y: f64, z: f64) -> Result<f64, TableError> {
    Ok(x * gr12(ctx, x, y, z)? + y * gr12(ctx, x, y, z)? + y * gr12(ctx, z, y, x)?
        - x * y * z * gr12(ctx, y, x, z)?)
}
