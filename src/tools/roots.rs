/*
    orbitkit, orbit propagation and access-window search
    Copyright (C) 2026 The orbitkit developers

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::errors::AstroError;
use crate::time::{Duration, Epoch, Unit};

const MAX_ITER: usize = 50;

/// Finds the epoch where `f` crosses zero inside the provided bracket via Brent's method.
///
/// The evaluation function may fail (e.g. when backed by a numerical integration), in which case
/// the search aborts with that error. A bracket whose endpoints do not straddle zero is a
/// `Configuration` error; exceeding the iteration budget is a `Convergence` error.
///
/// The returned epoch is within `epoch_precision` of the true crossing; a value within
/// `value_precision` of zero also terminates the search.
pub fn find_bracketed_root<F>(
    start: Epoch,
    end: Epoch,
    epoch_precision: Duration,
    value_precision: f64,
    f: &mut F,
) -> Result<Epoch, AstroError>
where
    F: FnMut(Epoch) -> Result<f64, AstroError>,
{
    // Helper lambdas, for f64s only
    let has_converged = |xa: f64, xb: f64| (xa - xb).abs() <= epoch_precision.to_seconds();
    let arrange = |a: f64, ya: f64, b: f64, yb: f64| {
        if ya.abs() > yb.abs() {
            (a, ya, b, yb)
        } else {
            (b, yb, a, ya)
        }
    };

    // Search in seconds past the bracket opening (convert to epoch just in time)
    let mut xa = 0.0;
    let mut xb = (end - start).to_seconds();
    let mut ya = f(start)?;
    let mut yb = f(end)?;

    // Check if we're already at the root
    if ya.abs() <= value_precision.abs() {
        return Ok(start);
    } else if yb.abs() <= value_precision.abs() {
        return Ok(end);
    }

    if ya * yb > 0.0 {
        return Err(AstroError::Configuration {
            reason: format!("bracket [{start}, {end}] does not straddle zero ({ya}, {yb})"),
        });
    }

    // The Brent solver, from the roots crate (sadly could not directly integrate it here)
    // Source: https://docs.rs/roots/0.0.5/src/roots/numerical/brent.rs.html#57-131
    let (mut xc, mut yc, mut xd) = (xa, ya, xa);
    let mut flag = true;

    for _ in 0..MAX_ITER {
        if ya.abs() < value_precision.abs() {
            return Ok(start + xa * Unit::Second);
        }
        if yb.abs() < value_precision.abs() {
            return Ok(start + xb * Unit::Second);
        }
        if has_converged(xa, xb) {
            return Ok(start + xb * Unit::Second);
        }
        let mut s = if (ya - yc).abs() > f64::EPSILON && (yb - yc).abs() > f64::EPSILON {
            xa * yb * yc / ((ya - yb) * (ya - yc))
                + xb * ya * yc / ((yb - ya) * (yb - yc))
                + xc * ya * yb / ((yc - ya) * (yc - yb))
        } else {
            xb - yb * (xb - xa) / (yb - ya)
        };
        let cond1 = (s - xb) * (s - (3.0 * xa + xb) / 4.0) > 0.0;
        let cond2 = flag && (s - xb).abs() >= (xb - xc).abs() / 2.0;
        let cond3 = !flag && (s - xb).abs() >= (xc - xd).abs() / 2.0;
        let cond4 = flag && has_converged(xb, xc);
        let cond5 = !flag && has_converged(xc, xd);
        if cond1 || cond2 || cond3 || cond4 || cond5 {
            s = (xa + xb) / 2.0;
            flag = true;
        } else {
            flag = false;
        }
        let ys = f(start + s * Unit::Second)?;
        xd = xc;
        xc = xb;
        yc = yb;
        if ya * ys < 0.0 {
            // Root bracketed between a and s
            let (a, new_ya, b, new_yb) = arrange(xa, ya, s, ys);
            xa = a;
            ya = new_ya;
            xb = b;
            yb = new_yb;
        } else {
            // Root bracketed between s and b
            let (a, new_ya, b, new_yb) = arrange(s, ys, xb, yb);
            xa = a;
            ya = new_ya;
            xb = b;
            yb = new_yb;
        }
    }
    error!("Brent solver failed after {MAX_ITER} iterations");
    Err(AstroError::Convergence {
        method: "Brent",
        iterations: MAX_ITER,
    })
}

#[cfg(test)]
mod ut_roots {
    use super::*;

    #[test]
    fn linear_crossing() {
        let start = Epoch::from_gregorian_utc_at_midnight(2026, 1, 1);
        let end = start + 100.0 * Unit::Second;
        // Zero at start + 42 s.
        let mut f = |e: Epoch| Ok((e - start).to_seconds() - 42.0);
        let root =
            find_bracketed_root(start, end, 10 * Unit::Millisecond, 1e-9, &mut f).unwrap();
        assert!((root - (start + 42.0 * Unit::Second)).abs() < 20 * Unit::Millisecond);
    }

    #[test]
    fn sinusoidal_crossing() {
        let start = Epoch::from_gregorian_utc_at_midnight(2026, 1, 1);
        let end = start + 10.0 * Unit::Second;
        let mut f = |e: Epoch| Ok(((e - start).to_seconds() - 4.0).sin());
        let root =
            find_bracketed_root(start, end, 1 * Unit::Millisecond, 1e-12, &mut f).unwrap();
        assert!((root - (start + 4.0 * Unit::Second)).abs() < 2 * Unit::Millisecond);
    }

    #[test]
    fn no_sign_change() {
        let start = Epoch::from_gregorian_utc_at_midnight(2026, 1, 1);
        let end = start + 10.0 * Unit::Second;
        let mut f = |_| Ok(1.0);
        assert!(matches!(
            find_bracketed_root(start, end, 1 * Unit::Millisecond, 1e-12, &mut f),
            Err(AstroError::Configuration { .. })
        ));
    }

    #[test]
    fn eval_failure_aborts() {
        let start = Epoch::from_gregorian_utc_at_midnight(2026, 1, 1);
        let end = start + 10.0 * Unit::Second;
        let mut f = |_| {
            Err(AstroError::Propagation {
                reason: "unavailable".to_string(),
            })
        };
        assert!(matches!(
            find_bracketed_root(start, end, 1 * Unit::Millisecond, 1e-12, &mut f),
            Err(AstroError::Propagation { .. })
        ));
    }
}
