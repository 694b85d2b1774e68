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

use super::{ErrorCtrl, RSSCartesianStep};
use crate::errors::AstroError;
use crate::time::{Duration, Unit};
use std::fmt;

/// PropOpts stores the integrator options, including the minimum and maximum step sizes, and the
/// max error size.
///
/// Note that different step sizes and max errors are only used for adaptive
/// methods. To use a fixed step integrator, initialize the options using `with_fixed_step`, and
/// use whichever adaptive step integrator is desired. For example, initializing an RK45 with
/// fixed step options will lead to an RK4 being used instead of an RK45.
#[derive(Clone, Copy, Debug)]
pub struct PropOpts<E: ErrorCtrl> {
    pub init_step: Duration,
    pub min_step: Duration,
    pub max_step: Duration,
    pub tolerance: f64,
    pub attempts: u8,
    pub fixed_step: bool,
    pub error_ctrl: E,
}

impl<E: ErrorCtrl> PropOpts<E> {
    /// `with_adaptive_step` initializes a `PropOpts` such that the integrator is used with an
    /// adaptive step size. The number of attempts is currently fixed to 50 (as in GMAT).
    ///
    /// Inconsistent bounds (a minimum step above the maximum step, non-positive
    /// steps, or a non-positive tolerance) are a configuration error.
    pub fn with_adaptive_step(
        min_step: Duration,
        max_step: Duration,
        tolerance: f64,
        error_ctrl: E,
    ) -> Result<Self, AstroError> {
        if min_step <= Duration::ZERO || max_step <= Duration::ZERO {
            return Err(AstroError::Configuration {
                reason: format!("step bounds must be positive, got [{min_step}, {max_step}]"),
            });
        }
        if min_step > max_step {
            return Err(AstroError::Configuration {
                reason: format!("min_step {min_step} is greater than max_step {max_step}"),
            });
        }
        if tolerance <= 0.0 {
            return Err(AstroError::Configuration {
                reason: format!("tolerance must be positive, got {tolerance:e}"),
            });
        }
        Ok(PropOpts {
            init_step: max_step,
            min_step,
            max_step,
            tolerance,
            attempts: 50,
            fixed_step: false,
            error_ctrl,
        })
    }

    pub fn with_adaptive_step_s(
        min_step: f64,
        max_step: f64,
        tolerance: f64,
        error_ctrl: E,
    ) -> Result<Self, AstroError> {
        Self::with_adaptive_step(
            min_step * Unit::Second,
            max_step * Unit::Second,
            tolerance,
            error_ctrl,
        )
    }

    /// Set the maximum step size and sets the initial step to that value if currently greater
    pub fn set_max_step(&mut self, max_step: Duration) {
        if self.init_step > max_step {
            self.init_step = max_step;
        }
        self.max_step = max_step;
    }

    /// Set the minimum step size and sets the initial step to that value if currently smaller
    pub fn set_min_step(&mut self, min_step: Duration) {
        if self.init_step < min_step {
            self.init_step = min_step;
        }
        self.min_step = min_step;
    }
}

impl<E: ErrorCtrl> fmt::Display for PropOpts<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fixed_step {
            write!(f, "fixed step: {:e}", self.min_step)
        } else {
            write!(
                f,
                "min_step: {:e}, max_step: {:e}, tol: {:e}, attempts: {}",
                self.min_step, self.max_step, self.tolerance, self.attempts,
            )
        }
    }
}

impl PropOpts<RSSCartesianStep> {
    /// `with_fixed_step` initializes a `PropOpts` such that the integrator is used with a fixed
    /// step size.
    pub fn with_fixed_step(step: Duration) -> Result<Self, AstroError> {
        if step <= Duration::ZERO {
            return Err(AstroError::Configuration {
                reason: format!("fixed step must be positive, got {step}"),
            });
        }
        Ok(PropOpts {
            init_step: step,
            min_step: step,
            max_step: step,
            tolerance: 0.0,
            fixed_step: true,
            attempts: 0,
            error_ctrl: RSSCartesianStep,
        })
    }

    pub fn with_fixed_step_s(step: f64) -> Result<Self, AstroError> {
        Self::with_fixed_step(step * Unit::Second)
    }

    /// Returns the default options with a specific tolerance.
    pub fn with_tolerance(tolerance: f64) -> Result<Self, AstroError> {
        if tolerance <= 0.0 {
            return Err(AstroError::Configuration {
                reason: format!("tolerance must be positive, got {tolerance:e}"),
            });
        }
        let mut opts = Self::default();
        opts.tolerance = tolerance;
        Ok(opts)
    }

    /// Creates propagator options with the provided max step, and sets the initial step to that value as well.
    pub fn with_max_step(max_step: Duration) -> Self {
        let mut opts = Self::default();
        opts.set_max_step(max_step);
        opts
    }
}

impl Default for PropOpts<RSSCartesianStep> {
    /// `default` returns the same default options as GMAT.
    fn default() -> PropOpts<RSSCartesianStep> {
        PropOpts {
            init_step: 60.0 * Unit::Second,
            min_step: 0.001 * Unit::Second,
            max_step: 2700.0 * Unit::Second,
            tolerance: 1e-12,
            attempts: 50,
            fixed_step: false,
            error_ctrl: RSSCartesianStep,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opts_surface() {
        let opts = PropOpts::with_fixed_step_s(1e-1).unwrap();
        assert_eq!(opts.min_step, 1e-1 * Unit::Second);
        assert_eq!(opts.max_step, 1e-1 * Unit::Second);
        assert!(opts.tolerance.abs() < f64::EPSILON);
        assert!(opts.fixed_step);

        let opts = PropOpts::with_adaptive_step_s(1e-2, 10.0, 1e-12, RSSCartesianStep).unwrap();
        assert_eq!(opts.min_step, 1e-2 * Unit::Second);
        assert_eq!(opts.max_step, 10.0 * Unit::Second);
        assert!((opts.tolerance - 1e-12).abs() < f64::EPSILON);
        assert!(!opts.fixed_step);

        let opts: PropOpts<RSSCartesianStep> = Default::default();
        assert_eq!(opts.init_step, 60.0 * Unit::Second);
        assert_eq!(opts.min_step, 0.001 * Unit::Second);
        assert_eq!(opts.max_step, 2700.0 * Unit::Second);
        assert!((opts.tolerance - 1e-12).abs() < f64::EPSILON);
        assert_eq!(opts.attempts, 50);
        assert!(!opts.fixed_step);
    }

    #[test]
    fn opts_invalid() {
        use crate::errors::AstroError;
        // Inverted step bounds are rejected.
        assert!(matches!(
            PropOpts::with_adaptive_step_s(10.0, 1.0, 1e-12, RSSCartesianStep),
            Err(AstroError::Configuration { .. })
        ));
        assert!(matches!(
            PropOpts::with_adaptive_step_s(1.0, 10.0, -1e-12, RSSCartesianStep),
            Err(AstroError::Configuration { .. })
        ));
        assert!(matches!(
            PropOpts::with_fixed_step_s(0.0),
            Err(AstroError::Configuration { .. })
        ));
    }
}
