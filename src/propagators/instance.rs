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

use super::{ErrorCtrl, IntegrationDetails, Propagator};
use crate::cosmic::State;
use crate::dynamics::Dynamics;
use crate::errors::AstroError;
use crate::linalg::Vector6;
use crate::time::{Duration, Epoch, Unit};

/// A propagator instance, spawned from a `Propagator` and an initial state. It owns the state
/// as it is integrated and stores the details of the previous integration step.
#[derive(Debug)]
pub struct PropInstance<'a, D: Dynamics, E: ErrorCtrl> {
    /// The state of this propagator instance
    pub state: State,
    /// The propagator setup (kind, stages, etc.)
    pub prop: &'a Propagator<'a, D, E>,
    /// Stores the details of the previous integration step
    pub details: IntegrationDetails,
    pub(crate) step_size: Duration, // Stores the adapted step for the _next_ call
    pub(crate) fixed_step: bool,
    // Allows us to do pre-allocation of the ki vectors
    pub(crate) k: Vec<Vector6<f64>>,
}

impl<'a, D: Dynamics, E: ErrorCtrl> PropInstance<'a, D, E> {
    /// Allows setting the step size of the propagator
    pub fn set_step(&mut self, step_size: Duration, fixed: bool) {
        self.step_size = step_size;
        self.fixed_step = fixed;
    }

    /// This method propagates the provided Dynamics for the provided duration, which may be
    /// negative for a backward propagation.
    #[allow(clippy::erasing_op)]
    pub fn for_duration(&mut self, duration: Duration) -> Result<State, AstroError> {
        if duration == 0 * Unit::Second {
            return Ok(self.state);
        }
        let stop_time = self.state.epoch + duration;
        if duration > 2 * Unit::Minute || duration < -2 * Unit::Minute {
            info!("Propagating for {} until {}", duration, stop_time);
        }

        let backprop = duration < Duration::ZERO;
        if backprop {
            self.step_size = -self.step_size; // Invert the step size
        }
        loop {
            let dt = self.state.epoch;
            if (!backprop && dt + self.step_size > stop_time)
                || (backprop && dt + self.step_size <= stop_time)
            {
                if stop_time == dt {
                    // No propagation necessary
                    return Ok(self.state);
                }
                // Take one final step of exactly the needed duration until the stop time
                let prev_step_size = self.step_size;
                let prev_step_kind = self.fixed_step;
                self.set_step(stop_time - dt, true);

                self.single_step()?;

                // Restore the step size for subsequent calls
                self.set_step(prev_step_size, prev_step_kind);
                if backprop {
                    self.step_size = -self.step_size; // Restore to a positive step size
                }
                return Ok(self.state);
            } else {
                self.single_step()?;
            }
        }
    }

    /// Propagates the provided Dynamics until the provided epoch. Returns the end state.
    pub fn until_epoch(&mut self, end_time: Epoch) -> Result<State, AstroError> {
        let duration: Duration = end_time - self.state.epoch;
        self.for_duration(duration)
    }

    /// Take a single propagator step
    pub fn single_step(&mut self) -> Result<(), AstroError> {
        let (t, state_vec) = self.derive()?;
        self.state = State::cartesian_vec(&state_vec, self.state.epoch + t, self.state.frame);
        Ok(())
    }

    /// This method integrates whichever function is provided as `eom`. Everything passed to this
    /// function is in **seconds**.
    ///
    /// This function returns the step size used (as a Duration) and the new state as
    /// y_{n+1} = y_n + \frac{dy_n}{dt}. To get the integration details, check `self.details`.
    fn derive(&mut self) -> Result<(Duration, Vector6<f64>), AstroError> {
        let state = &self.state.to_cartesian_vec();
        let ctx = &self.state;
        // Reset the number of attempts used (we don't reset the error because it's set before it's read)
        self.details.attempts = 1;
        // Convert the step size to seconds -- it's mutable because we may change it below
        let mut step_size = self.step_size.to_seconds();
        loop {
            let ki = self.prop.dynamics.eom(0.0, state, ctx)?;
            self.k[0] = ki;
            let mut a_idx: usize = 0;
            for i in 0..(self.prop.stages - 1) {
                // Let's compute the c_i by summing the relevant items from the list of coefficients.
                // \sum_{j=1}^{i-1} a_ij  ∀ i ∈ [2, s]
                let mut ci: f64 = 0.0;
                // The wi stores the a_{s1} * k_1 + a_{s2} * k_2 + ... + a_{s, s-1} * k_{s-1}
                let mut wi = Vector6::zeros();
                for kj in &self.k[0..i + 1] {
                    let a_ij = self.prop.a_coeffs[a_idx];
                    ci += a_ij;
                    wi += a_ij * kj;
                    a_idx += 1;
                }

                let ki = self
                    .prop
                    .dynamics
                    .eom(ci * step_size, &(state + step_size * wi), ctx)?;
                self.k[i + 1] = ki;
            }
            // Compute the next state and the error
            let mut next_state = *state;
            // State error estimation from the embedded lower-order solution, as in GMAT's
            // RungeKutta implementation.
            let mut error_est = Vector6::zeros();
            for (i, ki) in self.k.iter().enumerate() {
                let b_i = self.prop.b_coeffs[i];
                if !self.fixed_step {
                    let b_i_star = self.prop.b_coeffs[i + self.prop.stages];
                    error_est += step_size * (b_i - b_i_star) * ki;
                }
                next_state += step_size * b_i * ki;
            }

            if self.fixed_step {
                // Using a fixed step, no adaptive step necessary
                self.details.step = self.step_size;
                return Ok((self.details.step, next_state));
            } else {
                // Compute the error estimate.
                self.details.error =
                    self.prop
                        .opts
                        .error_ctrl
                        .estimate(&error_est, &next_state, state);
                if self.details.error <= self.prop.opts.tolerance
                    || step_size.abs() <= self.prop.opts.min_step.to_seconds()
                    || self.details.attempts >= self.prop.opts.attempts
                {
                    if self.details.error > self.prop.opts.tolerance
                        && step_size.abs() <= self.prop.opts.min_step.to_seconds()
                    {
                        // The step has collapsed onto the smallest allowed step and the error
                        // still exceeds the tolerance: the integration is diverging.
                        return Err(AstroError::Divergence {
                            min_step: self.prop.opts.min_step,
                            error: self.details.error,
                            tolerance: self.prop.opts.tolerance,
                        });
                    }
                    if self.details.attempts >= self.prop.opts.attempts {
                        warn!(
                            "Could not further decrease step size: maximum number of attempts reached ({})",
                            self.details.attempts
                        );
                    }

                    self.details.step = step_size * Unit::Second;
                    if self.details.error < self.prop.opts.tolerance {
                        // Error is less than tolerance, let's attempt to increase the step for the
                        // next iteration.
                        let proposed_step = 0.9
                            * step_size
                            * (self.prop.opts.tolerance / self.details.error)
                                .powf(1.0 / f64::from(self.prop.order));
                        step_size = if proposed_step.abs() > self.prop.opts.max_step.to_seconds() {
                            step_size.signum() * self.prop.opts.max_step.to_seconds()
                        } else {
                            proposed_step
                        };
                    }
                    // In all cases, let's update the step size to whatever was the adapted step size
                    self.step_size = step_size * Unit::Second;
                    return Ok((self.details.step, next_state));
                } else {
                    // Error is too high and we aren't using the smallest step, and we haven't hit
                    // the max number of attempts. So let's adapt the step size.
                    self.details.attempts += 1;
                    let proposed_step = 0.9
                        * step_size
                        * (self.prop.opts.tolerance / self.details.error)
                            .powf(1.0 / f64::from(self.prop.order - 1));
                    step_size = if proposed_step.abs() < self.prop.opts.min_step.to_seconds() {
                        step_size.signum() * self.prop.opts.min_step.to_seconds()
                    } else {
                        proposed_step
                    };
                    // Note that we don't set self.step_size, that will be updated right before we return
                }
            }
        }
    }
}
