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

use super::rk_methods::{CashKarp45, Dormand45, Fehlberg45, RK4Fixed, RK};
use super::{ErrorCtrl, IntegrationDetails, PropInstance, PropOpts, RSSCartesianStep};
use crate::cosmic::State;
use crate::dynamics::Dynamics;
use crate::linalg::Vector6;
use crate::time::Duration;

/// A Propagator allows propagating a set of dynamics forward or backward in time.
/// It is set up with an integration method and the options, and borrowed by each
/// `PropInstance` spawned from an initial state.
#[derive(Clone, Debug)]
pub struct Propagator<'a, D: Dynamics, E: ErrorCtrl> {
    pub dynamics: D, // Stores the dynamics used. *Must* use this to get the latest values
    pub opts: PropOpts<E>, // Stores the integrator options
    pub(crate) order: u8,  // Order of the integrator
    pub(crate) stages: usize, // Number of stages, i.e. how many times the derivatives will be called
    pub(crate) a_coeffs: &'a [f64],
    pub(crate) b_coeffs: &'a [f64],
}

impl<'a, D: Dynamics, E: ErrorCtrl> Propagator<'a, D, E> {
    /// Each propagator must be initialized with `new` which stores propagator information.
    pub fn new<T: RK>(dynamics: D, opts: PropOpts<E>) -> Self {
        Self {
            dynamics,
            opts,
            stages: T::STAGES,
            order: T::ORDER,
            a_coeffs: T::A_COEFFS,
            b_coeffs: T::B_COEFFS,
        }
    }

    /// Set the tolerance for the propagator
    pub fn set_tolerance(&mut self, tol: f64) {
        self.opts.tolerance = tol;
    }

    /// Set the maximum step size for the propagator and sets the initial step to that value if currently greater
    pub fn set_max_step(&mut self, step: Duration) {
        self.opts.set_max_step(step);
    }

    pub fn set_min_step(&mut self, step: Duration) {
        self.opts.set_min_step(step);
    }

    /// A Dormand Prince 5(4) propagator (the default) with custom propagator options.
    pub fn dp45(dynamics: D, opts: PropOpts<E>) -> Self {
        Self::new::<Dormand45>(dynamics, opts)
    }

    /// A Runge Kutta Fehlberg 4(5) propagator with custom propagator options.
    pub fn rkf45(dynamics: D, opts: PropOpts<E>) -> Self {
        Self::new::<Fehlberg45>(dynamics, opts)
    }

    /// A Cash Karp 4(5) propagator with custom propagator options.
    pub fn cash_karp45(dynamics: D, opts: PropOpts<E>) -> Self {
        Self::new::<CashKarp45>(dynamics, opts)
    }

    /// A fixed-step fourth order Runge Kutta with custom propagator options.
    pub fn rk4(dynamics: D, opts: PropOpts<E>) -> Self {
        Self::new::<RK4Fixed>(dynamics, opts)
    }

    /// Spawn an instance of this propagator from the provided initial state.
    pub fn with(&'a self, state: State) -> PropInstance<'a, D, E> {
        // Pre-allocate the k used in the propagator
        let mut k = Vec::with_capacity(self.stages + 1);
        for _ in 0..self.stages {
            k.push(Vector6::zeros());
        }
        PropInstance {
            state,
            prop: self,
            details: IntegrationDetails {
                step: self.opts.init_step,
                error: 0.0,
                attempts: 1,
            },
            step_size: self.opts.init_step,
            fixed_step: self.opts.fixed_step,
            k,
        }
    }
}

impl<'a, D: Dynamics> Propagator<'a, D, RSSCartesianStep> {
    /// Default propagator is a Dormand Prince 5(4) with the default PropOpts.
    pub fn default(dynamics: D) -> Self {
        Self::new::<Dormand45>(dynamics, PropOpts::default())
    }
}
