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

use crate::cosmic::{SatelliteSystem, State};
use crate::errors::AstroError;
use crate::linalg::{Vector3, Vector6};
use std::fmt;

pub mod orbital;
pub use self::orbital::OrbitalDynamics;

pub mod drag;
pub use self::drag::ExponentialDrag;

pub mod satellite;
pub use self::satellite::SatelliteDynamics;

/// The `Dynamics` trait handles and stores any equation of motion **and** the state is integrated.
///
/// Its design is such that several of the provided dynamics can be combined fairly easily. However,
/// when combining the dynamics (e.g. integrating the point mass gravity model with some custom
/// acceleration), it is up to the implementor to handle time and state organization correctly.
pub trait Dynamics: Clone + Sync + Send {
    /// Defines the equations of motion.
    ///
    /// - `delta_t`: Time in seconds past the context epoch.
    /// - `state_vec`: The state vector, which changes at each integration step.
    /// - `ctx`: The state context, used to rebuild the full state from the state vector.
    fn eom(
        &self,
        delta_t: f64,
        state_vec: &Vector6<f64>,
        ctx: &State,
    ) -> Result<Vector6<f64>, AstroError>;
}

/// A trait for immutable dynamics which return an acceleration (e.g. a gravity perturbation).
pub trait AccelModel: Send + Sync + fmt::Display {
    /// Returns the acceleration, in km/s^2, due to this model on the osculating state.
    fn eom(&self, osc: &State) -> Result<Vector3<f64>, AstroError>;
}

/// A force model, which depends on the satellite's physical characteristics.
pub trait ForceModel: Send + Sync + fmt::Display {
    /// Returns the force, in Newtons, due to this model on the osculating state.
    fn eom(&self, osc: &State, sat: &SatelliteSystem) -> Result<Vector3<f64>, AstroError>;
}
