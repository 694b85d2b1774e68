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

/*! # orbitkit

Trajectory representation and orbit propagation (analytic Kepler, SGP4, and
numerically integrated models), with an access generator that computes the
visibility windows between two trajectories.

All states are Cartesian position/velocity snapshots tagged with an epoch and
a reference frame. Propagation and access search are pure, synchronous,
CPU-bound computations: parallelize across independent trajectory pairs with
your own thread pool or with [access::compute_batch](crate::access::compute_batch).
*/

/// Provides the propagators / integrators available in `orbitkit`.
pub mod propagators;

/// Provides the orbital and satellite dynamics which feed the numerical propagators.
pub mod dynamics;

/// Provides the reference frames, the state snapshot, and the satellite physical properties.
pub mod cosmic;

/// The polymorphic state sources: Kepler, SGP4, and numerically propagated models.
pub mod model;

/// Time-to-state mappings built on a single model, and their orbit/pass specialization.
pub mod trajectory;

/// The access generator: visibility window search between two trajectories.
pub mod access;

/// Shared numerical tools (scalar boundary finder).
pub mod tools;

mod errors;
/// orbitkit will (almost) never panic, and functions which may fail return an error.
pub use self::errors::AstroError;

#[macro_use]
extern crate log;
extern crate hifitime;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

/// Re-export some useful things
pub use self::cosmic::{Frame, SatelliteSystem, State};
pub use self::trajectory::{Orbit, Trajectory};
