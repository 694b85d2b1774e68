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
use crate::time::{Duration, Epoch};
use hifitime::TimeScale;

mod frames;
pub use self::frames::Frame;

mod state;
pub(crate) use self::state::between_0_360;
pub use self::state::State;

mod satellite;
pub use self::satellite::SatelliteSystem;

/// Earth gravitational parameter, in km^3/s^2 (GMAT value).
pub const EARTH_GM_KM3_S2: f64 = 398_600.441_5;
/// Earth mean equatorial radius, in km.
pub const EARTH_EQ_RADIUS_KM: f64 = 6_378.136_3;
/// Earth flattening (WGS84).
pub const EARTH_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// Earth-centered inertial frame at the J2000 epoch.
pub const EARTH_J2000: Frame = Frame::Geoid {
    gm: EARTH_GM_KM3_S2,
    equatorial_radius: EARTH_EQ_RADIUS_KM,
    flattening: EARTH_FLATTENING,
};

/// A trait allowing for something to have an epoch
pub trait TimeTagged {
    /// Retrieve the Epoch
    fn epoch(&self) -> Epoch;

    /// Duration until the other epoch (negative if `other` is in the past)
    fn duration_until(&self, other: Epoch) -> Duration {
        other - self.epoch()
    }
}

/// The contract of an external time and frame conversion service.
///
/// The core treats epochs as a totally ordered continuous value and frames as
/// opaque identifiers: vectors expressed in differing frames must be converted
/// by such a service before any cross-trajectory arithmetic. orbitkit does not
/// implement this trait; callers inject conversions by pre-converting their
/// trajectories and states.
pub trait FrameTransform {
    /// Express the provided state in the requested frame.
    fn convert_frame(&self, state: &State, to: Frame) -> Result<State, AstroError>;

    /// Express the provided epoch in the requested time scale.
    fn convert_epoch(&self, epoch: Epoch, scale: TimeScale) -> Epoch;
}
