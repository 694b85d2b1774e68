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

use super::{EARTH_EQ_RADIUS_KM, EARTH_GM_KM3_S2};
use crate::errors::AstroError;
use std::fmt;

/// A coordinate reference frame in which position and velocity vectors are expressed.
///
/// Frames are opaque identifiers to the propagation core: no conversion is
/// performed here, and mixing frames in vector arithmetic is rejected by the
/// callers that would need it (e.g. the access conditions).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Frame {
    /// Any celestial frame which only has a gravitational parameter
    Celestial { gm: f64 },
    /// Any geoid, which has a gravitational parameter, an equatorial radius and a flattening value
    Geoid {
        gm: f64,
        equatorial_radius: f64,
        flattening: f64,
    },
    /// True Equator Mean Equinox, the output frame of SGP4 (Earth centered)
    TEME,
    /// Used as a placeholder only
    Inertial,
}

impl Frame {
    pub fn is_geoid(&self) -> bool {
        matches!(self, Frame::Geoid { .. })
    }

    pub fn is_celestial(&self) -> bool {
        matches!(self, Frame::Celestial { .. })
    }

    /// Returns the gravitational parameter of this frame's center, in km^3/s^2.
    ///
    /// TEME is Earth centered, so it returns the Earth GM.
    pub fn gm(&self) -> Result<f64, AstroError> {
        match self {
            Frame::Celestial { gm } | Frame::Geoid { gm, .. } => Ok(*gm),
            Frame::TEME => Ok(EARTH_GM_KM3_S2),
            Frame::Inertial => Err(AstroError::Configuration {
                reason: "gravitational parameter undefined for a placeholder frame".to_string(),
            }),
        }
    }

    /// Returns the equatorial radius of this frame's central body, in km.
    pub fn equatorial_radius(&self) -> Result<f64, AstroError> {
        match self {
            Frame::Geoid {
                equatorial_radius, ..
            } => Ok(*equatorial_radius),
            Frame::TEME => Ok(EARTH_EQ_RADIUS_KM),
            _ => Err(AstroError::Configuration {
                reason: "equatorial radius undefined for this frame".to_string(),
            }),
        }
    }

    pub fn flattening(&self) -> Result<f64, AstroError> {
        match self {
            Frame::Geoid { flattening, .. } => Ok(*flattening),
            _ => Err(AstroError::Configuration {
                reason: "flattening undefined for this frame".to_string(),
            }),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Frame::Celestial { gm } => write!(f, "celestial (GM = {gm} km^3/s^2)"),
            Frame::Geoid { gm, .. } => write!(f, "geoid (GM = {gm} km^3/s^2)"),
            Frame::TEME => write!(f, "TEME"),
            Frame::Inertial => write!(f, "inertial"),
        }
    }
}
