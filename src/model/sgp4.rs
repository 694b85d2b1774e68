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

use super::{Domain, Model};
use crate::cosmic::{Frame, State};
use crate::errors::AstroError;
use crate::time::Epoch;
use chrono::{Datelike, Timelike};
use sgp4::{Constants, Elements, MinutesSinceEpoch};
use std::sync::Arc;

/// An SGP4/SDP4 mean-element model built from a two-line element set. Evaluated states are in
/// the true equator, mean equinox (TEME) frame of the TLE.
///
/// The TLE epoch is trusted as internally consistent with the element set.
///
/// The model does not impose a validity window: its domain is unbounded, and queries far from
/// the TLE epoch degrade in accuracy without ever failing with a domain error. The only
/// epoch-dependent failures are those raised by the SGP4 theory itself (orbital decay,
/// eccentricity driven out of range), which surface as `Propagation` errors.
#[derive(Clone)]
pub struct Sgp4Model {
    constants: Arc<Constants>,
    epoch: Epoch,
    norad_id: u64,
    name: Option<String>,
}

impl Sgp4Model {
    /// Builds the model from the two lines of a TLE.
    pub fn from_tle(name: Option<&str>, line1: &str, line2: &str) -> Result<Self, AstroError> {
        let elements = Elements::from_tle(
            name.map(String::from),
            line1.trim().as_bytes(),
            line2.trim().as_bytes(),
        )
        .map_err(|e| AstroError::Configuration {
            reason: format!("TLE parsing failed: {e}"),
        })?;
        Self::from_elements(&elements)
    }

    /// Builds the model from parsed orbital elements (TLE or OMM).
    pub fn from_elements(elements: &Elements) -> Result<Self, AstroError> {
        let constants = Constants::from_elements(elements).map_err(|e| AstroError::Configuration {
            reason: format!("SGP4 initialization failed: {e}"),
        })?;

        let dt = elements.datetime;
        let epoch = Epoch::from_gregorian_utc(
            dt.year(),
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
            dt.nanosecond(),
        );

        Ok(Self {
            constants: Arc::new(constants),
            epoch,
            norad_id: elements.norad_id,
            name: elements.object_name.clone(),
        })
    }

    /// The epoch of the underlying element set.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn norad_id(&self) -> u64 {
        self.norad_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Model for Sgp4Model {
    fn evaluate(&self, epoch: Epoch) -> Result<State, AstroError> {
        let minutes_since_epoch = (epoch - self.epoch).to_seconds() / 60.0;
        // Internal SGP4 errors (orbital decay, eccentricity out of range) surface here.
        let prediction = self
            .constants
            .propagate(MinutesSinceEpoch(minutes_since_epoch))
            .map_err(|e| AstroError::Propagation {
                reason: format!("SGP4 propagation of #{} failed: {e}", self.norad_id),
            })?;

        Ok(State::cartesian(
            prediction.position[0],
            prediction.position[1],
            prediction.position[2],
            prediction.velocity[0],
            prediction.velocity[1],
            prediction.velocity[2],
            epoch,
            Frame::TEME,
        ))
    }

    fn domain(&self) -> Domain {
        Domain::unbounded()
    }

    fn frame(&self) -> Frame {
        Frame::TEME
    }

    fn boxed_clone(&self) -> Box<dyn Model> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod ut_sgp4 {
    use super::*;

    // TLE #5 from the Vallado, Crawford, Hujsak, Kelso SGP4 verification set.
    const LINE1: &str = "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753";
    const LINE2: &str = "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667";

    #[test]
    fn vallado_00005_at_epoch() {
        let model = Sgp4Model::from_tle(None, LINE1, LINE2).unwrap();
        let state = model.evaluate(model.epoch()).unwrap();
        assert_eq!(state.frame, Frame::TEME);
        // Reference: position (7022.46529266, -1400.08296755, 0.03995155) km.
        assert!((state.radius_km[0] - 7022.46529266).abs() < 1e-3);
        assert!((state.radius_km[1] - -1400.08296755).abs() < 1e-3);
        assert!((state.radius_km[2] - 0.03995155).abs() < 1e-3);
        assert!((state.velocity_km_s[0] - 1.893841015).abs() < 1e-6);
        assert!((state.velocity_km_s[1] - 6.405893759).abs() < 1e-6);
        assert!((state.velocity_km_s[2] - 4.534807250).abs() < 1e-6);
    }

    #[test]
    fn unbounded_validity() {
        use crate::time::Unit;

        let model = Sgp4Model::from_tle(None, LINE1, LINE2).unwrap();
        assert!(model.domain().contains(model.epoch() - 730 * Unit::Day));
        assert!(model.domain().contains(model.epoch() + 730 * Unit::Day));
        // Queries years from the TLE epoch are inaccurate but never a domain failure; this
        // orbit does not decay, so they succeed outright.
        for offset in [-730 * Unit::Day, 730 * Unit::Day] {
            let state = model.evaluate(model.epoch() + offset).unwrap();
            assert_eq!(state.frame, Frame::TEME);
        }
    }

    #[test]
    fn bad_tle_rejected() {
        assert!(matches!(
            Sgp4Model::from_tle(None, "not a tle", LINE2),
            Err(AstroError::Configuration { .. })
        ));
    }
}
