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

use crate::cosmic::State;
use crate::errors::AstroError;
use std::fmt;

/// The outcome of evaluating an access condition at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConditionEval {
    pub satisfied: bool,
    /// Signed metric, zero at the access boundary: positive while the condition holds.
    pub value: f64,
}

/// A visibility or contact condition between an observer and a target, evaluated pairwise on
/// their states.
pub trait AccessCondition: fmt::Display {
    fn eval(&self, observer: &State, target: &State) -> Result<ConditionEval, AstroError>;
}

/// Elevation of the target above the observer's geocentric horizon, minus a mask angle.
///
/// The elevation is measured from the plane normal to the observer's geocentric radius vector,
/// so this is exact for a spherical central body and a first-order answer for an oblate one.
#[derive(Clone, Copy, Debug)]
pub struct ElevationCondition {
    /// Minimum elevation, in degrees, for the access to hold.
    pub mask_deg: f64,
}

impl ElevationCondition {
    pub fn new(mask_deg: f64) -> Self {
        Self { mask_deg }
    }
}

impl fmt::Display for ElevationCondition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "elevation above {} deg", self.mask_deg)
    }
}

impl AccessCondition for ElevationCondition {
    fn eval(&self, observer: &State, target: &State) -> Result<ConditionEval, AstroError> {
        // Cross-frame vector arithmetic requires an explicit conversion beforehand.
        if observer.frame != target.frame {
            return Err(AstroError::Configuration {
                reason: format!(
                    "elevation requires a common frame, got {} and {}",
                    observer.frame, target.frame
                ),
            });
        }
        let range = target.radius() - observer.radius();
        let range_norm = range.norm();
        let zenith = observer.radius() / observer.rmag_km();
        if range_norm < f64::EPSILON {
            return Err(AstroError::Configuration {
                reason: "observer and target positions coincide".to_string(),
            });
        }
        let elevation_deg = (range.dot(&zenith) / range_norm).asin().to_degrees();
        let value = elevation_deg - self.mask_deg;
        Ok(ConditionEval {
            satisfied: value > 0.0,
            value,
        })
    }
}

/// Wraps an arbitrary closure as an access condition.
pub struct FnCondition<F>
where
    F: Fn(&State, &State) -> Result<ConditionEval, AstroError>,
{
    func: F,
    name: String,
}

impl<F> FnCondition<F>
where
    F: Fn(&State, &State) -> Result<ConditionEval, AstroError>,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            func,
            name: name.into(),
        }
    }
}

impl<F> fmt::Display for FnCondition<F>
where
    F: Fn(&State, &State) -> Result<ConditionEval, AstroError>,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl<F> AccessCondition for FnCondition<F>
where
    F: Fn(&State, &State) -> Result<ConditionEval, AstroError>,
{
    fn eval(&self, observer: &State, target: &State) -> Result<ConditionEval, AstroError> {
        (self.func)(observer, target)
    }
}

#[cfg(test)]
mod ut_condition {
    use super::*;
    use crate::cosmic::{EARTH_EQ_RADIUS_KM, EARTH_J2000};
    use crate::time::Epoch;

    #[test]
    fn elevation_overhead() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 2, 1);
        let observer = State::from_position(EARTH_EQ_RADIUS_KM, 0.0, 0.0, epoch, EARTH_J2000);
        // Target at 500 km directly above the observer.
        let target =
            State::from_position(EARTH_EQ_RADIUS_KM + 500.0, 0.0, 0.0, epoch, EARTH_J2000);
        let eval = ElevationCondition::new(10.0).eval(&observer, &target).unwrap();
        assert!(eval.satisfied);
        assert!((eval.value - 80.0).abs() < 1e-9);
    }

    #[test]
    fn elevation_below_horizon() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 2, 1);
        let observer = State::from_position(EARTH_EQ_RADIUS_KM, 0.0, 0.0, epoch, EARTH_J2000);
        // Target on the far side.
        let target =
            State::from_position(-(EARTH_EQ_RADIUS_KM + 500.0), 0.0, 0.0, epoch, EARTH_J2000);
        let eval = ElevationCondition::new(0.0).eval(&observer, &target).unwrap();
        assert!(!eval.satisfied);
        assert!(eval.value < 0.0);
    }

    #[test]
    fn elevation_frame_mismatch() {
        use crate::cosmic::Frame;
        let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 2, 1);
        let observer = State::from_position(EARTH_EQ_RADIUS_KM, 0.0, 0.0, epoch, EARTH_J2000);
        let target = State::from_position(7000.0, 0.0, 0.0, epoch, Frame::TEME);
        assert!(matches!(
            ElevationCondition::new(0.0).eval(&observer, &target),
            Err(AstroError::Configuration { .. })
        ));
    }
}
