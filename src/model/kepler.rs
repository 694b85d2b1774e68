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
use crate::cosmic::{between_0_360, Frame, State};
use crate::errors::AstroError;
use crate::time::Epoch;
use serde_derive::{Deserialize, Serialize};

/// Tolerance on the eccentric anomaly when solving Kepler's equation, in radians.
const KEPLER_TOL_RAD: f64 = 1e-12;
const KEPLER_MAX_ITER: usize = 50;

/// Classical (Keplerian) orbital elements, parsed elsewhere and consumed here.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassicalElements {
    pub sma_km: f64,
    pub ecc: f64,
    pub inc_deg: f64,
    pub raan_deg: f64,
    pub aop_deg: f64,
    pub ta_deg: f64,
}

impl ClassicalElements {
    /// Extracts the osculating elements of the provided state.
    pub fn from_state(state: &State) -> Result<Self, AstroError> {
        Ok(Self {
            sma_km: state.sma_km()?,
            ecc: state.ecc()?,
            inc_deg: state.inc_deg()?,
            raan_deg: state.raan_deg()?,
            aop_deg: state.aop_deg()?,
            ta_deg: state.ta_deg()?,
        })
    }

    /// Builds the Cartesian state of these elements at the provided epoch and frame.
    pub fn to_state(&self, epoch: Epoch, frame: Frame) -> Result<State, AstroError> {
        State::keplerian(
            self.sma_km,
            self.ecc,
            self.inc_deg,
            self.raan_deg,
            self.aop_deg,
            self.ta_deg,
            epoch,
            frame,
        )
    }
}

/// An analytic two-body model: the classical elements at a reference epoch, advanced by solving
/// Kepler's equation at each queried epoch. All elements but the anomaly are constants of the
/// motion.
#[derive(Clone, Debug)]
pub struct KeplerModel {
    elements: ClassicalElements,
    epoch: Epoch,
    frame: Frame,
    forward_only: bool,
}

impl KeplerModel {
    /// Builds a new analytic model from the provided elements, valid for all epochs.
    ///
    /// Only elliptical orbits can be advanced in closed form here, so an eccentricity outside of
    /// [0, 1) is a configuration error, as is a frame without a gravitational parameter.
    pub fn new(elements: ClassicalElements, epoch: Epoch, frame: Frame) -> Result<Self, AstroError> {
        if !(0.0..1.0).contains(&elements.ecc) {
            return Err(AstroError::Configuration {
                reason: format!(
                    "Kepler model requires 0 <= ecc < 1, got {}",
                    elements.ecc
                ),
            });
        }
        frame.gm()?;
        Ok(Self {
            elements,
            epoch,
            frame,
            forward_only: false,
        })
    }

    /// Builds the analytic model matching the osculating elements of the provided state.
    pub fn from_state(state: &State) -> Result<Self, AstroError> {
        Self::new(ClassicalElements::from_state(state)?, state.epoch, state.frame)
    }

    /// Restricts the domain to epochs at or after the reference epoch.
    pub fn forward_only(mut self) -> Self {
        self.forward_only = true;
        self
    }

    pub fn elements(&self) -> ClassicalElements {
        self.elements
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Mean motion, in rad/s.
    fn mean_motion_rad_s(&self) -> Result<f64, AstroError> {
        Ok((self.frame.gm()? / self.elements.sma_km.powi(3)).sqrt())
    }

    /// Solves Kepler's equation M = E - e sin E for the eccentric anomaly via Newton-Raphson.
    fn eccentric_from_mean_rad(&self, ma_rad: f64) -> Result<f64, AstroError> {
        let ecc = self.elements.ecc;
        // Vallado's starter: E_0 = M for small eccentricities, M + e otherwise.
        let mut ea = if ecc < 0.8 { ma_rad } else { ma_rad + ecc };
        for _ in 0..KEPLER_MAX_ITER {
            let delta = (ea - ecc * ea.sin() - ma_rad) / (1.0 - ecc * ea.cos());
            ea -= delta;
            if delta.abs() < KEPLER_TOL_RAD {
                return Ok(ea);
            }
        }
        Err(AstroError::Convergence {
            method: "Kepler's equation (Newton-Raphson)",
            iterations: KEPLER_MAX_ITER,
        })
    }
}

impl Model for KeplerModel {
    fn evaluate(&self, epoch: Epoch) -> Result<State, AstroError> {
        if !self.domain().contains(epoch) {
            return Err(AstroError::Domain {
                epoch,
                model: "KeplerModel (forward only)".to_string(),
            });
        }
        let ecc = self.elements.ecc;
        // Anomaly at the reference epoch, converted true -> eccentric -> mean.
        let ta0_rad = self.elements.ta_deg.to_radians();
        let ea0_rad = 2.0
            * (((1.0 - ecc) / (1.0 + ecc)).sqrt() * (ta0_rad / 2.0).tan()).atan();
        let ma0_rad = ea0_rad - ecc * ea0_rad.sin();

        let dt_s = (epoch - self.epoch).to_seconds();
        let ma_rad = ma0_rad + self.mean_motion_rad_s()? * dt_s;
        let ea_rad = self.eccentric_from_mean_rad(ma_rad)?;
        let ta_rad = 2.0
            * (((1.0 + ecc) / (1.0 - ecc)).sqrt() * (ea_rad / 2.0).tan()).atan();

        let mut elements = self.elements;
        elements.ta_deg = between_0_360(ta_rad.to_degrees());
        elements.to_state(epoch, self.frame)
    }

    fn domain(&self) -> Domain {
        if self.forward_only {
            Domain::from_start(self.epoch)
        } else {
            Domain::unbounded()
        }
    }

    fn frame(&self) -> Frame {
        self.frame
    }

    fn boxed_clone(&self) -> Box<dyn Model> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod ut_kepler {
    use super::*;
    use crate::cosmic::EARTH_J2000;
    use approx::assert_relative_eq;

    fn leo() -> KeplerModel {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 2, 1);
        KeplerModel::new(
            ClassicalElements {
                sma_km: 7000.0,
                ecc: 0.01,
                inc_deg: 51.6,
                raan_deg: 40.0,
                aop_deg: 30.0,
                ta_deg: 0.0,
            },
            epoch,
            EARTH_J2000,
        )
        .unwrap()
    }

    #[test]
    fn solver_reports_nonconvergence() {
        // A non-finite mean anomaly never satisfies the correction bound, so the solver must
        // exhaust its iteration budget and report it rather than loop or return garbage.
        let model = leo();
        match model.eccentric_from_mean_rad(f64::NAN) {
            Err(AstroError::Convergence { iterations, .. }) => {
                assert_eq!(iterations, KEPLER_MAX_ITER);
            }
            other => panic!("expected a convergence failure, got {other:?}"),
        }
    }

    #[test]
    fn evaluate_at_reference_epoch() {
        let model = leo();
        let state = model.evaluate(model.epoch()).unwrap();
        assert_relative_eq!(state.sma_km().unwrap(), 7000.0, max_relative = 1e-9);
        assert_relative_eq!(state.ta_deg().unwrap(), 0.0, epsilon = 1e-7);
    }

    #[test]
    fn one_period_round_trip() {
        let model = leo();
        let state0 = model.evaluate(model.epoch()).unwrap();
        let period = state0.period().unwrap();
        let state1 = model.evaluate(model.epoch() + period).unwrap();
        assert!((state0.radius() - state1.radius()).norm() < 1e-6);
        assert!((state0.velocity() - state1.velocity()).norm() < 1e-9);
    }

    #[test]
    fn forward_only_domain() {
        use crate::time::Unit;
        let model = leo().forward_only();
        let before = model.epoch() - 1 * Unit::Second;
        assert!(matches!(
            model.evaluate(before),
            Err(AstroError::Domain { .. })
        ));
        assert!(model.evaluate(model.epoch()).is_ok());
    }

    #[test]
    fn hyperbolic_rejected() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 2, 1);
        let elements = ClassicalElements {
            sma_km: -15000.0,
            ecc: 1.2,
            inc_deg: 10.0,
            raan_deg: 0.0,
            aop_deg: 0.0,
            ta_deg: 0.0,
        };
        assert!(matches!(
            KeplerModel::new(elements, epoch, EARTH_J2000),
            Err(AstroError::Configuration { .. })
        ));
    }
}
