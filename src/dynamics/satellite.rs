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

use super::{Dynamics, ForceModel, OrbitalDynamics};
use crate::cosmic::{SatelliteSystem, State};
use crate::errors::AstroError;
use crate::linalg::Vector6;
use crate::time::Unit;
use std::fmt;
use std::sync::Arc;

/// `SatelliteDynamics` combines the orbital dynamics with the force models acting on a satellite
/// of known physical characteristics.
#[derive(Clone)]
pub struct SatelliteDynamics {
    pub orbital_dyn: OrbitalDynamics,
    pub force_models: Vec<Arc<dyn ForceModel + Sync>>,
    pub sat: SatelliteSystem,
}

impl SatelliteDynamics {
    /// Initialize these dynamics with the provided orbital dynamics and without any force model.
    ///
    /// A satellite system without a strictly positive mass cannot be subjected to forces, and is
    /// rejected here rather than mid-integration.
    pub fn new(orbital_dyn: OrbitalDynamics, sat: SatelliteSystem) -> Result<Self, AstroError> {
        if sat.mass_kg <= 0.0 {
            return Err(AstroError::Configuration {
                reason: format!("satellite mass must be positive, got {} kg", sat.mass_kg),
            });
        }
        Ok(Self {
            orbital_dyn,
            force_models: Vec::new(),
            sat,
        })
    }

    /// Initialize these dynamics with the provided force models.
    pub fn with_models(
        orbital_dyn: OrbitalDynamics,
        sat: SatelliteSystem,
        force_models: Vec<Arc<dyn ForceModel + Sync>>,
    ) -> Result<Self, AstroError> {
        let mut me = Self::new(orbital_dyn, sat)?;
        me.force_models = force_models;
        Ok(me)
    }

    /// Add a force model to the currently defined dynamics
    pub fn add_model(&mut self, force_model: Arc<dyn ForceModel + Sync>) {
        self.force_models.push(force_model);
    }
}

impl fmt::Display for SatelliteDynamics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let models: Vec<String> = self.force_models.iter().map(|x| format!("{x}")).collect();
        write!(f, "Satellite dynamics with {} [{}]", self.sat, models.join("; "))
    }
}

impl Dynamics for SatelliteDynamics {
    fn eom(
        &self,
        delta_t: f64,
        state_vec: &Vector6<f64>,
        ctx: &State,
    ) -> Result<Vector6<f64>, AstroError> {
        let mut d_x = self.orbital_dyn.eom(delta_t, state_vec, ctx)?;

        let osc = State::cartesian_vec(state_vec, ctx.epoch + delta_t * Unit::Second, ctx.frame);
        for model in &self.force_models {
            let force_n = model.eom(&osc, &self.sat)?;
            // Newtons over kilograms gives m/s^2, and the state is in km/s^2.
            let accel_km_s2 = force_n / (self.sat.mass_kg * 1e3);
            for i in 0..3 {
                d_x[i + 3] += accel_km_s2[i];
            }
        }

        Ok(d_x)
    }
}
