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

use super::{AccelModel, Dynamics};
use crate::cosmic::State;
use crate::errors::AstroError;
use crate::linalg::Vector6;
use crate::time::Unit;
use std::fmt;
use std::sync::Arc;

/// `OrbitalDynamics` provides the equations of motion for any celestial dynamic, without state
/// transition matrix computation.
#[derive(Clone)]
pub struct OrbitalDynamics {
    pub accel_models: Vec<Arc<dyn AccelModel + Sync>>,
}

impl OrbitalDynamics {
    /// Initializes the point masses gravity dynamics of the central body of the context frame,
    /// without any perturbation.
    pub fn two_body() -> Self {
        Self {
            accel_models: Vec::new(),
        }
    }

    /// Initializes two-body dynamics with the provided list of perturbing acceleration models.
    pub fn new(accel_models: Vec<Arc<dyn AccelModel + Sync>>) -> Self {
        Self { accel_models }
    }

    /// Add a model to the currently defined orbital dynamics
    pub fn add_model(&mut self, accel_model: Arc<dyn AccelModel + Sync>) {
        self.accel_models.push(accel_model);
    }

    /// Clone these dynamics and add a model to the cloned copy
    pub fn with_model(&self, accel_model: Arc<dyn AccelModel + Sync>) -> Self {
        let mut me = self.clone();
        me.add_model(accel_model);
        me
    }
}

impl fmt::Display for OrbitalDynamics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let models: Vec<String> = self.accel_models.iter().map(|x| format!("{x}")).collect();
        write!(f, "Orbital dynamics: {}", models.join("; "))
    }
}

impl Dynamics for OrbitalDynamics {
    fn eom(
        &self,
        delta_t: f64,
        state_vec: &Vector6<f64>,
        ctx: &State,
    ) -> Result<Vector6<f64>, AstroError> {
        let osc = State::cartesian_vec(state_vec, ctx.epoch + delta_t * Unit::Second, ctx.frame);
        let gm = ctx.frame.gm()?;

        let radius = osc.radius();
        let body_acceleration = (-gm / radius.norm().powi(3)) * radius;
        let mut d_x = Vector6::from_iterator(
            osc.velocity()
                .iter()
                .chain(body_acceleration.iter())
                .cloned(),
        );

        // Apply the perturbations
        for model in &self.accel_models {
            let model_acc = model.eom(&osc)?;
            for i in 0..3 {
                d_x[i + 3] += model_acc[i];
            }
        }

        Ok(d_x)
    }
}
