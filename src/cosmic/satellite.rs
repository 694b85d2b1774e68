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

use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// The physical properties of a satellite: mass, cross-section areas, and the
/// drag and reflectivity coefficients. A pure value with no behavior, consumed
/// by the satellite dynamics when computing forces.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SatelliteSystem {
    /// Total mass, in kg
    pub mass_kg: f64,
    /// Cross section exposed to atmospheric drag, in m^2
    pub drag_area_m2: f64,
    /// Cross section exposed to solar radiation pressure, in m^2
    pub srp_area_m2: f64,
    /// Drag coefficient (C_d), typically 2.2 for a small satellite
    pub drag_coeff: f64,
    /// Reflectivity coefficient (C_r), between 0.0 (translucent) and 2.0 (mirror)
    pub reflectivity_coeff: f64,
}

impl SatelliteSystem {
    /// Creates a new satellite with the provided mass and zero cross sections.
    pub fn new(mass_kg: f64) -> Self {
        Self {
            mass_kg,
            ..Default::default()
        }
    }

    pub fn with_drag(mut self, drag_area_m2: f64, drag_coeff: f64) -> Self {
        self.drag_area_m2 = drag_area_m2;
        self.drag_coeff = drag_coeff;
        self
    }

    pub fn with_srp(mut self, srp_area_m2: f64, reflectivity_coeff: f64) -> Self {
        self.srp_area_m2 = srp_area_m2;
        self.reflectivity_coeff = reflectivity_coeff;
        self
    }
}

impl Default for SatelliteSystem {
    fn default() -> Self {
        Self {
            mass_kg: 0.0,
            drag_area_m2: 0.0,
            srp_area_m2: 0.0,
            drag_coeff: 2.2,
            reflectivity_coeff: 1.8,
        }
    }
}

impl fmt::Display for SatelliteSystem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "satellite of {} kg (drag: {} m^2 @ Cd {}, srp: {} m^2 @ Cr {})",
            self.mass_kg, self.drag_area_m2, self.drag_coeff, self.srp_area_m2,
            self.reflectivity_coeff
        )
    }
}
