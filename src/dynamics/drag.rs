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

use super::ForceModel;
use crate::cosmic::{SatelliteSystem, State};
use crate::errors::AstroError;
use crate::linalg::Vector3;
use std::fmt;

/// `ExponentialDrag` implements a cannonball drag model over an exponentially decaying atmosphere,
/// as defined in Vallado, 4th ed., page 551, with an important caveat.
///
/// **WARNING:** This model assumes that the velocity of the satellite is identical to the velocity
/// of the upper atmosphere. This is a poor assumption: do not use this model for high fidelity
/// drag computations.
#[derive(Clone, Copy, Debug)]
pub struct ExponentialDrag {
    /// Atmospheric density at the reference altitude, in kg/m^3
    pub rho0: f64,
    /// Reference altitude, in km
    pub ref_alt_km: f64,
    /// Scale height of the atmosphere, in km
    pub scale_height_km: f64,
}

impl ExponentialDrag {
    /// An exponential atmosphere anchored at 500 km, with densities from Vallado, 4th ed.,
    /// table 8-4.
    pub fn earth_500km() -> Self {
        Self {
            rho0: 6.967e-13,
            ref_alt_km: 500.0,
            scale_height_km: 63.822,
        }
    }

    /// Density, in kg/m^3, at the provided geocentric altitude.
    pub fn density(&self, altitude_km: f64) -> f64 {
        self.rho0 * (-(altitude_km - self.ref_alt_km) / self.scale_height_km).exp()
    }
}

impl fmt::Display for ExponentialDrag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Exponential drag (rho0 = {:e} kg/m^3 at {} km)",
            self.rho0, self.ref_alt_km
        )
    }
}

impl ForceModel for ExponentialDrag {
    fn eom(&self, osc: &State, sat: &SatelliteSystem) -> Result<Vector3<f64>, AstroError> {
        let altitude_km = osc.rmag_km() - osc.frame.equatorial_radius()?;
        let rho = self.density(altitude_km);
        // The atmosphere is assumed co-moving with the frame, so the relative velocity is the
        // inertial velocity, converted to m/s.
        let velocity_m_s = osc.velocity() * 1e3;
        Ok(-0.5 * rho * sat.drag_coeff * sat.drag_area_m2 * velocity_m_s.norm() * velocity_m_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_decays() {
        let drag = ExponentialDrag::earth_500km();
        assert!((drag.density(500.0) - drag.rho0).abs() < f64::EPSILON);
        assert!(drag.density(600.0) < drag.rho0);
        assert!(drag.density(400.0) > drag.rho0);
    }
}
