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

use super::{Frame, TimeTagged};
use crate::errors::AstroError;
use crate::time::{Epoch, Unit};
use na::{Vector3, Vector6};
use std::f64::consts::PI;
use std::fmt;

/// If an orbit has an eccentricity below the following value, it is considered circular (only affects warning messages)
pub const ECC_EPSILON: f64 = 1e-11;

/// Normalize an angle in degrees to [0, 360).
pub(crate) fn between_0_360(angle: f64) -> f64 {
    let mut angle = angle % 360.0;
    if angle < 0.0 {
        angle += 360.0;
    }
    angle
}

/// An immutable snapshot of a moving object at one instant: its Cartesian
/// position and velocity, the epoch, and the frame in which the vectors are
/// expressed.
///
/// The frame and the epoch are always jointly defined: there is no way to
/// construct a `State` without them. There are no setters; derive a new state
/// with the `with_*` methods instead.
///
/// **Units:** km, km/s.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct State {
    pub epoch: Epoch,
    pub radius_km: Vector3<f64>,
    pub velocity_km_s: Vector3<f64>,
    pub frame: Frame,
}

impl State {
    /// Creates a new State in the provided frame at the provided Epoch.
    ///
    /// **Units:** km, km, km, km/s, km/s, km/s
    pub fn cartesian(
        x_km: f64,
        y_km: f64,
        z_km: f64,
        vx_km_s: f64,
        vy_km_s: f64,
        vz_km_s: f64,
        epoch: Epoch,
        frame: Frame,
    ) -> Self {
        Self {
            epoch,
            radius_km: Vector3::new(x_km, y_km, z_km),
            velocity_km_s: Vector3::new(vx_km_s, vy_km_s, vz_km_s),
            frame,
        }
    }

    /// Creates a new State in the provided frame from the borrowed state vector.
    ///
    /// The state vector **must** be x, y, z, vx, vy, vz in km and km/s.
    pub fn cartesian_vec(vector: &Vector6<f64>, epoch: Epoch, frame: Frame) -> Self {
        Self {
            epoch,
            radius_km: Vector3::new(vector[0], vector[1], vector[2]),
            velocity_km_s: Vector3::new(vector[3], vector[4], vector[5]),
            frame,
        }
    }

    /// Creates a new State at the provided position with zero velocity.
    ///
    /// **Units:** km, km, km
    pub fn from_position(x_km: f64, y_km: f64, z_km: f64, epoch: Epoch, frame: Frame) -> Self {
        Self::cartesian(x_km, y_km, z_km, 0.0, 0.0, 0.0, epoch, frame)
    }

    /// Creates a new State in the provided gravitational frame from classical orbital elements.
    ///
    /// **Units:** km, none, degrees, degrees, degrees, degrees
    ///
    /// The conversion algorithm comes from GMAT's `StateConversionUtil::KeplerianToCartesian`.
    /// The state is stored in Cartesian coordinates as they are non-singular: expect rounding
    /// errors on the order of 1e-12 when round tripping through the element getters.
    #[allow(clippy::too_many_arguments)]
    pub fn keplerian(
        sma_km: f64,
        ecc: f64,
        inc_deg: f64,
        raan_deg: f64,
        aop_deg: f64,
        ta_deg: f64,
        epoch: Epoch,
        frame: Frame,
    ) -> Result<Self, AstroError> {
        let gm = frame.gm()?;
        if gm.abs() < f64::EPSILON {
            return Err(AstroError::Configuration {
                reason: "gravitational parameter is zero".to_string(),
            });
        }
        let ecc = if ecc < 0.0 {
            warn!("eccentricity cannot be negative: sign of eccentricity changed");
            -ecc
        } else {
            ecc
        };
        let sma = if ecc > 1.0 && sma_km > 0.0 {
            warn!("eccentricity > 1 (hyperbolic) BUT SMA > 0 (elliptical): sign of SMA changed");
            -sma_km
        } else if ecc < 1.0 && sma_km < 0.0 {
            warn!("eccentricity < 1 (elliptical) BUT SMA < 0 (hyperbolic): sign of SMA changed");
            -sma_km
        } else {
            sma_km
        };
        if (sma * (1.0 - ecc)).abs() < 1e-3 {
            warn!("radius of periapsis is less than one meter");
        }
        if (1.0 - ecc).abs() < f64::EPSILON {
            return Err(AstroError::Configuration {
                reason: "parabolic orbits have ill-defined Keplerian orbital elements".to_string(),
            });
        }
        if ecc > 1.0 {
            let ta = between_0_360(ta_deg);
            if ta > (PI - (1.0 / ecc).acos()).to_degrees() {
                return Err(AstroError::Configuration {
                    reason: format!(
                        "true anomaly {ta} physically impossible for a hyperbolic orbit"
                    ),
                });
            }
        }
        if (1.0 + ecc * ta_deg.to_radians().cos()).is_infinite() {
            return Err(AstroError::Configuration {
                reason: "radius of orbit is infinite".to_string(),
            });
        }
        let inc = inc_deg.to_radians();
        let raan = raan_deg.to_radians();
        let aop = aop_deg.to_radians();
        let ta = ta_deg.to_radians();
        let p = sma * (1.0 - ecc.powi(2));
        if p.abs() < f64::EPSILON {
            return Err(AstroError::Configuration {
                reason: "semilatus rectum is zero: parabolic orbit".to_string(),
            });
        }
        let radius = p / (1.0 + ecc * ta.cos());
        let (sin_aop_ta, cos_aop_ta) = (aop + ta).sin_cos();
        let (sin_inc, cos_inc) = inc.sin_cos();
        let (sin_raan, cos_raan) = raan.sin_cos();
        let (sin_aop, cos_aop) = aop.sin_cos();
        let x = radius * (cos_aop_ta * cos_raan - cos_inc * sin_aop_ta * sin_raan);
        let y = radius * (cos_aop_ta * sin_raan + cos_inc * sin_aop_ta * cos_raan);
        let z = radius * sin_aop_ta * sin_inc;
        let sqrt_gm_p = (gm / p).sqrt();
        let cos_ta_ecc = ta.cos() + ecc;
        let sin_ta = ta.sin();
        let vx = sqrt_gm_p * cos_ta_ecc * (-sin_aop * cos_raan - cos_inc * sin_raan * cos_aop)
            - sqrt_gm_p * sin_ta * (cos_aop * cos_raan - cos_inc * sin_raan * sin_aop);
        let vy = sqrt_gm_p * cos_ta_ecc * (-sin_aop * sin_raan + cos_inc * cos_raan * cos_aop)
            - sqrt_gm_p * sin_ta * (cos_aop * sin_raan + cos_inc * cos_raan * sin_aop);
        let vz = sqrt_gm_p * (cos_ta_ecc * sin_inc * cos_aop - sin_ta * sin_inc * sin_aop);
        Ok(Self::cartesian(x, y, z, vx, vy, vz, epoch, frame))
    }

    /// Creates a new State from the provided semi-major axis altitude in km.
    #[allow(clippy::too_many_arguments)]
    pub fn keplerian_altitude(
        sma_altitude_km: f64,
        ecc: f64,
        inc_deg: f64,
        raan_deg: f64,
        aop_deg: f64,
        ta_deg: f64,
        epoch: Epoch,
        frame: Frame,
    ) -> Result<Self, AstroError> {
        Self::keplerian(
            sma_altitude_km + frame.equatorial_radius()?,
            ecc,
            inc_deg,
            raan_deg,
            aop_deg,
            ta_deg,
            epoch,
            frame,
        )
    }

    /// Returns the radius vector, in km.
    pub fn radius(&self) -> Vector3<f64> {
        self.radius_km
    }

    /// Returns the velocity vector, in km/s.
    pub fn velocity(&self) -> Vector3<f64> {
        self.velocity_km_s
    }

    /// Returns this state as a Cartesian Vector6 in [km, km, km, km/s, km/s, km/s].
    ///
    /// Note that the time is **not** returned in the vector.
    pub fn to_cartesian_vec(&self) -> Vector6<f64> {
        Vector6::new(
            self.radius_km[0],
            self.radius_km[1],
            self.radius_km[2],
            self.velocity_km_s[0],
            self.velocity_km_s[1],
            self.velocity_km_s[2],
        )
    }

    /// Returns this state as a Keplerian Vector6 in [km, none, degrees, degrees, degrees, degrees].
    pub fn to_keplerian_vec(&self) -> Result<Vector6<f64>, AstroError> {
        Ok(Vector6::new(
            self.sma_km()?,
            self.ecc()?,
            self.inc_deg()?,
            self.raan_deg()?,
            self.aop_deg()?,
            self.ta_deg()?,
        ))
    }

    /// Returns the magnitude of the radius vector, in km.
    pub fn rmag_km(&self) -> f64 {
        self.radius_km.norm()
    }

    /// Returns the magnitude of the velocity vector, in km/s.
    pub fn vmag_km_s(&self) -> f64 {
        self.velocity_km_s.norm()
    }

    /// Returns the radial velocity, in km/s (positive when moving away from the center).
    pub fn radial_velocity_km_s(&self) -> f64 {
        self.radius_km.dot(&self.velocity_km_s) / self.rmag_km()
    }

    /// Returns the declination of the radius vector, in degrees.
    pub fn declination_deg(&self) -> f64 {
        (self.radius_km[2] / self.rmag_km()).asin().to_degrees()
    }

    /// Returns the orbital momentum vector, in km^2/s.
    pub fn hvec(&self) -> Vector3<f64> {
        self.radius_km.cross(&self.velocity_km_s)
    }

    /// Returns the magnitude of the orbital momentum, in km^2/s.
    pub fn hmag_km2_s(&self) -> f64 {
        self.hvec().norm()
    }

    /// Returns the specific mechanical energy, in km^2/s^2.
    pub fn energy_km2_s2(&self) -> Result<f64, AstroError> {
        Ok(self.vmag_km_s().powi(2) / 2.0 - self.frame.gm()? / self.rmag_km())
    }

    /// Returns the eccentricity vector (no unit).
    pub fn evec(&self) -> Result<Vector3<f64>, AstroError> {
        let gm = self.frame.gm()?;
        let r = self.radius_km;
        let v = self.velocity_km_s;
        Ok(((v.norm().powi(2) - gm / r.norm()) * r - r.dot(&v) * v) / gm)
    }

    /// Returns the eccentricity (no unit).
    pub fn ecc(&self) -> Result<f64, AstroError> {
        Ok(self.evec()?.norm())
    }

    /// Returns the semi-major axis, in km.
    pub fn sma_km(&self) -> Result<f64, AstroError> {
        Ok(-self.frame.gm()? / (2.0 * self.energy_km2_s2()?))
    }

    /// Returns the inclination, in degrees.
    pub fn inc_deg(&self) -> Result<f64, AstroError> {
        // Inclination is defined purely from the momentum vector, but restrict it
        // to gravitational frames as the other elements are.
        self.frame.gm()?;
        Ok((self.hvec()[2] / self.hmag_km2_s()).acos().to_degrees())
    }

    /// Returns the right ascension of the ascending node, in degrees.
    pub fn raan_deg(&self) -> Result<f64, AstroError> {
        self.frame.gm()?;
        let n = Vector3::new(0.0, 0.0, 1.0).cross(&self.hvec());
        let cos_raan = n[0] / n.norm();
        let raan = cos_raan.acos();
        Ok(if raan.is_nan() {
            if cos_raan > 1.0 {
                180.0
            } else {
                0.0
            }
        } else if n[1] < 0.0 {
            (2.0 * PI - raan).to_degrees()
        } else {
            raan.to_degrees()
        })
    }

    /// Returns the argument of periapsis, in degrees.
    pub fn aop_deg(&self) -> Result<f64, AstroError> {
        let evec = self.evec()?;
        let n = Vector3::new(0.0, 0.0, 1.0).cross(&self.hvec());
        let cos_aop = n.dot(&evec) / (n.norm() * evec.norm());
        let aop = cos_aop.acos();
        Ok(if aop.is_nan() {
            if cos_aop > 1.0 {
                180.0
            } else {
                0.0
            }
        } else if evec[2] < 0.0 {
            (2.0 * PI - aop).to_degrees()
        } else {
            aop.to_degrees()
        })
    }

    /// Returns the true anomaly in degrees, between 0 and 360.
    ///
    /// NOTE: emits a warning if the orbit is very nearly circular, where the
    /// true anomaly is ill-defined. At exactly 0.0 or 180.0 degrees the
    /// arccosine is ambiguous and the sign of its argument decides.
    pub fn ta_deg(&self) -> Result<f64, AstroError> {
        let ecc = self.ecc()?;
        if ecc < ECC_EPSILON {
            warn!("true anomaly ill-defined for circular orbit (e = {ecc})");
        }
        let cos_nu = self.evec()?.dot(&self.radius_km) / (ecc * self.rmag_km());
        let ta = cos_nu.acos();
        Ok(if ta.is_nan() {
            if cos_nu > 1.0 {
                180.0
            } else {
                0.0
            }
        } else if self.radius_km.dot(&self.velocity_km_s) < 0.0 {
            (2.0 * PI - ta).to_degrees()
        } else {
            ta.to_degrees()
        })
    }

    /// Returns the eccentric anomaly, in degrees between 0 and 360.
    pub fn ea_deg(&self) -> Result<f64, AstroError> {
        let ecc = self.ecc()?;
        let ta = self.ta_deg()?.to_radians();
        let ea = 2.0 * (((1.0 - ecc) / (1.0 + ecc)).sqrt() * (ta / 2.0).tan()).atan();
        Ok(between_0_360(ea.to_degrees()))
    }

    /// Returns the mean anomaly, in degrees between 0 and 360 (elliptical orbits).
    pub fn ma_deg(&self) -> Result<f64, AstroError> {
        let ecc = self.ecc()?;
        let ea = self.ea_deg()?.to_radians();
        Ok(between_0_360((ea - ecc * ea.sin()).to_degrees()))
    }

    /// Returns the orbital period.
    pub fn period(&self) -> Result<hifitime::Duration, AstroError> {
        Ok(2.0 * PI * (self.sma_km()?.powi(3) / self.frame.gm()?).sqrt() * Unit::Second)
    }

    /// Returns the radius of apoapsis, in km.
    pub fn apoapsis_km(&self) -> Result<f64, AstroError> {
        Ok(self.sma_km()? * (1.0 + self.ecc()?))
    }

    /// Returns the radius of periapsis, in km.
    pub fn periapsis_km(&self) -> Result<f64, AstroError> {
        Ok(self.sma_km()? * (1.0 - self.ecc()?))
    }

    /// Returns a copy of this state with the provided radius vector.
    pub fn with_radius(self, radius_km: &Vector3<f64>) -> Self {
        let mut me = self;
        me.radius_km = *radius_km;
        me
    }

    /// Returns a copy of this state with the provided velocity vector.
    pub fn with_velocity(self, velocity_km_s: &Vector3<f64>) -> Self {
        let mut me = self;
        me.velocity_km_s = *velocity_km_s;
        me
    }

    /// Returns a copy of this state tagged at the provided epoch.
    pub fn at_epoch(self, epoch: Epoch) -> Self {
        let mut me = self;
        me.epoch = epoch;
        me
    }
}

impl TimeTagged for State {
    fn epoch(&self) -> Epoch {
        self.epoch
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}] position = [{:.6}, {:.6}, {:.6}] km, velocity = [{:.6}, {:.6}, {:.6}] km/s ({})",
            self.epoch,
            self.radius_km[0],
            self.radius_km[1],
            self.radius_km[2],
            self.velocity_km_s[0],
            self.velocity_km_s[1],
            self.velocity_km_s[2],
            self.frame
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmic::EARTH_J2000;
    use approx::assert_abs_diff_eq;

    #[test]
    fn keplerian_round_trip() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2023, 4, 13);
        let state =
            State::keplerian(8_191.93, 0.024_5, 12.85, 306.614, 314.19, 99.887_7, epoch, EARTH_J2000)
                .unwrap();
        assert_abs_diff_eq!(state.sma_km().unwrap(), 8_191.93, epsilon = 1e-6);
        assert_abs_diff_eq!(state.ecc().unwrap(), 0.024_5, epsilon = 1e-9);
        assert_abs_diff_eq!(state.inc_deg().unwrap(), 12.85, epsilon = 1e-9);
        assert_abs_diff_eq!(state.raan_deg().unwrap(), 306.614, epsilon = 1e-9);
        assert_abs_diff_eq!(state.aop_deg().unwrap(), 314.19, epsilon = 1e-8);
        assert_abs_diff_eq!(state.ta_deg().unwrap(), 99.887_7, epsilon = 1e-8);
    }

    #[test]
    fn parabolic_rejected() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2023, 4, 13);
        assert!(matches!(
            State::keplerian(8_191.93, 1.0, 12.85, 306.614, 314.19, 99.887_7, epoch, EARTH_J2000),
            Err(AstroError::Configuration { .. })
        ));
    }

    #[test]
    fn anomalies_consistent() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2023, 4, 13);
        // At periapsis all anomalies are zero.
        let state =
            State::keplerian(8_000.0, 0.1, 30.0, 45.0, 60.0, 0.0, epoch, EARTH_J2000).unwrap();
        assert_abs_diff_eq!(state.ea_deg().unwrap() % 360.0, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(state.ma_deg().unwrap() % 360.0, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn period_of_leo() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2023, 4, 13);
        let state =
            State::keplerian_altitude(500.0, 0.0, 98.0, 0.0, 0.0, 0.0, epoch, EARTH_J2000)
                .unwrap();
        let period_s = state.period().unwrap().to_seconds();
        // A 500 km circular orbit has a period a bit over 94 minutes.
        assert!(period_s > 5_600.0 && period_s < 5_750.0);
    }
}
