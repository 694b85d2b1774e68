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

use crate::cosmic::{Frame, State};
use crate::errors::AstroError;
use crate::model::{Domain, Model};
use crate::time::{Duration, Epoch, TimeSeries};
use std::fmt;

mod orbit;
pub use self::orbit::{Orbit, Pass, PassReference};

/// A time-to-state mapping backed by exactly one model.
///
/// A trajectory is immutable after construction: the model cannot be swapped, a new trajectory
/// is constructed instead. Cloning a trajectory clones the underlying model, so each clone may
/// be sampled from its own thread.
pub struct Trajectory {
    model: Box<dyn Model>,
    name: Option<String>,
}

impl Trajectory {
    pub fn new(model: Box<dyn Model>) -> Self {
        Self { model, name: None }
    }

    pub fn named(model: Box<dyn Model>, name: impl Into<String>) -> Self {
        Self {
            model,
            name: Some(name.into()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn domain(&self) -> Domain {
        self.model.domain()
    }

    pub fn frame(&self) -> Frame {
        self.model.frame()
    }

    /// Returns the state at the provided epoch, delegating to the owned model.
    pub fn state_at(&self, epoch: Epoch) -> Result<State, AstroError> {
        self.model.evaluate(epoch)
    }

    /// Evaluates the trajectory at each provided epoch, **in the order given**.
    ///
    /// The epochs are not required to be sorted, but callers wanting the forward-integration
    /// speedup of a propagated model should pass them in increasing order.
    pub fn states_at(&self, epochs: &[Epoch]) -> Result<Vec<State>, AstroError> {
        epochs.iter().map(|e| self.state_at(*e)).collect()
    }

    /// Samples the trajectory at a fixed step over `[start, end]`, both ends included.
    pub fn sample(
        &self,
        start: Epoch,
        end: Epoch,
        step: Duration,
    ) -> Result<Vec<State>, AstroError> {
        if step <= Duration::ZERO {
            return Err(AstroError::Configuration {
                reason: format!("sampling step must be positive, got {step}"),
            });
        }
        if start > end {
            return Err(AstroError::Configuration {
                reason: format!("sampling span is inverted: {start} > {end}"),
            });
        }
        if !self.domain().contains(start) || !self.domain().contains(end) {
            return Err(AstroError::Range {
                reason: format!(
                    "sampling span [{start}, {end}] exceeds the trajectory domain {}",
                    self.domain()
                ),
            });
        }
        let mut states = Vec::new();
        for epoch in TimeSeries::inclusive(start, end, step) {
            states.push(self.state_at(epoch)?);
        }
        Ok(states)
    }
}

impl Clone for Trajectory {
    fn clone(&self) -> Self {
        Self {
            model: self.model.boxed_clone(),
            name: self.name.clone(),
        }
    }
}

impl fmt::Display for Trajectory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "Trajectory {name} in {} over {}", self.frame(), self.domain()),
            None => write!(f, "Trajectory in {} over {}", self.frame(), self.domain()),
        }
    }
}

#[cfg(test)]
mod ut_traj {
    use super::*;
    use crate::cosmic::EARTH_J2000;
    use crate::model::{ClassicalElements, KeplerModel};
    use crate::time::Unit;

    fn leo_traj() -> Trajectory {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 2, 1);
        let model = KeplerModel::new(
            ClassicalElements {
                sma_km: 6900.0,
                ecc: 0.002,
                inc_deg: 98.0,
                raan_deg: 0.0,
                aop_deg: 0.0,
                ta_deg: 0.0,
            },
            epoch,
            EARTH_J2000,
        )
        .unwrap();
        Trajectory::new(Box::new(model))
    }

    #[test]
    fn states_at_preserves_order() {
        let traj = leo_traj();
        let e0 = Epoch::from_gregorian_utc_at_midnight(2026, 2, 1);
        let epochs = [e0 + 30 * Unit::Minute, e0, e0 + 10 * Unit::Minute];
        let states = traj.states_at(&epochs).unwrap();
        assert_eq!(states.len(), 3);
        for (state, epoch) in states.iter().zip(&epochs) {
            assert_eq!(state.epoch, *epoch);
        }
    }

    #[test]
    fn sample_inclusive_bounds() {
        let traj = leo_traj();
        let e0 = Epoch::from_gregorian_utc_at_midnight(2026, 2, 1);
        let states = traj.sample(e0, e0 + 10 * Unit::Minute, 1 * Unit::Minute).unwrap();
        assert_eq!(states.len(), 11);
        assert_eq!(states.first().unwrap().epoch, e0);
        assert_eq!(states.last().unwrap().epoch, e0 + 10 * Unit::Minute);
    }

    #[test]
    fn sample_rejects_bad_step() {
        let traj = leo_traj();
        let e0 = Epoch::from_gregorian_utc_at_midnight(2026, 2, 1);
        assert!(matches!(
            traj.sample(e0, e0 + 1 * Unit::Hour, -1 * Unit::Second),
            Err(AstroError::Configuration { .. })
        ));
    }
}
