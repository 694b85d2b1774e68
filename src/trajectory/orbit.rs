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

use super::Trajectory;
use crate::errors::AstroError;
use crate::time::{Duration, Epoch, TimeSeries, Unit};
use crate::tools::find_bracketed_root;
use serde_derive::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;

/// The orbital reference point whose crossing closes one revolution and opens the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassReference {
    /// The ascending node: z coordinate rising through zero.
    #[default]
    AscendingNode,
    /// Perigee: radial velocity rising through zero.
    Perigee,
}

impl fmt::Display for PassReference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::AscendingNode => write!(f, "ascending node"),
            Self::Perigee => write!(f, "perigee"),
        }
    }
}

/// One revolution segment of an orbit, bounded by reference crossings (or by the analysis span
/// edges for the first and last segments).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pass {
    /// 1-based revolution index
    pub index: usize,
    pub start: Epoch,
    pub end: Epoch,
}

impl Pass {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pass #{}: {} until {}", self.index, self.start, self.end)
    }
}

/// A trajectory specialized with orbital metadata: a bounded analysis span segmented into
/// 1-based revolution passes.
///
/// Pass boundaries are derived lazily on the first query and cached. The cache is only ever
/// invalidated by constructing a new `Orbit`.
pub struct Orbit {
    traj: Trajectory,
    start: Epoch,
    end: Epoch,
    reference: PassReference,
    period: Duration,
    passes: RefCell<Vec<Pass>>,
}

impl Orbit {
    /// Builds an orbit over the provided analysis span, segmented at the ascending node.
    ///
    /// The orbital period is estimated from the osculating state at the start of the span.
    pub fn new(traj: Trajectory, start: Epoch, end: Epoch) -> Result<Self, AstroError> {
        Self::with_reference(traj, start, end, PassReference::default())
    }

    /// Builds an orbit segmented at the provided reference point.
    pub fn with_reference(
        traj: Trajectory,
        start: Epoch,
        end: Epoch,
        reference: PassReference,
    ) -> Result<Self, AstroError> {
        if start >= end {
            return Err(AstroError::Configuration {
                reason: format!("orbit analysis span is inverted or empty: {start} >= {end}"),
            });
        }
        if !traj.domain().contains(start) || !traj.domain().contains(end) {
            return Err(AstroError::Range {
                reason: format!(
                    "analysis span [{start}, {end}] exceeds the trajectory domain {}",
                    traj.domain()
                ),
            });
        }
        let period = traj.state_at(start)?.period()?;
        Ok(Self {
            traj,
            start,
            end,
            reference,
            period,
            passes: RefCell::new(Vec::new()),
        })
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.traj
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn reference(&self) -> PassReference {
        self.reference
    }

    /// Delegates to the owned trajectory.
    pub fn state_at(&self, epoch: Epoch) -> Result<crate::cosmic::State, AstroError> {
        self.traj.state_at(epoch)
    }

    /// The signed metric whose rising zero crossing marks a pass boundary.
    fn reference_metric(&self, epoch: Epoch) -> Result<f64, AstroError> {
        let state = self.traj.state_at(epoch)?;
        Ok(match self.reference {
            PassReference::AscendingNode => state.radius_km[2],
            PassReference::Perigee => state.radial_velocity_km_s(),
        })
    }

    /// Returns the pass of the provided 1-based revolution index.
    pub fn pass(&self, index: usize) -> Result<Pass, AstroError> {
        let passes = self.passes()?;
        if index == 0 || index > passes.len() {
            return Err(AstroError::Range {
                reason: format!(
                    "pass index {index} outside of [1, {}] for this span",
                    passes.len()
                ),
            });
        }
        Ok(passes[index - 1])
    }

    /// Returns all of the passes over the analysis span, contiguous and in order.
    ///
    /// The trajectory is sampled at a sixteenth of the orbital period to bracket each reference
    /// crossing, and each bracket is refined with the same boundary finder used by the access
    /// search.
    pub fn passes(&self) -> Result<Vec<Pass>, AstroError> {
        {
            let cached = self.passes.borrow();
            if !cached.is_empty() {
                return Ok(cached.clone());
            }
        }

        let coarse_step = self.period / 16.0;
        let mut crossings = Vec::new();
        let mut prev: Option<(Epoch, f64)> = None;
        for epoch in TimeSeries::inclusive(self.start, self.end, coarse_step) {
            let value = self.reference_metric(epoch)?;
            if let Some((prev_epoch, prev_value)) = prev {
                // Rising crossing only: the reference point is crossed once per revolution in
                // this direction.
                if prev_value < 0.0 && value >= 0.0 {
                    let root = find_bracketed_root(
                        prev_epoch,
                        epoch,
                        100 * Unit::Millisecond,
                        1e-9,
                        &mut |e| self.reference_metric(e),
                    )?;
                    crossings.push(root);
                }
            }
            prev = Some((epoch, value));
        }

        let mut passes = Vec::with_capacity(crossings.len() + 1);
        let mut open = self.start;
        for crossing in crossings {
            if crossing > open {
                passes.push(Pass {
                    index: passes.len() + 1,
                    start: open,
                    end: crossing,
                });
                open = crossing;
            }
        }
        if open < self.end {
            passes.push(Pass {
                index: passes.len() + 1,
                start: open,
                end: self.end,
            });
        }

        *self.passes.borrow_mut() = passes.clone();
        Ok(passes)
    }
}

impl fmt::Display for Orbit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Orbit over [{}, {}] segmented at the {}",
            self.start, self.end, self.reference
        )
    }
}

#[cfg(test)]
mod ut_orbit {
    use super::*;
    use crate::cosmic::EARTH_J2000;
    use crate::model::{ClassicalElements, KeplerModel};

    fn leo_orbit(reference: PassReference) -> Orbit {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 2, 1);
        let model = KeplerModel::new(
            ClassicalElements {
                sma_km: 7000.0,
                ecc: 0.01,
                inc_deg: 51.6,
                raan_deg: 25.0,
                aop_deg: 40.0,
                ta_deg: 10.0,
            },
            epoch,
            EARTH_J2000,
        )
        .unwrap();
        let traj = Trajectory::new(Box::new(model));
        Orbit::with_reference(traj, epoch, epoch + 6 * Unit::Hour, reference).unwrap()
    }

    #[test]
    fn passes_contiguous_and_one_based() {
        let orbit = leo_orbit(PassReference::AscendingNode);
        let passes = orbit.passes().unwrap();
        assert!(passes.len() >= 3);
        for (i, pass) in passes.iter().enumerate() {
            assert_eq!(pass.index, i + 1);
            assert!(pass.start < pass.end);
            if i > 0 {
                assert_eq!(passes[i - 1].end, pass.start);
            }
        }
        // Interior passes last one revolution.
        for pass in &passes[1..passes.len() - 1] {
            let delta = (pass.duration() - orbit.period()).abs();
            assert!(delta < 30 * Unit::Second, "pass duration off by {delta}");
        }
    }

    #[test]
    fn perigee_segmentation() {
        let orbit = leo_orbit(PassReference::Perigee);
        let passes = orbit.passes().unwrap();
        assert!(passes.len() >= 3);
        // At an interior boundary the radial velocity is zero and rising.
        let boundary = passes[1].start;
        let rv = orbit.state_at(boundary).unwrap().radial_velocity_km_s();
        assert!(rv.abs() < 1e-3, "radial velocity at perigee: {rv}");
    }

    #[test]
    fn pass_index_out_of_range() {
        let orbit = leo_orbit(PassReference::AscendingNode);
        assert!(matches!(orbit.pass(0), Err(AstroError::Range { .. })));
        assert!(matches!(orbit.pass(900), Err(AstroError::Range { .. })));
        assert!(orbit.pass(1).is_ok());
    }

    #[test]
    fn pass_reference_serde_round_trip() {
        for reference in [PassReference::AscendingNode, PassReference::Perigee] {
            let serialized = serde_yaml::to_string(&reference).unwrap();
            let back: PassReference = serde_yaml::from_str(&serialized).unwrap();
            assert_eq!(back, reference);
        }
        let parsed: PassReference = serde_yaml::from_str("Perigee").unwrap();
        assert_eq!(parsed, PassReference::Perigee);
    }

    #[test]
    fn cached_passes_stable() {
        let orbit = leo_orbit(PassReference::AscendingNode);
        let first = orbit.passes().unwrap();
        let second = orbit.passes().unwrap();
        assert_eq!(first, second);
    }
}
