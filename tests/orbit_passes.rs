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

use orbitkit::cosmic::EARTH_J2000;
use orbitkit::dynamics::OrbitalDynamics;
use orbitkit::model::{ClassicalElements, KeplerModel, PropagatedModel};
use orbitkit::time::{Epoch, Unit};
use orbitkit::trajectory::PassReference;
use orbitkit::{AstroError, Orbit, State, Trajectory};

fn leo_trajectory(epoch: Epoch) -> Trajectory {
    let model = KeplerModel::new(
        ClassicalElements {
            sma_km: 7000.0,
            ecc: 0.01,
            inc_deg: 51.6,
            raan_deg: 25.0,
            aop_deg: 40.0,
            ta_deg: 120.0,
        },
        epoch,
        EARTH_J2000,
    )
    .unwrap();
    Trajectory::new(Box::new(model))
}

#[test]
fn one_day_of_ascending_node_passes() {
    let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 4, 1);
    let orbit = Orbit::new(leo_trajectory(epoch), epoch, epoch + 1 * Unit::Day).unwrap();
    let passes = orbit.passes().unwrap();

    // ~97 minute period: 24 hours hold 14 full revolutions plus the edge segments.
    let expected = (1.0 * Unit::Day).to_seconds() / orbit.period().to_seconds();
    assert!(
        (passes.len() as f64 - expected).abs() <= 1.5,
        "got {} passes for {expected:.1} revolutions",
        passes.len()
    );

    // Contiguity and 1-based indexing end to end.
    assert_eq!(passes.first().unwrap().start, epoch);
    assert_eq!(passes.last().unwrap().end, epoch + 1 * Unit::Day);
    for (i, pass) in passes.iter().enumerate() {
        assert_eq!(pass.index, i + 1);
        if i > 0 {
            assert_eq!(pass.start, passes[i - 1].end);
        }
    }

    // At any interior boundary the z coordinate is zero and rising.
    let boundary = passes[2].start;
    let at = orbit.state_at(boundary).unwrap();
    let shortly_after = orbit.state_at(boundary + 10 * Unit::Second).unwrap();
    assert!(at.radius_km[2].abs() < 1.0, "z at node: {} km", at.radius_km[2]);
    assert!(shortly_after.radius_km[2] > at.radius_km[2]);
}

#[test]
fn perigee_reference_boundaries() {
    let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 4, 1);
    let orbit = Orbit::with_reference(
        leo_trajectory(epoch),
        epoch,
        epoch + 12 * Unit::Hour,
        PassReference::Perigee,
    )
    .unwrap();
    let passes = orbit.passes().unwrap();
    assert!(passes.len() >= 7);

    // Radius at an interior boundary is the periapsis radius.
    let boundary = passes[1].start;
    let state = orbit.state_at(boundary).unwrap();
    let rp = state.periapsis_km().unwrap();
    assert!((state.rmag_km() - rp).abs() < 1.0, "r at perigee: {}", state.rmag_km());
}

#[test]
fn pass_outside_span_is_range_error() {
    let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 4, 1);
    let orbit = Orbit::new(leo_trajectory(epoch), epoch, epoch + 6 * Unit::Hour).unwrap();
    assert!(matches!(orbit.pass(0), Err(AstroError::Range { .. })));
    assert!(matches!(orbit.pass(5000), Err(AstroError::Range { .. })));
}

#[test]
fn segmentation_over_integrated_trajectory() {
    let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 4, 1);
    let initial =
        State::keplerian(7000.0, 0.01, 51.6, 25.0, 40.0, 120.0, epoch, EARTH_J2000).unwrap();
    let traj = Trajectory::new(Box::new(PropagatedModel::new(
        initial,
        OrbitalDynamics::two_body(),
    )));

    let orbit = Orbit::new(traj, epoch, epoch + 6 * Unit::Hour).unwrap();
    let passes = orbit.passes().unwrap();
    assert!(passes.len() >= 3);
    for pass in &passes[1..passes.len() - 1] {
        let delta = (pass.duration() - orbit.period()).abs();
        assert!(delta < 30 * Unit::Second, "pass duration off by {delta}");
    }

    // The cached segmentation is returned unchanged on a second query.
    assert_eq!(passes, orbit.passes().unwrap());
}
