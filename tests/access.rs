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

use orbitkit::access::{
    compute_batch, Access, AccessGenerator, ConditionEval, ElevationCondition, FnCondition,
};
use orbitkit::cosmic::{EARTH_EQ_RADIUS_KM, EARTH_J2000};
use orbitkit::model::{ClassicalElements, Domain, KeplerModel, Model};
use orbitkit::time::{Epoch, Unit};
use orbitkit::{AstroError, Frame, State, Trajectory};

/// A point fixed in its frame, e.g. a ground station in an inertially-frozen approximation.
struct FixedPoint {
    position_km: [f64; 3],
    frame: Frame,
}

impl Model for FixedPoint {
    fn evaluate(&self, epoch: Epoch) -> Result<State, AstroError> {
        Ok(State::from_position(
            self.position_km[0],
            self.position_km[1],
            self.position_km[2],
            epoch,
            self.frame,
        ))
    }

    fn domain(&self) -> Domain {
        Domain::unbounded()
    }

    fn frame(&self) -> Frame {
        self.frame
    }

    fn boxed_clone(&self) -> Box<dyn Model> {
        Box::new(Self {
            position_km: self.position_km,
            frame: self.frame,
        })
    }
}

fn station() -> Trajectory {
    Trajectory::named(
        Box::new(FixedPoint {
            position_km: [EARTH_EQ_RADIUS_KM, 0.0, 0.0],
            frame: EARTH_J2000,
        }),
        "station",
    )
}

/// A 500 km, 98 deg satellite whose ground track crosses the station every revolution: the
/// orbital plane contains the station's radius vector and the satellite starts overhead.
fn overflying_sat(epoch: Epoch) -> Trajectory {
    let model = KeplerModel::new(
        ClassicalElements {
            sma_km: EARTH_EQ_RADIUS_KM + 500.0,
            ecc: 0.0001,
            inc_deg: 98.0,
            raan_deg: 0.0,
            aop_deg: 0.0,
            ta_deg: 0.0,
        },
        epoch,
        EARTH_J2000,
    )
    .unwrap();
    Trajectory::named(Box::new(model), "sat")
}

#[test]
fn constant_false_yields_empty() {
    let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 3, 1);
    let never = FnCondition::new("never", |_, _| {
        Ok(ConditionEval {
            satisfied: false,
            value: -1.0,
        })
    });
    let accesses = AccessGenerator::default()
        .compute_accesses(&station(), &overflying_sat(epoch), epoch, epoch + 1 * Unit::Day, &never)
        .unwrap();
    assert!(accesses.is_empty());
}

#[test]
fn constant_true_yields_single_partial() {
    let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 3, 1);
    let always = FnCondition::new("always", |_, _| {
        Ok(ConditionEval {
            satisfied: true,
            value: 1.0,
        })
    });
    let end = epoch + 1 * Unit::Day;
    let accesses = AccessGenerator::default()
        .compute_accesses(&station(), &overflying_sat(epoch), epoch, end, &always)
        .unwrap();
    assert_eq!(accesses.len(), 1);
    match &accesses[0] {
        Access::Partial(window) => {
            assert_eq!(window.start, epoch);
            assert_eq!(window.end, end);
        }
        other => panic!("expected a partial access spanning the interval, got {other}"),
    }
}

#[test]
fn elevation_windows_over_one_day() {
    let _ = pretty_env_logger::try_init();

    let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 3, 1);
    let end = epoch + 6 * Unit::Hour;
    let sat = overflying_sat(epoch);
    let condition = ElevationCondition::new(10.0);

    let accesses = AccessGenerator::default()
        .compute_accesses(&station(), &sat, epoch, end, &condition)
        .unwrap();

    // The satellite starts directly overhead and returns every revolution (~95 minutes), so the
    // six hour span holds an opening partial window and a complete window per revolution after.
    assert!(accesses.len() >= 3, "got {} accesses", accesses.len());
    assert!(matches!(accesses[0], Access::Partial(_)));
    for access in &accesses[1..] {
        assert!(access.is_complete(), "unexpected {access}");
    }

    for access in &accesses {
        let window = access.window().unwrap();
        // Minutes-scale periods of visibility, peaking well above the mask.
        assert!(window.duration() > 1 * Unit::Minute);
        assert!(window.duration() < 20 * Unit::Minute);
        assert!(window.max_value > 10.0, "max metric: {}", window.max_value);
    }

    // Strictly ordered and non-overlapping.
    for pair in accesses.windows(2) {
        let (a, b) = (pair[0].window().unwrap(), pair[1].window().unwrap());
        assert!(a.end <= b.start);
    }
}

#[test]
fn idempotent_results() {
    let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 3, 1);
    let end = epoch + 4 * Unit::Hour;
    let sat = overflying_sat(epoch);
    let condition = ElevationCondition::new(5.0);
    let generator = AccessGenerator::default();

    let first = generator
        .compute_accesses(&station(), &sat, epoch, end, &condition)
        .unwrap();
    let second = generator
        .compute_accesses(&station(), &sat, epoch, end, &condition)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn frame_mismatch_aborts_scan() {
    let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 3, 1);
    let teme_station = Trajectory::new(Box::new(FixedPoint {
        position_km: [EARTH_EQ_RADIUS_KM, 0.0, 0.0],
        frame: Frame::TEME,
    }));
    let result = AccessGenerator::default().compute_accesses(
        &teme_station,
        &overflying_sat(epoch),
        epoch,
        epoch + 1 * Unit::Hour,
        &ElevationCondition::new(0.0),
    );
    assert!(matches!(result, Err(AstroError::Configuration { .. })));
}

#[test]
fn interval_outside_joint_domain() {
    let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 3, 1);
    // The satellite model only exists from tomorrow onward.
    let restricted = KeplerModel::new(
        ClassicalElements {
            sma_km: 7000.0,
            ecc: 0.001,
            inc_deg: 98.0,
            raan_deg: 0.0,
            aop_deg: 0.0,
            ta_deg: 0.0,
        },
        epoch + 1 * Unit::Day,
        EARTH_J2000,
    )
    .unwrap()
    .forward_only();
    let result = AccessGenerator::default().compute_accesses(
        &station(),
        &Trajectory::new(Box::new(restricted)),
        epoch,
        epoch + 6 * Unit::Hour,
        &ElevationCondition::new(0.0),
    );
    assert!(matches!(result, Err(AstroError::Range { .. })));
}

#[test]
fn invalid_generator_config() {
    assert!(matches!(
        AccessGenerator::new(-10 * Unit::Second, 1 * Unit::Second),
        Err(AstroError::Configuration { .. })
    ));
    assert!(matches!(
        AccessGenerator::new(10 * Unit::Second, 30 * Unit::Second),
        Err(AstroError::Configuration { .. })
    ));
}

#[test]
fn batch_isolates_failures() {
    let epoch = Epoch::from_gregorian_utc_at_midnight(2026, 3, 1);
    let end = epoch + 4 * Unit::Hour;

    // Second pair's satellite is only defined after the analysis interval, so its search must
    // fail without affecting the first pair.
    let broken = KeplerModel::new(
        ClassicalElements {
            sma_km: 7000.0,
            ecc: 0.001,
            inc_deg: 98.0,
            raan_deg: 0.0,
            aop_deg: 0.0,
            ta_deg: 0.0,
        },
        end + 1 * Unit::Day,
        EARTH_J2000,
    )
    .unwrap()
    .forward_only();

    let pairs = vec![
        (station(), overflying_sat(epoch)),
        (station(), Trajectory::new(Box::new(broken))),
    ];
    let condition = ElevationCondition::new(10.0);
    let results = compute_batch(&AccessGenerator::default(), pairs, epoch, end, &condition);

    assert_eq!(results.len(), 2);
    let healthy = results[0].as_ref().unwrap();
    assert!(!healthy.is_empty());
    assert!(matches!(results[1], Err(AstroError::Range { .. })));
}
