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
use crate::time::Epoch;
use std::fmt;

mod kepler;
pub use self::kepler::{ClassicalElements, KeplerModel};

mod sgp4;
pub use self::sgp4::Sgp4Model;

mod propagated;
pub use self::propagated::PropagatedModel;

/// The ephemeris source behind a trajectory: anything able to produce the state of the object at
/// a queried epoch within its validity domain.
///
/// Models are `Send` but deliberately not `Sync`: an implementation may keep interior mutable
/// acceleration state (see `PropagatedModel`), so sharing one across threads requires cloning
/// via `boxed_clone` instead.
pub trait Model: Send {
    /// Returns the state at the provided epoch.
    ///
    /// Fails with `AstroError::Domain` if the epoch is outside of `self.domain()`.
    fn evaluate(&self, epoch: Epoch) -> Result<State, AstroError>;

    /// The validity bounds of this model. Either bound may be open.
    fn domain(&self) -> Domain;

    /// The frame all evaluated states are expressed in.
    fn frame(&self) -> Frame;

    /// An owned clone of this model, for handing to another thread.
    fn boxed_clone(&self) -> Box<dyn Model>;
}

/// The validity span of a model, with optionally open bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Domain {
    pub start: Option<Epoch>,
    pub end: Option<Epoch>,
}

impl Domain {
    /// A domain valid for all epochs.
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// A domain valid from `start` onward.
    pub fn from_start(start: Epoch) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    pub fn contains(&self, epoch: Epoch) -> bool {
        if let Some(start) = self.start {
            if epoch < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if epoch > end {
                return false;
            }
        }
        true
    }

    /// The intersection of both domains, or None if they are disjoint.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start = match (self.start, other.start) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        let end = match (self.end, other.end) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return None;
            }
        }
        Some(Self { start, end })
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.start, self.end) {
            (Some(s), Some(e)) => write!(f, "[{s}, {e}]"),
            (Some(s), None) => write!(f, "[{s}, +oo["),
            (None, Some(e)) => write!(f, "]-oo, {e}]"),
            (None, None) => write!(f, "]-oo, +oo["),
        }
    }
}

#[cfg(test)]
mod ut_domain {
    use super::Domain;
    use crate::time::{Epoch, Unit};

    #[test]
    fn domain_bounds() {
        let e0 = Epoch::from_gregorian_utc_at_midnight(2026, 1, 1);
        let unbounded = Domain::unbounded();
        assert!(unbounded.contains(e0));

        let fwd = Domain::from_start(e0);
        assert!(fwd.contains(e0));
        assert!(fwd.contains(e0 + 1 * Unit::Day));
        assert!(!fwd.contains(e0 - 1 * Unit::Second));

        let span = Domain {
            start: Some(e0),
            end: Some(e0 + 1 * Unit::Day),
        };
        let other = Domain {
            start: Some(e0 + 12 * Unit::Hour),
            end: None,
        };
        let both = span.intersect(&other).unwrap();
        assert_eq!(both.start, Some(e0 + 12 * Unit::Hour));
        assert_eq!(both.end, Some(e0 + 1 * Unit::Day));

        let disjoint = Domain {
            start: Some(e0 + 2 * Unit::Day),
            end: None,
        };
        assert!(span.intersect(&disjoint).is_none());
    }
}
