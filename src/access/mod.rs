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

use crate::time::{Duration, Epoch};
use std::fmt;

mod condition;
pub use self::condition::{AccessCondition, ConditionEval, ElevationCondition, FnCondition};

mod generator;
pub use self::generator::{compute_batch, AccessGenerator};

/// A refined interval over which an access condition held, with the largest observed value of
/// the condition metric inside it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Window {
    pub start: Epoch,
    pub end: Epoch,
    /// Largest condition metric sampled inside the window (e.g. peak elevation, in degrees, for
    /// an elevation condition).
    pub max_value: f64,
}

impl Window {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// One access between two trajectories.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Access {
    /// Both boundaries fall strictly inside the analysis interval.
    Complete(Window),
    /// The window is truncated by at least one edge of the analysis interval.
    Partial(Window),
    /// Boundary refinement failed inside one bracket; no valid bounds.
    Undefined,
}

impl Access {
    pub fn window(&self) -> Option<&Window> {
        match self {
            Self::Complete(w) | Self::Partial(w) => Some(w),
            Self::Undefined => None,
        }
    }

    pub fn start(&self) -> Option<Epoch> {
        self.window().map(|w| w.start)
    }

    pub fn end(&self) -> Option<Epoch> {
        self.window().map(|w| w.end)
    }

    pub fn duration(&self) -> Option<Duration> {
        self.window().map(Window::duration)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Complete(w) => write!(
                f,
                "Complete access: {} until {} ({}, max {:.3})",
                w.start,
                w.end,
                w.duration(),
                w.max_value
            ),
            Self::Partial(w) => write!(
                f,
                "Partial access: {} until {} ({}, max {:.3})",
                w.start,
                w.end,
                w.duration(),
                w.max_value
            ),
            Self::Undefined => write!(f, "Undefined access"),
        }
    }
}
