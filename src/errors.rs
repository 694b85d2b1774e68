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
use snafu::prelude::*;

/// The error taxonomy of orbitkit.
///
/// Errors are never silently swallowed: a model or solver failure terminates
/// the calling trajectory, orbit, or access computation. Batch drivers over
/// many independent trajectory pairs should catch per pair so that one failed
/// pair does not abort the whole batch. There are no internal retries.
#[derive(Clone, Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AstroError {
    /// The queried epoch lies outside the validity bounds of a model.
    #[snafu(display("epoch {epoch} is outside the validity domain of {model}"))]
    Domain { epoch: Epoch, model: String },
    /// An iterative solve exceeded its iteration cap.
    #[snafu(display("{method} did not converge within {iterations} iterations"))]
    Convergence {
        method: &'static str,
        iterations: usize,
    },
    /// The integrator step size collapsed below the minimum without meeting the tolerance.
    #[snafu(display(
        "integrator diverged: step at the {min_step} floor with local error {error:e} above tolerance {tolerance:e}"
    ))]
    Divergence {
        min_step: Duration,
        error: f64,
        tolerance: f64,
    },
    /// Inconsistent solver or search parameters.
    #[snafu(display("invalid configuration: {reason}"))]
    Configuration { reason: String },
    /// An index or interval lies outside the defined bounds.
    #[snafu(display("out of range: {reason}"))]
    Range { reason: String },
    /// A model-internal failure, e.g. a decayed SGP4 orbit.
    #[snafu(display("propagation failed: {reason}"))]
    Propagation { reason: String },
}
