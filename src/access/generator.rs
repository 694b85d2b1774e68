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

use super::{Access, AccessCondition, Window};
use crate::errors::AstroError;
use crate::time::{Duration, Epoch, TimeSeries, Unit};
use crate::tools::find_bracketed_root;
use crate::trajectory::Trajectory;
use rayon::prelude::*;

/// Searches a pair of trajectories for the windows over which an access condition holds.
///
/// The search is a coarse scan at `step`, bracket detection on condition flips, and Brent
/// refinement of each bracket down to `epoch_precision`.
#[derive(Clone, Copy, Debug)]
pub struct AccessGenerator {
    pub step: Duration,
    pub epoch_precision: Duration,
}

impl Default for AccessGenerator {
    fn default() -> Self {
        Self {
            step: 60 * Unit::Second,
            epoch_precision: 100 * Unit::Millisecond,
        }
    }
}

impl AccessGenerator {
    /// Builds a generator with the provided coarse scan step and boundary epoch precision.
    ///
    /// Both must be positive, and the precision must be finer than the step.
    pub fn new(step: Duration, epoch_precision: Duration) -> Result<Self, AstroError> {
        if step <= Duration::ZERO || epoch_precision <= Duration::ZERO {
            return Err(AstroError::Configuration {
                reason: format!(
                    "scan step and epoch precision must be positive, got {step} and {epoch_precision}"
                ),
            });
        }
        if epoch_precision >= step {
            return Err(AstroError::Configuration {
                reason: format!(
                    "epoch precision {epoch_precision} must be finer than the scan step {step}"
                ),
            });
        }
        Ok(Self {
            step,
            epoch_precision,
        })
    }

    /// Computes the ordered sequence of accesses from `observer` to `target` over the analysis
    /// interval `[start, end]`.
    ///
    /// An interval without any condition transition yields an empty sequence. Trajectories whose
    /// validity domains do not both cover the interval fail with `AstroError::Range` before any
    /// scanning. A condition failure during the coarse scan aborts the whole call; a failure
    /// during the refinement of one bracket only turns that window into `Access::Undefined`.
    pub fn compute_accesses<C: AccessCondition + ?Sized>(
        &self,
        observer: &Trajectory,
        target: &Trajectory,
        start: Epoch,
        end: Epoch,
        condition: &C,
    ) -> Result<Vec<Access>, AstroError> {
        if start >= end {
            return Err(AstroError::Configuration {
                reason: format!("analysis interval is inverted or empty: {start} >= {end}"),
            });
        }
        let overlap = observer
            .domain()
            .intersect(&target.domain())
            .ok_or_else(|| AstroError::Range {
                reason: "trajectory validity domains do not overlap".to_string(),
            })?;
        if !overlap.contains(start) || !overlap.contains(end) {
            return Err(AstroError::Range {
                reason: format!(
                    "analysis interval [{start}, {end}] exceeds the joint trajectory domain {overlap}"
                ),
            });
        }

        let mut eval_at = |epoch: Epoch| -> Result<f64, AstroError> {
            let obs = observer.state_at(epoch)?;
            let tgt = target.state_at(epoch)?;
            Ok(condition.eval(&obs, &tgt)?.value)
        };

        // 1. Coarse scan. The closing epoch is always sampled, even when the step does not
        // divide the interval.
        let mut samples = Vec::new();
        for epoch in TimeSeries::inclusive(start, end, self.step) {
            let obs = observer.state_at(epoch)?;
            let tgt = target.state_at(epoch)?;
            samples.push((epoch, condition.eval(&obs, &tgt)?));
        }
        match samples.last() {
            Some((last, _)) if *last < end => {
                let obs = observer.state_at(end)?;
                let tgt = target.state_at(end)?;
                samples.push((end, condition.eval(&obs, &tgt)?));
            }
            _ => {}
        }

        // 2 & 3. Bracket each satisfied flip and refine it to an exact boundary epoch. A failed
        // refinement poisons the window it would have bounded.
        #[derive(Clone, Copy)]
        enum Edge {
            Rise(Epoch),
            Fall(Epoch),
            Poisoned,
        }
        let mut edges = Vec::new();
        for pair in samples.windows(2) {
            let (prev_epoch, prev_eval) = pair[0];
            let (epoch, eval) = pair[1];
            if prev_eval.satisfied == eval.satisfied {
                continue;
            }
            match find_bracketed_root(prev_epoch, epoch, self.epoch_precision, 0.0, &mut eval_at) {
                Ok(boundary) => {
                    if eval.satisfied {
                        edges.push(Edge::Rise(boundary));
                    } else {
                        edges.push(Edge::Fall(boundary));
                    }
                }
                Err(err) => {
                    debug!("boundary refinement failed in [{prev_epoch}, {epoch}]: {err}");
                    edges.push(Edge::Poisoned);
                }
            }
        }

        // 4 & 5. Pair entry and exit boundaries into windows, truncating at the interval edges.
        let mut accesses = Vec::new();
        // (window opening epoch, true when truncated by the interval edge, poisoned)
        let mut open: Option<(Epoch, bool, bool)> = if samples[0].1.satisfied {
            Some((start, true, false))
        } else {
            None
        };
        for edge in edges {
            match edge {
                Edge::Rise(boundary) => {
                    if open.is_none() {
                        open = Some((boundary, false, false));
                    }
                }
                Edge::Fall(boundary) => {
                    if let Some((window_start, truncated, poisoned)) = open.take() {
                        self.emit(
                            &mut accesses,
                            window_start,
                            boundary,
                            truncated,
                            poisoned,
                            start,
                            end,
                            &mut eval_at,
                        )?;
                    }
                }
                Edge::Poisoned => match open.take() {
                    Some(_) => accesses.push(Access::Undefined),
                    None => open = Some((start, true, true)),
                },
            }
        }
        if let Some((window_start, truncated, poisoned)) = open {
            let _ = truncated;
            self.emit(
                &mut accesses,
                window_start,
                end,
                true,
                poisoned,
                start,
                end,
                &mut eval_at,
            )?;
        }

        Ok(accesses)
    }

    /// Builds one window, classifying it against the interval edges and estimating its peak
    /// metric by fine sampling; degenerate windows are dropped.
    #[allow(clippy::too_many_arguments)]
    fn emit<F>(
        &self,
        accesses: &mut Vec<Access>,
        window_start: Epoch,
        window_end: Epoch,
        truncated: bool,
        poisoned: bool,
        interval_start: Epoch,
        interval_end: Epoch,
        eval_at: &mut F,
    ) -> Result<(), AstroError>
    where
        F: FnMut(Epoch) -> Result<f64, AstroError>,
    {
        if poisoned {
            accesses.push(Access::Undefined);
            return Ok(());
        }
        if window_end <= window_start {
            // Refinement collapsed the window, drop it.
            return Ok(());
        }
        let mut max_value = f64::NEG_INFINITY;
        let fine_step = self.step / 16.0;
        for epoch in TimeSeries::inclusive(window_start, window_end, fine_step) {
            max_value = max_value.max(eval_at(epoch)?);
        }
        max_value = max_value.max(eval_at(window_end)?);

        let window = Window {
            start: window_start,
            end: window_end,
            max_value,
        };
        let complete = !truncated && interval_start < window_start && window_end < interval_end;
        if complete {
            accesses.push(Access::Complete(window));
        } else {
            accesses.push(Access::Partial(window));
        }
        Ok(())
    }
}

/// Runs one access search per trajectory pair, in parallel, over a shared analysis interval.
///
/// Each pair is searched independently: a failed pair yields its error in place without
/// aborting or corrupting the results of the other pairs.
pub fn compute_batch<C>(
    generator: &AccessGenerator,
    pairs: Vec<(Trajectory, Trajectory)>,
    start: Epoch,
    end: Epoch,
    condition: &C,
) -> Vec<Result<Vec<Access>, AstroError>>
where
    C: AccessCondition + Sync,
{
    pairs
        .into_par_iter()
        .map(|(observer, target)| {
            generator.compute_accesses(&observer, &target, start, end, condition)
        })
        .collect()
}
