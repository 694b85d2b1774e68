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

use na::{Vector3, Vector6};

// This determines when to take into consideration the magnitude of the state_delta and
// prevents dividing by too small of a number.
const REL_ERR_THRESH: f64 = 0.1;

/// The Error Control manages how a propagator computes the error in the current step.
pub trait ErrorCtrl: Copy + Send + Sync {
    /// Computes the actual error of the current step.
    ///
    /// The `error_est` is the estimated error computed from the difference in the two stages of
    /// of the RK propagator. The `candidate` variable is the candidate state, and `cur_state` is
    /// the current state. This function must return the error.
    fn estimate(
        &self,
        error_est: &Vector6<f64>,
        candidate: &Vector6<f64>,
        cur_state: &Vector6<f64>,
    ) -> f64;
}

/// An RSS step error control which effectively computes the L2 norm of the provided Vector of size 3
///
/// Note that this error controller should be preferably be used only with slices of a state with the same units.
/// For example, one should probably use this for position independently of using it for the velocity.
fn rss_step(error_est: &Vector3<f64>, candidate: &Vector3<f64>, cur_state: &Vector3<f64>) -> f64 {
    let mag = (candidate - cur_state).norm();
    let err = error_est.norm();
    if mag > REL_ERR_THRESH {
        err / mag
    } else {
        err
    }
}

/// An RSS state error control: when in doubt, use this error controller, especially for high accuracy.
///
/// Vallado states it as the following: "This is a more stringent error control than rss_step that is
/// often used as the default in other software such as STK".
fn rss_state(error_est: &Vector3<f64>, candidate: &Vector3<f64>, cur_state: &Vector3<f64>) -> f64 {
    let mag = 0.5 * (candidate + cur_state).norm();
    let err = error_est.norm();
    if mag > REL_ERR_THRESH {
        err / mag
    } else {
        err
    }
}

/// An RSS step error control on the radius and the velocity separately, the
/// largest of both errors wins.
#[derive(Copy, Clone, Debug, Default)]
pub struct RSSCartesianStep;

impl ErrorCtrl for RSSCartesianStep {
    fn estimate(
        &self,
        error_est: &Vector6<f64>,
        candidate: &Vector6<f64>,
        cur_state: &Vector6<f64>,
    ) -> f64 {
        let err_radius = rss_step(
            &error_est.fixed_rows::<3>(0).into_owned(),
            &candidate.fixed_rows::<3>(0).into_owned(),
            &cur_state.fixed_rows::<3>(0).into_owned(),
        );
        let err_velocity = rss_step(
            &error_est.fixed_rows::<3>(3).into_owned(),
            &candidate.fixed_rows::<3>(3).into_owned(),
            &cur_state.fixed_rows::<3>(3).into_owned(),
        );
        err_radius.max(err_velocity)
    }
}

/// An RSS state error control on the radius and the velocity separately, the
/// largest of both errors wins.
#[derive(Copy, Clone, Debug, Default)]
pub struct RSSCartesianState;

impl ErrorCtrl for RSSCartesianState {
    fn estimate(
        &self,
        error_est: &Vector6<f64>,
        candidate: &Vector6<f64>,
        cur_state: &Vector6<f64>,
    ) -> f64 {
        let err_radius = rss_state(
            &error_est.fixed_rows::<3>(0).into_owned(),
            &candidate.fixed_rows::<3>(0).into_owned(),
            &cur_state.fixed_rows::<3>(0).into_owned(),
        );
        let err_velocity = rss_state(
            &error_est.fixed_rows::<3>(3).into_owned(),
            &candidate.fixed_rows::<3>(3).into_owned(),
            &cur_state.fixed_rows::<3>(3).into_owned(),
        );
        err_radius.max(err_velocity)
    }
}

/// A largest error control which computes the largest error at each component.
///
/// This is a standard error computation algorithm, but it's arguably bad if the
/// state's components have different units: it calculates the largest local
/// estimate of the error from the integration given the difference in the
/// candidate state and the previous state.
#[derive(Copy, Clone, Debug, Default)]
pub struct LargestError;

impl ErrorCtrl for LargestError {
    fn estimate(
        &self,
        error_est: &Vector6<f64>,
        candidate: &Vector6<f64>,
        cur_state: &Vector6<f64>,
    ) -> f64 {
        let state_delta = candidate - cur_state;
        let mut max_err = 0.0;
        for (i, prop_err_i) in error_est.iter().enumerate() {
            let err = if state_delta[i] > REL_ERR_THRESH {
                (prop_err_i / state_delta[i]).abs()
            } else {
                prop_err_i.abs()
            };
            if err > max_err {
                max_err = err;
            }
        }
        max_err
    }
}
