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

use super::{Domain, Model};
use crate::cosmic::{Frame, State};
use crate::dynamics::Dynamics;
use crate::errors::AstroError;
use crate::propagators::{ErrorCtrl, PropOpts, Propagator, RSSCartesianStep};
use crate::time::Epoch;
use std::cell::RefCell;

/// A model backed by numerical integration of a set of dynamics from an initial state.
///
/// The model keeps a forward-integration cursor: when queried at monotonically increasing epochs
/// (the common scanning pattern), each evaluation resumes from the previous one instead of
/// restarting from the initial state. A query before the cursor restarts from the initial state,
/// propagating backward if needed.
///
/// The cursor lives in a `RefCell`, so this model is `Send` but not `Sync`: to evaluate from
/// several threads, clone the model (each clone carries its own cursor).
pub struct PropagatedModel<D: Dynamics, E: ErrorCtrl> {
    initial: State,
    dynamics: D,
    opts: PropOpts<E>,
    cursor: RefCell<State>,
}

impl<D: Dynamics> PropagatedModel<D, RSSCartesianStep> {
    /// Builds a model integrating the provided dynamics with the default integrator setup.
    pub fn new(initial: State, dynamics: D) -> Self {
        Self::with_opts(initial, dynamics, PropOpts::default())
    }
}

impl<D: Dynamics, E: ErrorCtrl> PropagatedModel<D, E> {
    pub fn with_opts(initial: State, dynamics: D, opts: PropOpts<E>) -> Self {
        Self {
            initial,
            dynamics,
            opts,
            cursor: RefCell::new(initial),
        }
    }

    pub fn initial_state(&self) -> State {
        self.initial
    }
}

impl<D: Dynamics + 'static, E: ErrorCtrl + 'static> Model for PropagatedModel<D, E> {
    fn evaluate(&self, epoch: Epoch) -> Result<State, AstroError> {
        let mut cursor = self.cursor.borrow_mut();
        // Resume from the cursor when moving forward, otherwise restart from the initial state.
        let from = if epoch >= cursor.epoch {
            *cursor
        } else {
            self.initial
        };

        let prop = Propagator::dp45(self.dynamics.clone(), self.opts);
        let mut instance = prop.with(from);
        let state = instance.until_epoch(epoch)?;
        *cursor = state;
        Ok(state)
    }

    fn domain(&self) -> Domain {
        Domain::unbounded()
    }

    fn frame(&self) -> Frame {
        self.initial.frame
    }

    fn boxed_clone(&self) -> Box<dyn Model> {
        Box::new(Self {
            initial: self.initial,
            dynamics: self.dynamics.clone(),
            opts: self.opts,
            cursor: RefCell::new(self.initial),
        })
    }
}
