// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Violations of the executor's event protocol.
//!
//! These are fatal to the offending worker's scenario context only: the
//! translator surfaces them rather than guessing a correction.

use derive_more::with_trait::{Display, Error};

use crate::event::WorkerId;

/// Event sequence received from a worker is not the one an executor is
/// allowed to emit.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum ProtocolViolation {
    /// Scenario started while another one is still active on the same worker.
    #[display("`{worker}` already runs scenario `{active}`")]
    AlreadyActive {
        /// Offending worker.
        worker: WorkerId,

        /// Name of the scenario being active.
        #[error(not(source))]
        active: String,
    },

    /// Scenario-level event received while no scenario is active.
    #[display("`{worker}` has no active scenario")]
    NotFound {
        /// Offending worker.
        worker: WorkerId,
    },

    /// Step or hook finished while nothing is open.
    #[display("`{worker}` finished `{step}` without starting it")]
    NoOpenStep {
        /// Offending worker.
        worker: WorkerId,

        /// Name of the finished step or hook.
        #[error(not(source))]
        step: String,
    },

    /// Step or hook started while another one is still open.
    #[display("`{worker}` started `{started}` while `{open}` is still open")]
    StepAlreadyOpen {
        /// Offending worker.
        worker: WorkerId,

        /// Name of the step or hook being open.
        #[error(not(source))]
        open: String,

        /// Name of the started step or hook.
        #[error(not(source))]
        started: String,
    },

    /// Step or hook finished isn't the one being open.
    #[display("`{worker}` finished `{finished}` while `{open}` is open")]
    MismatchedStep {
        /// Offending worker.
        worker: WorkerId,

        /// Name of the step or hook being open.
        #[error(not(source))]
        open: String,

        /// Name of the finished step or hook.
        #[error(not(source))]
        finished: String,
    },

    /// Scenario finished while a step or hook is still open.
    #[display("`{worker}` finished its scenario while `{open}` is still open")]
    UnclosedStep {
        /// Offending worker.
        worker: WorkerId,

        /// Name of the step or hook being open.
        #[error(not(source))]
        open: String,
    },
}

impl ProtocolViolation {
    /// Returns the [`WorkerId`] that violated the protocol.
    #[must_use]
    pub const fn worker(&self) -> WorkerId {
        match self {
            Self::AlreadyActive { worker, .. }
            | Self::NotFound { worker }
            | Self::NoOpenStep { worker, .. }
            | Self::StepAlreadyOpen { worker, .. }
            | Self::MismatchedStep { worker, .. }
            | Self::UnclosedStep { worker, .. } => *worker,
        }
    }
}
