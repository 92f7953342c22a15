// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Core error types of the crate.
//!
//! This module contains the main [`Error`] enum that consolidates all the
//! errors the report translator may surface into a single hierarchy.

use std::io;

use derive_more::with_trait::{Display, Error as StdError, From};

use crate::event::WorkerId;

use super::{ConfigError, ProtocolViolation};

/// Top-level error type of the report translator.
///
/// Failures of the code under test are never represented here: they are
/// recorded into the report as statuses instead.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Executor emitted an event sequence it's not allowed to.
    #[display("Protocol violation: {_0}")]
    Protocol(ProtocolViolation),

    /// Attachment content couldn't be stored, so the scenario it belongs to
    /// has been aborted.
    #[display("Failed to store attachment `{source_id}` of `{worker}`: {source}")]
    #[from(ignore)]
    Attachment {
        /// Worker whose scenario has been aborted.
        worker: WorkerId,

        /// Generated source identifier of the attachment.
        #[error(not(source))]
        source_id: String,

        /// Underlying I/O error.
        source: io::Error,
    },

    /// Finalized scenario couldn't be handed over to the sink.
    #[display("Failed to hand over results of `{worker}`: {source}")]
    #[from(ignore)]
    Sink {
        /// Worker whose scenario results have been lost.
        worker: WorkerId,

        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    #[display("Configuration error: {_0}")]
    Config(ConfigError),
}

/// Result type alias using [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Returns the [`WorkerId`] whose scenario context has been affected by
    /// this [`Error`], if any.
    #[must_use]
    pub const fn worker(&self) -> Option<WorkerId> {
        match self {
            Self::Protocol(v) => Some(v.worker()),
            Self::Attachment { worker, .. } | Self::Sink { worker, .. } => {
                Some(*worker)
            }
            Self::Config(_) => None,
        }
    }

    /// Indicates whether this [`Error`] is a [`ProtocolViolation`].
    #[must_use]
    pub const fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}
