// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Statuses and lifecycle stages of report records.

use derive_more::with_trait::Display;
use serde::Serialize;

/// Possible statuses of a report record.
///
/// Variants are declared in ascending order of severity, so [`Ord`] gives
/// the precedence used to aggregate statuses:
/// `broken > failed > skipped > passed`.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Everything went fine.
    #[display("passed")]
    Passed,

    /// Wasn't run, or its result doesn't matter.
    #[display("skipped")]
    Skipped,

    /// Expectation of the test was not met.
    #[display("failed")]
    Failed,

    /// Test code itself misbehaved, or the outcome couldn't be determined.
    #[display("broken")]
    Broken,
}

impl Status {
    /// Returns the most severe of the given [`Status`]es, if any.
    #[must_use]
    pub fn worst(statuses: impl IntoIterator<Item = Self>) -> Option<Self> {
        statuses.into_iter().max()
    }
}

/// Lifecycle stage of a report record, independent of its [`Status`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Known upfront, but not started yet.
    #[display("scheduled")]
    Scheduled,

    /// Started, but not finished yet.
    #[display("running")]
    Running,

    /// Finished.
    #[display("finished")]
    Finished,

    /// Awaiting for something to happen before it can start.
    #[display("pending")]
    Pending,

    /// Started, but never finished.
    #[display("interrupted")]
    Interrupted,
}

/// Structured details of a [`Status`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDetails {
    /// Failure is a known one.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub known: bool,

    /// Failure should be ignored.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub muted: bool,

    /// Test is known to be unstable.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub flaky: bool,

    /// Human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Captured trace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl StatusDetails {
    /// Creates [`StatusDetails`] with the given `message` only.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self { message: Some(message.into()), ..Self::default() }
    }

    /// Indicates whether these [`StatusDetails`] carry nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
