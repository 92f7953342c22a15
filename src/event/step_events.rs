// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Outcomes of running steps and hooks.

use std::{any::Any, sync::Arc};

use derive_more::with_trait::Display;

/// Alias for a [`catch_unwind()`] error.
///
/// [`catch_unwind()`]: std::panic::catch_unwind()
pub type Info = Arc<dyn Any + Send + 'static>;

/// Outcome of running a [`Step`] or a [`Hook`], as reported by an executor.
///
/// [`Hook`]: super::Hook
/// [`Step`]: gherkin::Step
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum Outcome {
    /// [`Step`] passed.
    ///
    /// [`Step`]: gherkin::Step
    #[display("passed")]
    Passed,

    /// [`Step`] failed with the given [`Cause`].
    ///
    /// [`Step`]: gherkin::Step
    #[display("failed: {_0}")]
    Failed(Cause),

    /// [`Step`] doesn't match any step definition.
    ///
    /// [`Step`]: gherkin::Step
    #[display("undefined")]
    Undefined(Option<Cause>),

    /// [`Step`] matches multiple step definitions.
    ///
    /// [`Step`]: gherkin::Step
    #[display("ambiguous")]
    Ambiguous(Option<Cause>),

    /// [`Step`] definition reported that it's not implemented yet.
    ///
    /// [`Step`]: gherkin::Step
    #[display("pending")]
    Pending(Option<Cause>),

    /// [`Step`] wasn't run at all.
    ///
    /// [`Step`]: gherkin::Step
    #[display("skipped")]
    Skipped,
}

impl Outcome {
    /// Constructs an [`Outcome::Failed`] caused by the given panic payload.
    #[must_use]
    pub fn panicked(info: &Info) -> Self {
        Self::Failed(Cause::from_panic(info))
    }

    /// Returns the [`Cause`] attached to this [`Outcome`], if any.
    #[must_use]
    pub const fn cause(&self) -> Option<&Cause> {
        match self {
            Self::Failed(cause) => Some(cause),
            Self::Undefined(cause)
            | Self::Ambiguous(cause)
            | Self::Pending(cause) => cause.as_ref(),
            Self::Passed | Self::Skipped => None,
        }
    }
}

/// Kind of a [`Cause`] of a failed [`Step`].
///
/// [`Step`]: gherkin::Step
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum CauseKind {
    /// Expectation of the test was not met.
    #[display("assertion")]
    Assertion,

    /// Test code itself misbehaved.
    #[display("error")]
    Error,
}

/// Cause of a failed [`Step`] or [`Hook`].
///
/// [`Hook`]: super::Hook
/// [`Step`]: gherkin::Step
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display("{message}")]
pub struct Cause {
    /// [`CauseKind`] of this [`Cause`].
    pub kind: CauseKind,

    /// Human-readable message.
    pub message: String,

    /// Captured trace (backtrace, error chain), if any.
    pub trace: Option<String>,
}

impl Cause {
    /// Creates a [`CauseKind::Assertion`] [`Cause`].
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self { kind: CauseKind::Assertion, message: message.into(), trace: None }
    }

    /// Creates a [`CauseKind::Error`] [`Cause`].
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: CauseKind::Error, message: message.into(), trace: None }
    }

    /// Attaches the given `trace` to this [`Cause`].
    #[must_use]
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Creates a [`Cause`] out of a [`catch_unwind()`] payload.
    ///
    /// Panics raised by the `assert*!` family of macros (their messages start
    /// with `assertion`) are considered [`CauseKind::Assertion`]s, any other
    /// panic is a [`CauseKind::Error`].
    ///
    /// [`catch_unwind()`]: std::panic::catch_unwind()
    #[must_use]
    pub fn from_panic(info: &Info) -> Self {
        let message = coerce_error(info);
        if message.starts_with("assertion") {
            Self::assertion(message)
        } else {
            Self::error(message)
        }
    }

    /// Indicates whether this [`Cause`] is a [`CauseKind::Assertion`].
    #[must_use]
    pub fn is_assertion(&self) -> bool {
        self.kind == CauseKind::Assertion
    }
}

/// Coerces the given panic payload into a [`String`].
#[must_use]
pub fn coerce_error(err: &Info) -> String {
    if let Some(string) = err.downcast_ref::<String>() {
        string.clone()
    } else if let Some(&string) = err.downcast_ref::<&str>() {
        string.to_owned()
    } else {
        "(Could not resolve panic payload)".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assertion_panics_are_assertions() {
        let info: Info = Arc::new(String::from(
            "assertion `left == right` failed\n  left: 15\n right: 123",
        ));
        let cause = Cause::from_panic(&info);

        assert!(cause.is_assertion());
        assert!(cause.message.contains("left: 15"));
    }

    #[test]
    fn other_panics_are_errors() {
        let info: Info = Arc::new("called `Option::unwrap()` on a `None` value");
        let outcome = Outcome::panicked(&info);

        let Outcome::Failed(cause) = outcome else {
            panic!("expected `Outcome::Failed`");
        };
        assert_eq!(cause.kind, CauseKind::Error);
    }

    #[test]
    fn unknown_payload_is_described() {
        let info: Info = Arc::new(42_i32);

        assert_eq!(coerce_error(&info), "(Could not resolve panic payload)");
    }

    #[test]
    fn cause_is_reachable_from_outcome() {
        let ambiguous = Outcome::Ambiguous(Some(Cause::error("2 matches")));

        assert_eq!(ambiguous.cause().map(|c| c.message.as_str()), Some("2 matches"));
        assert_eq!(Outcome::Passed.cause(), None);
        assert_eq!(Outcome::Undefined(None).cause(), None);
    }
}
