// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Mapping of executor [`Outcome`]s onto report [`Status`]es.

use crate::{
    event::{Cause, CauseKind, HookType, Outcome},
    model::{Status, StatusDetails},
};

/// [`Status`] a scenario is forced to have, at least, by one of its steps or
/// hooks.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Verdict {
    /// Forced [`Status`].
    pub status: Status,

    /// Details explaining the [`Verdict::status`].
    pub details: Option<StatusDetails>,
}

/// [`Outcome`] of a step or a hook, expressed in report terms.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Mapped {
    /// [`Status`] of the step or hook itself. [`None`] for unresolved steps.
    pub status: Option<Status>,

    /// Details of the [`Mapped::status`].
    pub details: Option<StatusDetails>,

    /// [`Verdict`] imposed on the enclosing scenario, if any.
    pub verdict: Option<Verdict>,

    /// Whether all the following steps of the scenario must be skipped.
    pub skip_rest: bool,
}

/// Maps the [`Outcome`] of a [`gherkin::Step`].
///
/// - Assertion failures are [`Status::Failed`], any other failure is
///   [`Status::Broken`].
/// - Undefined and pending steps stay statusless, skip the rest of the
///   scenario and make it [`Status::Skipped`].
/// - Ambiguous steps stay statusless, skip the rest of the scenario and make
///   it [`Status::Broken`].
#[must_use]
pub fn step(outcome: &Outcome) -> Mapped {
    match outcome {
        Outcome::Passed => resolved(Status::Passed),
        Outcome::Skipped => resolved(Status::Skipped),
        Outcome::Failed(cause) => {
            let (status, details) = failure(cause);
            Mapped {
                status: Some(status),
                details: Some(details),
                ..Mapped::default()
            }
        }
        Outcome::Undefined(cause) | Outcome::Pending(cause) => {
            unresolved(Status::Skipped, cause.as_ref())
        }
        Outcome::Ambiguous(cause) => {
            unresolved(Status::Broken, cause.as_ref())
        }
    }
}

/// Maps the [`Outcome`] of a [`Before`] or [`After`] hook.
///
/// A failed [`Before`] hook skips all the steps and makes the scenario
/// [`Status::Skipped`], while a failed [`After`] one makes it
/// [`Status::Broken`]. The hook itself records its failure either way.
///
/// An undefined, ambiguous or pending hook counts as a [`Status::Broken`]
/// failure of the hook. A skipped one imposes nothing.
///
/// [`After`]: HookType::After
/// [`Before`]: HookType::Before
#[must_use]
pub fn hook(ty: HookType, outcome: &Outcome) -> Mapped {
    let (status, details) = match outcome {
        Outcome::Passed => return resolved(Status::Passed),
        Outcome::Skipped => return resolved(Status::Skipped),
        Outcome::Failed(cause) => failure(cause),
        Outcome::Undefined(cause)
        | Outcome::Ambiguous(cause)
        | Outcome::Pending(cause) => (
            Status::Broken,
            cause.as_ref().map_or_else(
                || StatusDetails::message(format!("{ty} hook is {outcome}")),
                self::details,
            ),
        ),
    };

    let verdict = match ty {
        HookType::Before => Status::Skipped,
        HookType::After => Status::Broken,
    };
    Mapped {
        status: Some(status),
        details: Some(details.clone()),
        verdict: Some(Verdict { status: verdict, details: Some(details) }),
        skip_rest: ty == HookType::Before,
    }
}

/// [`Mapped`] of a step or a hook resolved into the given [`Status`].
fn resolved(status: Status) -> Mapped {
    Mapped { status: Some(status), ..Mapped::default() }
}

/// [`Mapped`] of an unresolved step, imposing the given [`Status`] onto its
/// scenario.
fn unresolved(verdict: Status, cause: Option<&Cause>) -> Mapped {
    let details = cause.map(details);
    Mapped {
        status: None,
        details: details.clone(),
        verdict: Some(Verdict { status: verdict, details }),
        skip_rest: true,
    }
}

/// Classifies the given failure [`Cause`].
fn failure(cause: &Cause) -> (Status, StatusDetails) {
    let status = match cause.kind {
        CauseKind::Assertion => Status::Failed,
        CauseKind::Error => Status::Broken,
    };
    (status, details(cause))
}

/// Converts the given [`Cause`] into [`StatusDetails`].
fn details(cause: &Cause) -> StatusDetails {
    StatusDetails {
        message: Some(cause.message.clone()),
        trace: cause.trace.clone(),
        ..StatusDetails::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assertion_is_failed_error_is_broken() {
        let failed = step(&Outcome::Failed(Cause::assertion("15 != 123")));
        let broken = step(&Outcome::Failed(
            Cause::error("connection refused").with_trace("at db.rs:10"),
        ));

        assert_eq!(failed.status, Some(Status::Failed));
        assert_eq!(
            failed.details.and_then(|d| d.message).as_deref(),
            Some("15 != 123"),
        );
        assert_eq!(broken.status, Some(Status::Broken));
        assert_eq!(
            broken.details.and_then(|d| d.trace).as_deref(),
            Some("at db.rs:10"),
        );
        assert!(!failed.skip_rest);
        assert!(failed.verdict.is_none());
    }

    #[test]
    fn undefined_and_pending_skip_the_scenario() {
        for outcome in [Outcome::Undefined(None), Outcome::Pending(None)] {
            let mapped = step(&outcome);

            assert_eq!(mapped.status, None);
            assert!(mapped.skip_rest);
            assert_eq!(
                mapped.verdict.map(|v| v.status),
                Some(Status::Skipped),
            );
        }
    }

    #[test]
    fn ambiguous_breaks_the_scenario() {
        let mapped = step(&Outcome::Ambiguous(Some(Cause::error(
            "2 step definitions match",
        ))));

        assert_eq!(mapped.status, None);
        assert!(mapped.skip_rest);
        let verdict = mapped.verdict.unwrap();
        assert_eq!(verdict.status, Status::Broken);
        assert_eq!(
            verdict.details.and_then(|d| d.message).as_deref(),
            Some("2 step definitions match"),
        );
    }

    #[test]
    fn failed_before_hook_skips_everything() {
        let mapped = hook(
            HookType::Before,
            &Outcome::Failed(Cause::error("database is down")),
        );

        assert_eq!(mapped.status, Some(Status::Broken));
        assert!(mapped.skip_rest);
        assert_eq!(mapped.verdict.map(|v| v.status), Some(Status::Skipped));
    }

    #[test]
    fn failed_after_hook_breaks_the_scenario() {
        let mapped =
            hook(HookType::After, &Outcome::Failed(Cause::assertion("leak")));

        assert_eq!(mapped.status, Some(Status::Failed));
        assert!(!mapped.skip_rest);
        assert_eq!(mapped.verdict.map(|v| v.status), Some(Status::Broken));
    }

    #[test]
    fn unresolved_hook_is_broken_failure() {
        let before = hook(HookType::Before, &Outcome::Pending(None));
        let after = hook(
            HookType::After,
            &Outcome::Ambiguous(Some(Cause::error("2 hooks match"))),
        );

        assert_eq!(before.status, Some(Status::Broken));
        assert!(before.details.and_then(|d| d.message).is_some());
        assert!(before.skip_rest);
        assert_eq!(before.verdict.map(|v| v.status), Some(Status::Skipped));

        assert_eq!(after.status, Some(Status::Broken));
        assert!(!after.skip_rest);
        assert_eq!(
            after.verdict.and_then(|v| v.details).and_then(|d| d.message),
            Some("2 hooks match".into()),
        );
    }

    #[test]
    fn skipped_hook_imposes_nothing() {
        let mapped = hook(HookType::After, &Outcome::Skipped);

        assert_eq!(mapped, resolved(Status::Skipped));
    }

    #[test]
    fn passed_hook_imposes_nothing() {
        let mapped = hook(HookType::Before, &Outcome::Passed);

        assert_eq!(mapped, resolved(Status::Passed));
    }
}
