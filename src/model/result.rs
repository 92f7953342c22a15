// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Serialize`]able report records.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use super::{Stage, Status, StatusDetails};

/// Converts the given [`SystemTime`] into milliseconds since [`UNIX_EPOCH`].
#[must_use]
pub fn millis(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Content attached to a [`StepResult`], a [`FixtureResult`] or a
/// [`TestResult`].
///
/// The content itself is stored by a [`Sink`] under [`Attachment::source`].
///
/// [`Sink`]: crate::Sink
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Attachment {
    /// Name of this [`Attachment`].
    pub name: String,

    /// MIME type of this [`Attachment`]'s content.
    #[serde(rename = "type")]
    pub mime_type: String,

    /// Generated identifier the content is stored under.
    pub source: String,
}

/// `name=value` label of a [`TestResult`].
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct Label {
    /// Name of this [`Label`].
    pub name: String,

    /// Value of this [`Label`].
    pub value: String,
}

impl Label {
    /// Creates a new [`Label`].
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// Link of a [`TestResult`] to an external system.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct Link {
    /// Identifier in the external system.
    pub name: String,

    /// Category of this [`Link`] (`issue`, `tms`, `link`).
    #[serde(rename = "type")]
    pub link_type: String,

    /// Resolved URL, if a pattern is configured for the category.
    pub url: Option<String>,
}

/// Parameter of a [`TestResult`] run from a [Scenario Outline] example row.
///
/// [Scenario Outline]: https://cucumber.io/docs/gherkin/reference#scenario-outline
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct Parameter {
    /// Column header.
    pub name: String,

    /// Cell text.
    pub value: String,
}

/// Record of a single [`gherkin::Step`] run.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    /// Display name of the step.
    pub name: String,

    /// [`Status`] of the step. Absent for unresolved (undefined, pending or
    /// ambiguous) steps.
    pub status: Option<Status>,

    /// Details of the [`StepResult::status`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_details: Option<StatusDetails>,

    /// Lifecycle [`Stage`] of the step.
    pub stage: Stage,

    /// Start time in milliseconds since [`UNIX_EPOCH`].
    pub start: Option<u64>,

    /// Stop time in milliseconds since [`UNIX_EPOCH`].
    pub stop: Option<u64>,

    /// [`Attachment`]s raised while the step was running.
    pub attachments: Vec<Attachment>,
}

impl StepResult {
    /// Creates a new [`StepResult`] known upfront, but not started yet.
    #[must_use]
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: None,
            status_details: None,
            stage: Stage::Pending,
            start: None,
            stop: None,
            attachments: vec![],
        }
    }

    /// Indicates whether this [`StepResult`] has been started.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.start.is_some()
    }
}

/// Record of a [`Before`] or [`After`] hook run.
///
/// [`After`]: crate::event::HookType::After
/// [`Before`]: crate::event::HookType::Before
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureResult {
    /// Name of the hook.
    pub name: String,

    /// [`Status`] of the hook.
    pub status: Option<Status>,

    /// Details of the [`FixtureResult::status`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_details: Option<StatusDetails>,

    /// Lifecycle [`Stage`] of the hook.
    pub stage: Stage,

    /// Start time in milliseconds since [`UNIX_EPOCH`].
    pub start: Option<u64>,

    /// Stop time in milliseconds since [`UNIX_EPOCH`].
    pub stop: Option<u64>,

    /// [`Attachment`]s raised while the hook was running.
    pub attachments: Vec<Attachment>,
}

impl FixtureResult {
    /// Creates a new running [`FixtureResult`].
    #[must_use]
    pub fn started(name: impl Into<String>, at: SystemTime) -> Self {
        Self {
            name: name.into(),
            status: None,
            status_details: None,
            stage: Stage::Running,
            start: Some(millis(at)),
            stop: None,
            attachments: vec![],
        }
    }
}

/// Record of a single [`gherkin::Scenario`] (or a single example row of a
/// [Scenario Outline]) run.
///
/// [Scenario Outline]: https://cucumber.io/docs/gherkin/reference#scenario-outline
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// Unique identifier of this [`TestResult`].
    pub uuid: String,

    /// Stable identifier correlating the same scenario across runs.
    pub history_id: String,

    /// Display name.
    pub name: String,

    /// Fully qualified name: normalized source path and line.
    pub full_name: String,

    /// Feature and scenario descriptions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Aggregated [`Status`].
    pub status: Option<Status>,

    /// Details of the [`TestResult::status`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_details: Option<StatusDetails>,

    /// Lifecycle [`Stage`].
    pub stage: Stage,

    /// Start time in milliseconds since [`UNIX_EPOCH`].
    pub start: Option<u64>,

    /// Stop time in milliseconds since [`UNIX_EPOCH`].
    pub stop: Option<u64>,

    /// [`StepResult`]s in execution order, background ones first.
    pub steps: Vec<StepResult>,

    /// [`Attachment`]s raised outside of any step or hook.
    pub attachments: Vec<Attachment>,

    /// [`Label`]s.
    pub labels: Vec<Label>,

    /// [`Link`]s.
    pub links: Vec<Link>,

    /// [`Parameter`]s in example-row column order.
    pub parameters: Vec<Parameter>,
}

impl TestResult {
    /// Returns values of all the [`Label`]s with the given `name`.
    pub fn label_values<'s>(
        &'s self,
        name: &'s str,
    ) -> impl Iterator<Item = &'s str> + 's {
        self.labels
            .iter()
            .filter(move |l| l.name == name)
            .map(|l| l.value.as_str())
    }
}

/// Container of [`FixtureResult`]s surrounding [`TestResult`]s.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResultContainer {
    /// Unique identifier of this [`TestResultContainer`].
    pub uuid: String,

    /// [`TestResult::uuid`]s of the surrounded [`TestResult`]s.
    pub children: Vec<String>,

    /// [`Before`] hooks.
    ///
    /// [`Before`]: crate::event::HookType::Before
    pub befores: Vec<FixtureResult>,

    /// [`After`] hooks.
    ///
    /// [`After`]: crate::event::HookType::After
    pub afters: Vec<FixtureResult>,

    /// Start time in milliseconds since [`UNIX_EPOCH`].
    pub start: Option<u64>,

    /// Stop time in milliseconds since [`UNIX_EPOCH`].
    pub stop: Option<u64>,
}
