// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Top-level lifecycle events emitted by an executor.

use std::path::PathBuf;

use super::{Hook, HookType, Outcome, Source};

/// Top-level event of a [Gherkin] executor's lifecycle.
///
/// Each worker emits its own ordered sub-stream of these, wrapped into an
/// [`Event`] carrying the emitting [`WorkerId`].
///
/// [`Event`]: super::Event
/// [`WorkerId`]: super::WorkerId
/// [Gherkin]: https://cucumber.io/docs/gherkin/reference
#[derive(Clone, Debug)]
pub enum Lifecycle {
    /// Raw text of a `.feature` file has been read.
    SourceRead {
        /// Path the source has been read from.
        path: PathBuf,

        /// Raw text of the `.feature` file.
        text: String,
    },

    /// [`TestCase`] execution being started.
    TestCaseStarted(TestCase),

    /// [`TestStep`] execution being started.
    TestStepStarted(TestStep),

    /// [`TestStep`] execution finished with the given [`Outcome`].
    TestStepFinished(TestStep, Outcome),

    /// Arbitrary content attached by the code under test.
    Embed(Embedding),

    /// Text written by the code under test.
    Write(String),

    /// [`TestCase`] execution being finished.
    TestCaseFinished,
}

impl Lifecycle {
    /// Constructs an event of a [`Scenario`] being started.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn case_started(
        feature: Source<gherkin::Feature>,
        rule: Option<Source<gherkin::Rule>>,
        scenario: Source<gherkin::Scenario>,
    ) -> Self {
        Self::TestCaseStarted(TestCase { feature, rule, scenario })
    }

    /// Constructs an event of a [`Step`] being started.
    ///
    /// [`Step`]: gherkin::Step
    #[must_use]
    pub fn step_started(step: Source<gherkin::Step>) -> Self {
        Self::TestStepStarted(TestStep::Step(step))
    }

    /// Constructs an event of a [`Step`] being finished.
    ///
    /// [`Step`]: gherkin::Step
    #[must_use]
    pub fn step_finished(step: Source<gherkin::Step>, outcome: Outcome) -> Self {
        Self::TestStepFinished(TestStep::Step(step), outcome)
    }

    /// Constructs an event of a [`Background`] [`Step`] being started.
    ///
    /// [`Background`]: gherkin::Background
    /// [`Step`]: gherkin::Step
    #[must_use]
    pub fn background_step_started(step: Source<gherkin::Step>) -> Self {
        Self::TestStepStarted(TestStep::Background(step))
    }

    /// Constructs an event of a [`Background`] [`Step`] being finished.
    ///
    /// [`Background`]: gherkin::Background
    /// [`Step`]: gherkin::Step
    #[must_use]
    pub fn background_step_finished(
        step: Source<gherkin::Step>,
        outcome: Outcome,
    ) -> Self {
        Self::TestStepFinished(TestStep::Background(step), outcome)
    }

    /// Constructs an event of a [`Hook`] being started.
    #[must_use]
    pub fn hook_started(hook: Hook) -> Self {
        Self::TestStepStarted(TestStep::Hook(hook))
    }

    /// Constructs an event of a [`Hook`] being finished.
    #[must_use]
    pub fn hook_finished(hook: Hook, outcome: Outcome) -> Self {
        Self::TestStepFinished(TestStep::Hook(hook), outcome)
    }

    /// Constructs an event of an [`Embedding`] being attached.
    #[must_use]
    pub fn embed(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self::Embed(Embedding {
            name: name.into(),
            mime_type: mime_type.into(),
            content: content.into(),
        })
    }
}

/// [`Scenario`] (or a single example row of a [Scenario Outline]) being
/// executed, along with its enclosing [`Feature`] and [`Rule`].
///
/// [`Feature`]: gherkin::Feature
/// [`Rule`]: gherkin::Rule
/// [`Scenario`]: gherkin::Scenario
/// [Scenario Outline]: https://cucumber.io/docs/gherkin/reference#scenario-outline
#[derive(Clone, Debug)]
pub struct TestCase {
    /// [`gherkin::Feature`] the [`Scenario`] belongs to.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub feature: Source<gherkin::Feature>,

    /// [`gherkin::Rule`] the [`Scenario`] belongs to, if any.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub rule: Option<Source<gherkin::Rule>>,

    /// [`gherkin::Scenario`] itself.
    pub scenario: Source<gherkin::Scenario>,
}

impl TestCase {
    /// Returns the [`gherkin::Background`] applicable to this [`TestCase`].
    ///
    /// A [`Rule`]'s own background runs after the [`Feature`]'s one.
    ///
    /// [`Feature`]: gherkin::Feature
    /// [`Rule`]: gherkin::Rule
    pub fn background_steps(&self) -> impl Iterator<Item = &gherkin::Step> {
        self.feature
            .background
            .iter()
            .chain(self.rule.iter().filter_map(|r| r.background.as_ref()))
            .flat_map(|bg| &bg.steps)
    }

    /// Returns all the tags applicable to this [`TestCase`]: [`Feature`]'s,
    /// [`Rule`]'s and [`Scenario`]'s ones, in this order.
    ///
    /// [`Feature`]: gherkin::Feature
    /// [`Rule`]: gherkin::Rule
    /// [`Scenario`]: gherkin::Scenario
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.feature
            .tags
            .iter()
            .chain(self.rule.iter().flat_map(|r| &r.tags))
            .chain(&self.scenario.tags)
            .map(String::as_str)
    }
}

/// Unit of work run by an executor inside a [`TestCase`].
#[derive(Clone, Debug)]
pub enum TestStep {
    /// [`Background`] [`Step`].
    ///
    /// [`Background`]: gherkin::Background
    /// [`Step`]: gherkin::Step
    Background(Source<gherkin::Step>),

    /// Regular [`Scenario`]'s [`Step`].
    ///
    /// [`Scenario`]: gherkin::Scenario
    /// [`Step`]: gherkin::Step
    Step(Source<gherkin::Step>),

    /// [`Before`] or [`After`] [`Hook`].
    ///
    /// [`After`]: HookType::After
    /// [`Before`]: HookType::Before
    Hook(Hook),
}

impl TestStep {
    /// Returns the [`gherkin::Step`] of this [`TestStep`], if it's not a
    /// [`Hook`].
    #[must_use]
    pub fn gherkin(&self) -> Option<&gherkin::Step> {
        match self {
            Self::Background(st) | Self::Step(st) => Some(st),
            Self::Hook(_) => None,
        }
    }

    /// Returns the [`HookType`] of this [`TestStep`], if it's a [`Hook`].
    #[must_use]
    pub const fn hook_type(&self) -> Option<HookType> {
        match self {
            Self::Hook(h) => Some(h.ty),
            Self::Background(_) | Self::Step(_) => None,
        }
    }
}

/// Content attached by the code under test.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Embedding {
    /// Name of the attachment.
    pub name: String,

    /// MIME type of the [`Embedding::content`]. Not validated.
    pub mime_type: String,

    /// Raw content.
    pub content: Vec<u8>,
}
