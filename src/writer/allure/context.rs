// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! In-flight report records of a single worker.

use crate::{
    config::NamingStrategy,
    event::{HookType, WorkerId},
    model::{
        Attachment, FixtureResult, StatusDetails, StepResult, TestResult,
        TestResultContainer,
    },
};

use super::{naming, status::Verdict};

/// Node of a [`ScenarioContext`] being open.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Node {
    /// [`TestResult`] itself.
    Scenario,

    /// [`StepResult`] at the given index.
    Step(usize),

    /// [`FixtureResult`] of the given [`HookType`] at the given index.
    Fixture(HookType, usize),
}

/// Report records of the scenario a worker currently runs.
///
/// Open nodes form a stack: the [`Node::Scenario`] at the bottom, and at most
/// one [`Node::Step`] or [`Node::Fixture`] above it.
#[derive(Clone, Debug)]
pub struct ScenarioContext {
    /// Worker running the scenario.
    pub(super) worker: WorkerId,

    /// [`NamingStrategy`] of steps.
    pub(super) naming: NamingStrategy,

    /// [`TestResult`] being built.
    pub(super) result: TestResult,

    /// [`TestResultContainer`] being built.
    pub(super) container: TestResultContainer,

    /// Source lines of [`TestResult::steps`], index by index.
    pub(super) lines: Vec<usize>,

    /// Stack of open [`Node`]s.
    pub(super) stack: Vec<Node>,

    /// [`Verdict`]s imposed onto the scenario so far.
    pub(super) verdicts: Vec<Verdict>,

    /// Result flags derived from tags.
    pub(super) flags: StatusDetails,

    /// Whether all the following steps must be skipped.
    pub(super) skip_rest: bool,
}

impl ScenarioContext {
    /// Creates a new [`ScenarioContext`] with the [`Node::Scenario`] open.
    #[must_use]
    pub fn new(
        worker: WorkerId,
        naming: NamingStrategy,
        result: TestResult,
        container: TestResultContainer,
        flags: StatusDetails,
    ) -> Self {
        Self {
            worker,
            naming,
            result,
            container,
            lines: vec![],
            stack: vec![Node::Scenario],
            verdicts: vec![],
            flags,
            skip_rest: false,
        }
    }

    /// Returns the [`WorkerId`] running the scenario.
    #[must_use]
    pub const fn worker(&self) -> WorkerId {
        self.worker
    }

    /// Returns the [`TestResult`] being built.
    #[must_use]
    pub const fn result(&self) -> &TestResult {
        &self.result
    }

    /// Returns the [`TestResultContainer`] being built.
    #[must_use]
    pub const fn container(&self) -> &TestResultContainer {
        &self.container
    }

    /// Schedules a [`StepResult`] of the given [`gherkin::Step`] to be run
    /// later.
    pub fn schedule(&mut self, step: &gherkin::Step) {
        self.result
            .steps
            .push(StepResult::pending(naming::step_name(step, self.naming)));
        self.lines.push(step.position.line);
    }

    /// Returns the [`Node`] open above the [`Node::Scenario`], if any.
    #[must_use]
    pub fn open(&self) -> Option<Node> {
        self.stack.last().copied().filter(|n| *n != Node::Scenario)
    }

    /// Returns the name of the given [`Node`].
    #[must_use]
    pub fn node_name(&self, node: Node) -> &str {
        match node {
            Node::Scenario => self.result.name.as_str(),
            Node::Step(i) => {
                self.result.steps.get(i).map_or("", |s| s.name.as_str())
            }
            Node::Fixture(ty, i) => {
                self.fixtures(ty).get(i).map_or("", |f| f.name.as_str())
            }
        }
    }

    /// Returns [`Attachment`]s of the innermost open [`Node`].
    pub fn attachments_mut(&mut self) -> &mut Vec<Attachment> {
        match self.stack.last().copied().unwrap_or(Node::Scenario) {
            Node::Step(i) if i < self.result.steps.len() => {
                &mut self.result.steps[i].attachments
            }
            Node::Fixture(ty, i) if i < self.fixtures(ty).len() => {
                &mut self.fixtures_mut(ty)[i].attachments
            }
            Node::Scenario | Node::Step(_) | Node::Fixture(..) => {
                &mut self.result.attachments
            }
        }
    }

    /// Returns [`FixtureResult`]s of the given [`HookType`].
    pub(super) fn fixtures(&self, ty: HookType) -> &[FixtureResult] {
        match ty {
            HookType::Before => &self.container.befores,
            HookType::After => &self.container.afters,
        }
    }

    /// Returns [`FixtureResult`]s of the given [`HookType`] for mutation.
    pub(super) fn fixtures_mut(
        &mut self,
        ty: HookType,
    ) -> &mut Vec<FixtureResult> {
        match ty {
            HookType::Before => &mut self.container.befores,
            HookType::After => &mut self.container.afters,
        }
    }
}
