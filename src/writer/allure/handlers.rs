// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Transitions of a [`ScenarioContext`] driven by lifecycle events.

use std::time::SystemTime;

use crate::{
    error::{ProtocolViolation, Result},
    event::{Outcome, TestStep},
    model::{
        millis, FixtureResult, Stage, Status, StatusDetails, StepResult,
        TestResult, TestResultContainer,
    },
    writer::Sink,
};

use super::{
    attachment,
    context::{Node, ScenarioContext},
    naming, status,
};

impl ScenarioContext {
    /// Opens a [`StepResult`] or a [`FixtureResult`] for the started
    /// [`TestStep`].
    ///
    /// A [`gherkin::Step`] opens the first scheduled [`StepResult`] of the
    /// same name and line, or a new one, if there is none.
    ///
    /// # Errors
    ///
    /// - [`ProtocolViolation::StepAlreadyOpen`] if something is open already;
    /// - [`Error::Attachment`] if its data table cannot be stored.
    ///
    /// [`Error::Attachment`]: crate::Error::Attachment
    pub fn start_step<S: Sink + ?Sized>(
        &mut self,
        step: &TestStep,
        at: SystemTime,
        sink: &S,
    ) -> Result<()> {
        if let Some(open) = self.open() {
            return Err(ProtocolViolation::StepAlreadyOpen {
                worker: self.worker,
                open: self.node_name(open).to_owned(),
                started: self.describe(step),
            }
            .into());
        }

        let st = match step {
            TestStep::Hook(hook) => {
                let fixtures = self.fixtures_mut(hook.ty);
                fixtures.push(FixtureResult::started(hook.name.as_str(), at));
                let node = Node::Fixture(hook.ty, fixtures.len() - 1);
                self.stack.push(node);
                tracing::trace!(worker = %self.worker, %hook, "hook started");
                return Ok(());
            }
            TestStep::Background(st) | TestStep::Step(st) => st,
        };

        let name = naming::step_name(st, self.naming);
        let line = st.position.line;
        let scheduled = self.result.steps.iter().zip(&self.lines).position(
            |(s, l)| s.stage == Stage::Pending && s.name == name && *l == line,
        );
        let index = scheduled.unwrap_or_else(|| {
            self.result.steps.push(StepResult::pending(name.as_str()));
            self.lines.push(line);
            self.result.steps.len() - 1
        });

        let record = &mut self.result.steps[index];
        record.stage = Stage::Running;
        record.start = Some(millis(at));
        self.stack.push(Node::Step(index));
        tracing::trace!(worker = %self.worker, step = %name, "step started");

        if let Some(table) = &st.table {
            _ = self.attach(
                attachment::DATA_TABLE,
                attachment::TSV,
                attachment::data_table(table).as_bytes(),
                sink,
            )?;
        }
        Ok(())
    }

    /// Closes the open [`StepResult`] or [`FixtureResult`] of the finished
    /// [`TestStep`] with the given [`Outcome`].
    ///
    /// Once an unresolved step or a failed [`Before`] hook is met, every
    /// following step is [`Status::Skipped`] whatever its [`Outcome`] is.
    ///
    /// # Errors
    ///
    /// - [`ProtocolViolation::NoOpenStep`] if nothing is open;
    /// - [`ProtocolViolation::MismatchedStep`] if the open one is another
    ///   step or hook.
    ///
    /// [`Before`]: crate::event::HookType::Before
    pub fn finish_step(
        &mut self,
        step: &TestStep,
        outcome: &Outcome,
        at: SystemTime,
    ) -> Result<(), ProtocolViolation> {
        let Some(open) = self.open() else {
            return Err(ProtocolViolation::NoOpenStep {
                worker: self.worker,
                step: self.describe(step),
            });
        };
        if !self.is_open(open, step) {
            return Err(ProtocolViolation::MismatchedStep {
                worker: self.worker,
                open: self.node_name(open).to_owned(),
                finished: self.describe(step),
            });
        }
        _ = self.stack.pop();

        match (open, step) {
            (Node::Fixture(ty, i), TestStep::Hook(hook)) => {
                let mapped = status::hook(ty, outcome);
                if let Some(fixture) = self.fixtures_mut(ty).get_mut(i) {
                    fixture.status = mapped.status;
                    fixture.status_details = mapped.details;
                    fixture.stage = Stage::Finished;
                    fixture.stop = Some(millis(at));
                }
                self.skip_rest |= mapped.skip_rest;
                self.verdicts.extend(mapped.verdict);
                tracing::trace!(
                    worker = %self.worker, %hook, %outcome, "hook finished"
                );
            }
            (Node::Step(i), _) => {
                let mapped = if self.skip_rest {
                    status::Mapped {
                        status: Some(Status::Skipped),
                        ..status::Mapped::default()
                    }
                } else {
                    status::step(outcome)
                };
                let record = &mut self.result.steps[i];
                record.status = mapped.status;
                record.status_details = mapped.details;
                record.stage = Stage::Finished;
                record.stop = Some(millis(at));
                tracing::trace!(
                    worker = %self.worker,
                    step = %record.name,
                    %outcome,
                    "step finished"
                );
                self.skip_rest |= mapped.skip_rest;
                self.verdicts.extend(mapped.verdict);
            }
            (Node::Scenario | Node::Fixture(..), _) => {}
        }
        Ok(())
    }

    /// Stores the `content` and attaches it to the innermost open node.
    ///
    /// # Errors
    ///
    /// [`Error::Attachment`] if the `content` cannot be stored.
    ///
    /// [`Error::Attachment`]: crate::Error::Attachment
    pub fn attach<S: Sink + ?Sized>(
        &mut self,
        name: &str,
        mime_type: &str,
        content: &[u8],
        sink: &S,
    ) -> Result<String> {
        let worker = self.worker;
        attachment::attach(
            self.attachments_mut(),
            name,
            mime_type,
            content,
            sink,
            worker,
        )
    }

    /// Finalizes the scenario, resolving its overall [`Status`] as the worst
    /// of its steps' ones and the imposed verdicts.
    ///
    /// Scheduled steps never started are [`Status::Skipped`]. A scenario
    /// without any status at all is [`Status::Skipped`] too.
    ///
    /// # Errors
    ///
    /// [`ProtocolViolation::UnclosedStep`] if a step or a hook is still open.
    pub fn finish(
        mut self,
        at: SystemTime,
    ) -> Result<(TestResult, TestResultContainer), ProtocolViolation> {
        if let Some(open) = self.open() {
            return Err(ProtocolViolation::UnclosedStep {
                worker: self.worker,
                open: self.node_name(open).to_owned(),
            });
        }

        for step in &mut self.result.steps {
            if step.stage == Stage::Pending {
                step.status = Some(Status::Skipped);
                step.stage = Stage::Finished;
            }
        }

        let status = Status::worst(
            self.result
                .steps
                .iter()
                .filter_map(|s| s.status)
                .chain(self.verdicts.iter().map(|v| v.status)),
        )
        .unwrap_or(Status::Skipped);

        let details = self
            .verdicts
            .iter()
            .find(|v| v.status == status)
            .and_then(|v| v.details.clone())
            .or_else(|| {
                self.result
                    .steps
                    .iter()
                    .find(|s| s.status == Some(status))
                    .and_then(|s| s.status_details.clone())
            })
            .unwrap_or_default();
        let details = StatusDetails {
            known: self.flags.known,
            muted: self.flags.muted,
            flaky: self.flags.flaky,
            ..details
        };

        let stop = Some(millis(at));
        self.result.status = Some(status);
        self.result.status_details = (!details.is_empty()).then_some(details);
        self.result.stage = Stage::Finished;
        self.result.stop = stop;
        self.container.stop = stop;

        Ok((self.result, self.container))
    }

    /// Indicates whether the given open [`Node`] is the one of the `step`.
    fn is_open(&self, node: Node, step: &TestStep) -> bool {
        match (node, step) {
            (Node::Fixture(ty, i), TestStep::Hook(hook)) => {
                ty == hook.ty
                    && self.fixtures(ty).get(i).is_some_and(|f| f.name == hook.name)
            }
            (Node::Step(i), TestStep::Background(st) | TestStep::Step(st)) => {
                self.lines.get(i) == Some(&st.position.line)
                    && self.node_name(node) == naming::step_name(st, self.naming)
            }
            _ => false,
        }
    }

    /// Describes the given [`TestStep`] for errors.
    fn describe(&self, step: &TestStep) -> String {
        match step {
            TestStep::Background(st) | TestStep::Step(st) => {
                naming::step_name(st, self.naming)
            }
            TestStep::Hook(hook) => hook.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;
    use crate::{
        config::NamingStrategy,
        event::{Cause, Hook, Source, WorkerId},
        writer::Memory,
    };

    const FEATURE: &str = "\
Feature: Simple
  Background:
    Given a is 1

  Scenario: Add a to b
    Given a is 5
    And b is 10
      | x | y |
      | 1 | 2 |
    When I add a to b
";

    fn steps() -> (Vec<Source<gherkin::Step>>, Source<gherkin::Step>) {
        let feature =
            gherkin::Feature::parse(FEATURE, gherkin::GherkinEnv::default())
                .unwrap();
        let bg = feature.background.as_ref().unwrap().steps[0].clone();
        let steps = feature.scenarios[0]
            .steps
            .iter()
            .cloned()
            .map(Source::new)
            .collect();
        (steps, Source::new(bg))
    }

    fn context() -> ScenarioContext {
        let result = TestResult {
            uuid: "r".into(),
            history_id: "h".into(),
            name: "Add a to b".into(),
            full_name: "simple.feature:5".into(),
            description: None,
            status: None,
            status_details: None,
            stage: Stage::Running,
            start: Some(0),
            stop: None,
            steps: vec![],
            attachments: vec![],
            labels: vec![],
            links: vec![],
            parameters: vec![],
        };
        let container = TestResultContainer {
            uuid: "c".into(),
            children: vec!["r".into()],
            befores: vec![],
            afters: vec![],
            start: Some(0),
            stop: None,
        };
        ScenarioContext::new(
            WorkerId(0),
            NamingStrategy::Long,
            result,
            container,
            StatusDetails::default(),
        )
    }

    fn at(ms: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(ms)
    }

    fn run(
        ctx: &mut ScenarioContext,
        step: TestStep,
        outcome: Outcome,
        sink: &Memory,
    ) {
        ctx.start_step(&step, at(1), sink).unwrap();
        ctx.finish_step(&step, &outcome, at(2)).unwrap();
    }

    #[test]
    fn opens_scheduled_background_step() {
        let (steps, bg) = steps();
        let sink = Memory::new();
        let mut ctx = context();
        ctx.schedule(&bg);

        run(&mut ctx, TestStep::Background(bg), Outcome::Passed, &sink);
        run(&mut ctx, TestStep::Step(steps[0].clone()), Outcome::Passed, &sink);

        let (result, _) = ctx.finish(at(3)).unwrap();
        let names = result.steps.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["Given  a is 1", "Given  a is 5"]);
        assert_eq!(result.status, Some(Status::Passed));
        assert_eq!(result.stop, Some(3));
    }

    #[test]
    fn never_started_scheduled_step_is_skipped() {
        let (_, bg) = steps();
        let mut ctx = context();
        ctx.schedule(&bg);

        let (result, _) = ctx.finish(at(3)).unwrap();

        assert_eq!(result.steps[0].status, Some(Status::Skipped));
        assert_eq!(result.status, Some(Status::Skipped));
    }

    #[test]
    fn data_table_is_attached_to_its_step() {
        let (steps, _) = steps();
        let sink = Memory::new();
        let mut ctx = context();

        run(&mut ctx, TestStep::Step(steps[1].clone()), Outcome::Passed, &sink);

        let (result, _) = ctx.finish(at(3)).unwrap();
        let attached = &result.steps[0].attachments;
        assert_eq!(attached.len(), 1);
        assert_eq!(attached[0].name, "Data table");
        assert_eq!(attached[0].mime_type, "text/tab-separated-values");
        assert_eq!(
            sink.attachment(&attached[0].source).as_deref(),
            Some(&b"x\ty\n1\t2\n"[..]),
        );
    }

    #[test]
    fn later_steps_are_skipped_after_ambiguous_one() {
        let (steps, _) = steps();
        let sink = Memory::new();
        let mut ctx = context();

        run(&mut ctx, TestStep::Step(steps[0].clone()), Outcome::Ambiguous(None), &sink);
        run(&mut ctx, TestStep::Step(steps[2].clone()), Outcome::Passed, &sink);

        let (result, _) = ctx.finish(at(3)).unwrap();
        assert_eq!(result.steps[0].status, None);
        assert_eq!(result.steps[1].status, Some(Status::Skipped));
        assert_eq!(result.status, Some(Status::Broken));
    }

    #[test]
    fn failed_after_hook_breaks_passed_scenario() {
        let (steps, _) = steps();
        let sink = Memory::new();
        let mut ctx = context();

        run(&mut ctx, TestStep::Step(steps[0].clone()), Outcome::Passed, &sink);
        run(
            &mut ctx,
            TestStep::Hook(Hook::after("cleanup")),
            Outcome::Failed(Cause::error("cleanup failed")),
            &sink,
        );

        let (result, container) = ctx.finish(at(3)).unwrap();
        assert_eq!(result.steps[0].status, Some(Status::Passed));
        assert_eq!(result.status, Some(Status::Broken));
        assert_eq!(
            result.status_details.and_then(|d| d.message).as_deref(),
            Some("cleanup failed"),
        );
        assert_eq!(container.afters[0].status, Some(Status::Broken));
        assert_eq!(container.afters[0].stage, Stage::Finished);
    }

    #[test]
    fn attachments_follow_open_node() {
        let (steps, _) = steps();
        let sink = Memory::new();
        let mut ctx = context();
        let step = TestStep::Step(steps[0].clone());

        _ = ctx.attach("before", "text/plain", b"1", &sink).unwrap();
        ctx.start_step(&step, at(1), &sink).unwrap();
        _ = ctx.attach("inside", "text/plain", b"2", &sink).unwrap();
        ctx.finish_step(&step, &Outcome::Passed, at(2)).unwrap();

        let (result, _) = ctx.finish(at(3)).unwrap();
        assert_eq!(result.attachments[0].name, "before");
        assert_eq!(result.steps[0].attachments[0].name, "inside");
    }

    #[test]
    fn rejects_protocol_violations() {
        let (steps, _) = steps();
        let sink = Memory::new();
        let mut ctx = context();
        let first = TestStep::Step(steps[0].clone());
        let second = TestStep::Step(steps[2].clone());

        assert!(matches!(
            ctx.finish_step(&first, &Outcome::Passed, at(1)),
            Err(ProtocolViolation::NoOpenStep { .. }),
        ));

        ctx.start_step(&first, at(1), &sink).unwrap();
        assert!(ctx.start_step(&second, at(1), &sink).is_err());
        assert!(matches!(
            ctx.finish_step(&second, &Outcome::Passed, at(2)),
            Err(ProtocolViolation::MismatchedStep { .. }),
        ));
        assert!(matches!(
            ctx.clone().finish(at(3)),
            Err(ProtocolViolation::UnclosedStep { .. }),
        ));
    }
}
