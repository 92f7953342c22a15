// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Core [Allure] translator implementation.
//!
//! [Allure]: https://allurereport.org

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    process,
};

use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
    config::Config,
    error::{Error, ProtocolViolation, Result},
    event::{Event, Lifecycle, Metadata, TestCase, WorkerId},
    model::{millis, Stage, TestResult, TestResultContainer},
    writer::Sink,
};

use super::{
    attachment,
    context::ScenarioContext,
    hasher, labels, naming, parameters,
    registry::Registry,
};

/// Translator of executor [`Lifecycle`] events into [Allure] report records.
///
/// Events of different workers may be handled concurrently through a shared
/// reference: each worker's scenario is tracked separately. Finalized records
/// are handed over to the [`Sink`].
///
/// [Allure]: https://allurereport.org
#[derive(Debug)]
pub struct Allure<S> {
    /// [`Config`] of this translator.
    config: Config,

    /// Resolved host name.
    host: String,

    /// Active scenarios of workers.
    registry: Registry,

    /// Raw texts of `.feature` files by their paths.
    sources: RwLock<HashMap<PathBuf, String>>,

    /// Receiver of finalized records.
    sink: S,
}

impl<S: Sink> Allure<S> {
    /// Creates a new [`Allure`] translator handing records over to the given
    /// [`Sink`].
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, Config::default())
    }

    /// Creates a new [`Allure`] translator with the given [`Config`].
    #[must_use]
    pub fn with_config(sink: S, config: Config) -> Self {
        let host = config.host_name();
        Self {
            config,
            host,
            registry: Registry::new(),
            sources: RwLock::new(HashMap::new()),
            sink,
        }
    }

    /// Returns the [`Config`] of this translator.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the [`Sink`] of this translator.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the number of scenarios being run right now.
    #[must_use]
    pub fn active(&self) -> usize {
        self.registry.len()
    }

    /// Handles the given [`Lifecycle`] event.
    ///
    /// # Errors
    ///
    /// - [`Error::Protocol`] if the event isn't allowed in the worker's
    ///   current state. Unless it's a [`ProtocolViolation::NotFound`], the
    ///   worker's scenario is discarded.
    /// - [`Error::Attachment`] if attachment content cannot be stored. The
    ///   worker's scenario is discarded.
    /// - [`Error::Sink`] if a finalized scenario cannot be handed over.
    pub fn handle_event(&self, event: Event<Lifecycle>) -> Result<()> {
        let (ev, meta) = event.split();
        match ev {
            Lifecycle::SourceRead { path, text } => {
                _ = self.sources.write().insert(path, text);
                Ok(())
            }
            Lifecycle::TestCaseStarted(case) => self.start_case(&case, meta),
            Lifecycle::TestStepStarted(step) => {
                self.with_context(meta.worker, |ctx| {
                    ctx.start_step(&step, meta.at, &self.sink)
                })
            }
            Lifecycle::TestStepFinished(step, outcome) => {
                self.with_context(meta.worker, |ctx| {
                    Ok(ctx.finish_step(&step, &outcome, meta.at)?)
                })
            }
            Lifecycle::Embed(emb) => self.with_context(meta.worker, |ctx| {
                ctx.attach(&emb.name, &emb.mime_type, &emb.content, &self.sink)
                    .map(drop)
            }),
            Lifecycle::Write(text) => self.with_context(meta.worker, |ctx| {
                ctx.attach(
                    attachment::TEXT_OUTPUT,
                    "text/plain",
                    text.as_bytes(),
                    &self.sink,
                )
                .map(drop)
            }),
            Lifecycle::TestCaseFinished => self.finish_case(meta),
        }
    }

    /// Begins a new scenario on the worker.
    fn start_case(&self, case: &TestCase, meta: Metadata) -> Result<()> {
        let context = self.build_context(case, meta);
        let (name, history_id) =
            (context.result().name.clone(), context.result().history_id.clone());

        if let Err(e) = self.registry.begin(context) {
            _ = self.registry.abort(meta.worker);
            tracing::error!(
                worker = %meta.worker,
                error = %e,
                "scenario context aborted"
            );
            return Err(e.into());
        }
        tracing::debug!(
            worker = %meta.worker,
            %name,
            %history_id,
            "scenario started"
        );
        Ok(())
    }

    /// Finalizes the worker's scenario and hands it over to the [`Sink`].
    fn finish_case(&self, meta: Metadata) -> Result<()> {
        let context = self.registry.end(meta.worker)?;
        let (result, container) = context.finish(meta.at).map_err(|e| {
            tracing::error!(
                worker = %meta.worker,
                error = %e,
                "scenario context aborted"
            );
            Error::from(e)
        })?;

        tracing::debug!(
            worker = %meta.worker,
            name = %result.name,
            history_id = %result.history_id,
            status = ?result.status,
            "scenario finished"
        );
        self.sink
            .write_result(result, container)
            .map_err(|source| Error::Sink { worker: meta.worker, source })
    }

    /// Runs the given function on the worker's active [`ScenarioContext`],
    /// discarding it on any error but [`ProtocolViolation::NotFound`].
    fn with_context(
        &self,
        worker: WorkerId,
        f: impl FnOnce(&mut ScenarioContext) -> Result<()>,
    ) -> Result<()> {
        let handle = self.registry.current(worker)?;
        let res = f(&mut handle.lock());
        drop(handle);

        res.map_err(|e| {
            if !matches!(e, Error::Protocol(ProtocolViolation::NotFound { .. })) {
                _ = self.registry.abort(worker);
                tracing::error!(
                    worker = %worker,
                    error = %e,
                    "scenario context aborted"
                );
            }
            e
        })
    }

    /// Builds a [`ScenarioContext`] of the given [`TestCase`].
    fn build_context(&self, case: &TestCase, meta: Metadata) -> ScenarioContext {
        let feature = &*case.feature;
        let scenario = &*case.scenario;

        let path = feature
            .path
            .as_deref()
            .map(naming::normalize_path)
            .unwrap_or_default();
        let line = scenario.position.line;
        let params = parameters::extract(scenario);
        let history_id = hasher::history_id(
            &path,
            &format!("{line}:{}", scenario.name),
            &params,
        );

        let description = {
            let sources = self.sources.read();
            let source = feature
                .path
                .as_deref()
                .and_then(|p| lookup(&sources, p));
            naming::description(feature, scenario, source)
        };

        let thread = format!("{}@{}.{}", process::id(), self.host, meta.worker);
        let extracted = labels::extract(
            case,
            labels::Origin { path: &path, host: &self.host, thread: &thread },
            &self.config.links,
            &self.config.labels,
        );

        let start = Some(millis(meta.at));
        let result = TestResult {
            uuid: Uuid::new_v4().to_string(),
            history_id,
            name: scenario.name.clone(),
            full_name: naming::full_name(&path, line),
            description,
            status: None,
            status_details: None,
            stage: Stage::Running,
            start,
            stop: None,
            steps: vec![],
            attachments: vec![],
            labels: extracted.labels,
            links: extracted.links,
            parameters: params,
        };
        let container = TestResultContainer {
            uuid: Uuid::new_v4().to_string(),
            children: vec![result.uuid.clone()],
            befores: vec![],
            afters: vec![],
            start,
            stop: None,
        };

        let mut context = ScenarioContext::new(
            meta.worker,
            self.config.naming,
            result,
            container,
            extracted.flags,
        );
        for step in case.background_steps() {
            context.schedule(step);
        }
        context
    }
}

/// Looks up the cached raw text of the `.feature` file at the given `path`,
/// comparing normalized paths if there is no exact match.
fn lookup<'s>(sources: &'s HashMap<PathBuf, String>, path: &Path) -> Option<&'s str> {
    sources
        .get(path)
        .or_else(|| {
            let wanted = naming::normalize_path(path);
            sources
                .iter()
                .find(|(p, _)| naming::normalize_path(p) == wanted)
                .map(|(_, text)| text)
        })
        .map(String::as_str)
}
