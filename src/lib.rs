// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [Allure] report model for [Cucumber] executions.
//!
//! Translates the ordered stream of [`Lifecycle`] events emitted by a
//! Gherkin executor into [Allure] test results: one [`TestResult`] per
//! executed scenario with its steps, attachments, labels, links and
//! parameters, and one [`TestResultContainer`] holding its hooks. Finalized
//! records are handed over to a [`Sink`].
//!
//! ```rust
//! use cucumber_allure::{event::Source, Allure, Event, Lifecycle, Memory};
//!
//! let feature = gherkin::Feature::parse(
//!     "Feature: Simple\n  Scenario: Add\n    Given a is 5\n",
//!     gherkin::GherkinEnv::default(),
//! )
//! .unwrap();
//! let scenario = Source::new(feature.scenarios[0].clone());
//! let step = Source::new(scenario.steps[0].clone());
//!
//! let allure = Allure::new(Memory::new());
//! for ev in [
//!     Lifecycle::case_started(Source::new(feature), None, scenario),
//!     Lifecycle::step_started(step.clone()),
//!     Lifecycle::step_finished(step, cucumber_allure::event::Outcome::Passed),
//!     Lifecycle::TestCaseFinished,
//! ] {
//!     allure.handle_event(Event::new(0, ev)).unwrap();
//! }
//!
//! assert_eq!(allure.sink().results()[0].steps[0].name, "Given  a is 5");
//! ```
//!
//! [Allure]: https://allurereport.org
//! [Cucumber]: https://cucumber.io

pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod feature;
pub mod model;
pub mod writer;

pub use gherkin;

#[doc(inline)]
pub use self::{
    config::{Config, NamingStrategy},
    error::{Error, Result},
    event::{Event, Lifecycle},
    feature::Ext as FeatureExt,
    model::{Status, TestResult, TestResultContainer},
    writer::{Allure, Memory, Sink},
};
