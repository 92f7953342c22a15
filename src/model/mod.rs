// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [Allure] report model.
//!
//! Every type here is [`Serialize`]able in the shape [Allure] expects its
//! `*-result.json` and `*-container.json` files to have, so a [`Sink`] may
//! persist them as is.
//!
//! [`Serialize`]: serde::Serialize
//! [`Sink`]: crate::Sink
//! [Allure]: https://allurereport.org

pub mod result;
pub mod status;

pub use self::{
    result::{
        millis, Attachment, FixtureResult, Label, Link, Parameter, StepResult,
        TestResult, TestResultContainer,
    },
    status::{Stage, Status, StatusDetails},
};
