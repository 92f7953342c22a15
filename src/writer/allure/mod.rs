// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [Allure] report translator.
//!
//! The translation engine is organized into several focused modules:
//!
//! - [`writer`]: the [`Allure`] translator dispatching [`Lifecycle`] events;
//! - [`context`] and [`handlers`]: per-worker scenario records and their
//!   transitions;
//! - [`registry`]: worker to scenario mapping;
//! - [`status`], [`labels`], [`parameters`], [`naming`], [`hasher`] and
//!   [`attachment`]: pieces of a single record.
//!
//! [Allure]: https://allurereport.org
//! [`Lifecycle`]: crate::event::Lifecycle

pub mod attachment;
pub mod context;
pub mod handlers;
pub mod hasher;
pub mod labels;
pub mod naming;
pub mod parameters;
pub mod registry;
pub mod status;
pub mod writer;

pub use self::{
    context::{Node, ScenarioContext},
    registry::Registry,
    writer::Allure,
};
