// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error handling types of the crate, organized by error domain.
//!
//! # Modules
//!
//! - [`core`] - Main [`Error`] type
//! - [`protocol`] - Violations of the executor's event protocol
//! - [`config`] - Configuration and validation errors

pub mod config;
pub mod core;
pub mod protocol;

pub use self::{
    config::{ConfigError, ConfigResult},
    core::{Error, Result},
    protocol::ProtocolViolation,
};
