// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Key occurrences in a lifecycle of a [Cucumber] execution, as observed by
//! the report translator.
//!
//! The top-level enum here is [`Lifecycle`], wrapped into an [`Event`] which
//! tells when it happened and which worker emitted it.
//!
//! [Cucumber]: https://cucumber.io

// Core modules
pub mod event_struct;
pub mod source;
pub mod worker;

// Event type modules
pub mod hook_events;
pub mod lifecycle;
pub mod step_events;

// Re-export public API
pub use event_struct::{Event, Metadata};
pub use hook_events::{Hook, HookType};
pub use lifecycle::{Embedding, Lifecycle, TestCase, TestStep};
pub use source::Source;
pub use step_events::{coerce_error, Cause, CauseKind, Info, Outcome};
pub use worker::WorkerId;
