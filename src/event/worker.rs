// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Identity of an executor worker.

use derive_more::with_trait::{Display, From, Into};

/// Identifier of an independent executor worker, running at most one
/// [`Scenario`] at a time.
///
/// Every [`Event`] is tagged with the [`WorkerId`] that emitted it, so events
/// of concurrently running [`Scenario`]s may be demultiplexed.
///
/// [`Event`]: super::Event
/// [`Scenario`]: gherkin::Scenario
#[derive(
    Clone, Copy, Debug, Display, Eq, From, Hash, Into, Ord, PartialEq, PartialOrd,
)]
#[display("worker-{_0}")]
pub struct WorkerId(pub usize);

impl WorkerId {
    /// Returns the numeric index of this [`WorkerId`].
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}
