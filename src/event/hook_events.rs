// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Hook-related events and types.

use derive_more::with_trait::Display;

/// Type of hook executed before or after all [`Scenario`]'s [`Step`]s.
///
/// [`Scenario`]: gherkin::Scenario
/// [`Step`]: gherkin::Step
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("{self:?}")]
pub enum HookType {
    /// Executing on each [`Scenario`] before running all [`Step`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    /// [`Step`]: gherkin::Step
    Before,

    /// Executing on each [`Scenario`] after running all [`Step`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    /// [`Step`]: gherkin::Step
    After,
}

/// [`Before`] or [`After`] hook being run by an executor.
///
/// [`After`]: HookType::After
/// [`Before`]: HookType::Before
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
#[display("{ty} hook `{name}`")]
pub struct Hook {
    /// [`HookType`] of this [`Hook`].
    pub ty: HookType,

    /// Name of the code location implementing this [`Hook`], if known.
    pub name: String,
}

impl Hook {
    /// Creates a new [`Hook`] of the given [`HookType`] named after its code
    /// location.
    #[must_use]
    pub fn new(ty: HookType, name: impl Into<String>) -> Self {
        Self { ty, name: name.into() }
    }

    /// Creates a new [`HookType::Before`] [`Hook`].
    #[must_use]
    pub fn before(name: impl Into<String>) -> Self {
        Self::new(HookType::Before, name)
    }

    /// Creates a new [`HookType::After`] [`Hook`].
    #[must_use]
    pub fn after(name: impl Into<String>) -> Self {
        Self::new(HookType::After, name)
    }
}
