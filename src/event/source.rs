// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Shared [`gherkin`] AST nodes carried by events.

use std::sync::Arc;

use derive_more::with_trait::{AsRef, Debug, Deref, From};

/// [`gherkin`] AST node ([`gherkin::Feature`], [`gherkin::Scenario`],
/// [`gherkin::Step`], etc.) shared between the executor and every event
/// mentioning it.
///
/// Two [`Source`]s are equal only when they point to the same node, so an
/// expanded outline instance never equals its sibling with the same text.
#[derive(AsRef, Debug, Deref, From)]
#[as_ref(forward)]
#[debug("{:?}", **_0)]
#[debug(bound(T: std::fmt::Debug))]
#[deref(forward)]
pub struct Source<T: ?Sized>(Arc<T>);

impl<T> Source<T> {
    /// Moves the given AST node into a new [`Source`].
    #[must_use]
    pub fn new(node: T) -> Self {
        Self(Arc::new(node))
    }
}

impl<T: ?Sized> Source<T> {
    /// Returns the number of [`Source`]s pointing to the same AST node.
    #[must_use]
    pub fn shares(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl<T: ?Sized> Clone for Source<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> PartialEq for Source<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ?Sized> Eq for Source<T> {}
