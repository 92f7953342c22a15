// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Persistence seam of finalized report records.

use std::{collections::HashMap, io, sync::Arc};

use parking_lot::Mutex;

use crate::model::{TestResult, TestResultContainer};

/// Receiver of finalized report records and raw attachment content.
///
/// Called concurrently from every worker, so records may arrive in any
/// relative order.
pub trait Sink: Send + Sync {
    /// Stores the raw `content` of an attachment under the given generated
    /// `source` identifier.
    ///
    /// # Errors
    ///
    /// If the content cannot be stored. The scenario the attachment belongs to
    /// is aborted then.
    fn write_attachment(&self, source: &str, content: &[u8]) -> io::Result<()>;

    /// Stores a finalized [`TestResult`] along with its
    /// [`TestResultContainer`].
    ///
    /// # Errors
    ///
    /// If the records cannot be stored.
    fn write_result(
        &self,
        result: TestResult,
        container: TestResultContainer,
    ) -> io::Result<()>;
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn write_attachment(&self, source: &str, content: &[u8]) -> io::Result<()> {
        (**self).write_attachment(source, content)
    }

    fn write_result(
        &self,
        result: TestResult,
        container: TestResultContainer,
    ) -> io::Result<()> {
        (**self).write_result(result, container)
    }
}

/// [`Sink`] keeping everything in memory.
#[derive(Debug, Default)]
pub struct Memory {
    /// Received [`TestResult`]s with their [`TestResultContainer`]s, in
    /// arrival order.
    results: Mutex<Vec<(TestResult, TestResultContainer)>>,

    /// Received attachment contents by their source identifiers.
    attachments: Mutex<HashMap<String, Vec<u8>>>,
}

impl Memory {
    /// Creates a new empty [`Memory`] sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all the [`TestResult`]s received so far, in arrival order.
    #[must_use]
    pub fn results(&self) -> Vec<TestResult> {
        self.results.lock().iter().map(|(r, _)| r.clone()).collect()
    }

    /// Returns all the [`TestResultContainer`]s received so far, in arrival
    /// order.
    #[must_use]
    pub fn containers(&self) -> Vec<TestResultContainer> {
        self.results.lock().iter().map(|(_, c)| c.clone()).collect()
    }

    /// Returns the content stored under the given `source` identifier.
    #[must_use]
    pub fn attachment(&self, source: &str) -> Option<Vec<u8>> {
        self.attachments.lock().get(source).cloned()
    }

    /// Returns the number of stored attachments.
    #[must_use]
    pub fn attachments_count(&self) -> usize {
        self.attachments.lock().len()
    }
}

impl Sink for Memory {
    fn write_attachment(&self, source: &str, content: &[u8]) -> io::Result<()> {
        let mut attachments = self.attachments.lock();
        if attachments.contains_key(source) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("attachment `{source}` is already stored"),
            ));
        }
        _ = attachments.insert(source.to_owned(), content.to_vec());
        Ok(())
    }

    fn write_result(
        &self,
        result: TestResult,
        container: TestResultContainer,
    ) -> io::Result<()> {
        self.results.lock().push((result, container));
        Ok(())
    }
}
