// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Registry of in-flight [`ScenarioContext`]s, one per worker.

use std::{
    collections::{hash_map::Entry, HashMap},
    sync::Arc,
};

use parking_lot::{Mutex, RwLock};

use crate::{error::ProtocolViolation, event::WorkerId};

use super::context::ScenarioContext;

/// Shared handle to a [`ScenarioContext`].
pub type Handle = Arc<Mutex<ScenarioContext>>;

/// Concurrency-safe mapping of workers onto their active
/// [`ScenarioContext`]s.
///
/// The map itself is locked only to look up, insert or remove a [`Handle`],
/// so unrelated workers never wait on each other's scenarios.
#[derive(Debug, Default)]
pub struct Registry {
    /// Active [`ScenarioContext`]s by their workers.
    contexts: RwLock<HashMap<WorkerId, Handle>>,
}

impl Registry {
    /// Creates a new empty [`Registry`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the given [`ScenarioContext`] as the active one of its
    /// worker.
    ///
    /// # Errors
    ///
    /// [`ProtocolViolation::AlreadyActive`] if the worker has an active
    /// [`ScenarioContext`] already. The active one is left untouched.
    pub fn begin(
        &self,
        context: ScenarioContext,
    ) -> Result<Handle, ProtocolViolation> {
        let worker = context.worker();
        match self.contexts.write().entry(worker) {
            Entry::Occupied(active) => Err(ProtocolViolation::AlreadyActive {
                worker,
                active: active.get().lock().result().name.clone(),
            }),
            Entry::Vacant(slot) => {
                Ok(Arc::clone(slot.insert(Arc::new(Mutex::new(context)))))
            }
        }
    }

    /// Returns the [`Handle`] of the worker's active [`ScenarioContext`].
    ///
    /// # Errors
    ///
    /// [`ProtocolViolation::NotFound`] if the worker has none.
    pub fn current(&self, worker: WorkerId) -> Result<Handle, ProtocolViolation> {
        self.contexts
            .read()
            .get(&worker)
            .cloned()
            .ok_or(ProtocolViolation::NotFound { worker })
    }

    /// Removes the worker's active [`ScenarioContext`] and returns it.
    ///
    /// # Errors
    ///
    /// [`ProtocolViolation::NotFound`] if the worker has none.
    pub fn end(
        &self,
        worker: WorkerId,
    ) -> Result<ScenarioContext, ProtocolViolation> {
        let handle = self
            .contexts
            .write()
            .remove(&worker)
            .ok_or(ProtocolViolation::NotFound { worker })?;

        // Only the owning worker clones handles, and only for the duration
        // of a single event.
        Ok(Arc::try_unwrap(handle)
            .map_or_else(|shared| shared.lock().clone(), Mutex::into_inner))
    }

    /// Discards the worker's active [`ScenarioContext`], if any.
    pub fn abort(&self, worker: WorkerId) -> Option<Handle> {
        self.contexts.write().remove(&worker)
    }

    /// Returns the number of active [`ScenarioContext`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.read().len()
    }

    /// Indicates whether there are no active [`ScenarioContext`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.read().is_empty()
    }
}
