//! Scoped undo sessions.
//!
//! ```ignore
//! let mut session = Session::begin(&mut store);
//! session.modify::<Account>(id, |a| a.name = "alice".into())?;
//! session.commit()?;
//! ```
//!
//! A session dropped without [`Session::commit`] is rolled back.

use crate::error::StoreError;
use crate::UndoableStore;
use std::ops::{Deref, DerefMut};

pub struct Session<'a, S: UndoableStore> {
    store: &'a mut S,
    open: bool,
}

impl<'a, S: UndoableStore> Session<'a, S> {
    pub fn begin(store: &'a mut S) -> Self {
        store.begin_session();
        Self { store, open: true }
    }

    pub fn commit(mut self) -> Result<(), StoreError> {
        self.open = false;
        self.store.commit_session()
    }

    pub fn rollback(mut self) -> Result<(), StoreError> {
        self.open = false;
        self.store.rollback_session()
    }
}

impl<S: UndoableStore> Deref for Session<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.store
    }
}

impl<S: UndoableStore> DerefMut for Session<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.store
    }
}

impl<S: UndoableStore> Drop for Session<'_, S> {
    fn drop(&mut self) {
        if self.open {
            if let Err(e) = self.store.rollback_session() {
                tracing::warn!(error = %e, "dropped session could not be rolled back");
            }
        }
    }
}
