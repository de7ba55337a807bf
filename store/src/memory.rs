//! In-memory object store with nested undo sessions.

use crate::error::StoreError;
use crate::objects::{GlobalDynamicProperties, ReserveFund};
use crate::table::{StoredObject, Tables};
use crate::{ObjectStore, UndoableStore};
use std::fmt;

#[derive(Clone, Debug, Default)]
struct State {
    tables: Tables,
    dynamic: GlobalDynamicProperties,
    reserve: ReserveFund,
}

/// Restores one piece of state to what it was before a change.
type UndoEntry = Box<dyn FnOnce(&mut State)>;

/// BTreeMap-backed tables with sequential ids and an undo log.
///
/// Changes made while no session is open are permanent.
#[derive(Default)]
pub struct MemoryStore {
    state: State,
    sessions: Vec<Vec<UndoEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects of type `T`.
    pub fn count<T: StoredObject>(&self) -> usize {
        T::table(&self.state.tables).objects.len()
    }

    fn record(&mut self, entry: UndoEntry) {
        if let Some(session) = self.sessions.last_mut() {
            session.push(entry);
        }
    }

    fn restore<T: StoredObject>(id: T::Id, previous: T) -> UndoEntry {
        Box::new(move |state: &mut State| {
            T::table_mut(&mut state.tables).objects.insert(id, previous);
        })
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("state", &self.state)
            .field("session_depth", &self.sessions.len())
            .finish()
    }
}

impl ObjectStore for MemoryStore {
    fn find<T: StoredObject>(&self, id: T::Id) -> Option<&T> {
        T::table(&self.state.tables).objects.get(&id)
    }

    fn create<T: StoredObject>(&mut self, constructor: impl FnOnce(T::Id) -> T) -> T::Id {
        let table = T::table_mut(&mut self.state.tables);
        let instance = table.next_instance;
        let id = T::Id::from(instance);
        let object = constructor(id);
        debug_assert_eq!(object.id(), id);
        table.objects.insert(id, object);
        table.next_instance = instance + 1;

        self.record(Box::new(move |state: &mut State| {
            let table = T::table_mut(&mut state.tables);
            table.objects.remove(&id);
            table.next_instance = instance;
        }));
        id
    }

    fn modify<T: StoredObject>(
        &mut self,
        id: T::Id,
        patch: impl FnOnce(&mut T),
    ) -> Result<(), StoreError> {
        let object = T::table_mut(&mut self.state.tables)
            .objects
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.into()))?;
        let previous = object.clone();
        patch(object);
        self.record(Self::restore(id, previous));
        Ok(())
    }

    fn try_modify<T, R, E>(
        &mut self,
        id: T::Id,
        patch: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Result<R, E>
    where
        T: StoredObject,
        E: From<StoreError>,
    {
        let previous = self.get::<T>(id)?.clone();
        let mut draft = previous.clone();
        let out = patch(&mut draft)?;
        T::table_mut(&mut self.state.tables).objects.insert(id, draft);
        self.record(Self::restore(id, previous));
        Ok(out)
    }

    fn remove<T: StoredObject>(&mut self, id: T::Id) -> Result<T, StoreError> {
        let removed = T::table_mut(&mut self.state.tables)
            .objects
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound(id.into()))?;
        self.record(Self::restore(id, removed.clone()));
        Ok(removed)
    }

    fn ids<T: StoredObject>(&self) -> Vec<T::Id> {
        T::table(&self.state.tables).objects.keys().copied().collect()
    }

    fn dynamic_properties(&self) -> &GlobalDynamicProperties {
        &self.state.dynamic
    }

    fn modify_dynamic_properties(&mut self, patch: impl FnOnce(&mut GlobalDynamicProperties)) {
        let previous = self.state.dynamic.clone();
        patch(&mut self.state.dynamic);
        self.record(Box::new(move |state: &mut State| state.dynamic = previous));
    }

    fn reserve_fund(&self) -> &ReserveFund {
        &self.state.reserve
    }

    fn modify_reserve_fund(&mut self, patch: impl FnOnce(&mut ReserveFund)) {
        let previous = self.state.reserve.clone();
        patch(&mut self.state.reserve);
        self.record(Box::new(move |state: &mut State| state.reserve = previous));
    }
}

impl UndoableStore for MemoryStore {
    fn begin_session(&mut self) {
        self.sessions.push(Vec::new());
    }

    fn commit_session(&mut self) -> Result<(), StoreError> {
        let entries = self.sessions.pop().ok_or(StoreError::NoActiveSession)?;
        if let Some(parent) = self.sessions.last_mut() {
            parent.extend(entries);
        }
        Ok(())
    }

    fn rollback_session(&mut self) -> Result<(), StoreError> {
        let entries = self.sessions.pop().ok_or(StoreError::NoActiveSession)?;
        tracing::trace!(changes = entries.len(), depth = self.sessions.len(), "rolling back session");
        for undo in entries.into_iter().rev() {
            undo(&mut self.state);
        }
        Ok(())
    }

    fn session_depth(&self) -> usize {
        self.sessions.len()
    }
}
