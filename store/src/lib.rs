//! Ledger object store.
//!
//! The evaluator, vesting and budget engines depend only on the
//! [`ObjectStore`] and [`UndoableStore`] traits. [`MemoryStore`] is the
//! in-memory implementation with nested undo sessions that every node and
//! test uses.

pub mod account;
pub mod error;
pub mod memory;
pub mod objects;
pub mod session;
pub mod table;

pub use account::{Account, AccountStatistics, Membership};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use objects::{Asset, GlobalDynamicProperties, ReserveFund, Witness};
pub use session::Session;
pub use table::{StoredObject, Table, Tables};

/// Keyed lookup, creation, modification and removal of ledger entities.
///
/// Every call is all-or-nothing: a failed call leaves the store unchanged.
pub trait ObjectStore {
    fn find<T: StoredObject>(&self, id: T::Id) -> Option<&T>;

    fn get<T: StoredObject>(&self, id: T::Id) -> Result<&T, StoreError> {
        self.find(id).ok_or_else(|| StoreError::NotFound(id.into()))
    }

    fn exists<T: StoredObject>(&self, id: T::Id) -> bool {
        self.find::<T>(id).is_some()
    }

    /// Allocate the next id of `T` and store what `constructor` builds for it.
    fn create<T: StoredObject>(&mut self, constructor: impl FnOnce(T::Id) -> T) -> T::Id;

    fn modify<T: StoredObject>(
        &mut self,
        id: T::Id,
        patch: impl FnOnce(&mut T),
    ) -> Result<(), StoreError>;

    /// Copy-on-write modification: `patch` runs on a clone that replaces the
    /// stored object only if it returns `Ok`.
    fn try_modify<T, R, E>(
        &mut self,
        id: T::Id,
        patch: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Result<R, E>
    where
        T: StoredObject,
        E: From<StoreError>;

    fn remove<T: StoredObject>(&mut self, id: T::Id) -> Result<T, StoreError>;

    /// Every stored id of `T`, ascending.
    fn ids<T: StoredObject>(&self) -> Vec<T::Id>;

    fn dynamic_properties(&self) -> &GlobalDynamicProperties;

    fn modify_dynamic_properties(&mut self, patch: impl FnOnce(&mut GlobalDynamicProperties));

    fn reserve_fund(&self) -> &ReserveFund;

    fn modify_reserve_fund(&mut self, patch: impl FnOnce(&mut ReserveFund));

    /// Statistics record of `account`.
    fn account_statistics(&self, account: duo_types::AccountId) -> Result<&AccountStatistics, StoreError> {
        let stats_id = self.get::<Account>(account)?.statistics;
        self.get(stats_id)
    }

    fn find_account_by_name(&self, name: &str) -> Option<&Account> {
        self.ids::<Account>()
            .into_iter()
            .filter_map(|id| self.find::<Account>(id))
            .find(|a| a.name == name)
    }

    fn find_asset_by_symbol(&self, symbol: &str) -> Option<&Asset> {
        self.ids::<Asset>()
            .into_iter()
            .filter_map(|id| self.find::<Asset>(id))
            .find(|a| a.symbol == symbol)
    }
}

/// An [`ObjectStore`] whose changes can be grouped into nested sessions.
pub trait UndoableStore: ObjectStore {
    fn begin_session(&mut self);

    /// Keep the changes of the innermost session, folding them into the
    /// enclosing session if there is one.
    fn commit_session(&mut self) -> Result<(), StoreError>;

    /// Undo every change made since the innermost session began, including
    /// created and removed objects, singletons and id counters.
    fn rollback_session(&mut self) -> Result<(), StoreError>;

    fn session_depth(&self) -> usize;
}
