//! The initial ledger: reserved assets, funded accounts and block producers.

use crate::ChainError;
use duo_store::{Account, AccountStatistics, Asset, Membership, MemoryStore, ObjectStore, Witness};
use duo_types::{AccountId, AssetAmount, ShareType, Timestamp, MAX_SHARE_SUPPLY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

/// Name of the committee account, always account 0 and issuer of CORE and SDR.
pub const COMMITTEE_ACCOUNT_NAME: &str = "committee-account";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAccount {
    pub name: String,
    #[serde(default)]
    pub core_balance: ShareType,
    #[serde(default)]
    pub sdr_balance: ShareType,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisState {
    pub initial_timestamp: Timestamp,
    pub core_max_supply: ShareType,
    /// Account names that produce blocks, in witness id order.
    pub witnesses: Vec<String>,
    pub accounts: Vec<GenesisAccount>,
}

impl Default for GenesisState {
    fn default() -> Self {
        Self {
            initial_timestamp: Timestamp::EPOCH,
            core_max_supply: MAX_SHARE_SUPPLY,
            witnesses: Vec::new(),
            accounts: Vec::new(),
        }
    }
}

impl GenesisState {
    /// Build the initial store.
    ///
    /// The committee account is created first, then CORE and SDR, then the
    /// listed accounts and witnesses. The first block after genesis runs
    /// maintenance.
    pub fn build(&self) -> Result<MemoryStore, ChainError> {
        self.check()?;
        let mut store = MemoryStore::new();

        let committee = create_account(&mut store, COMMITTEE_ACCOUNT_NAME, 0, 0)?;
        debug_assert_eq!(committee, AccountId::COMMITTEE);

        let core_supply: ShareType = self.accounts.iter().map(|a| a.core_balance).sum();
        let sdr_supply: ShareType = self.accounts.iter().map(|a| a.sdr_balance).sum();
        for (symbol, max_supply, current_supply) in [
            ("CORE", self.core_max_supply, core_supply),
            ("SDR", MAX_SHARE_SUPPLY, sdr_supply),
        ] {
            store.create(|id| Asset {
                id,
                symbol: symbol.into(),
                precision: 5,
                issuer: committee,
                max_supply,
                current_supply,
                override_authority: false,
            });
        }

        for account in &self.accounts {
            create_account(&mut store, &account.name, account.core_balance, account.sdr_balance)?;
        }

        for name in &self.witnesses {
            let witness_account = store
                .find_account_by_name(name)
                .map(|a| a.id)
                .ok_or_else(|| ChainError::Genesis(format!("witness account {name:?} is not defined")))?;
            store.create(|id| Witness {
                id,
                witness_account,
                pay_vb: None,
                total_produced: 0,
            });
        }

        let time = self.initial_timestamp;
        store.modify_dynamic_properties(|d| {
            d.head_block_time = time;
            d.next_maintenance_time = time;
        });

        info!(
            accounts = self.accounts.len(),
            witnesses = self.witnesses.len(),
            time = %time,
            "genesis state built"
        );
        Ok(store)
    }

    fn check(&self) -> Result<(), ChainError> {
        if self.core_max_supply <= 0 || self.core_max_supply > MAX_SHARE_SUPPLY {
            return Err(ChainError::Genesis("core max supply out of range".into()));
        }
        let mut names = BTreeSet::from([COMMITTEE_ACCOUNT_NAME]);
        let mut core: ShareType = 0;
        let mut sdr: ShareType = 0;
        for account in &self.accounts {
            if !names.insert(account.name.as_str()) {
                return Err(ChainError::Genesis(format!("duplicate account {:?}", account.name)));
            }
            if account.core_balance < 0 || account.sdr_balance < 0 {
                return Err(ChainError::Genesis(format!("negative balance for {:?}", account.name)));
            }
            core = core
                .checked_add(account.core_balance)
                .ok_or_else(|| ChainError::Genesis("core supply overflow".into()))?;
            sdr = sdr
                .checked_add(account.sdr_balance)
                .ok_or_else(|| ChainError::Genesis("sdr supply overflow".into()))?;
        }
        if core > self.core_max_supply {
            return Err(ChainError::Genesis("initial balances exceed core max supply".into()));
        }
        if sdr > MAX_SHARE_SUPPLY {
            return Err(ChainError::Genesis("initial balances exceed sdr max supply".into()));
        }
        Ok(())
    }
}

fn create_account(
    store: &mut MemoryStore,
    name: &str,
    core: ShareType,
    sdr: ShareType,
) -> Result<AccountId, ChainError> {
    let owner = AccountId::new(store.count::<Account>() as u64);
    let statistics = store.create(|id| AccountStatistics::new(id, owner));
    for delta in [AssetAmount::core(core), AssetAmount::sdr(sdr)] {
        store.try_modify::<AccountStatistics, (), ChainError>(statistics, |s| {
            s.adjust_balance(delta).map_err(Into::into)
        })?;
    }
    Ok(store.create(|id| Account {
        id,
        name: name.into(),
        statistics,
        membership: Membership::Basic,
    }))
}
