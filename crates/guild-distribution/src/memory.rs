//! In-memory host.
//!
//! Keeps every table in ordered maps. Used by the unit tests and by
//! simulations that do not need persistence.

use std::collections::{BTreeMap, BTreeSet};

use guild_types::{AccountScope, Amount, BlockTimestamp, DistributionRecord, Member, Name, Pool};

use crate::host::{DistributionTables, ElectionOracle, Host, Ledger, MemberRegistry};
use crate::{DistributionError, Result};

/// A [`Host`] backed by ordered maps.
#[derive(Clone, Debug)]
pub struct MemoryHost {
    contract: Name,
    now: BlockTimestamp,
    next_election: Option<BlockTimestamp>,
    rank_levels: usize,
    members: BTreeMap<Name, u8>,
    pools: BTreeMap<Name, Pool>,
    records: BTreeMap<BlockTimestamp, DistributionRecord>,
    accounts: BTreeMap<AccountScope, BTreeMap<Name, Amount>>,
    points: BTreeSet<AccountScope>,
}

impl MemoryHost {
    /// An empty host whose swept funds are held by `contract`.
    pub fn new(contract: impl Into<Name>) -> Self {
        Self {
            contract: contract.into(),
            now: BlockTimestamp::default(),
            next_election: None,
            rank_levels: 0,
            members: BTreeMap::new(),
            pools: BTreeMap::new(),
            records: BTreeMap::new(),
            accounts: BTreeMap::new(),
            points: BTreeSet::new(),
        }
    }

    pub fn set_now(&mut self, now: BlockTimestamp) {
        self.now = now;
    }

    pub fn set_next_election(&mut self, next: Option<BlockTimestamp>) {
        self.next_election = next;
    }

    /// Report at least `levels` rank levels in the histogram.
    pub fn set_rank_levels(&mut self, levels: usize) {
        self.rank_levels = levels;
    }

    pub fn add_member(&mut self, account: impl Into<Name>, election_rank: u8) {
        self.members.insert(account.into(), election_rank);
    }

    /// Deposit into a pool's owned balance.
    pub fn fund_pool(&mut self, pool: impl Into<Name>, amount: Amount) -> Result<()> {
        self.credit(AccountScope::Owned, &pool.into(), amount)
    }

    /// Every account under `scope`.
    pub fn accounts_in(&self, scope: AccountScope) -> BTreeMap<Name, Amount> {
        self.accounts.get(&scope).cloned().unwrap_or_default()
    }

    /// Sum of every distribution-scope balance.
    pub fn distributed_total(&self) -> Amount {
        self.accounts
            .iter()
            .filter(|(scope, _)| scope.is_distribution())
            .flat_map(|(_, accounts)| accounts.values())
            .sum()
    }

    /// Run `f` and roll back every change it made if it fails.
    pub fn transact<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }
}

impl Ledger for MemoryHost {
    fn balance(&self, scope: AccountScope, owner: &Name) -> Result<Option<Amount>> {
        Ok(self
            .accounts
            .get(&scope)
            .and_then(|accounts| accounts.get(owner))
            .copied())
    }

    fn credit(&mut self, scope: AccountScope, owner: &Name, amount: Amount) -> Result<()> {
        let balance = self
            .accounts
            .entry(scope)
            .or_default()
            .entry(owner.clone())
            .or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(DistributionError::Overflow)?;
        if scope.is_distribution() {
            self.points.insert(scope);
        }
        Ok(())
    }

    fn debit(&mut self, scope: AccountScope, owner: &Name, amount: Amount) -> Result<()> {
        let available = self.balance(scope, owner)?.unwrap_or(0);
        if available < amount {
            return Err(DistributionError::InsufficientBalance {
                scope,
                owner: owner.clone(),
                needed: amount,
                available,
            });
        }
        if let Some(accounts) = self.accounts.get_mut(&scope) {
            if available == amount {
                accounts.remove(owner);
            } else {
                accounts.insert(owner.clone(), available - amount);
            }
            if accounts.is_empty() {
                self.accounts.remove(&scope);
            }
        }
        Ok(())
    }

    fn clear_scope(&mut self, scope: AccountScope) -> Result<()> {
        self.accounts.remove(&scope);
        Ok(())
    }

    fn scope_is_empty(&self, scope: AccountScope) -> Result<bool> {
        Ok(self
            .accounts
            .get(&scope)
            .map_or(true, BTreeMap::is_empty))
    }

    fn distribution_points(&self, limit: usize) -> Result<Vec<AccountScope>> {
        Ok(self.points.iter().take(limit).copied().collect())
    }

    fn erase_distribution_point(&mut self, scope: AccountScope) -> Result<()> {
        self.points.remove(&scope);
        Ok(())
    }
}

impl DistributionTables for MemoryHost {
    fn pools(&self) -> Result<Vec<Pool>> {
        Ok(self.pools.values().cloned().collect())
    }

    fn insert_pool(&mut self, pool: &Pool) -> Result<()> {
        if self.pools.contains_key(&pool.name) {
            return Err(DistributionError::Storage(format!(
                "pool {} already exists",
                pool.name
            )));
        }
        self.pools.insert(pool.name.clone(), pool.clone());
        Ok(())
    }

    fn clear_pools(&mut self) -> Result<()> {
        self.pools.clear();
        Ok(())
    }

    fn records(&self) -> Result<Vec<DistributionRecord>> {
        Ok(self.records.values().cloned().collect())
    }

    fn last_record(&self) -> Result<Option<DistributionRecord>> {
        Ok(self.records.values().next_back().cloned())
    }

    fn put_record(&mut self, record: &DistributionRecord) -> Result<()> {
        self.records
            .insert(record.distribution_time(), record.clone());
        Ok(())
    }

    fn erase_record(&mut self, distribution_time: BlockTimestamp) -> Result<()> {
        self.records.remove(&distribution_time);
        Ok(())
    }

    fn clear_records(&mut self) -> Result<()> {
        self.records.clear();
        Ok(())
    }
}

impl MemberRegistry for MemoryHost {
    fn rank_histogram(&self) -> Result<Vec<u16>> {
        let top = self.members.values().copied().max().unwrap_or(0);
        let levels = self.rank_levels.max(usize::from(top));
        let mut ranks = vec![0u16; levels + 1];
        for &rank in self.members.values() {
            let count = &mut ranks[usize::from(rank)];
            *count = count.checked_add(1).ok_or(DistributionError::Overflow)?;
        }
        Ok(ranks)
    }

    fn members_after(&self, cursor: &Name, limit: usize) -> Result<Vec<Member>> {
        use std::ops::Bound;

        Ok(self
            .members
            .range((Bound::Excluded(cursor), Bound::Unbounded))
            .take(limit)
            .map(|(account, &election_rank)| Member {
                account: account.clone(),
                election_rank,
            })
            .collect())
    }
}

impl ElectionOracle for MemoryHost {
    fn next_election_time(&self) -> Result<Option<BlockTimestamp>> {
        Ok(self.next_election)
    }
}

impl Host for MemoryHost {
    fn now(&self) -> BlockTimestamp {
        self.now
    }

    fn contract(&self) -> &Name {
        &self.contract
    }
}
