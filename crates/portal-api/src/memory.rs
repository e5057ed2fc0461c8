//! In-memory implementation of the account API.
//!
//! Behaves like a json-server instance: exact-match filtering, numeric ids
//! assigned on create, `201` for creates, `404` for unknown ids, shallow
//! merge on `PATCH`. Individual operations can be made to fail for testing
//! error paths.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use portal_model::{Account, AccountId, AccountPatch, NewAccount};

use crate::client::{AccountApi, AccountQuery, Collection, Created};
use crate::error::{ApiError, ApiResult};

/// An account API operation, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Query lookup.
    Find,
    /// Full listing.
    List,
    /// Fetch by id.
    Get,
    /// Create.
    Create,
    /// Full replace.
    Replace,
    /// Partial update.
    Patch,
    /// Delete.
    Delete,
}

#[derive(Debug, Default)]
struct State {
    users: Vec<Account>,
    admins: Vec<Account>,
    next_id: u64,
    failing: HashSet<Operation>,
    create_status: Option<u16>,
}

impl State {
    fn records(&self, collection: Collection) -> &Vec<Account> {
        match collection {
            Collection::Users => &self.users,
            Collection::Admins => &self.admins,
        }
    }

    fn records_mut(&mut self, collection: Collection) -> &mut Vec<Account> {
        match collection {
            Collection::Users => &mut self.users,
            Collection::Admins => &mut self.admins,
        }
    }

    fn allocate_id(&mut self) -> AccountId {
        self.next_id += 1;
        AccountId::Number(self.next_id)
    }

    fn bump_past(&mut self, id: &AccountId) {
        if let AccountId::Number(n) = id {
            self.next_id = self.next_id.max(*n);
        }
    }
}

/// Account API backed by two in-process collections.
#[derive(Debug, Default)]
pub struct MemoryAccountApi {
    state: RwLock<State>,
    requests: AtomicUsize,
}

impl MemoryAccountApi {
    /// Creates an API with empty collections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record as-is, keeping its id.
    pub fn insert(&self, collection: Collection, account: Account) {
        let mut state = self.state.write();
        state.bump_past(&account.id);
        state.records_mut(collection).push(account);
    }

    /// Inserts a new record, assigning the next id.
    pub fn seed(&self, collection: Collection, account: NewAccount) -> Account {
        let mut state = self.state.write();
        let record = account.with_id(state.allocate_id());
        state.records_mut(collection).push(record.clone());
        record
    }

    /// Returns a copy of every record in a collection.
    #[must_use]
    pub fn accounts(&self, collection: Collection) -> Vec<Account> {
        self.state.read().records(collection).clone()
    }

    /// Returns a copy of one record.
    #[must_use]
    pub fn account(&self, collection: Collection, id: &AccountId) -> Option<Account> {
        self.state
            .read()
            .records(collection)
            .iter()
            .find(|a| &a.id == id)
            .cloned()
    }

    /// Number of requests served so far, including failed ones.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Makes every subsequent call of `operation` fail.
    pub fn fail_on(&self, operation: Operation) {
        self.state.write().failing.insert(operation);
    }

    /// Lets every operation succeed again.
    pub fn clear_failures(&self) {
        self.state.write().failing.clear();
    }

    /// Answers successful creates with `status` instead of `201`.
    pub fn respond_to_create_with(&self, status: u16) {
        self.state.write().create_status = Some(status);
    }

    fn begin(&self, operation: Operation) -> ApiResult<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.state.read().failing.contains(&operation) {
            return Err(ApiError::Unavailable(format!("{operation:?} failed")));
        }
        Ok(())
    }
}

fn not_found(collection: Collection, id: &AccountId) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("{collection} record {id} not found"),
    }
}

#[async_trait]
impl AccountApi for MemoryAccountApi {
    async fn find(
        &self,
        collection: Collection,
        query: &AccountQuery,
    ) -> ApiResult<Vec<Account>> {
        self.begin(Operation::Find)?;
        Ok(self
            .state
            .read()
            .records(collection)
            .iter()
            .filter(|a| query.matches(a))
            .cloned()
            .collect())
    }

    async fn list(&self, collection: Collection) -> ApiResult<Vec<Account>> {
        self.begin(Operation::List)?;
        Ok(self.accounts(collection))
    }

    async fn get(&self, collection: Collection, id: &AccountId) -> ApiResult<Account> {
        self.begin(Operation::Get)?;
        self.account(collection, id)
            .ok_or_else(|| not_found(collection, id))
    }

    async fn create(&self, collection: Collection, account: &NewAccount) -> ApiResult<Created> {
        self.begin(Operation::Create)?;
        let mut state = self.state.write();
        let record = account.clone().with_id(state.allocate_id());
        state.records_mut(collection).push(record.clone());
        Ok(Created {
            status: state.create_status.unwrap_or(201),
            account: Some(record),
        })
    }

    async fn replace(&self, collection: Collection, account: &Account) -> ApiResult<Account> {
        self.begin(Operation::Replace)?;
        let mut state = self.state.write();
        let slot = state
            .records_mut(collection)
            .iter_mut()
            .find(|a| a.id == account.id)
            .ok_or_else(|| not_found(collection, &account.id))?;
        *slot = account.clone();
        Ok(slot.clone())
    }

    async fn patch(
        &self,
        collection: Collection,
        id: &AccountId,
        patch: &AccountPatch,
    ) -> ApiResult<Account> {
        self.begin(Operation::Patch)?;
        let mut state = self.state.write();
        let slot = state
            .records_mut(collection)
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| not_found(collection, id))?;
        patch.apply(slot);
        Ok(slot.clone())
    }

    async fn delete(&self, collection: Collection, id: &AccountId) -> ApiResult<()> {
        self.begin(Operation::Delete)?;
        let mut state = self.state.write();
        let records = state.records_mut(collection);
        let before = records.len();
        records.retain(|a| &a.id != id);
        if records.len() == before {
            return Err(not_found(collection, id));
        }
        Ok(())
    }
}
