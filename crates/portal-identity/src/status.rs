//! Loading flag and sticky error shared by the providers.

use parking_lot::RwLock;
use portal_core::{Event, EventType};
use portal_model::Role;

use crate::error::IdentityResult;

/// Observable state of a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderStatus {
    /// An operation is in flight.
    pub loading: bool,
    /// Message of the most recent failure, cleared when the next operation
    /// starts.
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct StatusCell {
    inner: RwLock<ProviderStatus>,
}

impl StatusCell {
    pub(crate) fn snapshot(&self) -> ProviderStatus {
        self.inner.read().clone()
    }

    /// Marks an operation as started. `loading` drops back to `false` when
    /// the returned guard goes out of scope.
    pub(crate) fn begin(&self) -> LoadingGuard<'_> {
        let mut status = self.inner.write();
        status.loading = true;
        status.last_error = None;
        LoadingGuard { cell: self }
    }

    pub(crate) fn set_error(&self, message: impl Into<String>) {
        self.inner.write().last_error = Some(message.into());
    }

    /// Records a failed result in `last_error` and as an audit event.
    pub(crate) fn record<T>(
        &self,
        event_type: EventType,
        role: Role,
        result: IdentityResult<T>,
    ) -> IdentityResult<T> {
        if let Err(e) = &result {
            let message = e.to_string();
            Event::builder(event_type)
                .role(role.as_str())
                .failure(message.clone())
                .emit();
            self.set_error(message);
        }
        result
    }
}

pub(crate) struct LoadingGuard<'a> {
    cell: &'a StatusCell,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.cell.inner.write().loading = false;
    }
}
