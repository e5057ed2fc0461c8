//! Audit events for account activity.
//!
//! Security-relevant outcomes (logins, registrations, credential changes,
//! account removal) are recorded as structured events and written to the
//! `tracing` framework. Events never carry passwords or session tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Login attempt.
    Login,
    /// Logout.
    Logout,
    /// Self-service registration.
    Register,
    /// Profile fields updated.
    UpdateProfile,
    /// Password changed.
    UpdatePassword,
    /// Account deleted by its owner.
    DeleteAccount,
    /// Administrator roster fetched.
    ListAdmins,
    /// Administrator created by another administrator.
    AdminCreated,
    /// Session restored from the persisted cache.
    SessionRestored,
}

/// Outcome of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Failure,
}

/// A security event for audit logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: Uuid,

    /// Timestamp of the event (ISO 8601).
    pub timestamp: DateTime<Utc>,

    /// Type of event.
    pub event_type: EventType,

    /// Outcome of the event.
    pub outcome: EventOutcome,

    /// Role tag of the acting identity (`user` or `admin`).
    pub role: Option<String>,

    /// Account the event refers to.
    pub account_id: Option<String>,

    /// Email the event refers to (login and registration attempts).
    pub email: Option<String>,

    /// Error message (for failure events).
    pub error: Option<String>,

    /// Additional details as key-value pairs.
    pub details: Vec<(String, String)>,
}

impl Event {
    /// Creates a new event builder.
    #[must_use]
    pub const fn builder(event_type: EventType) -> EventBuilder {
        EventBuilder::new(event_type)
    }

    /// Writes the event to the tracing framework.
    ///
    /// Successes are logged at INFO, failures at WARN.
    pub fn emit(&self) {
        let details = self
            .details
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",");

        match self.outcome {
            EventOutcome::Success => tracing::info!(
                target: "portal::audit",
                event_id = %self.id,
                event_type = ?self.event_type,
                role = self.role.as_deref().unwrap_or("-"),
                account_id = self.account_id.as_deref().unwrap_or("-"),
                email = self.email.as_deref().unwrap_or("-"),
                details = %details,
                "account event"
            ),
            EventOutcome::Failure => tracing::warn!(
                target: "portal::audit",
                event_id = %self.id,
                event_type = ?self.event_type,
                role = self.role.as_deref().unwrap_or("-"),
                account_id = self.account_id.as_deref().unwrap_or("-"),
                email = self.email.as_deref().unwrap_or("-"),
                error = self.error.as_deref().unwrap_or("-"),
                details = %details,
                "account event failed"
            ),
        }
    }
}

/// Builder for creating events.
pub struct EventBuilder {
    event_type: EventType,
    outcome: EventOutcome,
    role: Option<String>,
    account_id: Option<String>,
    email: Option<String>,
    error: Option<String>,
    details: Vec<(String, String)>,
}

impl EventBuilder {
    /// Creates a new event builder.
    #[must_use]
    pub const fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            outcome: EventOutcome::Success,
            role: None,
            account_id: None,
            email: None,
            error: None,
            details: Vec::new(),
        }
    }

    /// Sets the outcome to success.
    #[must_use]
    pub const fn success(mut self) -> Self {
        self.outcome = EventOutcome::Success;
        self
    }

    /// Sets the outcome to failure with an error message.
    #[must_use]
    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.outcome = EventOutcome::Failure;
        self.error = Some(error.into());
        self
    }

    /// Sets the role tag.
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Sets the account ID.
    #[must_use]
    pub fn account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Sets the email address.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Adds a detail key-value pair.
    #[must_use]
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> Event {
        Event {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            event_type: self.event_type,
            outcome: self.outcome,
            role: self.role,
            account_id: self.account_id,
            email: self.email,
            error: self.error,
            details: self.details,
        }
    }

    /// Builds the event and writes it to the tracing framework.
    pub fn emit(self) {
        self.build().emit();
    }
}
