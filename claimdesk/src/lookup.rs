use tracing::{debug, warn};

use crate::error::Result;
use crate::types::{UserDetails, UserRef};

/// Notice shown when a profile cannot be fetched.
pub const LOOKUP_ERROR_MESSAGE: &str = "Failed to fetch user details";

/// Handle for one in-flight profile fetch.
///
/// A ticket is only honoured while it is the newest one issued; closing the
/// detail view or starting another lookup makes it stale.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTicket {
    generation: u64,
    user: UserRef,
}

impl LookupTicket {
    pub fn user(&self) -> &UserRef {
        &self.user
    }

    pub fn user_doc_id(&self) -> &str {
        &self.user.user_doc_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The profile is now on display.
    Shown,
    /// The fetch failed; whatever was shown before still is.
    Failed,
    /// The ticket was superseded and its result dropped.
    Stale,
}

/// Selected user and fetched profile behind the user-detail view.
#[derive(Debug, Clone, Default)]
pub struct UserLookup {
    selected: Option<UserRef>,
    details: Option<UserDetails>,
    generation: u64,
}

impl UserLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&UserRef> {
        self.selected.as_ref()
    }

    pub fn details(&self) -> Option<&UserDetails> {
        self.details.as_ref()
    }

    /// Whether the detail view is open.
    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    /// Start fetching `user`'s profile.
    pub fn begin(&mut self, user: &UserRef) -> LookupTicket {
        self.generation += 1;
        LookupTicket {
            generation: self.generation,
            user: user.clone(),
        }
    }

    /// Apply a fetch result.
    pub fn finish(&mut self, ticket: LookupTicket, result: Result<UserDetails>) -> LookupOutcome {
        if ticket.generation != self.generation {
            debug!(user_doc_id = %ticket.user.user_doc_id, "dropping stale user lookup");
            return LookupOutcome::Stale;
        }
        match result {
            Ok(details) => {
                self.details = Some(details);
                self.selected = Some(ticket.user);
                LookupOutcome::Shown
            }
            Err(e) => {
                warn!(user_doc_id = %ticket.user.user_doc_id, error = %e, "failed to fetch user details");
                LookupOutcome::Failed
            }
        }
    }

    /// Close the detail view, invalidating any fetch still in flight.
    pub fn close(&mut self) {
        self.generation += 1;
        self.selected = None;
        self.details = None;
    }
}
