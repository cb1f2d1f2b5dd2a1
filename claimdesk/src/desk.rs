use tracing::{info, warn};

use crate::error::Result;
use crate::gateway::ClaimGateway;
use crate::listing::{ClaimList, LoadStep};
use crate::lookup::{LookupOutcome, UserLookup, LOOKUP_ERROR_MESSAGE};
use crate::types::UserRef;
use crate::workflow::{
    resume_resolution, run_resolution, Resolution, ResolutionError, ResolutionFlows,
    ResolutionPlan,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Short user-facing message about an action's outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}

/// A resolution whose venue update went through but whose claim mutation did
/// not.
#[derive(Debug, Clone)]
pub struct StalledResolution {
    pub plan: ResolutionPlan,
    /// Why the claim step failed.
    pub reason: String,
}

/// How a resolution attempt ended.
#[derive(Debug)]
pub enum ResolutionOutcome {
    /// Both steps succeeded and the list was reloaded from page 1.
    Resolved(Notice),
    /// The attempt failed; the error says at which stage.
    Failed(Notice, ResolutionError),
}

impl ResolutionOutcome {
    pub fn notice(&self) -> &Notice {
        match self {
            ResolutionOutcome::Resolved(n) | ResolutionOutcome::Failed(n, _) => n,
        }
    }
}

/// Sequential driver for the claim desk.
///
/// Owns the list, workflow and lookup state and runs each gateway call to
/// completion before returning.
pub struct ClaimDesk<G> {
    gateway: G,
    list: ClaimList,
    flows: ResolutionFlows,
    lookup: UserLookup,
    stalled: Vec<StalledResolution>,
}

impl<G: ClaimGateway> ClaimDesk<G> {
    pub fn new(gateway: G, page_size: usize) -> Self {
        Self {
            gateway,
            list: ClaimList::new(page_size),
            flows: ResolutionFlows::new(),
            lookup: UserLookup::new(),
            stalled: Vec::new(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn list(&self) -> &ClaimList {
        &self.list
    }

    pub fn flows(&self) -> &ResolutionFlows {
        &self.flows
    }

    pub fn lookup(&self) -> &UserLookup {
        &self.lookup
    }

    /// Resolutions left half-done, oldest first.
    pub fn stalled(&self) -> &[StalledResolution] {
        &self.stalled
    }

    // --- Listing ---

    /// Load `page` into the list, from cache when possible.
    pub async fn load_claims(&mut self, page: u32) -> Result<LoadStep> {
        let step = self.list.begin_load(page);
        if let LoadStep::Fetch(request) = &step {
            let result = self.gateway.fetch_claims(request.variant(), request).await;
            self.list.finish_load(page, result)?;
        }
        Ok(step)
    }

    /// Select `page` and load it.
    pub async fn change_page(&mut self, page: u32) -> Result<LoadStep> {
        self.list.select_page(page);
        self.load_claims(self.list.current_page()).await
    }

    /// Walk the cursor chain from page 1 up to `page`.
    ///
    /// Stops early at the last page the backend advertises; returns the page
    /// that ended up selected.
    pub async fn seek_page(&mut self, page: u32) -> Result<u32> {
        self.change_page(1).await?;
        let mut current = 1;
        while current < page && self.list.next_enable() {
            current += 1;
            self.change_page(current).await?;
        }
        Ok(current)
    }

    /// Drop every cached page and reload page 1.
    pub async fn refresh(&mut self) -> Result<LoadStep> {
        self.list.invalidate();
        self.load_claims(1).await
    }

    // --- Accept / reject ---

    /// Open the confirmation for `claim_id`.
    pub fn request_resolution(&mut self, resolution: Resolution, claim_id: impl Into<String>) {
        self.flows.request(resolution, claim_id);
    }

    /// Dismiss the confirmation.
    pub fn cancel_resolution(&mut self, resolution: Resolution) {
        self.flows.cancel(resolution);
    }

    /// Confirm the pending resolution and run it.
    ///
    /// Returns `None` when no confirmation was open.
    pub async fn confirm_resolution(&mut self, resolution: Resolution) -> Option<ResolutionOutcome> {
        let plan = match self.flows.begin(resolution, self.list.claims())? {
            Ok(plan) => plan,
            Err(e) => {
                let notice = Notice::error(resolution.failure_message());
                return Some(ResolutionOutcome::Failed(notice, e));
            }
        };

        let result = run_resolution(&self.gateway, &plan).await;
        self.flows.finish(resolution);
        Some(self.settle(plan, result).await)
    }

    /// Request and confirm in one go.
    pub async fn resolve(
        &mut self,
        resolution: Resolution,
        claim_id: impl Into<String>,
    ) -> Option<ResolutionOutcome> {
        self.request_resolution(resolution, claim_id);
        self.confirm_resolution(resolution).await
    }

    /// Retry the claim step of a stalled resolution.
    ///
    /// Returns `None` if no stalled resolution exists for `claim_id`.
    pub async fn resume_stalled(&mut self, claim_id: &str) -> Option<ResolutionOutcome> {
        let idx = self.stalled.iter().position(|s| s.plan.claim_id == claim_id)?;
        let stalled = self.stalled.remove(idx);
        info!(claim_id, resolution = %stalled.plan.resolution, "resuming stalled resolution");

        let result = resume_resolution(&self.gateway, &stalled.plan).await;
        Some(self.settle(stalled.plan, result).await)
    }

    async fn settle(
        &mut self,
        plan: ResolutionPlan,
        result: std::result::Result<(), ResolutionError>,
    ) -> ResolutionOutcome {
        let resolution = plan.resolution;
        match result {
            Ok(()) => {
                if let Err(e) = self.refresh().await {
                    warn!(error = %e, "reload after resolution failed");
                }
                ResolutionOutcome::Resolved(Notice::success(resolution.success_message()))
            }
            Err(e) => {
                if e.is_partial() {
                    warn!(
                        claim_id = %plan.claim_id,
                        %resolution,
                        error = %e,
                        "venue updated but claim unresolved"
                    );
                    self.stalled.push(StalledResolution {
                        plan,
                        reason: e.failure.to_string(),
                    });
                } else {
                    warn!(error = %e, "resolution failed");
                }
                ResolutionOutcome::Failed(Notice::error(resolution.failure_message()), e)
            }
        }
    }

    // --- User details ---

    /// Fetch and show `user`'s profile.
    ///
    /// Returns a notice only on failure.
    pub async fn show_user(&mut self, user: &UserRef) -> Option<Notice> {
        let ticket = self.lookup.begin(user);
        let result = self.gateway.fetch_user_details(ticket.user_doc_id()).await;
        match self.lookup.finish(ticket, result) {
            LookupOutcome::Failed => Some(Notice::error(LOOKUP_ERROR_MESSAGE)),
            LookupOutcome::Shown | LookupOutcome::Stale => None,
        }
    }

    /// Close the user-detail view.
    pub fn close_user(&mut self) {
        self.lookup.close();
    }
}
