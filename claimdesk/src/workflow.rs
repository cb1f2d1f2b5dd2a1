//! Accept/reject workflow.
//!
//! Each resolution kind has its own state machine,
//! `Idle -> Confirming -> Resolving -> Idle`, held in [`ResolutionFlows`].
//! Resolving a claim is a two-step saga run by [`run_resolution`]: write the
//! venue back with its ownership flag set, then accept or reject the claim.
//! The steps are not atomic; a failure after the venue update is reported
//! with stage [`SagaStage::ClaimPending`] so callers can record and resume it.

use std::fmt;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::error::ClaimDeskError;
use crate::gateway::ClaimGateway;
use crate::types::{Claim, MutationResult, Venue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Accept,
    Reject,
}

impl Resolution {
    /// Value written to the venue's `event_conf_req` flag.
    pub fn conf_flag(self) -> u8 {
        match self {
            Resolution::Accept => 1,
            Resolution::Reject => 0,
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Resolution::Accept => "Claim accepted successfully",
            Resolution::Reject => "Claim rejected successfully",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Resolution::Accept => "Failed to accept claim",
            Resolution::Reject => "Failed to reject claim",
        }
    }

    /// Question asked before resolving.
    pub fn prompt(self) -> &'static str {
        match self {
            Resolution::Accept => "Are you sure you want to accept this claim?",
            Resolution::Reject => "Are you sure you want to reject this claim?",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::Accept => "accept",
            Resolution::Reject => "reject",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a resolution saga stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaStage {
    /// Nothing has been written yet.
    VenueUpdate,
    /// The venue was updated; the claim mutation has not succeeded.
    ClaimPending,
}

impl fmt::Display for SagaStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SagaStage::VenueUpdate => f.write_str("venue update"),
            SagaStage::ClaimPending => f.write_str("claim mutation"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolutionFailure {
    #[error("claim is not in the loaded page")]
    NotFound,

    #[error("backend returned error payload: {payload}")]
    Rejected { payload: Value },

    #[error(transparent)]
    Remote(#[from] ClaimDeskError),
}

#[derive(Debug, Error)]
#[error("{resolution} of claim {claim_id} failed at {stage}: {failure}")]
pub struct ResolutionError {
    pub claim_id: String,
    pub resolution: Resolution,
    pub stage: SagaStage,
    #[source]
    pub failure: ResolutionFailure,
}

impl ResolutionError {
    /// The venue was written but the claim was not resolved.
    pub fn is_partial(&self) -> bool {
        self.stage == SagaStage::ClaimPending
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.failure, ResolutionFailure::NotFound)
    }
}

/// Everything needed to run (or resume) one resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionPlan {
    pub claim_id: String,
    pub resolution: Resolution,
    /// Copy of the claim's venue with the ownership flag already set.
    pub venue: Venue,
}

impl ResolutionPlan {
    pub fn new(claim: &Claim, resolution: Resolution) -> Self {
        let mut venue = claim.r.venue.clone();
        venue.event_conf_req = resolution.conf_flag();
        Self {
            claim_id: claim.id.clone(),
            resolution,
            venue,
        }
    }

    fn fail(&self, stage: SagaStage, failure: ResolutionFailure) -> ResolutionError {
        ResolutionError {
            claim_id: self.claim_id.clone(),
            resolution: self.resolution,
            stage,
            failure,
        }
    }
}

/// State of one resolution kind's confirmation flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FlowState {
    #[default]
    Idle,
    /// Waiting for the operator to confirm this claim id.
    Confirming(String),
    /// Remote calls for this claim id are in flight.
    Resolving(String),
}

/// The accept and reject flows side by side.
#[derive(Debug, Clone, Default)]
pub struct ResolutionFlows {
    accept: FlowState,
    reject: FlowState,
}

impl ResolutionFlows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, resolution: Resolution) -> &FlowState {
        match resolution {
            Resolution::Accept => &self.accept,
            Resolution::Reject => &self.reject,
        }
    }

    fn state_mut(&mut self, resolution: Resolution) -> &mut FlowState {
        match resolution {
            Resolution::Accept => &mut self.accept,
            Resolution::Reject => &mut self.reject,
        }
    }

    /// Claim id awaiting confirmation, if the dialog is open.
    pub fn confirming(&self, resolution: Resolution) -> Option<&str> {
        match self.state(resolution) {
            FlowState::Confirming(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_resolving(&self, resolution: Resolution) -> bool {
        matches!(self.state(resolution), FlowState::Resolving(_))
    }

    /// Open the confirmation for `claim_id`. Ignored while resolving.
    pub fn request(&mut self, resolution: Resolution, claim_id: impl Into<String>) -> bool {
        let state = self.state_mut(resolution);
        if matches!(state, FlowState::Resolving(_)) {
            return false;
        }
        *state = FlowState::Confirming(claim_id.into());
        true
    }

    /// Dismiss the confirmation. Returns `false` if nothing was pending.
    pub fn cancel(&mut self, resolution: Resolution) -> bool {
        let state = self.state_mut(resolution);
        if matches!(state, FlowState::Confirming(_)) {
            *state = FlowState::Idle;
            return true;
        }
        false
    }

    /// Operator confirmed: look the pending claim up in `claims` and plan
    /// the remote calls.
    ///
    /// Returns `None` when nothing awaits confirmation. A claim missing from
    /// `claims` ends the flow with a not-found error before any call is made.
    pub fn begin(
        &mut self,
        resolution: Resolution,
        claims: &[Claim],
    ) -> Option<Result<ResolutionPlan, ResolutionError>> {
        let state = self.state_mut(resolution);
        let claim_id = match state {
            FlowState::Confirming(id) => std::mem::take(id),
            _ => return None,
        };
        *state = FlowState::Idle;

        match claims.iter().find(|c| c.id == claim_id) {
            Some(claim) => {
                *state = FlowState::Resolving(claim_id);
                Some(Ok(ResolutionPlan::new(claim, resolution)))
            }
            None => {
                warn!(%claim_id, %resolution, "claim not found in loaded page");
                Some(Err(ResolutionError {
                    claim_id,
                    resolution,
                    stage: SagaStage::VenueUpdate,
                    failure: ResolutionFailure::NotFound,
                }))
            }
        }
    }

    /// Remote calls are done, whatever their outcome.
    pub fn finish(&mut self, resolution: Resolution) {
        *self.state_mut(resolution) = FlowState::Idle;
    }
}

/// Run both saga steps for `plan`.
pub async fn run_resolution<G: ClaimGateway>(
    gateway: &G,
    plan: &ResolutionPlan,
) -> Result<(), ResolutionError> {
    info!(
        claim_id = %plan.claim_id,
        resolution = %plan.resolution,
        event_conf_req = plan.venue.event_conf_req,
        "updating venue owner"
    );

    let venue_result = gateway
        .update_venue_owner(&plan.venue)
        .await
        .map_err(|e| plan.fail(SagaStage::VenueUpdate, e.into()))?;
    ensure_empty(plan, SagaStage::VenueUpdate, venue_result)?;

    info!(
        claim_id = %plan.claim_id,
        resolution = %plan.resolution,
        stage = %SagaStage::ClaimPending,
        "venue updated, claim pending"
    );

    resume_resolution(gateway, plan).await
}

/// Run only the claim step of `plan`, for a saga whose venue update already
/// went through.
pub async fn resume_resolution<G: ClaimGateway>(
    gateway: &G,
    plan: &ResolutionPlan,
) -> Result<(), ResolutionError> {
    let claim_result = match plan.resolution {
        Resolution::Accept => gateway.claim_accept(&plan.claim_id).await,
        Resolution::Reject => gateway.claim_reject(&plan.claim_id).await,
    }
    .map_err(|e| plan.fail(SagaStage::ClaimPending, e.into()))?;
    ensure_empty(plan, SagaStage::ClaimPending, claim_result)?;

    info!(
        claim_id = %plan.claim_id,
        resolution = %plan.resolution,
        "claim resolved"
    );
    Ok(())
}

fn ensure_empty(
    plan: &ResolutionPlan,
    stage: SagaStage,
    result: MutationResult,
) -> Result<(), ResolutionError> {
    if result.is_empty() {
        return Ok(());
    }
    Err(plan.fail(
        stage,
        ResolutionFailure::Rejected {
            payload: result.payload,
        },
    ))
}
