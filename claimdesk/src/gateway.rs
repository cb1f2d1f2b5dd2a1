//! Remote operations the desk depends on.
//!
//! [`ClaimDeskHttpClient`] is the production implementation; tests drive the
//! desk through in-memory gateways.

use std::future::Future;

use crate::error::Result;
use crate::rest::ClaimDeskHttpClient;
use crate::types::*;

/// The five backend calls behind the claim desk.
pub trait ClaimGateway {
    /// Fetch one page of claims from the first-page or next-page endpoint.
    fn fetch_claims(
        &self,
        variant: PageVariant,
        request: &ClaimsRequest,
    ) -> impl Future<Output = Result<ClaimPage>> + Send;

    /// Write back a venue object.
    fn update_venue_owner(&self, venue: &Venue)
        -> impl Future<Output = Result<MutationResult>> + Send;

    fn claim_accept(&self, claim_id: &str) -> impl Future<Output = Result<MutationResult>> + Send;

    fn claim_reject(&self, claim_id: &str) -> impl Future<Output = Result<MutationResult>> + Send;

    fn fetch_user_details(
        &self,
        user_doc_id: &str,
    ) -> impl Future<Output = Result<UserDetails>> + Send;
}

impl ClaimGateway for ClaimDeskHttpClient {
    fn fetch_claims(
        &self,
        variant: PageVariant,
        request: &ClaimsRequest,
    ) -> impl Future<Output = Result<ClaimPage>> + Send {
        ClaimDeskHttpClient::fetch_claims(self, variant, request)
    }

    fn update_venue_owner(
        &self,
        venue: &Venue,
    ) -> impl Future<Output = Result<MutationResult>> + Send {
        ClaimDeskHttpClient::update_venue_owner(self, venue)
    }

    fn claim_accept(&self, claim_id: &str) -> impl Future<Output = Result<MutationResult>> + Send {
        ClaimDeskHttpClient::claim_accept(self, claim_id)
    }

    fn claim_reject(&self, claim_id: &str) -> impl Future<Output = Result<MutationResult>> + Send {
        ClaimDeskHttpClient::claim_reject(self, claim_id)
    }

    fn fetch_user_details(
        &self,
        user_doc_id: &str,
    ) -> impl Future<Output = Result<UserDetails>> + Send {
        ClaimDeskHttpClient::fetch_user_details(self, user_doc_id)
    }
}
