use serde_json::{json, Value};

use crate::error::Result;
use crate::rest::ClaimDeskHttpClient;
use crate::types::*;

const CLAIMS_PATH: &str = "/venue/claims";
const CLAIM_ACCEPT_PATH: &str = "/venue/claim/accept";
const CLAIM_REJECT_PATH: &str = "/venue/claim/reject";
const VENUE_OWNER_PATH: &str = "/venue/owner";

impl ClaimDeskHttpClient {
    // --- Claims ---

    /// POST /venue/claims{extension} - One page of pending claims.
    pub async fn fetch_claims(
        &self,
        variant: PageVariant,
        request: &ClaimsRequest,
    ) -> Result<ClaimPage> {
        let path = format!("{CLAIMS_PATH}{}", variant.extension());
        let body = self.post_json(&path, request).await?;
        let value: Value = serde_json::from_str(&body)?;
        ClaimPage::from_value(value)
    }

    /// POST /venue/claim/accept - Mark a claim accepted.
    pub async fn claim_accept(&self, claim_id: &str) -> Result<MutationResult> {
        let body = self
            .post_json(CLAIM_ACCEPT_PATH, &json!({ "id": claim_id }))
            .await?;
        Ok(MutationResult::from_body(&body)?)
    }

    /// POST /venue/claim/reject - Mark a claim rejected.
    pub async fn claim_reject(&self, claim_id: &str) -> Result<MutationResult> {
        let body = self
            .post_json(CLAIM_REJECT_PATH, &json!({ "id": claim_id }))
            .await?;
        Ok(MutationResult::from_body(&body)?)
    }

    // --- Venue ---

    /// POST /venue/owner - Write back a venue with its ownership flag set.
    pub async fn update_venue_owner(&self, venue: &Venue) -> Result<MutationResult> {
        let body = self.post_json(VENUE_OWNER_PATH, venue).await?;
        Ok(MutationResult::from_body(&body)?)
    }

    // --- User ---

    /// GET /user/{user_doc_id}/admin - Contact details of a user.
    pub async fn fetch_user_details(&self, user_doc_id: &str) -> Result<UserDetails> {
        let envelope: UserDetailsEnvelope =
            self.get_segments(&["user", user_doc_id, "admin"]).await?;
        Ok(envelope.details)
    }
}
