use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClaimDeskError, Result};
use crate::types::Claim;

/// Opaque forward-paging token issued by the backend.
///
/// Only the presence of its `l` field is ever inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(Value);

impl Cursor {
    /// Accept a response cursor only if it is an object carrying `l`.
    pub fn from_response(raw: Option<Value>) -> Option<Self> {
        raw.filter(|v| v.get("l").is_some()).map(Self)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Which listing endpoint a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVariant {
    First,
    Next,
}

impl PageVariant {
    /// Path suffix appended to the listing endpoint.
    pub fn extension(self) -> &'static str {
        match self {
            PageVariant::First => "",
            PageVariant::Next => "_next",
        }
    }
}

/// Body of a claim listing request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimsRequest {
    pub limit: usize,
    pub cursor: Option<Cursor>,
}

impl ClaimsRequest {
    pub fn new(limit: usize, cursor: Option<Cursor>) -> Self {
        Self { limit, cursor }
    }

    pub fn variant(&self) -> PageVariant {
        if self.cursor.is_some() {
            PageVariant::Next
        } else {
            PageVariant::First
        }
    }
}

/// One page of claims plus the cursor for the page after it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimPage {
    pub rows: Vec<Claim>,
    pub cursor: Option<Cursor>,
}

impl ClaimPage {
    /// Decode a listing response body.
    ///
    /// `rows` must be a JSON array of claims; anything else is a malformed
    /// response and nothing from the body is used.
    pub fn from_value(body: Value) -> Result<Self> {
        let Value::Object(mut fields) = body else {
            return Err(ClaimDeskError::MalformedResponse(
                "listing body is not an object".into(),
            ));
        };

        let rows = match fields.remove("rows") {
            Some(rows @ Value::Array(_)) => serde_json::from_value::<Vec<Claim>>(rows)?,
            Some(_) => {
                return Err(ClaimDeskError::MalformedResponse(
                    "rows is not a list".into(),
                ))
            }
            None => {
                return Err(ClaimDeskError::MalformedResponse("rows is missing".into()))
            }
        };

        Ok(Self {
            rows,
            cursor: Cursor::from_response(fields.remove("cursor")),
        })
    }

    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }
}
