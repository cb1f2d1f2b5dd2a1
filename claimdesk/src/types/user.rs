use serde::{Deserialize, Serialize};

/// Key under which the admin user endpoint nests the profile.
pub const USER_DETAILS_KEY: &str = "$@user_details_for_admin";

/// Contact details of a claim's requester.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDetails {
    #[serde(rename = "fn", default)]
    pub first_name: Option<String>,
    #[serde(rename = "ln", default)]
    pub last_name: Option<String>,
    #[serde(rename = "mail", default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Response wrapper of the admin user endpoint.
///
/// The rename must stay equal to [`USER_DETAILS_KEY`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetailsEnvelope {
    #[serde(rename = "$@user_details_for_admin")]
    pub details: UserDetails,
}

impl UserDetails {
    /// "First Last", skipping whichever part is missing.
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_key_matches_constant() {
        let envelope = UserDetailsEnvelope {
            details: UserDetails::default(),
        };
        let value = serde_json::to_value(&envelope).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, [USER_DETAILS_KEY]);
    }
}
