use anyhow::{anyhow, Context};

use crate::UserId;

/// Canonical author profile. Legacy rows in the hosted datastore carry the
/// same concepts under several historical column names; `from_row` resolves
/// each concept through an explicit, ordered alias list exactly once, so the
/// rest of the codebase only ever sees the canonical field.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AuthorProfile {
    pub user_id: UserId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub approved: bool,
    pub is_anonymous: bool,
    pub credentials: Option<String>,
    pub union_affiliation: Option<String>,
    pub organization: Option<String>,
    pub bio: Option<String>,
}

const CREDENTIALS_ALIASES: &[&str] = &["credentials", "title"];
const UNION_ALIASES: &[&str] = &["union_affiliation", "union"];
const ORGANIZATION_ALIASES: &[&str] = &["organization", "employer", "org"];
const BIO_ALIASES: &[&str] = &["bio", "about", "summary"];

fn first_string(row: &serde_json::Value, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|key| row.get(key).and_then(|v| v.as_str()))
        .find(|s| !s.trim().is_empty())
        .map(String::from)
}

impl AuthorProfile {
    pub fn from_row(row: &serde_json::Value) -> anyhow::Result<AuthorProfile> {
        let user_id = row
            .get("user_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("author row without a user_id"))?;
        let user_id = UserId(user_id.parse().context("parsing author user_id")?);
        Ok(AuthorProfile {
            user_id,
            email: first_string(row, &["email"]),
            display_name: first_string(row, &["display_name"]),
            approved: row.get("approved").and_then(|v| v.as_bool()).unwrap_or(false),
            is_anonymous: row
                .get("is_anonymous")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            credentials: first_string(row, CREDENTIALS_ALIASES),
            union_affiliation: first_string(row, UNION_ALIASES),
            organization: first_string(row, ORGANIZATION_ALIASES),
            bio: first_string(row, BIO_ALIASES),
        })
    }

    pub fn stub(user_id: UserId) -> AuthorProfile {
        AuthorProfile {
            user_id,
            email: None,
            display_name: None,
            approved: false,
            is_anonymous: false,
            credentials: None,
            union_affiliation: None,
            organization: None,
            bio: None,
        }
    }
}
