//! IAM access token claims
//!
//! The subject id and IMS account are never stored in the configuration
//! file; they are decoded from the access token's payload on every read.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Account ids carried in the token's `account` claim
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountsInfo {
    #[serde(rename = "bss", default)]
    pub account_id: String,

    #[serde(rename = "ims", default)]
    pub ims_account_id: String,
}

/// Decoded IAM access token payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IamTokenInfo {
    pub iam_id: String,
    pub id: String,
    pub realm_id: String,
    pub identifier: String,
    pub subject: String,
    pub subject_type: String,
    pub user_email: String,
    pub accounts: AccountsInfo,
    pub expiry: Option<DateTime<Utc>>,
    pub issued_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Claims {
    iam_id: String,
    id: String,
    realmid: String,
    identifier: String,
    sub: String,
    sub_type: String,
    email: String,
    account: AccountsInfo,
    exp: Option<i64>,
    iat: Option<i64>,
}

impl IamTokenInfo {
    /// Decodes the claims of `token`
    ///
    /// Empty or malformed tokens yield an empty info rather than an error.
    pub fn parse(token: &str) -> Self {
        match decode_claims(token) {
            Some(claims) => Self {
                iam_id: claims.iam_id,
                id: claims.id,
                realm_id: claims.realmid,
                identifier: claims.identifier,
                subject: claims.sub,
                subject_type: claims.sub_type,
                user_email: claims.email,
                accounts: claims.account,
                expiry: claims.exp.and_then(|s| DateTime::from_timestamp(s, 0)),
                issued_at: claims.iat.and_then(|s| DateTime::from_timestamp(s, 0)),
            },
            None => Self::default(),
        }
    }

    /// True when the token carries an expiry that is already past
    pub fn is_expired(&self) -> bool {
        self.expiry.is_some_and(|exp| exp <= Utc::now())
    }
}

fn decode_claims(token: &str) -> Option<Claims> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    let token = match token.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => &token[7..],
        _ => token,
    };

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() < 3 {
        tracing::debug!(segments = parts.len(), "IAM token is not a JWT");
        return None;
    }

    let payload = URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| tracing::debug!(error = %e, "IAM token payload is not base64url"))
        .ok()?;

    serde_json::from_slice(&payload)
        .map_err(|e| tracing::debug!(error = %e, "IAM token payload is not JSON"))
        .ok()
}

#[cfg(test)]
pub(crate) fn encode_test_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}
