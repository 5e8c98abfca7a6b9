//! JWT access token signing

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::config::SigningAccount;
use crate::grants::{CapabilityGrant, GrantSet};
use crate::{Error, Result};

/// Content type the telephony platform expects on access tokens
pub const ACCESS_TOKEN_CONTENT_TYPE: &str = "twilio-fpa;v=1";

/// Turns an identity and a grant into an opaque bearer credential
pub trait Signer: Send + Sync {
    fn sign(
        &self,
        account: &SigningAccount<'_>,
        identity: &str,
        grant: &CapabilityGrant,
    ) -> Result<String>;
}

/// JWT claims for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub jti: String,              // "<api key>-<issued at>"
    pub iss: String,              // API key sid
    pub sub: String,              // Account sid
    pub iat: u64,
    pub exp: u64,
    pub grants: GrantSet,
}

/// HS256 signer keyed by the account's API key secret
pub struct JwtSigner {
    ttl_seconds: u64,
    header: Header,
}

impl JwtSigner {
    pub fn new(ttl_seconds: u64) -> Self {
        let mut header = Header::new(Algorithm::HS256);
        header.cty = Some(ACCESS_TOKEN_CONTENT_TYPE.to_string());

        Self { ttl_seconds, header }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    fn claims(&self, account: &SigningAccount<'_>, identity: &str, grant: &CapabilityGrant) -> Result<AccessTokenClaims> {
        let now = chrono::Utc::now();
        let exp = i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(chrono::TimeDelta::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(Error::TokenLifetime(self.ttl_seconds))?;

        Ok(AccessTokenClaims {
            jti: format!("{}-{}", account.api_key, now.timestamp()),
            iss: account.api_key.to_string(),
            sub: account.account_sid.to_string(),
            iat: now.timestamp() as u64,
            exp: exp.timestamp() as u64,
            grants: GrantSet::new(identity, grant),
        })
    }
}

impl Signer for JwtSigner {
    fn sign(
        &self,
        account: &SigningAccount<'_>,
        identity: &str,
        grant: &CapabilityGrant,
    ) -> Result<String> {
        let claims = self.claims(account, identity, grant)?;
        let key = EncodingKey::from_secret(account.api_key_secret.as_bytes());

        Ok(encode(&self.header, &claims, &key)?)
    }
}
