//! Credential issuance
//!
//! Picks the capability grant for a request, attaches the resolved identity and
//! hands both to the [`Signer`]. Exactly one grant goes into every credential.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::GatewayConfig;
use crate::grants::CapabilityGrant;
use crate::jwt::Signer;
use crate::types::{CapabilityRequest, IdentityClaim, SubChannel};
use crate::Result;

/// A signed access token and the identity it was issued for
#[derive(Debug, Clone)]
pub struct Credential {
    identity: String,
    token: String,
}

impl Credential {
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn into_token(self) -> String {
        self.token
    }
}

/// Issues voice and video credentials
pub struct CredentialIssuer {
    config: Arc<GatewayConfig>,
    signer: Arc<dyn Signer>,
}

impl CredentialIssuer {
    pub fn new(config: Arc<GatewayConfig>, signer: Arc<dyn Signer>) -> Self {
        Self { config, signer }
    }

    /// Identity claim for a raw request value, using the configured fallback
    pub fn identity_claim(&self, requested: Option<&str>) -> IdentityClaim {
        IdentityClaim::resolve(requested, &self.config.default_identity)
    }

    pub fn issue_voice_credential(&self, claim: &IdentityClaim, sub_channel: SubChannel) -> Result<Credential> {
        self.issue(claim, CapabilityRequest::Voice { sub_channel })
    }

    pub fn issue_video_credential(&self, claim: &IdentityClaim) -> Result<Credential> {
        self.issue(claim, CapabilityRequest::Video)
    }

    /// Issue a credential carrying the grant for `request`
    pub fn issue(&self, claim: &IdentityClaim, request: CapabilityRequest) -> Result<Credential> {
        let account = self.config.signing_account()?;
        let grant = CapabilityGrant::for_request(request, &self.config);
        let token = self.signer.sign(&account, claim.identity(), &grant)?;

        info!(identity = claim.identity(), grant = grant.kind(), "Issued access token");
        debug!("Token: {}", token);

        Ok(Credential {
            identity: claim.identity().to_string(),
            token,
        })
    }
}
