//! # Gateway-Core
//!
//! Signaling gateway between voice/video client SDKs and the telephony
//! platform.
//!
//! This crate provides:
//! - Access token issuance with a single voice or video grant
//! - Call routing from a normalized call setup request to a call plan
//! - TwiML rendering of call plans
//! - REST API exposing both over GET and POST
//!
//! ## Architecture
//!
//! The decision logic ([`CredentialIssuer`], [`CallRouter`], [`classify`]) is
//! pure and takes its configuration at construction. Signing and markup go
//! through the [`Signer`] and [`MarkupSerializer`] traits so the HTTP layer in
//! [`api`] only wires implementations together.

pub mod error;
pub mod types;
pub mod config;
pub mod grants;
pub mod jwt;
pub mod issuer;
pub mod destination;
pub mod markup;
pub mod routing;
pub mod greetings;
pub mod logging;
pub mod api;

pub use error::{Error, Result};
pub use types::{
    CallKind, CallPlan, CallSetupRequest, CapabilityRequest, DestinationKind, IdentityClaim,
    RecordingPolicy, SubChannel,
};
pub use config::GatewayConfig;
pub use grants::CapabilityGrant;
pub use jwt::{JwtSigner, Signer};
pub use issuer::{Credential, CredentialIssuer};
pub use destination::classify;
pub use markup::{MarkupSerializer, TwimlSerializer};
pub use routing::CallRouter;
pub use api::GatewayState;

/// Initialize the gateway service state
pub fn init(config: GatewayConfig) -> GatewayState {
    GatewayState::new(config)
}
