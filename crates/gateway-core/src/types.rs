//! Core types for gateway-core

/// Identity used when a token request carries none.
pub const DEFAULT_IDENTITY: &str = "alice";

/// Identity that a credential is issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    identity: String,
}

impl IdentityClaim {
    /// Resolve the requested identity, falling back when it is absent or empty.
    pub fn resolve(requested: Option<&str>, fallback: &str) -> Self {
        let identity = match requested {
            Some(identity) if !identity.is_empty() => identity,
            _ => fallback,
        };
        Self { identity: identity.to_string() }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }
}

/// Push notification environment attached to a voice capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubChannel {
    /// Android FCM
    Android,
    /// iOS APNs sandbox
    Sandbox,
    /// iOS APNs production
    #[default]
    Production,
}

impl SubChannel {
    /// Parse a wire value. Anything other than `android` or `sandbox` is production.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("android") => SubChannel::Android,
            Some("sandbox") => SubChannel::Sandbox,
            _ => SubChannel::Production,
        }
    }
}

/// Capability requested for a credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityRequest {
    Voice { sub_channel: SubChannel },
    Video,
}

/// Kind of call requested by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallKind {
    Conference,
    Direct,
    #[default]
    Default,
}

impl CallKind {
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("conference") => CallKind::Conference,
            Some("direct") => CallKind::Direct,
            _ => CallKind::Default,
        }
    }
}

/// Normalized call setup parameters
///
/// `record` keeps its wire form: only the literal string `"true"` turns
/// recording on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSetupRequest {
    pub kind: CallKind,
    pub to: Option<String>,
    pub from: Option<String>,
    pub display_name: Option<String>,
    pub record: Option<String>,
}

impl CallSetupRequest {
    pub fn wants_recording(&self) -> bool {
        self.record.as_deref() == Some("true")
    }

    /// Destination, treating an empty string as absent
    pub fn destination(&self) -> Option<&str> {
        self.to.as_deref().filter(|to| !to.is_empty())
    }
}

/// Classification of a raw call destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    PhoneNumber,
    ClientName,
}

/// Recording behaviour of a conference leg. Wait music is off in both cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingPolicy {
    Disabled,
    FromStart { status_callback: String },
}

/// What a connected call should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallPlan {
    SayGreeting(String),
    DialConference {
        room: Option<String>,
        recording: RecordingPolicy,
    },
    /// Dial a PSTN number, answered on bridge
    DialNumber {
        target: String,
        caller_id: String,
    },
    /// Dial a registered client, answered on bridge
    DialClient {
        target: String,
        caller_id: Option<String>,
        display_name: Option<String>,
    },
}
