//! Capability grants embedded in access tokens

use serde::{Deserialize, Serialize};

use crate::config::GatewayConfig;
use crate::types::CapabilityRequest;

/// Permission to place and receive voice calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceGrant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outgoing: Option<OutgoingApplication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_credential_sid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingApplication {
    pub application_sid: String,
}

/// Permission to join video rooms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoGrant {}

/// The single grant carried by a credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityGrant {
    Voice(VoiceGrant),
    Video(VideoGrant),
}

impl CapabilityGrant {
    /// Build the grant for a capability request from the configured identifiers
    pub fn for_request(request: CapabilityRequest, config: &GatewayConfig) -> Self {
        match request {
            CapabilityRequest::Voice { sub_channel } => CapabilityGrant::Voice(VoiceGrant {
                outgoing: config.app_sid().map(|sid| OutgoingApplication {
                    application_sid: sid.to_string(),
                }),
                push_credential_sid: config.push_credential_sid(sub_channel).map(str::to_string),
            }),
            CapabilityRequest::Video => CapabilityGrant::Video(VideoGrant::default()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CapabilityGrant::Voice(_) => "voice",
            CapabilityGrant::Video(_) => "video",
        }
    }
}

/// The `grants` claim of an access token: the identity plus exactly one grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSet {
    pub identity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<VoiceGrant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoGrant>,
}

impl GrantSet {
    pub fn new(identity: &str, grant: &CapabilityGrant) -> Self {
        let (voice, video) = match grant {
            CapabilityGrant::Voice(voice) => (Some(voice.clone()), None),
            CapabilityGrant::Video(video) => (None, Some(video.clone())),
        };
        Self {
            identity: identity.to_string(),
            voice,
            video,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SubChannel;
    use serde_json::json;

    fn config() -> GatewayConfig {
        GatewayConfig {
            app_sid: Some("AP123".to_string()),
            push_credential_sid_android: Some("CR-android".to_string()),
            push_credential_sid_sandbox: Some("CR-sandbox".to_string()),
            push_credential_sid_production: Some("CR-production".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_voice_grant_per_sub_channel() {
        let config = config();
        let cases = [
            (SubChannel::Android, "CR-android"),
            (SubChannel::Sandbox, "CR-sandbox"),
            (SubChannel::Production, "CR-production"),
        ];

        for (sub_channel, expected) in cases {
            let grant = CapabilityGrant::for_request(CapabilityRequest::Voice { sub_channel }, &config);
            match grant {
                CapabilityGrant::Voice(voice) => {
                    assert_eq!(voice.push_credential_sid.as_deref(), Some(expected));
                    assert_eq!(voice.outgoing.unwrap().application_sid, "AP123");
                }
                other => panic!("expected voice grant, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_grant_set_payload() {
        let grant = CapabilityGrant::for_request(
            CapabilityRequest::Voice { sub_channel: SubChannel::Android },
            &config(),
        );
        let payload = serde_json::to_value(GrantSet::new("bob", &grant)).unwrap();
        assert_eq!(payload, json!({
            "identity": "bob",
            "voice": {
                "outgoing": { "application_sid": "AP123" },
                "push_credential_sid": "CR-android"
            }
        }));

        let video = CapabilityGrant::for_request(CapabilityRequest::Video, &config());
        let payload = serde_json::to_value(GrantSet::new("bob", &video)).unwrap();
        assert_eq!(payload, json!({ "identity": "bob", "video": {} }));
    }

    #[test]
    fn test_unset_identifiers_are_omitted() {
        let grant = CapabilityGrant::for_request(
            CapabilityRequest::Voice { sub_channel: SubChannel::Sandbox },
            &GatewayConfig::default(),
        );
        let payload = serde_json::to_value(GrantSet::new("alice", &grant)).unwrap();
        assert_eq!(payload, json!({ "identity": "alice", "voice": {} }));
    }
}
