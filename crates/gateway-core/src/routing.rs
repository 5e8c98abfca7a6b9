//! Call routing
//!
//! Maps a normalized call setup request onto exactly one [`CallPlan`]:
//!
//! ```text
//! kind == conference        -> DialConference(to, recording if record == "true")
//! to absent or empty        -> SayGreeting(first call)
//! to is a phone number      -> DialNumber(to, configured caller number)
//! otherwise                 -> DialClient(to, from, name)
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::GatewayConfig;
use crate::destination::classify;
use crate::markup::MarkupSerializer;
use crate::types::{CallKind, CallPlan, CallSetupRequest, DestinationKind, RecordingPolicy};
use crate::Result;

/// Spoken when a client calls without a destination
pub const FIRST_CALL_GREETING: &str = "Congratulations! You have made your first call! Good bye.";

pub struct CallRouter {
    config: Arc<GatewayConfig>,
    serializer: Arc<dyn MarkupSerializer>,
}

impl CallRouter {
    pub fn new(config: Arc<GatewayConfig>, serializer: Arc<dyn MarkupSerializer>) -> Self {
        Self { config, serializer }
    }

    /// Decide the call plan for a request
    pub fn route(&self, request: &CallSetupRequest) -> Result<CallPlan> {
        if request.kind == CallKind::Conference {
            let recording = if request.wants_recording() {
                RecordingPolicy::FromStart {
                    status_callback: self.config.recording_status_callback()?.to_string(),
                }
            } else {
                RecordingPolicy::Disabled
            };
            return Ok(CallPlan::DialConference {
                room: request.to.clone(),
                recording,
            });
        }

        let Some(to) = request.destination() else {
            return Ok(CallPlan::SayGreeting(FIRST_CALL_GREETING.to_string()));
        };

        match classify(to) {
            DestinationKind::PhoneNumber => Ok(CallPlan::DialNumber {
                target: to.to_string(),
                caller_id: self.config.caller_number()?.to_string(),
            }),
            DestinationKind::ClientName => Ok(CallPlan::DialClient {
                target: to.to_string(),
                caller_id: request.from.clone(),
                display_name: request.display_name.clone(),
            }),
        }
    }

    /// Route a request and render the resulting plan
    pub fn respond(&self, request: &CallSetupRequest) -> Result<String> {
        let plan = self.route(request)?;
        debug!(?plan, "Routed call");
        self.render(&plan)
    }

    pub fn render(&self, plan: &CallPlan) -> Result<String> {
        let markup = self.serializer.serialize(plan)?;
        info!("Response: {}", markup);
        Ok(markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::TwimlSerializer;
    use crate::Error;

    const CALLBACK: &str = "https://example.com/recordingComplete";

    fn router(config: GatewayConfig) -> CallRouter {
        CallRouter::new(Arc::new(config), Arc::new(TwimlSerializer::new()))
    }

    fn configured() -> CallRouter {
        router(GatewayConfig {
            caller_number: Some("1234567890".to_string()),
            recording_status_callback: Some(CALLBACK.to_string()),
            ..Default::default()
        })
    }

    fn request(kind: CallKind, to: Option<&str>) -> CallSetupRequest {
        CallSetupRequest {
            kind,
            to: to.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_conference_with_recording() {
        let mut req = request(CallKind::Conference, Some("room1"));
        req.record = Some("true".to_string());

        let plan = configured().route(&req).unwrap();
        assert_eq!(plan, CallPlan::DialConference {
            room: Some("room1".to_string()),
            recording: RecordingPolicy::FromStart { status_callback: CALLBACK.to_string() },
        });
    }

    #[test]
    fn test_conference_record_flag_must_be_literal_true() {
        let mut req = request(CallKind::Conference, Some("room1"));
        req.record = Some("True".to_string());

        let plan = configured().route(&req).unwrap();
        assert_eq!(plan, CallPlan::DialConference {
            room: Some("room1".to_string()),
            recording: RecordingPolicy::Disabled,
        });
    }

    #[test]
    fn test_conference_wins_over_number_destination() {
        let plan = configured().route(&request(CallKind::Conference, Some("+15551234567"))).unwrap();
        assert!(matches!(plan, CallPlan::DialConference { .. }));
    }

    #[test]
    fn test_first_call_greeting() {
        let router = configured();
        for req in [request(CallKind::Default, None), request(CallKind::Direct, Some(""))] {
            assert_eq!(
                router.route(&req).unwrap(),
                CallPlan::SayGreeting("Congratulations! You have made your first call! Good bye.".to_string())
            );
        }
    }

    #[test]
    fn test_number_uses_configured_caller_id() {
        let mut req = request(CallKind::Default, Some("+15551234567"));
        req.from = Some("alice-device".to_string());

        let plan = configured().route(&req).unwrap();
        assert_eq!(plan, CallPlan::DialNumber {
            target: "+15551234567".to_string(),
            caller_id: "1234567890".to_string(),
        });
    }

    #[test]
    fn test_client_uses_request_caller_id() {
        let req = CallSetupRequest {
            kind: CallKind::Direct,
            to: Some("bob".to_string()),
            from: Some("alice-device".to_string()),
            display_name: Some("Alice".to_string()),
            record: None,
        };

        let plan = configured().route(&req).unwrap();
        assert_eq!(plan, CallPlan::DialClient {
            target: "bob".to_string(),
            caller_id: Some("alice-device".to_string()),
            display_name: Some("Alice".to_string()),
        });
    }

    #[test]
    fn test_missing_caller_number() {
        let router = router(GatewayConfig::default());
        let result = router.route(&request(CallKind::Default, Some("5")));
        assert!(matches!(result, Err(Error::ConfigurationMissing("CALLER_NUMBER"))));

        // Client dials and greetings need no configuration
        assert!(router.route(&request(CallKind::Default, Some("bob"))).is_ok());
        assert!(router.route(&request(CallKind::Default, None)).is_ok());
    }

    #[test]
    fn test_missing_recording_callback() {
        let router = router(GatewayConfig::default());
        let mut req = request(CallKind::Conference, Some("room1"));
        assert!(router.route(&req).is_ok());

        req.record = Some("true".to_string());
        assert!(matches!(
            router.route(&req),
            Err(Error::ConfigurationMissing("RECORDING_STATUS_CALLBACK"))
        ));
    }

    #[test]
    fn test_route_is_idempotent() {
        let router = configured();
        let req = CallSetupRequest {
            kind: CallKind::Default,
            to: Some("bob".to_string()),
            from: Some("alice-device".to_string()),
            display_name: Some("Alice".to_string()),
            record: Some("true".to_string()),
        };
        assert_eq!(router.route(&req).unwrap(), router.route(&req).unwrap());
        assert_eq!(router.respond(&req).unwrap(), router.respond(&req).unwrap());
    }

    #[test]
    fn test_respond_renders_markup() {
        let markup = configured().respond(&request(CallKind::Default, Some("bob"))).unwrap();
        assert!(markup.contains("<Client>bob"));
        assert!(markup.contains(r#"answerOnBridge="true""#));
        assert!(!markup.contains("<Say>"));
    }
}
