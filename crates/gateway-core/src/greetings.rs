//! Fixed greetings for inbound and welcome calls

use tracing::info;

use crate::markup::MarkupSerializer;
use crate::types::CallPlan;
use crate::Result;

pub const INBOUND_GREETING: &str = "Congratulations! You have received your first inbound call! Good bye.";
pub const WELCOME_GREETING: &str = "Welcome to Twilio";

pub fn incoming() -> CallPlan {
    CallPlan::SayGreeting(INBOUND_GREETING.to_string())
}

pub fn welcome() -> CallPlan {
    CallPlan::SayGreeting(WELCOME_GREETING.to_string())
}

pub fn render_incoming(serializer: &dyn MarkupSerializer) -> Result<String> {
    render(serializer, &incoming())
}

pub fn render_welcome(serializer: &dyn MarkupSerializer) -> Result<String> {
    render(serializer, &welcome())
}

fn render(serializer: &dyn MarkupSerializer, plan: &CallPlan) -> Result<String> {
    let markup = serializer.serialize(plan)?;
    info!("Response: {}", markup);
    Ok(markup)
}
