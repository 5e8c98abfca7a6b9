//! Voice response markup generation

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::types::{CallPlan, RecordingPolicy};
use crate::{Error, Result};

/// Renders a [`CallPlan`] into the text returned to the telephony platform
pub trait MarkupSerializer: Send + Sync {
    fn serialize(&self, plan: &CallPlan) -> Result<String>;
}

/// TwiML voice response writer
#[derive(Debug, Clone, Copy, Default)]
pub struct TwimlSerializer;

impl TwimlSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl MarkupSerializer for TwimlSerializer {
    fn serialize(&self, plan: &CallPlan) -> Result<String> {
        let mut doc = TwimlWriter::new();

        doc.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        doc.start(BytesStart::new("Response"))?;

        match plan {
            CallPlan::SayGreeting(text) => {
                doc.text_element(BytesStart::new("Say"), text)?;
            }
            CallPlan::DialConference { room, recording } => {
                doc.start(BytesStart::new("Dial"))?;

                let mut conference = BytesStart::new("Conference");
                conference.push_attribute(("waitUrl", ""));
                if let RecordingPolicy::FromStart { status_callback } = recording {
                    conference.push_attribute(("record", "record-from-start"));
                    conference.push_attribute(("recordingStatusCallback", status_callback.as_str()));
                }
                match room {
                    Some(room) => doc.text_element(conference, room)?,
                    None => doc.write(Event::Empty(conference))?,
                }

                doc.end("Dial")?;
            }
            CallPlan::DialNumber { target, caller_id } => {
                doc.start(bridged_dial(Some(caller_id.as_str())))?;
                doc.text_element(BytesStart::new("Number"), target)?;
                doc.end("Dial")?;
            }
            CallPlan::DialClient { target, caller_id, display_name } => {
                doc.start(bridged_dial(caller_id.as_deref()))?;
                doc.start(BytesStart::new("Client"))?;
                doc.write(Event::Text(BytesText::new(target)))?;

                let mut parameter = BytesStart::new("Parameter");
                parameter.push_attribute(("name", "name"));
                if let Some(display_name) = display_name {
                    parameter.push_attribute(("value", display_name.as_str()));
                }
                doc.write(Event::Empty(parameter))?;

                doc.end("Client")?;
                doc.end("Dial")?;
            }
        }

        doc.end("Response")?;
        doc.finish()
    }
}

/// `<Dial>` that only answers the caller once the far leg connects
fn bridged_dial(caller_id: Option<&str>) -> BytesStart<'_> {
    let mut dial = BytesStart::new("Dial");
    if let Some(caller_id) = caller_id {
        dial.push_attribute(("callerId", caller_id));
    }
    dial.push_attribute(("answerOnBridge", "true"));
    dial
}

struct TwimlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl TwimlWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new(Cursor::new(Vec::new())),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::Markup(e.to_string()))
    }

    fn start(&mut self, element: BytesStart<'_>) -> Result<()> {
        self.write(Event::Start(element))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, element: BytesStart<'_>, text: &str) -> Result<()> {
        let end = element.to_end().into_owned();
        self.start(element)?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.write(Event::End(end))
    }

    fn finish(self) -> Result<String> {
        let xml = self.writer.into_inner().into_inner();
        String::from_utf8(xml).map_err(|e| Error::Markup(e.to_string()))
    }
}
