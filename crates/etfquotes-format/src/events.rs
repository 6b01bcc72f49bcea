//! Wire encodings for streamed progress events.

use etfquotes_types::ProgressEvent;
use std::io::Write;

use crate::FormatError;

/// How progress events are framed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventEncoding {
    /// One JSON object per line.
    #[default]
    Ndjson,
    /// Server-Sent Events: `data: {json}` followed by a blank line.
    Sse,
}

impl EventEncoding {
    /// Returns the name of this encoding.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ndjson => "ndjson",
            Self::Sse => "sse",
        }
    }

    /// Returns the HTTP content type of a stream in this encoding.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Ndjson => "application/x-ndjson",
            Self::Sse => "text/event-stream",
        }
    }

    /// Encodes one event as a complete frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be serialized.
    pub fn encode(&self, event: &ProgressEvent) -> Result<String, FormatError> {
        let json = serde_json::to_string(event)?;
        Ok(match self {
            Self::Ndjson => format!("{json}\n"),
            Self::Sse => format!("data: {json}\n\n"),
        })
    }

    /// Writes one event frame and flushes, so consumers see it immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_event<W: Write>(
        &self,
        event: &ProgressEvent,
        mut writer: W,
    ) -> Result<(), FormatError> {
        writer.write_all(self.encode(event)?.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl std::fmt::Display for EventEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventEncoding {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "sse" | "event-stream" => Ok(Self::Sse),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}
