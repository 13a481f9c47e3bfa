//! Message classification and log rendering.

use std::fmt;

use axum::extract::ws::Message;

/// Kind of a data message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// UTF-8 text.
    Text,
    /// Opaque bytes.
    Binary,
}

impl MessageKind {
    /// Lowercase label used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed payload of a data message, rendered verbatim for the log.
///
/// Text is written as-is; binary as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// Payload of a text message.
    Text(&'a str),
    /// Payload of a binary message.
    Binary(&'a [u8]),
}

impl<'a> Payload<'a> {
    /// Borrows the payload of `msg`, returning `None` for ping, pong and
    /// close frames.
    #[must_use]
    pub fn of(msg: &'a Message) -> Option<Self> {
        match msg {
            Message::Text(text) => Some(Self::Text(text.as_str())),
            Message::Binary(bytes) => Some(Self::Binary(bytes.as_ref())),
            Message::Ping(_) | Message::Pong(_) | Message::Close(_) => None,
        }
    }

    /// Kind of the message this payload came from.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::Text(_) => MessageKind::Text,
            Self::Binary(_) => MessageKind::Binary,
        }
    }

    /// Payload length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Binary(bytes) => bytes.len(),
        }
    }

    /// Returns `true` if the payload has no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Binary(bytes) => {
                for b in *bytes {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_frames_have_a_payload() {
        let text = Message::text("hi");
        let binary = Message::binary(vec![1u8]);
        assert_eq!(Payload::of(&text), Some(Payload::Text("hi")));
        assert_eq!(
            Payload::of(&binary).map(|p| p.kind()),
            Some(MessageKind::Binary)
        );
    }

    #[test]
    fn control_frames_have_no_payload() {
        let ping = Message::Ping(Vec::<u8>::new().into());
        let pong = Message::Pong(Vec::<u8>::new().into());
        let close = Message::Close(None);
        assert_eq!(Payload::of(&ping), None);
        assert_eq!(Payload::of(&pong), None);
        assert_eq!(Payload::of(&close), None);
    }

    #[test]
    fn text_payload_logged_verbatim() {
        let payload = Payload::Text("ping");
        assert_eq!(payload.to_string(), "ping");
        assert_eq!(payload.len(), 4);
        assert_eq!(payload.kind().to_string(), "text");
    }

    #[test]
    fn binary_payload_logged_as_hex() {
        let payload = Payload::Binary(&[0x01, 0x02, 0xab]);
        assert_eq!(payload.to_string(), "0102ab");
        assert_eq!(payload.len(), 3);
    }

    #[test]
    fn empty_payload() {
        let msg = Message::binary(Vec::<u8>::new());
        let payload = Payload::of(&msg);
        assert!(payload.is_some_and(|p| p.is_empty()));
        assert_eq!(payload.map(|p| p.to_string()), Some(String::new()));
    }
}
