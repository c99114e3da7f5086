//! Push-channel wire messages. Plain text frames, no framing beyond that.

/// Viewer request for the shared secret.
pub const GET_KEY: &str = "get_key";

/// Prefix of the secret delivery message.
pub const KEY_PREFIX: &str = "key:";

/// Broadcast sent after every successful ingest.
pub const IMAGES_UPDATED: &str = "Images updated";

/// A frame received from a viewer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inbound {
    GetKey,
    /// Anything else. Ignored by the server.
    Other,
}

impl Inbound {
    pub fn parse(text: &str) -> Self {
        if text == GET_KEY {
            Self::GetKey
        } else {
            Self::Other
        }
    }
}

/// A frame sent to a viewer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outbound<'a> {
    Key(&'a str),
    ImagesUpdated,
}

impl Outbound<'_> {
    pub fn render(&self) -> String {
        match self {
            Self::Key(secret) => format!("{KEY_PREFIX}{secret}"),
            Self::ImagesUpdated => IMAGES_UPDATED.to_string(),
        }
    }
}
