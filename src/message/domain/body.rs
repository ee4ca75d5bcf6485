//! Message body types representing the two content variants a message
//! may carry.
//!
//! A message is either text or an image reference, never both. The body is
//! serialised with a `type` tag so the variant survives JSONB persistence
//! round trips.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The content of a message.
///
/// Exactly one variant is populated per message, matching the message's
/// kind. Bodies are immutable once the message is created.
///
/// # Serialisation
///
/// Bodies are serialised with a `type` tag field:
///
/// ```json
/// { "type": "text", "text": "hello" }
/// { "type": "image", "image_ref": "ab12….jpg", "mime_type": "image/jpeg" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageBody {
    /// Plain text content.
    Text(TextBody),
    /// A reference to an image held in the media store.
    Image(ImageBody),
}

impl MessageBody {
    /// Creates a text body.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextBody::new(text))
    }

    /// Creates an image body.
    #[must_use]
    pub fn image(image_ref: ImageRef, mime_type: impl Into<String>) -> Self {
        Self::Image(ImageBody::new(image_ref, mime_type))
    }

    /// Returns the kind tag matching this body.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::Text(_) => MessageKind::Text,
            Self::Image(_) => MessageKind::Image,
        }
    }
}

/// Text content within a message.
///
/// # Examples
///
/// ```
/// use parley::message::domain::TextBody;
///
/// let text = TextBody::new("hello");
/// assert!(!text.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBody {
    /// The text content.
    pub text: String,
}

impl TextBody {
    /// Creates a new text body.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Returns `true` if the text content is empty or whitespace-only.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Returns the length of the text content in characters.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// An image reference within a message.
///
/// The bytes themselves live in the media store; the body carries only the
/// store reference and the MIME type recorded at upload time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBody {
    /// Reference into the media store.
    pub image_ref: ImageRef,
    /// The MIME type recorded when the image was uploaded.
    pub mime_type: String,
}

impl ImageBody {
    /// Creates a new image body.
    #[must_use]
    pub fn new(image_ref: ImageRef, mime_type: impl Into<String>) -> Self {
        Self {
            image_ref,
            mime_type: mime_type.into(),
        }
    }

    /// Returns `true` if the body has valid structure.
    ///
    /// A valid image body carries an `image/*` MIME type.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Error returned when an image reference fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid image reference '{0}'")]
pub struct ParseImageRefError(String);

/// A validated reference to an image held in the media store.
///
/// References are opaque tokens of the form `<hex digest>.<extension>`,
/// produced by the media store's content-hash addressing. Parsing rejects
/// anything that could escape the store directory: path separators, parent
/// references, and non-alphanumeric characters.
///
/// # Examples
///
/// ```
/// use parley::message::domain::ImageRef;
///
/// let image_ref: ImageRef = "0a1b2c3d.jpg".parse().expect("valid reference");
/// assert_eq!(image_ref.as_str(), "0a1b2c3d.jpg");
/// assert!("../../etc/passwd".parse::<ImageRef>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the file extension portion of the reference, if any.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(_, ext)| ext)
    }
}

impl FromStr for ImageRef {
    type Err = ParseImageRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let well_formed = !s.is_empty()
            && s.len() <= 128
            && !s.starts_with('.')
            && !s.ends_with('.')
            && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '.')
            && !s.contains("..");

        if well_formed {
            Ok(Self(s.to_owned()))
        } else {
            Err(ParseImageRefError(s.to_owned()))
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a message kind tag fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown message kind '{0}'; expected 'text' or 'image'")]
pub struct ParseMessageKindError(String);

/// Discriminates the two message content variants.
///
/// The kind is derived from the body and is what clients send in the
/// `messageType` multipart field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// A text message.
    Text,
    /// An image message.
    Image,
}

impl MessageKind {
    /// Returns the canonical string tag for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

impl TryFrom<&str> for MessageKind {
    type Error = ParseMessageKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            other => Err(ParseMessageKindError(other.to_owned())),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
