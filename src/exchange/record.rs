//! Records and their on-disk representation

use crate::columns::{Attributes, Scalar};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// One extracted document
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Unique identifying URL of the document
    pub locator: String,

    /// Document title
    pub title: Option<String>,

    /// Raw document body
    pub content: Vec<u8>,

    /// Extra columns
    pub attributes: Attributes,
}

impl Record {
    /// Creates a record with no title, content or attributes
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            title: None,
            content: Vec::new(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Merges `attributes` into the record; incoming values win on conflict
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Converts the record to its wire form
    ///
    /// The host rejects empty content, so an empty body becomes a single space.
    pub fn to_document(&self) -> Document {
        let content: &[u8] = if self.content.is_empty() {
            b" "
        } else {
            &self.content
        };

        Document {
            docurl: self.locator.clone(),
            title: self.title.clone().unwrap_or_default(),
            content: STANDARD.encode(content),
            columns: self.attributes.clone(),
        }
    }
}

/// Wire form of a record inside a batch file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub docurl: String,
    pub title: String,
    /// Base64 (standard alphabet) of the raw content
    pub content: String,
    #[serde(default)]
    pub columns: Attributes,
}

impl Document {
    /// Decodes the content back to raw bytes
    pub fn decode_content(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.content)
    }
}

/// Top-level JSON document of one batch file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchFile {
    pub docs: Vec<Document>,
}
