//! Embedded files: blobs packaged with a connector (scripts, query files)
//! and referenced from its body by numeric id.

use std::borrow::Cow;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A file shipped alongside a connector definition.
///
/// Created by the embedded-file resolution step of the single-file parser;
/// the `reference` keeps the path as written in the original `${file::...}`
/// placeholder so generated instances stay traceable to their source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedFile {
    /// Raw file content. Variable substitution on an instance replaces this
    /// wholesale on the instance's own copy.
    content: Vec<u8>,

    /// The reference string that pointed at this file in the connector body.
    reference: String,

    /// File type derived from the extension (`awk`, `ps1`, ...), when any.
    file_type: Option<String>,
}

impl EmbeddedFile {
    /// Build an embedded file from loaded bytes and the reference that
    /// located it. The file type is derived from the reference's extension.
    pub fn new(content: Vec<u8>, reference: impl Into<String>) -> Self {
        let reference = reference.into();
        let file_type = Path::new(&reference)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_string);
        Self { content, reference, file_type }
    }

    /// The raw bytes.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Replace the content, e.g. after variable substitution.
    pub fn set_content(&mut self, content: Vec<u8>) {
        self.content = content;
    }

    /// The original reference string.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// File type derived from the reference's extension, if any.
    pub fn file_type(&self) -> Option<&str> {
        self.file_type.as_deref()
    }

    /// Decode the content as text. Embedded files are overwhelmingly scripts
    /// and query templates; invalid UTF-8 is replaced rather than rejected
    /// so substitution can still run over the readable parts.
    pub fn decode_as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}
