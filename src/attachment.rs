//! Attachment handles yielded by the host's file picker.
//!
//! The core only stores these references; it never reads or validates the
//! underlying bytes.

use serde::{Deserialize, Serialize};

/// A selected file: name, MIME type and size as reported by the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl Attachment {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    /// Build a handle from a file name, guessing the MIME type from its
    /// extension.
    pub fn from_name(name: impl Into<String>, size_bytes: u64) -> Self {
        let name = name.into();
        let mime_type = guess_mime(&name).to_string();
        Self {
            name,
            mime_type,
            size_bytes,
        }
    }

    /// Parse a console token of the form `name` or `name:bytes`.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        match token.rsplit_once(':') {
            Some((name, size)) if !name.is_empty() => match size.parse::<u64>() {
                Ok(size) => Some(Self::from_name(name, size)),
                Err(_) => Some(Self::from_name(token, 0)),
            },
            _ => Some(Self::from_name(token, 0)),
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }
}

impl std::fmt::Display for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {} bytes)", self.name, self.mime_type, self.size_bytes)
    }
}

fn guess_mime(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
