//! Export of the current payload under a derived file name.
//!
//! Exporting never re-encodes: it hands out the bytes the size estimator
//! already produced.

use crate::encode::{EncodedPayload, OutputFormat};

/// A file ready for the host's download sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn from_payload(
        payload: &EncodedPayload,
        original_name: &str,
        substituted: bool,
        suffix: &str,
    ) -> Self {
        Self {
            file_name: output_file_name(original_name, payload.format, substituted, suffix),
            mime_type: payload.mime_type(),
            bytes: payload.bytes.clone(),
        }
    }
}

/// Derive `"{basename}{suffix}.{ext}"` from the original file name.
///
/// The original extension is kept unless the output format was substituted
/// (e.g. GIF exported as PNG), in which case the output format's extension is
/// used. Names without an extension also get the output format's extension.
pub fn output_file_name(
    original: &str,
    format: OutputFormat,
    substituted: bool,
    suffix: &str,
) -> String {
    let (base, ext) = match original.rsplit_once('.') {
        Some((base, ext)) if !ext.is_empty() => (base, Some(ext)),
        Some((base, _)) => (base, None),
        None => (original, None),
    };

    let ext = match ext {
        Some(ext) if !substituted => ext,
        _ => format.extension(),
    };

    format!("{base}{suffix}.{ext}")
}
