//! Content type detection from leading bytes.
//!
//! Used when the store has no content type recorded for an object.

/// Bytes inspected when deciding between text and binary.
const SNIFF_LEN: usize = 512;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Detect the content type of `data` using magic numbers
pub fn sniff_content_type(data: &[u8]) -> &'static str {
    let head = &data[..data.len().min(SNIFF_LEN)];

    // PDF: %PDF-
    if head.starts_with(b"%PDF-") {
        return "application/pdf";
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if head.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return "image/png";
    }

    // JPEG: FF D8 FF
    if head.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg";
    }

    // GIF: GIF87a / GIF89a
    if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        return "image/gif";
    }

    // WebP: RIFF ... WEBP
    if head.len() >= 12 && head.starts_with(b"RIFF") && &head[8..12] == b"WEBP" {
        return "image/webp";
    }

    // ZIP: PK 03 04
    if head.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
        return "application/zip";
    }

    // GZIP: 1F 8B 08
    if head.starts_with(&[0x1F, 0x8B, 0x08]) {
        return "application/x-gzip";
    }

    if let Some(markup) = sniff_markup(head) {
        return markup;
    }

    if looks_like_text(head) {
        return "text/plain; charset=utf-8";
    }

    OCTET_STREAM
}

fn sniff_markup(head: &[u8]) -> Option<&'static str> {
    let start = head
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(head.len());
    let trimmed = &head[start..];
    let lower: Vec<u8> = trimmed
        .iter()
        .take(16)
        .map(|b| b.to_ascii_lowercase())
        .collect();

    if lower.starts_with(b"<!doctype html") || lower.starts_with(b"<html") {
        return Some("text/html; charset=utf-8");
    }
    if lower.starts_with(b"<?xml") {
        return Some("text/xml; charset=utf-8");
    }
    None
}

fn looks_like_text(head: &[u8]) -> bool {
    if head.is_empty() {
        return true;
    }
    let text = match std::str::from_utf8(head) {
        Ok(text) => text,
        // A multibyte character may be cut at the sniff boundary.
        Err(e) if e.error_len().is_none() => match std::str::from_utf8(&head[..e.valid_up_to()]) {
            Ok(text) => text,
            Err(_) => return false,
        },
        Err(_) => return false,
    };
    !text
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t' | '\x0C' | '\x1B'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_common_binary_formats() {
        assert_eq!(sniff_content_type(b"%PDF-1.7\n..."), "application/pdf");
        assert_eq!(
            sniff_content_type(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00]),
            "image/png"
        );
        assert_eq!(sniff_content_type(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(sniff_content_type(b"GIF89a...."), "image/gif");
        assert_eq!(sniff_content_type(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(sniff_content_type(&[0x50, 0x4B, 0x03, 0x04, 0x14]), "application/zip");
    }

    #[test]
    fn test_detects_text_and_markup() {
        assert_eq!(sniff_content_type(b"hello world\n"), "text/plain; charset=utf-8");
        assert_eq!(
            sniff_content_type(b"  <!DOCTYPE html><html></html>"),
            "text/html; charset=utf-8"
        );
        assert_eq!(sniff_content_type(b"<?xml version=\"1.0\"?>"), "text/xml; charset=utf-8");
    }

    #[test]
    fn test_falls_back_to_octet_stream() {
        assert_eq!(sniff_content_type(&[0x00, 0x01, 0x02, 0xFE]), OCTET_STREAM);
    }
}
