//! MIME sniffing based on magic signatures in the leading bytes.
//! The claimed Content-Type header and the URL extension are deliberately
//! ignored; only the byte content decides.

/// How many leading bytes are inspected for signatures.
const HEAD_LIMIT: usize = 512;

// Common magic signatures
const PDF: &[u8] = b"%PDF-"; // PDF
const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]; // PNG
const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF]; // JPEG
const GIF: &[u8] = b"GIF8"; // GIF87a/GIF89a
const RIFF: &[u8] = b"RIFF"; // RIFF container (WebP, WAV, AVI)
const WEBP: &[u8] = b"WEBP"; // WebP signature after RIFF
const ZIP: &[u8] = &[0x50, 0x4B, 0x03, 0x04]; // ZIP
const GZIP: &[u8] = &[0x1F, 0x8B]; // GZIP
const RAR: &[u8] = b"Rar!"; // RAR
const SEVEN_Z: &[u8] = &[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C]; // 7z

/// Determines the MIME type of a byte buffer from its magic header.
/// Unrecognized content falls back to `text/plain` when it decodes as UTF-8
/// and `application/octet-stream` otherwise.
pub fn sniff_mime(content: &[u8]) -> &'static str {
    if content.is_empty() {
        return "application/x-empty";
    }

    let head = &content[..content.len().min(HEAD_LIMIT)];

    let starts_with = |pat: &[u8]| head.len() >= pat.len() && &head[..pat.len()] == pat;

    if starts_with(PDF) {
        return "application/pdf";
    }
    if starts_with(PNG) {
        return "image/png";
    }
    if starts_with(JPEG) {
        return "image/jpeg";
    }
    if starts_with(GIF) {
        return "image/gif";
    }
    if starts_with(RIFF) && head.len() >= 12 && &head[8..12] == WEBP {
        return "image/webp";
    }
    if starts_with(ZIP) {
        return "application/zip";
    }
    if starts_with(GZIP) {
        return "application/gzip";
    }
    if starts_with(RAR) {
        return "application/x-rar";
    }
    if starts_with(SEVEN_Z) {
        return "application/x-7z-compressed";
    }

    if looks_like_html(head) {
        return "text/html";
    }

    if is_utf8_text(head, content.len() > HEAD_LIMIT) {
        return "text/plain";
    }

    "application/octet-stream"
}

/// Confirms the content sniffs as a PDF; on failure returns the detected
/// MIME type so the caller can name it in its error. Pure check.
pub fn ensure_pdf(content: &[u8]) -> Result<(), &'static str> {
    match sniff_mime(content) {
        "application/pdf" => Ok(()),
        other => Err(other),
    }
}

// A multibyte sequence cut short by the head slice must not reclassify an
// otherwise valid text body; `error_len() == None` marks exactly that case
// and is accepted only when the slice really was cut.
fn is_utf8_text(head: &[u8], truncated: bool) -> bool {
    match std::str::from_utf8(head) {
        Ok(_) => true,
        Err(e) => truncated && e.error_len().is_none(),
    }
}

/// HTML has no fixed magic number; check for a document marker near the start,
/// case-insensitively, skipping leading whitespace.
fn looks_like_html(head: &[u8]) -> bool {
    const MARKERS: &[&[u8]] = &[b"<!doctype html", b"<html", b"<head", b"<body"];

    let trimmed: Vec<u8> = head
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .map(|b| b.to_ascii_lowercase())
        .collect();

    MARKERS.iter().any(|marker| trimmed.starts_with(marker))
}

#[cfg(test)]
mod tests {
    use super::{ensure_pdf, sniff_mime};

    #[test]
    fn detects_pdf_magic() {
        assert_eq!(sniff_mime(b"%PDF-1.7 rest of the document"), "application/pdf");
    }

    #[test]
    fn detects_html_regardless_of_case_and_whitespace() {
        assert_eq!(sniff_mime(b"  <!DOCTYPE HTML><html></html>"), "text/html");
        assert_eq!(sniff_mime(b"<html lang=\"pt-BR\">"), "text/html");
    }

    #[test]
    fn detects_png() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert_eq!(sniff_mime(&png), "image/png");
    }

    #[test]
    fn plain_utf8_is_text() {
        assert_eq!(sniff_mime("apenas texto comum".as_bytes()), "text/plain");
    }

    #[test]
    fn invalid_utf8_is_octet_stream() {
        assert_eq!(sniff_mime(&[0x00, 0xFF, 0xFE, 0x01]), "application/octet-stream");
    }

    #[test]
    fn empty_buffer_has_its_own_type() {
        assert_eq!(sniff_mime(b""), "application/x-empty");
    }

    #[test]
    fn multibyte_char_split_at_head_boundary_is_still_text() {
        // 511 ASCII bytes followed by "é": the 512-byte head slice ends in
        // the middle of the two-byte sequence.
        let mut content = vec![b'a'; 511];
        content.extend_from_slice("é o fim do extrato".as_bytes());
        assert_eq!(sniff_mime(&content), "text/plain");
    }

    #[test]
    fn ensure_pdf_accepts_pdf_content() {
        assert!(ensure_pdf(b"%PDF-1.4 corpo do documento").is_ok());
    }

    #[test]
    fn ensure_pdf_names_the_detected_type() {
        assert_eq!(
            ensure_pdf(b"<html><body>pagina de erro</body></html>"),
            Err("text/html")
        );
    }

    #[test]
    fn pdf_extension_does_not_matter() {
        // Only content decides; an HTML page served as .pdf is still HTML.
        assert_eq!(sniff_mime(b"<html><body>404</body></html>"), "text/html");
    }
}
