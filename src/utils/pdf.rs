// PDF text extraction over the `pdf-extract` crate.
// Always keep this module small and dependency-light.

use anyhow::{anyhow, Result};
use std::panic::{self, AssertUnwindSafe};

/// Extracts the text layer of a PDF held fully in memory.
/// Pages are concatenated in document order, each followed by a newline.
///
/// An empty or whitespace-only result is NOT an error here; the caller
/// decides how to report a PDF without extractable text (e.g. scanned pages).
pub fn extract_text(content: &[u8]) -> Result<String> {
    let pages = extract_pages(content)?;

    let mut text = String::new();
    for page in pages {
        text.push_str(&page);
        text.push('\n');
    }
    Ok(text)
}

// `pdf-extract` can panic on malformed input rather than returning an error;
// the unwind boundary turns those panics into plain extraction errors.
fn extract_pages(content: &[u8]) -> Result<Vec<String>> {
    let owned = content.to_vec();
    match panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&owned)
    })) {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(anyhow!("{}", e)),
        Err(_) => Err(anyhow!("PDF parser panicked on malformed document")),
    }
}
