use super::ExtractionError;

/// Extract the text layer of a PDF. Pages are separated by newlines.
///
/// Scanned PDFs without a text layer come back empty; that is not an error
/// here; the empty document simply produces no chunks downstream.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::PdfError(e.to_string()))?;

    // pdf-extract separates pages with form feeds.
    let pages: Vec<&str> = text
        .split('\x0C')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect();

    if pages.is_empty() {
        tracing::warn!("PDF has no extractable text layer");
    }

    Ok(pages.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_a_pdf_error() {
        let err = extract_pdf(b"this is not a pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::PdfError(_)));
    }
}
