//! DOCX text extraction.
//!
//! A DOCX file is a ZIP archive; the body lives in `word/document.xml` as
//! WordprocessingML. Text runs (`<w:t>`) are concatenated per paragraph
//! (`<w:p>`) and paragraphs are joined with newlines. Inside
//! `mc:AlternateContent` only the `mc:Choice` branch is read; `mc:Fallback`
//! repeats the same content for older readers.

use std::io::{Cursor, Read};

use super::ExtractionError;

const DOCUMENT_XML: &str = "word/document.xml";

pub fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::DocxError(format!("not a DOCX (zip) archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| ExtractionError::DocxError(format!("missing {DOCUMENT_XML}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::DocxError(format!("unreadable {DOCUMENT_XML}: {e}")))?;

    Ok(paragraphs_from_xml(&xml).join("\n"))
}

/// Walk the tags of `document.xml` and collect the text of each paragraph.
fn paragraphs_from_xml(xml: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut fallback_depth = 0usize;
    let mut rest = xml;

    while let Some(open) = rest.find('<') {
        if in_text && fallback_depth == 0 {
            current.push_str(&decode_entities(&rest[..open]));
        }
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let tag = &rest[open + 1..open + close];
        rest = &rest[open + close + 1..];

        let closing = tag.starts_with('/');
        let self_closing = tag.ends_with('/');
        let name = tag
            .trim_start_matches('/')
            .trim_end_matches('/')
            .split_whitespace()
            .next()
            .unwrap_or("");

        if name == "mc:Fallback" {
            if closing {
                fallback_depth = fallback_depth.saturating_sub(1);
            } else if !self_closing {
                fallback_depth += 1;
            }
            continue;
        }
        if fallback_depth > 0 {
            continue;
        }

        match (name, closing) {
            ("w:t", false) => in_text = !self_closing,
            ("w:t", true) => in_text = false,
            ("w:tab", false) => current.push('\t'),
            ("w:br" | "w:cr", false) => current.push('\n'),
            ("w:p", true) => paragraphs.push(std::mem::take(&mut current)),
            ("w:p", false) if self_closing => paragraphs.push(String::new()),
            _ => {}
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }
    paragraphs
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn make_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCUMENT_XML, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>
<w:p><w:pPr><w:pStyle w:val="Normal"/></w:pPr><w:r><w:t>Interviewer: Can you tell us </w:t></w:r><w:r><w:t xml:space="preserve">about the project?</w:t></w:r></w:p>
<w:p><w:r><w:t>Guest: Rock &amp; roll &lt;mostly&gt;.</w:t></w:r></w:p>
<w:p/>
<w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t><w:tab/><w:t>text</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
</w:body>
</w:document>"#;

    #[test]
    fn paragraphs_are_joined_with_newlines() {
        let text = extract_docx(&make_docx(BODY)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Interviewer: Can you tell us about the project?");
        assert_eq!(lines[1], "Guest: Rock & roll <mostly>.");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "cell\ttext");
    }

    #[test]
    fn style_tags_do_not_leak_text() {
        let paragraphs = paragraphs_from_xml(BODY);
        assert!(paragraphs.iter().all(|p| !p.contains("Normal")));
    }

    #[test]
    fn text_box_fallback_is_not_duplicated() {
        let xml = r#"<w:document><w:body>
<w:p><w:r><w:t>Before the box.</w:t></w:r></w:p>
<w:p><w:r><mc:AlternateContent>
<mc:Choice Requires="wps"><w:drawing><wps:txbx><w:txbxContent><w:p><w:r><w:t>Boxed quote</w:t></w:r></w:p></w:txbxContent></wps:txbx></w:drawing></mc:Choice>
<mc:Fallback><w:pict><v:textbox><w:txbxContent><w:p><w:r><w:t>Boxed quote</w:t></w:r></w:p></w:txbxContent></v:textbox></w:pict></mc:Fallback>
</mc:AlternateContent></w:r></w:p>
<w:p><w:r><w:t>After the box.</w:t></w:r></w:p>
</w:body></w:document>"#;
        let text = extract_docx(&make_docx(xml)).unwrap();
        assert_eq!(text.matches("Boxed quote").count(), 1);
        assert!(text.contains("Before the box."));
        assert!(text.ends_with("After the box."));
    }

    #[test]
    fn not_a_zip_is_docx_error() {
        let err = extract_docx(b"plain bytes").unwrap_err();
        assert!(matches!(err, ExtractionError::DocxError(_)));
    }

    #[test]
    fn zip_without_document_is_docx_error() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = extract_docx(&bytes).unwrap_err();
        assert!(matches!(err, ExtractionError::DocxError(_)));
    }
}
