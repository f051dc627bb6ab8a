mod docx;
mod pdf;
mod rtf;
mod txt;

use std::path::Path;

use thiserror::Error;
use tracing::debug;
use verbatim_core::Document;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("DOCX extraction failed: {0}")]
    DocxError(String),
    #[error("RTF conversion failed: {0}")]
    RtfError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source formats the pipeline knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pdf,
    Rtf,
    Docx,
    Txt,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "rtf" => Some(Self::Rtf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Rtf => "rtf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }
}

/// Whether `path` has an extension one of the readers handles.
pub fn is_supported(path: &Path) -> bool {
    SourceFormat::from_path(path).is_some()
}

/// Settings for readers that shell out to external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// `pandoc` binary used for RTF conversion.
    pub pandoc_bin: String,
}

impl ReadOptions {
    pub fn new(pandoc_bin: impl Into<String>) -> Self {
        Self {
            pandoc_bin: pandoc_bin.into(),
        }
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self::new("pandoc")
    }
}

/// Result of extracting text from a source file.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Original filename.
    pub filename: String,
    pub format: SourceFormat,
    /// Plain text body.
    pub text: String,
}

/// Extract text from file bytes based on the filename's extension.
pub fn extract_text(
    bytes: &[u8],
    filename: &str,
    options: &ReadOptions,
) -> Result<ExtractedDocument, ExtractionError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let format = SourceFormat::from_extension(&ext)
        .ok_or_else(|| ExtractionError::UnsupportedType(format!("{filename} (.{ext})")))?;

    let text = match format {
        SourceFormat::Pdf => pdf::extract_pdf(bytes)?,
        SourceFormat::Rtf => rtf::extract_rtf(bytes, &options.pandoc_bin)?,
        SourceFormat::Docx => docx::extract_docx(bytes)?,
        SourceFormat::Txt => txt::extract_txt(bytes)?,
    };

    Ok(ExtractedDocument {
        filename: filename.to_string(),
        format,
        text,
    })
}

/// Read a source file from disk into a [`Document`].
///
/// The extension is checked before the file is opened so unsupported inputs
/// fail without touching the filesystem.
pub fn read_document(path: &Path, options: &ReadOptions) -> Result<Document, ExtractionError> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    if !is_supported(path) {
        return Err(ExtractionError::UnsupportedType(filename));
    }

    let bytes = std::fs::read(path)?;
    let extracted = extract_text(&bytes, &filename, options)?;
    debug!(
        file = %filename,
        format = extracted.format.as_str(),
        chars = extracted.text.len(),
        "extracted document text"
    );
    Ok(Document::new(path, extracted.text))
}
