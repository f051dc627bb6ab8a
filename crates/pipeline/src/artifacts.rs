//! Where inputs are found and where processed artifacts land.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::warn;
use verbatim_core::document::source_stem;

use crate::orchestrator::PipelineError;

/// Naming of the per-document output files inside one output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub output_dir: PathBuf,
    /// Extension of the intermediate text artifact, without the dot.
    pub intermediate_extension: String,
}

impl OutputLayout {
    pub fn new(output_dir: impl Into<PathBuf>, intermediate_extension: &str) -> Self {
        Self {
            output_dir: output_dir.into(),
            intermediate_extension: intermediate_extension.trim_start_matches('.').to_string(),
        }
    }

    /// `<output_dir>/<stem>_processed.<ext>`
    pub fn intermediate_path(&self, source: &Path) -> PathBuf {
        self.output_dir.join(format!(
            "{}_processed.{}",
            source_stem(source),
            self.intermediate_extension
        ))
    }

    /// `<output_dir>/<stem>_processed.pdf`
    pub fn rendered_path(&self, source: &Path) -> PathBuf {
        self.output_dir
            .join(format!("{}_processed.pdf", source_stem(source)))
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new("output", "md")
    }
}

/// The per-run `input_<date>` and `output_<date>` folders under `save_path`.
pub fn dated_folders(save_path: &Path, date: NaiveDate) -> (PathBuf, PathBuf) {
    let stamp = date.format("%Y-%m-%d");
    (
        save_path.join(format!("input_{stamp}")),
        save_path.join(format!("output_{stamp}")),
    )
}

/// Create today's dated folders (local date) and return them. Logging the
/// chosen folders is left to the caller.
pub fn create_dated_folders(save_path: &Path) -> Result<(PathBuf, PathBuf), PipelineError> {
    let today = chrono::Local::now().date_naive();
    let (input, output) = dated_folders(save_path, today);
    for dir in [&input, &output] {
        std::fs::create_dir_all(dir).map_err(|source| PipelineError::Io {
            path: dir.clone(),
            source,
        })?;
    }
    Ok((input, output))
}

/// Regular files directly inside `dir`, sorted by name. Subdirectories are
/// not descended into.
pub fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            // the root itself failing means there is nothing to process
            Err(e) if e.depth() == 0 => {
                return Err(PipelineError::Walk {
                    path: dir.to_path_buf(),
                    source: e,
                })
            }
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_names_follow_source_stem() {
        let layout = OutputLayout::new("/out", ".md");
        let src = Path::new("/in/Interview 3.docx");
        assert_eq!(
            layout.intermediate_path(src),
            PathBuf::from("/out/Interview 3_processed.md")
        );
        assert_eq!(
            layout.rendered_path(src),
            PathBuf::from("/out/Interview 3_processed.pdf")
        );
    }

    #[test]
    fn intermediate_extension_is_configurable() {
        let layout = OutputLayout::new("out", "txt");
        assert_eq!(
            layout.intermediate_path(Path::new("a.pdf")),
            PathBuf::from("out/a_processed.txt")
        );
    }

    #[test]
    fn dated_folder_names() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 3).unwrap();
        let (input, output) = dated_folders(Path::new("data"), date);
        assert_eq!(input, PathBuf::from("data/input_2024-07-03"));
        assert_eq!(output, PathBuf::from("data/output_2024-07-03"));
    }

    #[test]
    fn dated_folders_are_created_under_save_path() {
        let save = std::env::temp_dir().join(format!("verbatim-dated-{}", uuid::Uuid::new_v4()));
        let (input, output) = create_dated_folders(&save).unwrap();
        assert!(input.is_dir());
        assert!(output.is_dir());
        assert_eq!(input.parent(), Some(save.as_path()));
        assert!(input.file_name().unwrap().to_string_lossy().starts_with("input_"));

        // a second call on the same day reuses the folders
        assert_eq!(create_dated_folders(&save).unwrap(), (input, output));
        std::fs::remove_dir_all(&save).ok();
    }
}
