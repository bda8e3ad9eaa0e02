// Export: render the selected layout, paginate it onto A4 and paint a PDF.
// export_document is CPU-bound; async callers go through ExportController,
// which runs it inside tokio::task::spawn_blocking.

pub mod job;
pub mod pdf;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::errors::StudioError;
use crate::layout::{paginate, select_renderer, LayoutRenderer};
use crate::models::{ResumeContent, TemplateId};

pub use job::{ExportController, ExportStatus, ExportTicket};

pub const FALLBACK_FILENAME: &str = "Resume.pdf";

/// A finished export: the PDF bytes and what they were made from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportArtifact {
    pub filename: String,
    pub template: TemplateId,
    pub page_count: usize,
    #[serde(skip)]
    pub bytes: Bytes,
    pub generated_at: DateTime<Utc>,
}

impl ExportArtifact {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Writes the PDF into `dir` under its filename, creating `dir` if needed.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, StudioError> {
        if Path::new(&self.filename).file_name() != Some(OsStr::new(&self.filename)) {
            return Err(StudioError::Export(format!(
                "refusing to write '{}' outside {}",
                self.filename,
                dir.display()
            )));
        }
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.size(), "Wrote export");
        Ok(path)
    }
}

/// `Full_Name.pdf` from the trimmed name with whitespace runs replaced by
/// `_`; `Resume.pdf` when the name is blank.
///
/// The name ends up on disk, so path separators, reserved characters and
/// control characters also become `_`, and a stem made only of dots falls
/// back to `Resume.pdf`.
pub fn export_filename(full_name: &str) -> String {
    let stem: String = full_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if stem.chars().all(|c| c == '.') {
        FALLBACK_FILENAME.to_string()
    } else {
        format!("{stem}.pdf")
    }
}

/// Produces the PDF for a content snapshot with the layout its metadata
/// selects, the same tree the preview shows.
pub fn export_document(content: &ResumeContent) -> Result<ExportArtifact, StudioError> {
    let renderer = select_renderer(content.metadata.template);
    let tree = renderer.render(content);
    let document = paginate(&tree)?;

    let filename = export_filename(&content.personal_info.full_name);
    let generated_at = Utc::now();
    let bytes = pdf::write_pdf(&document, &filename, generated_at);
    if bytes.is_empty() {
        return Err(StudioError::Export("PDF writer produced no output".to_string()));
    }

    info!(
        template = %renderer.template(),
        pages = document.page_count(),
        bytes = bytes.len(),
        "Exported {filename}"
    );
    Ok(ExportArtifact {
        filename,
        template: renderer.template(),
        page_count: document.page_count(),
        bytes: Bytes::from(bytes),
        generated_at,
    })
}
