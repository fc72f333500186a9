//! Word-to-PDF conversion via headless LibreOffice.
//!
//! pdfium only understands PDF, so `.doc`/`.docx` inputs take a detour
//! through `soffice --headless --convert-to pdf`. The converted file is
//! written into a fresh `TempDir`; each conversion gets its own directory, so
//! concurrent runs can never collide on an output name. The directory (and
//! therefore the temporary PDF) is removed when [`ConvertedPdf`] drops —
//! on success, on any later pipeline failure, and on panic alike.

use crate::error::ManualError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info};

/// A Word document converted to a temporary PDF.
///
/// Holds the `TempDir` so the PDF lives exactly as long as this value.
pub struct ConvertedPdf {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl ConvertedPdf {
    /// Path to the temporary PDF.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Convert a Word document to a PDF in a scoped temporary directory.
///
/// Requires LibreOffice (`soffice`) on `PATH`. A missing converter, a
/// corrupt input, or a conversion that produces no output all surface as
/// [`ManualError::ConversionError`].
pub async fn convert_to_pdf(input: &Path) -> Result<ConvertedPdf, ManualError> {
    let temp_dir = TempDir::new().map_err(|e| ManualError::Internal(e.to_string()))?;

    info!("Converting {} to PDF", input.display());

    let output = Command::new("soffice")
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(temp_dir.path())
        .arg(input)
        .output()
        .await
        .map_err(|e| ManualError::ConversionError {
            path: input.to_path_buf(),
            detail: format!("failed to run LibreOffice (soffice): {e}"),
        })?;

    if !output.status.success() {
        return Err(ManualError::ConversionError {
            path: input.to_path_buf(),
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    // soffice writes <stem>.pdf into the output directory.
    let stem = input
        .file_stem()
        .ok_or_else(|| ManualError::ConversionError {
            path: input.to_path_buf(),
            detail: "input has no file name".to_string(),
        })?;
    let pdf_path = temp_dir.path().join(Path::new(stem).with_extension("pdf"));

    if !pdf_path.exists() {
        return Err(ManualError::ConversionError {
            path: input.to_path_buf(),
            detail: format!("no PDF produced at {}", pdf_path.display()),
        });
    }

    debug!("Converted to temporary PDF: {}", pdf_path.display());

    Ok(ConvertedPdf {
        path: pdf_path,
        _temp_dir: temp_dir,
    })
}
