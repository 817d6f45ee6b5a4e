//! Document loading for the binary: turns a path into plain resume text.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::errors::AppError;

/// Path argument that means "read standard input".
pub const STDIN_PATH: &str = "-";

/// Reads `path` as plain text (`.txt`, `.text`, `.md`, no extension) or
/// extracts the text layer of a `.pdf`, then normalizes it.
pub fn read_document(path: &Path) -> Result<String, AppError> {
    if path == Path::new(STDIN_PATH) {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .map_err(|e| AppError::io(path, e))?;
        return Ok(clean_text(&String::from_utf8_lossy(&bytes)));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let raw = match extension.as_str() {
        "txt" | "text" | "md" | "" => {
            let bytes = std::fs::read(path).map_err(|e| AppError::io(path, e))?;
            String::from_utf8_lossy(&bytes).into_owned()
        }
        "pdf" => pdf_extract::extract_text(path).map_err(|e| AppError::PdfExtraction {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?,
        other => return Err(AppError::UnsupportedFormat(other.to_string())),
    };

    debug!("Read {} bytes from {}", raw.len(), path.display());
    Ok(clean_text(&raw))
}

/// Normalizes line endings, repairs the common mojibake bullet, and drops
/// blank lines so every line carries content.
pub fn clean_text(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace(['\r', '\u{c}'], "\n")
        .replace("â€¢", "•")
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
