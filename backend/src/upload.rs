use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Failed to save upload to {}: {source}", path.display())]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Case-insensitive extension check against the allowed upload formats.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Strips directory components and anything outside `[A-Za-z0-9._-]` from a
/// client-supplied filename. Never yields an empty or dot-only name.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Transient upload written under the scratch directory. The file is removed
/// when the guard drops, so every handler exit path cleans up after itself.
///
/// Scratch names carry a per-request UUID prefix; concurrent uploads of the
/// same filename never share a path.
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn persist(uploads_dir: &Path, filename: &str, data: &[u8]) -> Result<Self, UploadError> {
        let name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(filename));
        let path = uploads_dir.join(name);
        fs::write(&path, data).map_err(|source| UploadError::Save {
            path: path.clone(),
            source,
        })?;
        info!("Image saved at: {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => info!("Removed scratch file: {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove scratch file {}: {}", self.path.display(), e),
        }
    }
}
