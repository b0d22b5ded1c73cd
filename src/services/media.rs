/// Local media storage for profile pictures and post images.
///
/// Uploads are validated by decoding the payload, then written synchronously
/// under the configured media root as `{slug}-{uuid}.{ext}`. Stored paths are
/// relative to the root so the root can move between deployments.
use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::utils::slugify;

pub const PROFILE_SUBDIR: &str = "uploads/profiles";
pub const POST_SUBDIR: &str = "uploads/posts";

#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the upload directories if they don't exist yet.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for subdir in [PROFILE_SUBDIR, POST_SUBDIR] {
            fs::create_dir_all(self.root.join(subdir))?;
        }
        Ok(())
    }

    /// Validate and store an uploaded image; returns the relative media path.
    pub fn save_image(&self, subdir: &str, base_name: &str, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            return Err(AppError::Validation("Empty image payload".to_string()));
        }

        let format = image::guess_format(bytes)
            .map_err(|_| AppError::Validation("Unrecognized image format".to_string()))?;

        // A plausible magic number is not enough; reject truncated payloads.
        image::load_from_memory(bytes)
            .map_err(|e| AppError::Validation(format!("Invalid image payload: {}", e)))?;

        let ext = extension_for(format);
        let filename = format!("{}-{}.{}", slugify(base_name), Uuid::new_v4(), ext);
        let relative = format!("{}/{}", subdir, filename);
        let target = self.root.join(&relative);

        fs::write(&target, bytes)
            .map_err(|e| AppError::Internal(format!("Failed to store image: {}", e)))?;

        Ok(relative)
    }

    /// Best-effort removal of a previously stored file.
    pub fn remove(&self, relative: &str) {
        // Stored paths are generated by save_image; anything else is refused.
        if Path::new(relative)
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            tracing::warn!(%relative, "refusing to remove path outside media root");
            return;
        }

        let target = self.root.join(relative);
        if let Err(e) = fs::remove_file(&target) {
            tracing::debug!(%relative, "media file removal failed: {}", e);
        }
    }
}

fn extension_for(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("bin")
}
