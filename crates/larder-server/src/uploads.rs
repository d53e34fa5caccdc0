//! Storage for uploaded item images
//!
//! Images land in a single flat directory and are referenced from items by
//! their public path, `/uploads/<file>`. Stored names are generated; the
//! client's filename only contributes its extension.

use std::path::PathBuf;

use rand::Rng;
use tracing::{debug, warn};

/// URL prefix under which stored images are served
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Longest extension carried over from the client's filename
const MAX_EXTENSION_LEN: usize = 8;

/// Image directory handle shared by the item handlers
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write an image and return its public path
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let filename = generate_filename(original_name);
        tokio::fs::write(self.dir.join(&filename), bytes).await?;
        debug!(file = %filename, size = bytes.len(), "Stored upload");

        Ok(format!("{}/{}", UPLOADS_URL_PREFIX, filename))
    }

    /// Delete the file behind a public path
    ///
    /// Best effort: a missing file or a path that resolves outside the
    /// uploads directory is logged and left alone.
    pub async fn remove(&self, public_path: &str) {
        let Some(path) = self.resolve(public_path) else {
            warn!(
                "Image path outside uploads directory, skipping delete: {}",
                public_path
            );
            return;
        };

        // Path traversal protection
        let inside = match (
            tokio::fs::canonicalize(&path).await,
            tokio::fs::canonicalize(&self.dir).await,
        ) {
            (Ok(canonical_file), Ok(canonical_dir)) => canonical_file.starts_with(&canonical_dir),
            _ => {
                debug!("Image already gone: {}", public_path);
                return;
            }
        };

        if !inside {
            warn!(
                "Image path outside uploads directory, skipping delete: {}",
                public_path
            );
            return;
        }

        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!("Failed to delete image {}: {}", public_path, e);
        }
    }

    /// Map a public path to a file inside the uploads directory
    fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let name = public_path
            .strip_prefix(UPLOADS_URL_PREFIX)?
            .strip_prefix('/')?;

        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return None;
        }

        Some(self.dir.join(name))
    }
}

/// Build a stored filename: `<unix millis>-<9 random digits><.ext>`
pub fn generate_filename(original_name: Option<&str>) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(100_000_000..1_000_000_000);

    match original_name.and_then(extension_of) {
        Some(ext) => format!("{}-{}.{}", millis, suffix, ext),
        None => format!("{}-{}", millis, suffix),
    }
}

fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_filename_keeps_extension() {
        let name = generate_filename(Some("milk carton.JPG"));
        assert!(name.ends_with(".jpg"));

        let (millis, rest) = name.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        let digits = rest.trim_end_matches(".jpg");
        assert_eq!(digits.len(), 9);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_filename_drops_odd_extensions() {
        assert!(!generate_filename(None).contains('.'));
        assert!(!generate_filename(Some("noext")).contains('.'));
        assert!(!generate_filename(Some(".hidden")).contains('.'));
        assert!(!generate_filename(Some("evil.p/hp")).contains('.'));
        assert!(!generate_filename(Some("long.abcdefghijk")).contains('.'));
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let store = UploadStore::new("/tmp/larder-uploads");
        assert!(store.resolve("/uploads/abc.png").is_some());
        assert!(store.resolve("/uploads/../secret").is_none());
        assert!(store.resolve("/uploads/..").is_none());
        assert!(store.resolve("/etc/passwd").is_none());
        assert!(store.resolve("/uploads/").is_none());
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("images"));

        let public = store.save(Some("photo.png"), b"png-bytes").await.unwrap();
        assert!(public.starts_with("/uploads/"));

        let on_disk = store.resolve(&public).unwrap();
        assert_eq!(std::fs::read(&on_disk).unwrap(), b"png-bytes");

        store.remove(&public).await;
        assert!(!on_disk.exists());

        // Removing again is a no-op
        store.remove(&public).await;
    }
}
