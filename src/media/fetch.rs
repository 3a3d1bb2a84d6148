/// Photo download and caching
///
/// Downloads a photo's image bytes, stores the full-size file for the
/// detail view, and generates the grid thumbnail. Decode and resize are
/// CPU-bound and run on a blocking thread, never on the UI loop.
use std::path::{Path, PathBuf};

use crate::api::ApiClient;

use super::thumbnail;

/// Cached files for one photo
#[derive(Debug, Clone)]
pub struct CachedMedia {
    pub photo_id: i64,
    /// 256 px grid thumbnail
    pub thumbnail: PathBuf,
    /// Full-size download for the detail overlay
    pub original: PathBuf,
}

/// Download and cache one photo's media.
///
/// Skips the network entirely when both cache files already exist, so
/// startup from a warm cache costs no requests.
pub async fn fetch_photo_media(
    client: ApiClient,
    photo_id: i64,
    image_url: String,
) -> Result<CachedMedia, String> {
    let thumb_dir = thumbnail::thumbnail_cache_dir();
    let originals_dir = thumbnail::originals_cache_dir();

    let original = originals_dir.join(original_file_name(photo_id, &image_url));
    let cached_thumb = thumb_dir.join(format!("{}.jpg", photo_id));

    if original.exists() && cached_thumb.exists() {
        return Ok(CachedMedia {
            photo_id,
            thumbnail: cached_thumb,
            original,
        });
    }

    let bytes = client
        .fetch_image(&image_url)
        .await
        .map_err(|e| format!("Failed to download {}: {}", image_url, e))?;

    // Decode + resize off the UI thread
    tokio::task::spawn_blocking(move || cache_blocking(photo_id, bytes, &original, &thumb_dir))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

fn cache_blocking(
    photo_id: i64,
    bytes: Vec<u8>,
    original: &Path,
    thumb_dir: &Path,
) -> Result<CachedMedia, String> {
    std::fs::write(original, &bytes)
        .map_err(|e| format!("Failed to cache original: {}", e))?;

    let thumbnail = thumbnail::make_thumbnail(&bytes, photo_id, thumb_dir)?;

    Ok(CachedMedia {
        photo_id,
        thumbnail,
        original: original.to_path_buf(),
    })
}

/// Cache file name for the full-size download, keeping the URL's
/// extension when it has a usable one.
fn original_file_name(photo_id: i64, image_url: &str) -> String {
    let extension = image_url
        .rsplit('/')
        .next()
        .and_then(|name| name.split('?').next())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| ext.len() <= 4 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("jpg");

    format!("{}.{}", photo_id, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_file_name_keeps_url_extension() {
        assert_eq!(
            original_file_name(3, "https://cdn.example/p/photo.png?token=abc"),
            "3.png"
        );
        assert_eq!(original_file_name(3, "https://cdn.example/p/photo"), "3.jpg");
        assert_eq!(
            original_file_name(3, "https://cdn.example/p/photo.image-long-ext"),
            "3.jpg"
        );
    }
}
