use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use walkdir::WalkDir;

/// Size of generated grid thumbnails (longest edge)
const THUMBNAIL_SIZE: u32 = 256;

/// Get the thumbnail cache directory
/// Returns ~/.cache/milepost/thumbnails on Linux
pub fn thumbnail_cache_dir() -> PathBuf {
    let mut path = dirs::cache_dir()
        .or_else(dirs::home_dir)
        .expect("Could not determine cache directory");

    path.push("milepost");
    path.push("thumbnails");

    fs::create_dir_all(&path).expect("Failed to create thumbnail cache directory");

    path
}

/// Get the cache directory for full-size downloads
pub fn originals_cache_dir() -> PathBuf {
    let mut path = dirs::cache_dir()
        .or_else(dirs::home_dir)
        .expect("Could not determine cache directory");

    path.push("milepost");
    path.push("originals");

    fs::create_dir_all(&path).expect("Failed to create originals cache directory");

    path
}

/// Decode downloaded image bytes and save a grid thumbnail.
///
/// The thumbnail keeps the source aspect ratio with its longest edge at
/// 256 px and is always written as JPEG (alpha flattened), named
/// `{photo_id}.jpg` inside `cache_dir`.
pub fn make_thumbnail(bytes: &[u8], photo_id: i64, cache_dir: &Path) -> Result<PathBuf, String> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| format!("Failed to decode image: {}", e))?;

    let thumbnail = img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3);

    let path = cache_dir.join(format!("{}.jpg", photo_id));
    thumbnail
        .to_rgb8()
        .save(&path)
        .map_err(|e| format!("Failed to save thumbnail: {}", e))?;

    Ok(path)
}

/// Result of a thumbnail cache sweep
#[derive(Debug, Clone)]
pub struct SweepResult {
    pub removed_count: usize,
    pub kept_count: usize,
}

/// Delete cached thumbnails whose photo no longer exists in the catalog.
///
/// Walks the cache directory and removes every `{id}.jpg` whose ID is
/// not in `live_ids`. Files that do not follow the naming scheme are not
/// ours and are left alone.
pub fn sweep_orphans(cache_dir: &Path, live_ids: &[i64]) -> SweepResult {
    let mut removed_count = 0;
    let mut kept_count = 0;

    for entry in WalkDir::new(cache_dir)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let id = path
            .file_stem()
            .and_then(|stem| stem.to_string_lossy().parse::<i64>().ok());

        match id {
            Some(id) if !live_ids.contains(&id) => {
                if let Err(e) = fs::remove_file(path) {
                    eprintln!("⚠️  Could not remove stale thumbnail {}: {}", path.display(), e);
                } else {
                    removed_count += 1;
                }
            }
            Some(_) => kept_count += 1,
            None => {}
        }
    }

    println!(
        "🧹 Thumbnail sweep: removed {}, kept {}",
        removed_count, kept_count
    );

    SweepResult {
        removed_count,
        kept_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("milepost-test-{}", name));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([40, 90, 160]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_thumbnail_is_resized_and_saved_as_jpeg() {
        let dir = temp_dir("thumb");

        let path = make_thumbnail(&png_bytes(1024, 512), 7, &dir).unwrap();
        assert_eq!(path, dir.join("7.jpg"));

        let thumb = image::open(&path).unwrap();
        // Longest edge capped, aspect ratio kept
        assert_eq!(thumb.width(), 256);
        assert_eq!(thumb.height(), 128);
    }

    #[test]
    fn test_garbage_bytes_are_an_error_not_a_panic() {
        let dir = temp_dir("garbage");
        assert!(make_thumbnail(b"not an image", 1, &dir).is_err());
    }

    #[test]
    fn test_sweep_removes_only_orphaned_thumbnails() {
        let dir = temp_dir("sweep");
        fs::write(dir.join("1.jpg"), b"a").unwrap();
        fs::write(dir.join("2.jpg"), b"b").unwrap();
        fs::write(dir.join("notes.txt"), b"not a thumbnail").unwrap();

        let result = sweep_orphans(&dir, &[1]);

        assert_eq!(result.removed_count, 1);
        assert_eq!(result.kept_count, 1);
        assert!(dir.join("1.jpg").exists());
        assert!(!dir.join("2.jpg").exists());
        // Files outside the naming scheme are untouched
        assert!(dir.join("notes.txt").exists());
    }
}
