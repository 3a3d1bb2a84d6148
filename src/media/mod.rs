/// Image download and cache management
///
/// - fetch.rs: download + cache one photo's media off the UI thread
/// - thumbnail.rs: thumbnail generation, cache directories, orphan sweep

pub mod fetch;
pub mod thumbnail;

pub use fetch::{fetch_photo_media, CachedMedia};
pub use thumbnail::{sweep_orphans, SweepResult};
