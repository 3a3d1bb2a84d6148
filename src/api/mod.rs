/// Backend data access
///
/// This module is the only place that talks to the profile service:
/// - Wire DTOs shared with the backend (types.rs)
/// - The REST client, one method per endpoint (client.rs)

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{Milestone, Photo, Profile, UserSummary};
