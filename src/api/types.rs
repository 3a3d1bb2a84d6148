/// Wire data structures for the profile backend
///
/// These structs mirror the JSON bodies the REST API produces and
/// consumes. Field names on the wire are camelCase; everything optional
/// on the server side defaults instead of failing the decode.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A photo in the journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Unique backend ID
    pub id: i64,
    /// Where the full-size image lives (CDN URL)
    pub image_url: String,
    /// Free-form tag grouping photos by subject
    pub topic: String,
    /// Free-text description shown in the detail view
    #[serde(default)]
    pub description: String,
    /// When the photo was uploaded
    pub upload_date: DateTime<Utc>,
    /// Milestones this photo is tagged to
    #[serde(default)]
    pub tagged_milestone_ids: Vec<i64>,
}

/// A milestone in the progress tree
///
/// The backend may deliver these either as a nested hierarchy (children
/// inside `sub_milestones`) or as a flat list where only `parent_id`
/// carries the structure. Both shapes, and mixtures, are tolerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// Unique backend ID
    pub id: i64,
    /// What needs to be done
    pub task: String,
    /// Whether the milestone is done
    #[serde(default)]
    pub completed: bool,
    /// Fractional progress (0.0-1.0), when the backend tracks it
    #[serde(default)]
    pub completion_rate: Option<f32>,
    /// Parent milestone ID; absent on roots
    #[serde(default)]
    pub parent_id: Option<i64>,
    /// Nested children, when the backend delivers a hierarchy
    #[serde(default)]
    pub sub_milestones: Vec<Milestone>,
}

impl Milestone {
    /// Progress as a percentage.
    ///
    /// Prefers the explicit fractional rate when present; otherwise the
    /// completed flag maps to 100 or 0.
    pub fn completion_percent(&self) -> f32 {
        match self.completion_rate {
            Some(rate) => rate * 100.0,
            None => {
                if self.completed {
                    100.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// A user as listed on the discovery screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// Unique backend ID
    pub id: i64,
    /// Name to show in the listing
    pub display_name: String,
    /// Avatar image URL, if the user set one
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A user's full profile, fetched when viewing someone else's page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Unique backend ID
    pub id: i64,
    /// Name to show on the profile
    pub display_name: String,
    /// The user's milestone tree (roots, possibly nested)
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    /// The user's photo journal
    #[serde(default)]
    pub photos: Vec<Photo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_photo_with_absent_optionals() {
        let body = r#"{
            "id": 7,
            "imageUrl": "https://cdn.example/p/7.jpg",
            "topic": "Climbing",
            "uploadDate": "2024-11-02T09:30:00Z"
        }"#;

        let photo: Photo = serde_json::from_str(body).unwrap();
        assert_eq!(photo.id, 7);
        assert_eq!(photo.topic, "Climbing");
        assert!(photo.description.is_empty());
        assert!(photo.tagged_milestone_ids.is_empty());
    }

    #[test]
    fn test_decode_nested_milestones() {
        let body = r#"{
            "id": 1,
            "task": "Learn to swim",
            "completed": false,
            "completionRate": 0.5,
            "subMilestones": [
                { "id": 2, "task": "Float", "completed": true, "parentId": 1 }
            ]
        }"#;

        let milestone: Milestone = serde_json::from_str(body).unwrap();
        assert_eq!(milestone.sub_milestones.len(), 1);
        assert_eq!(milestone.sub_milestones[0].parent_id, Some(1));
        assert!(milestone.parent_id.is_none());
    }

    #[test]
    fn test_completion_percent_prefers_explicit_rate() {
        let mut milestone = Milestone {
            id: 1,
            task: "Run a marathon".to_string(),
            completed: true,
            completion_rate: Some(0.25),
            parent_id: None,
            sub_milestones: Vec::new(),
        };
        // Explicit rate wins over the completed flag
        assert_eq!(milestone.completion_percent(), 25.0);

        milestone.completion_rate = None;
        assert_eq!(milestone.completion_percent(), 100.0);

        milestone.completed = false;
        assert_eq!(milestone.completion_percent(), 0.0);
    }

    #[test]
    fn test_decode_profile_defaults_to_empty_lists() {
        let body = r#"{ "id": 3, "displayName": "Robin" }"#;

        let profile: Profile = serde_json::from_str(body).unwrap();
        assert!(profile.milestones.is_empty());
        assert!(profile.photos.is_empty());
    }
}
