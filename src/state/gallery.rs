/// Photo gallery state
///
/// Owns the photo source, the derived tag set, the tag filter, the
/// single-photo detail selection, and the upload-panel flag. All
/// derivations are plain functions over the photo list so the view stays
/// a pure render of this struct.
use std::collections::HashMap;

use iced::widget::image;

use crate::api::{Milestone, Photo};

/// The synthetic filter entry that shows every photo
pub const ALL_TAG: &str = "All";

#[derive(Debug, Clone, Default)]
pub struct GalleryState {
    /// The photo source currently shown
    pub photos: Vec<Photo>,
    /// Milestone records used to resolve a photo's tagged milestones
    pub milestones: Vec<Milestone>,
    /// The subset of `photos` the grid displays
    pub filtered: Vec<Photo>,
    /// Distinct topics in order of first appearance (without "All")
    pub tags: Vec<String>,
    /// Currently selected filter tag
    pub selected_tag: String,
    /// Photo open in the detail overlay, if any
    pub selected_photo: Option<Photo>,
    /// Whether the upload form is expanded
    pub upload_open: bool,
    /// Suppresses the upload affordance (viewing someone else's photos)
    pub read_only: bool,
    /// Photos were supplied by the caller; skip network refreshes
    pub supplied: bool,
    /// Grid thumbnails by photo ID, filled in as downloads finish
    pub thumbnails: HashMap<i64, image::Handle>,
    /// Full-size cache files by photo ID, for the detail overlay
    pub originals: HashMap<i64, std::path::PathBuf>,
    /// The upload form behind the expandable panel
    pub upload: UploadForm,
}

impl GalleryState {
    /// Gallery backed by the shared client; photos arrive via a fetch.
    pub fn new(milestones: Vec<Milestone>) -> Self {
        GalleryState {
            milestones,
            selected_tag: ALL_TAG.to_string(),
            ..GalleryState::default()
        }
    }

    /// Gallery over an externally supplied photo list (another user's
    /// profile). Never triggers a network call of its own.
    pub fn with_photos(
        photos: Vec<Photo>,
        milestones: Vec<Milestone>,
        initial_tag: Option<String>,
        read_only: bool,
    ) -> Self {
        let mut gallery = GalleryState {
            milestones,
            selected_tag: initial_tag.unwrap_or_else(|| ALL_TAG.to_string()),
            read_only,
            supplied: true,
            ..GalleryState::default()
        };
        gallery.set_photos(photos);
        gallery
    }

    /// Replace the photo source and re-derive tags and the filtered list.
    /// The selected tag is kept; a tag that no longer occurs simply
    /// filters down to an empty grid.
    pub fn set_photos(&mut self, photos: Vec<Photo>) {
        self.tags = derive_tags(&photos);
        self.photos = photos;
        self.refilter();
    }

    /// Apply a newly selected filter tag.
    pub fn select_tag(&mut self, tag: String) {
        self.selected_tag = tag;
        self.refilter();
    }

    fn refilter(&mut self) {
        self.filtered = filter_photos(&self.photos, &self.selected_tag);
    }

    /// Filter options for the dropdown: "All" plus every derived tag.
    pub fn filter_options(&self) -> Vec<String> {
        let mut options = Vec::with_capacity(self.tags.len() + 1);
        options.push(ALL_TAG.to_string());
        options.extend(self.tags.iter().cloned());
        options
    }

    /// Open the detail overlay for one photo. Only one photo can be
    /// selected at a time; selecting another replaces it.
    pub fn select_photo(&mut self, photo: Photo) {
        self.selected_photo = Some(photo);
    }

    /// Close the detail overlay.
    pub fn close_detail(&mut self) {
        self.selected_photo = None;
    }

    pub fn toggle_upload(&mut self) {
        self.upload_open = !self.upload_open;
    }

    /// Record a finished media download.
    pub fn set_media(&mut self, photo_id: i64, thumbnail: image::Handle, original: std::path::PathBuf) {
        self.thumbnails.insert(photo_id, thumbnail);
        self.originals.insert(photo_id, original);
    }

    /// The milestones a photo is tagged to, resolved against the
    /// milestone source including nested children.
    pub fn milestones_for(&self, photo: &Photo) -> Vec<Milestone> {
        let mut found = Vec::new();
        collect_tagged(&self.milestones, &photo.tagged_milestone_ids, &mut found);
        found
    }
}

/// Distinct topics in order of first appearance, duplicates collapsed.
pub fn derive_tags(photos: &[Photo]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for photo in photos {
        if !tags.contains(&photo.topic) {
            tags.push(photo.topic.clone());
        }
    }
    tags
}

/// The subset of `photos` a filter tag displays: everything for "All",
/// the topic-matching subset otherwise.
pub fn filter_photos(photos: &[Photo], tag: &str) -> Vec<Photo> {
    if tag == ALL_TAG {
        photos.to_vec()
    } else {
        photos.iter().filter(|p| p.topic == tag).cloned().collect()
    }
}

/// State of the expandable upload form
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    /// File picked through the native dialog
    pub file: Option<std::path::PathBuf>,
    pub topic: String,
    pub description: String,
    /// Milestones the new photo will be tagged to
    pub tagged_milestone_ids: Vec<i64>,
    /// An upload request is on the wire
    pub in_flight: bool,
}

impl UploadForm {
    /// A submission needs at least a file and a topic.
    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.topic.trim().is_empty() && !self.in_flight
    }

    pub fn toggle_milestone(&mut self, id: i64, tagged: bool) {
        if tagged {
            if !self.tagged_milestone_ids.contains(&id) {
                self.tagged_milestone_ids.push(id);
            }
        } else {
            self.tagged_milestone_ids.retain(|&m| m != id);
        }
    }

    /// Clear everything after a successful upload.
    pub fn reset(&mut self) {
        *self = UploadForm::default();
    }
}

/// Every milestone as a flat (id, task) list, nested children included.
/// Feeds the upload form's tag checkboxes.
pub fn flatten_milestones(milestones: &[Milestone]) -> Vec<(i64, String)> {
    let mut flat = Vec::new();
    for milestone in milestones {
        flat.push((milestone.id, milestone.task.clone()));
        flat.extend(flatten_milestones(&milestone.sub_milestones));
    }
    flat
}

fn collect_tagged(milestones: &[Milestone], ids: &[i64], found: &mut Vec<Milestone>) {
    for milestone in milestones {
        if ids.contains(&milestone.id) {
            found.push(milestone.clone());
        }
        collect_tagged(&milestone.sub_milestones, ids, found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn photo(id: i64, topic: &str) -> Photo {
        Photo {
            id,
            image_url: format!("https://cdn.example/p/{}.jpg", id),
            topic: topic.to_string(),
            description: String::new(),
            upload_date: Utc.with_ymd_and_hms(2024, 11, 2, 9, 30, 0).unwrap(),
            tagged_milestone_ids: Vec::new(),
        }
    }

    #[test]
    fn test_all_filter_shows_everything() {
        let photos = vec![photo(1, "Hiking"), photo(2, "Baking"), photo(3, "Hiking")];
        assert_eq!(filter_photos(&photos, ALL_TAG), photos);
    }

    #[test]
    fn test_tag_filter_shows_exact_topic_subset() {
        let photos = vec![photo(1, "Hiking"), photo(2, "Baking"), photo(3, "Hiking")];
        let filtered = filter_photos(&photos, "Hiking");
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|p| p.topic == "Hiking"));

        assert!(filter_photos(&photos, "Sailing").is_empty());
    }

    #[test]
    fn test_tags_preserve_first_occurrence_order_and_collapse_duplicates() {
        let photos = vec![
            photo(1, "Hiking"),
            photo(2, "Baking"),
            photo(3, "Hiking"),
            photo(4, "Chess"),
        ];

        let tags = derive_tags(&photos);
        assert_eq!(tags, vec!["Hiking", "Baking", "Chess"]);
        // Deriving again changes nothing
        assert_eq!(derive_tags(&photos), tags);
    }

    #[test]
    fn test_filter_options_lead_with_all() {
        let mut gallery = GalleryState::new(Vec::new());
        gallery.set_photos(vec![photo(1, "Hiking"), photo(2, "Baking")]);
        assert_eq!(gallery.filter_options(), vec!["All", "Hiking", "Baking"]);
    }

    #[test]
    fn test_selecting_tag_refilters() {
        let mut gallery = GalleryState::new(Vec::new());
        gallery.set_photos(vec![photo(1, "Hiking"), photo(2, "Baking")]);
        assert_eq!(gallery.filtered.len(), 2);

        gallery.select_tag("Baking".to_string());
        assert_eq!(gallery.filtered.len(), 1);
        assert_eq!(gallery.filtered[0].id, 2);
    }

    #[test]
    fn test_single_selection_opens_and_closes_cleanly() {
        let mut gallery = GalleryState::new(Vec::new());
        gallery.set_photos(vec![photo(1, "Hiking"), photo(2, "Baking")]);

        gallery.select_photo(gallery.filtered[0].clone());
        assert_eq!(gallery.selected_photo.as_ref().map(|p| p.id), Some(1));

        // Selecting another photo replaces the first
        gallery.select_photo(gallery.filtered[1].clone());
        assert_eq!(gallery.selected_photo.as_ref().map(|p| p.id), Some(2));

        gallery.close_detail();
        assert!(gallery.selected_photo.is_none());
    }

    #[test]
    fn test_supplied_photos_skip_fetch_and_honor_initial_tag() {
        let gallery = GalleryState::with_photos(
            vec![photo(1, "Hiking"), photo(2, "Baking")],
            Vec::new(),
            Some("Baking".to_string()),
            true,
        );

        assert!(gallery.supplied);
        assert!(gallery.read_only);
        assert_eq!(gallery.filtered.len(), 1);
        assert_eq!(gallery.filtered[0].topic, "Baking");
    }

    #[test]
    fn test_upload_form_gating_and_milestone_toggling() {
        let mut form = UploadForm::default();
        assert!(!form.can_submit());

        form.file = Some(std::path::PathBuf::from("/photos/cake.jpg"));
        form.topic = "Baking".to_string();
        assert!(form.can_submit());

        form.in_flight = true;
        assert!(!form.can_submit());

        form.toggle_milestone(5, true);
        form.toggle_milestone(5, true);
        assert_eq!(form.tagged_milestone_ids, vec![5]);

        form.toggle_milestone(5, false);
        assert!(form.tagged_milestone_ids.is_empty());

        form.reset();
        assert!(form.file.is_none());
        assert!(!form.in_flight);
    }

    #[test]
    fn test_flatten_milestones_includes_nested_children() {
        let nested = Milestone {
            id: 2,
            task: "Float".to_string(),
            completed: false,
            completion_rate: None,
            parent_id: Some(1),
            sub_milestones: Vec::new(),
        };
        let root = Milestone {
            id: 1,
            task: "Learn to swim".to_string(),
            completed: false,
            completion_rate: None,
            parent_id: None,
            sub_milestones: vec![nested],
        };

        let flat = flatten_milestones(&[root]);
        assert_eq!(
            flat,
            vec![(1, "Learn to swim".to_string()), (2, "Float".to_string())]
        );
    }

    #[test]
    fn test_milestones_resolve_through_nested_children() {
        let nested = Milestone {
            id: 2,
            task: "Float".to_string(),
            completed: true,
            completion_rate: None,
            parent_id: Some(1),
            sub_milestones: Vec::new(),
        };
        let root = Milestone {
            id: 1,
            task: "Learn to swim".to_string(),
            completed: false,
            completion_rate: None,
            parent_id: None,
            sub_milestones: vec![nested],
        };

        let mut gallery = GalleryState::new(vec![root]);
        let mut p = photo(1, "Swimming");
        p.tagged_milestone_ids = vec![2];
        gallery.set_photos(vec![p.clone()]);

        let tagged = gallery.milestones_for(&p);
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].task, "Float");
    }
}
