use std::collections::HashMap;
use std::time::Duration;

use iced::widget::{button, column, container, horizontal_space, row, text};
use iced::{Alignment, Element, Length, Point, Task, Theme};
use rfd::FileDialog;

mod api;
mod color;
mod config;
mod error;
mod graph;
mod media;
mod state;
mod ui;

use api::{ApiClient, Milestone, Photo, Profile, UserSummary};
use error::ApiError;
use state::gallery::GalleryState;
use state::library::Library;
use state::tree::{build_graph, MilestoneGraph};

/// Main application state
struct Milepost {
    /// REST client for the profile backend
    client: ApiClient,
    /// The local photo catalog
    library: Library,
    config: config::Config,
    /// The signed-in viewer's profile, once fetched
    profile: Option<Profile>,
    /// The viewer's own milestone context
    milestones: Vec<Milestone>,
    /// The viewer's own photo gallery
    gallery: GalleryState,
    discover: DiscoverState,
    /// Another user's profile page, when one is open
    profile_view: Option<ProfileView>,
    /// Which user's profile is currently being fetched
    profile_target: Option<i64>,
    tree: TreeState,
    screen: Screen,
    /// Previous navigation entries, for the back action
    history: Vec<Screen>,
    /// Status message to display to the user
    status: String,
}

/// The screens the app can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Gallery,
    Discover,
    Profile,
    Tree,
}

/// State of the discovery screen
#[derive(Debug, Clone, Default)]
pub struct DiscoverState {
    pub users: Vec<UserSummary>,
    pub loading: bool,
}

/// Another user's loaded profile plus their read-only gallery
pub struct ProfileView {
    pub profile: Profile,
    pub gallery: GalleryState,
}

/// State of the milestone tree page
#[derive(Debug, Clone)]
pub struct TreeState {
    /// User whose tree is shown; None means the viewer's own
    pub target: Option<i64>,
    /// Page title
    pub title: String,
    pub graph: MilestoneGraph,
    /// Top-left node positions: layout output plus user dragging
    pub positions: HashMap<i64, Point>,
    /// Viewport pan offset
    pub pan: cgmath::Vector2<f32>,
    pub loading: bool,
}

impl Default for TreeState {
    fn default() -> Self {
        TreeState {
            target: None,
            title: String::new(),
            graph: MilestoneGraph::default(),
            positions: HashMap::new(),
            pan: cgmath::Vector2::new(0.0, 0.0),
            loading: false,
        }
    }
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// The viewer's own profile arrived (or failed)
    SelfProfileLoaded(Result<Profile, ApiError>),
    /// The viewer's photo list arrived (or failed)
    PhotosLoaded(Result<Vec<Photo>, ApiError>),
    /// One photo's media finished downloading and caching
    MediaCached(Result<media::CachedMedia, String>),
    /// The background thumbnail sweep finished
    CacheSwept(media::SweepResult),

    /// A filter tag was picked in the visible gallery
    TagSelected(String),
    /// A grid cell was clicked
    PhotoSelected(Photo),
    /// The detail overlay was dismissed
    DetailClosed,

    /// The upload panel was expanded or collapsed
    UploadToggled,
    /// User clicked "Choose Photo…"
    UploadPickFile,
    UploadTopicChanged(String),
    UploadDescriptionChanged(String),
    UploadMilestoneToggled(i64, bool),
    UploadSubmitted,
    /// Background upload completed with the created record
    UploadFinished(Result<Photo, ApiError>),

    GalleryPressed,
    DiscoverPressed,
    /// Open the viewer's own milestone tree
    TreePressed,
    BackPressed,

    /// The discovery listing arrived (or failed)
    DiscoverLoaded(Result<Vec<UserSummary>, ApiError>),
    /// A discovered user was chosen
    UserChosen(i64),
    /// Another user's profile arrived (or failed)
    ProfileLoaded {
        user_id: i64,
        result: Result<Profile, ApiError>,
    },
    /// Open the milestone tree of the profile being viewed
    ProfileTreePressed,

    /// Milestones for the tree page arrived (or failed)
    TreeLoaded {
        target: Option<i64>,
        result: Result<Vec<Milestone>, ApiError>,
    },
    /// A node was dragged to a new position
    TreeNodeMoved { id: i64, position: Point },
    /// Empty canvas space was dragged
    TreePanned(cgmath::Vector2<f32>),
}

impl Milepost {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let (config, warning) = config::load();
        if let Some(warning) = warning {
            eprintln!("⚠️  {}", warning);
        }

        let client = ApiClient::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        );

        // If this fails, we panic because the app cannot function
        // without its catalog
        let library = Library::new()
            .expect("Failed to initialize catalog. Check permissions and disk space.");

        // Seed the gallery from the catalog so something renders before
        // the first fetch completes (or without a network at all)
        let cached_photos = library.load_photos().unwrap_or_default();
        println!("🖼️  Milepost started with {} cached photos", cached_photos.len());

        let mut gallery = GalleryState::new(Vec::new());
        gallery.set_photos(cached_photos.clone());

        if let Ok(thumbnails) = library.thumbnails() {
            for (photo_id, path) in thumbnails {
                let path = std::path::PathBuf::from(path);
                if path.exists() {
                    gallery
                        .thumbnails
                        .insert(photo_id, iced::widget::image::Handle::from_path(path));
                }
            }
        }

        let status = format!(
            "Ready. {} photos in catalog.",
            library.photo_count().unwrap_or(0)
        );

        let app = Milepost {
            client,
            library,
            config,
            profile: None,
            milestones: Vec::new(),
            gallery,
            discover: DiscoverState::default(),
            profile_view: None,
            profile_target: None,
            tree: TreeState::default(),
            screen: Screen::Gallery,
            history: Vec::new(),
            status,
        };

        let startup = Task::batch(vec![
            app.fetch_self_profile_task(),
            app.fetch_photos_task(),
            app.media_tasks(&cached_photos),
        ]);

        (app, startup)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SelfProfileLoaded(Ok(profile)) => {
                self.milestones = profile.milestones.clone();
                self.gallery.milestones = self.milestones.clone();
                self.profile = Some(profile);

                // The viewer's own tree follows their milestone context
                if self.screen == Screen::Tree && self.is_self_target(self.tree.target) {
                    self.rebuild_self_tree();
                }

                Task::none()
            }
            Message::SelfProfileLoaded(Err(e)) => {
                eprintln!("⚠️  Failed to fetch own profile: {}", e);
                self.status = format!("⚠️ Could not load profile: {}", e);
                Task::none()
            }

            Message::PhotosLoaded(Ok(photos)) => {
                if let Err(e) = self.library.replace_photos(&photos) {
                    eprintln!("⚠️  Could not update catalog: {}", e);
                }

                self.gallery.set_photos(photos.clone());
                self.status = format!("✅ Loaded {} photos.", photos.len());

                Task::batch(vec![self.media_tasks(&photos), self.sweep_task()])
            }
            Message::PhotosLoaded(Err(e)) => {
                // Keep whatever the gallery last showed; the grid stays
                // stale-but-consistent
                eprintln!("⚠️  Failed to fetch photos: {}", e);
                self.status = format!("⚠️ Could not refresh photos: {}", e);
                Task::none()
            }

            Message::MediaCached(Ok(cached)) => {
                let handle = iced::widget::image::Handle::from_path(cached.thumbnail.clone());

                self.gallery
                    .set_media(cached.photo_id, handle.clone(), cached.original.clone());
                if let Some(profile_view) = &mut self.profile_view {
                    profile_view
                        .gallery
                        .set_media(cached.photo_id, handle, cached.original.clone());
                }

                if let Err(e) = self
                    .library
                    .set_thumbnail(cached.photo_id, &cached.thumbnail.to_string_lossy())
                {
                    eprintln!("⚠️  Could not record thumbnail: {}", e);
                }

                Task::none()
            }
            Message::MediaCached(Err(e)) => {
                eprintln!("⚠️  {}", e);
                Task::none()
            }

            Message::CacheSwept(result) => {
                if result.removed_count > 0 {
                    self.status = format!(
                        "🧹 Cleaned {} stale thumbnails.",
                        result.removed_count
                    );
                }
                Task::none()
            }

            Message::TagSelected(tag) => {
                self.visible_gallery().select_tag(tag);
                Task::none()
            }
            Message::PhotoSelected(photo) => {
                self.visible_gallery().select_photo(photo);
                Task::none()
            }
            Message::DetailClosed => {
                self.visible_gallery().close_detail();
                Task::none()
            }

            Message::UploadToggled => {
                self.gallery.toggle_upload();
                Task::none()
            }
            Message::UploadPickFile => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Select a Photo")
                    .add_filter("Images", &["jpg", "jpeg", "png", "gif", "webp"])
                    .pick_file();

                if let Some(file) = file {
                    self.gallery.upload.file = Some(file);
                }

                Task::none()
            }
            Message::UploadTopicChanged(topic) => {
                self.gallery.upload.topic = topic;
                Task::none()
            }
            Message::UploadDescriptionChanged(description) => {
                self.gallery.upload.description = description;
                Task::none()
            }
            Message::UploadMilestoneToggled(id, tagged) => {
                self.gallery.upload.toggle_milestone(id, tagged);
                Task::none()
            }
            Message::UploadSubmitted => {
                let Some(file) = self.gallery.upload.file.clone() else {
                    return Task::none();
                };

                self.gallery.upload.in_flight = true;
                self.status = "Uploading photo…".to_string();

                let client = self.client.clone();
                let topic = self.gallery.upload.topic.clone();
                let description = self.gallery.upload.description.clone();
                let tagged = self.gallery.upload.tagged_milestone_ids.clone();

                Task::perform(
                    async move { client.upload_photo(file, topic, description, tagged).await },
                    Message::UploadFinished,
                )
            }
            Message::UploadFinished(Ok(photo)) => {
                self.gallery.upload.reset();
                self.gallery.upload_open = false;
                self.status = format!("✅ Uploaded \"{}\".", photo.topic);

                // Pull the fresh list so the new photo shows up tagged
                // and ordered the way the backend stored it
                self.fetch_photos_task()
            }
            Message::UploadFinished(Err(e)) => {
                eprintln!("⚠️  Upload failed: {}", e);
                self.gallery.upload.in_flight = false;
                self.status = format!("⚠️ Upload failed: {}", e);
                Task::none()
            }

            Message::GalleryPressed => {
                self.navigate(Screen::Gallery);
                Task::none()
            }
            Message::DiscoverPressed => {
                self.navigate(Screen::Discover);
                self.discover.loading = true;

                let client = self.client.clone();
                Task::perform(
                    async move { client.discover_users().await },
                    Message::DiscoverLoaded,
                )
            }
            Message::TreePressed => self.open_tree(None, "My Milestone Tree".to_string()),
            Message::BackPressed => {
                if let Some(previous) = self.history.pop() {
                    self.screen = previous;
                }
                Task::none()
            }

            Message::DiscoverLoaded(Ok(users)) => {
                self.discover.loading = false;
                self.discover.users = users;
                Task::none()
            }
            Message::DiscoverLoaded(Err(e)) => {
                // The client propagates; the listing screen owns the
                // failure
                eprintln!("⚠️  Discovery failed: {}", e);
                self.discover.loading = false;
                self.status = format!("⚠️ Could not load discovery: {}", e);
                Task::none()
            }

            Message::UserChosen(user_id) => {
                self.navigate(Screen::Profile);
                self.profile_view = None;
                self.profile_target = Some(user_id);

                let client = self.client.clone();
                Task::perform(
                    async move { client.get_profile(user_id).await },
                    move |result| Message::ProfileLoaded { user_id, result },
                )
            }
            Message::ProfileLoaded { user_id, result } => {
                if self.profile_target != Some(user_id) {
                    // A stale response for a profile we already left
                    return Task::none();
                }

                match result {
                    Ok(profile) => {
                        let gallery = GalleryState::with_photos(
                            profile.photos.clone(),
                            profile.milestones.clone(),
                            None,
                            true,
                        );
                        let photos = profile.photos.clone();
                        self.profile_view = Some(ProfileView { profile, gallery });
                        self.media_tasks(&photos)
                    }
                    Err(e) => {
                        eprintln!("⚠️  Failed to fetch profile {}: {}", user_id, e);
                        self.status = format!("⚠️ Could not load profile: {}", e);
                        Task::none()
                    }
                }
            }
            Message::ProfileTreePressed => {
                let Some(view) = &self.profile_view else {
                    return Task::none();
                };
                let target = view.profile.id;
                let title = format!("{}'s Milestone Tree", view.profile.display_name);
                self.open_tree(Some(target), title)
            }

            Message::TreeLoaded { target, result } => {
                if self.tree.target != target {
                    // Slow response for a tree we already navigated away
                    // from; a stale overwrite would show the wrong user
                    return Task::none();
                }

                self.tree.loading = false;
                match result {
                    Ok(milestones) => {
                        self.tree.graph = build_graph(&milestones);
                        self.tree.positions = graph::layout::arrange(&self.tree.graph);
                        self.status = format!(
                            "Showing {} milestones.",
                            self.tree.graph.nodes.len()
                        );
                    }
                    Err(e) => {
                        eprintln!("⚠️  Failed to fetch milestones: {}", e);
                        self.status = format!("⚠️ Could not load milestones: {}", e);
                    }
                }
                Task::none()
            }
            Message::TreeNodeMoved { id, position } => {
                self.tree.positions.insert(id, position);
                Task::none()
            }
            Message::TreePanned(delta) => {
                self.tree.pan += delta;
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let nav = row![
            text("Milepost").size(20),
            horizontal_space(),
            button("Gallery")
                .on_press_maybe((self.screen != Screen::Gallery).then_some(Message::GalleryPressed))
                .padding(8),
            button("My Tree")
                .on_press_maybe((self.screen != Screen::Tree).then_some(Message::TreePressed))
                .padding(8),
            button("Discover")
                .on_press_maybe((self.screen != Screen::Discover).then_some(Message::DiscoverPressed))
                .padding(8),
        ]
        .spacing(8)
        .padding(12)
        .align_y(Alignment::Center);

        let content: Element<'_, Message> = match self.screen {
            Screen::Gallery => ui::gallery::view(&self.gallery, self.config.grid_columns),
            Screen::Discover => ui::discover::view(&self.discover),
            Screen::Profile => {
                ui::profile::view(self.profile_view.as_ref(), self.config.grid_columns)
            }
            Screen::Tree => ui::tree::view(&self.tree),
        };

        let status_bar = container(text(&self.status).size(12)).padding(8);

        column![
            nav,
            container(content).width(Length::Fill).height(Length::Fill),
            status_bar,
        ]
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// The gallery the current screen shows
    fn visible_gallery(&mut self) -> &mut GalleryState {
        match (&self.screen, &mut self.profile_view) {
            (Screen::Profile, Some(view)) => &mut view.gallery,
            _ => &mut self.gallery,
        }
    }

    fn is_self_target(&self, target: Option<i64>) -> bool {
        match target {
            None => true,
            Some(id) => self.profile.as_ref().map(|p| p.id) == Some(id),
        }
    }

    fn rebuild_self_tree(&mut self) {
        self.tree.graph = build_graph(&self.milestones);
        self.tree.positions = graph::layout::arrange(&self.tree.graph);
        self.tree.loading = false;
    }

    /// Switch to a screen, remembering where we came from.
    fn navigate(&mut self, screen: Screen) {
        if self.screen != screen {
            self.history.push(self.screen);
            self.screen = screen;
        }
    }

    /// Open the tree page for a target user (None = the viewer).
    ///
    /// The viewer's own tree renders straight from the cached milestone
    /// context; anyone else's needs a profile fetch first.
    fn open_tree(&mut self, target: Option<i64>, title: String) -> Task<Message> {
        self.navigate(Screen::Tree);

        if self.is_self_target(target) {
            self.tree = TreeState {
                title,
                ..TreeState::default()
            };
            self.rebuild_self_tree();
            return Task::none();
        }

        self.tree = TreeState {
            target,
            title,
            loading: true,
            ..TreeState::default()
        };

        let client = self.client.clone();
        let user_id = target.unwrap_or_default();
        Task::perform(
            async move {
                client
                    .get_profile(user_id)
                    .await
                    .map(|profile| profile.milestones)
            },
            move |result| Message::TreeLoaded { target, result },
        )
    }

    fn fetch_self_profile_task(&self) -> Task<Message> {
        let client = self.client.clone();
        Task::perform(
            async move { client.self_profile().await },
            Message::SelfProfileLoaded,
        )
    }

    fn fetch_photos_task(&self) -> Task<Message> {
        let client = self.client.clone();
        Task::perform(async move { client.get_photos().await }, Message::PhotosLoaded)
    }

    /// One download-and-cache task per photo. Photos whose media is
    /// already on disk resolve without touching the network.
    fn media_tasks(&self, photos: &[Photo]) -> Task<Message> {
        let tasks: Vec<Task<Message>> = photos
            .iter()
            .map(|photo| {
                Task::perform(
                    media::fetch_photo_media(
                        self.client.clone(),
                        photo.id,
                        photo.image_url.clone(),
                    ),
                    Message::MediaCached,
                )
            })
            .collect();

        Task::batch(tasks)
    }

    /// Background sweep of thumbnails whose photo left the catalog.
    fn sweep_task(&self) -> Task<Message> {
        let cache_dir = media::thumbnail::thumbnail_cache_dir();
        let live_ids = self.library.photo_ids().unwrap_or_default();

        Task::perform(
            async move {
                tokio::task::spawn_blocking(move || media::sweep_orphans(&cache_dir, &live_ids))
                    .await
                    .unwrap_or_else(|_| media::SweepResult {
                        removed_count: 0,
                        kept_count: 0,
                    })
            },
            Message::CacheSwept,
        )
    }
}

fn main() -> iced::Result {
    iced::application("Milepost", Milepost::update, Milepost::view)
        .theme(Milepost::theme)
        .centered()
        .run_with(Milepost::new)
}
