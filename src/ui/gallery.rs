/// Photo gallery view
///
/// Filter dropdown, photo grid, click-to-expand detail overlay, and the
/// expandable upload form. Pure render over `GalleryState`; every
/// interaction goes back through `Message`.
use iced::widget::{
    button, center, checkbox, column, container, image, mouse_area, opaque, pick_list, row,
    scrollable, stack, text, text_input, Column, Row,
};
use iced::{Alignment, Color, ContentFit, Element, Length};

use crate::api::Photo;
use crate::state::gallery::{flatten_milestones, GalleryState};
use crate::Message;

/// Grid cell footprint
const CELL_WIDTH: f32 = 220.0;
const CELL_HEIGHT: f32 = 150.0;

pub fn view<'a>(gallery: &'a GalleryState, columns: usize) -> Element<'a, Message> {
    let mut content = Column::new().spacing(16).padding(24);

    if !gallery.read_only {
        content = content.push(upload_section(gallery));
    }

    content = content.push(filter_row(gallery));
    content = content.push(scrollable(photo_grid(gallery, columns)).height(Length::Fill));

    let base: Element<'a, Message> = content.into();

    // At most one photo is ever selected; its detail view sits on top of
    // the grid and closes on any click outside the card.
    match &gallery.selected_photo {
        Some(photo) => modal(base, detail_card(gallery, photo), Message::DetailClosed),
        None => base,
    }
}

fn upload_section(gallery: &GalleryState) -> Element<'_, Message> {
    let toggle_label = if gallery.upload_open {
        "▼ Upload New Photo"
    } else {
        "▶ Upload New Photo"
    };

    let mut section = column![button(toggle_label)
        .on_press(Message::UploadToggled)
        .padding(8)]
    .spacing(12);

    if gallery.upload_open {
        section = section.push(upload_form(gallery));
    }

    section.into()
}

fn upload_form(gallery: &GalleryState) -> Element<'_, Message> {
    let form = &gallery.upload;

    let picked = form
        .file
        .as_ref()
        .and_then(|f| f.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "no file selected".to_string());

    let mut fields = column![
        row![
            button("Choose Photo…").on_press(Message::UploadPickFile).padding(8),
            text(picked).size(14),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        text_input("Topic", &form.topic)
            .on_input(Message::UploadTopicChanged)
            .padding(8),
        text_input("Description", &form.description)
            .on_input(Message::UploadDescriptionChanged)
            .padding(8),
    ]
    .spacing(10);

    let milestones = flatten_milestones(&gallery.milestones);
    if !milestones.is_empty() {
        let mut tags = Column::new().spacing(4);
        tags = tags.push(text("Tag milestones:").size(14));
        for (id, task) in milestones {
            let tagged = form.tagged_milestone_ids.contains(&id);
            tags = tags.push(
                checkbox(task, tagged).on_toggle(move |checked| {
                    Message::UploadMilestoneToggled(id, checked)
                }),
            );
        }
        fields = fields.push(tags);
    }

    let submit_label = if form.in_flight { "Uploading…" } else { "Upload" };
    fields = fields.push(
        button(submit_label)
            .on_press_maybe(form.can_submit().then_some(Message::UploadSubmitted))
            .padding(8),
    );

    container(fields)
        .padding(16)
        .style(container::rounded_box)
        .into()
}

fn filter_row(gallery: &GalleryState) -> Element<'_, Message> {
    row![
        text("Filter by tag:").size(16),
        pick_list(
            gallery.filter_options(),
            Some(gallery.selected_tag.clone()),
            Message::TagSelected,
        )
        .padding(6),
    ]
    .spacing(12)
    .align_y(Alignment::Center)
    .into()
}

fn photo_grid(gallery: &GalleryState, columns: usize) -> Element<'_, Message> {
    let columns = columns.max(1);
    let mut grid = Column::new().spacing(12);

    for chunk in gallery.filtered.chunks(columns) {
        let mut cells = Row::new().spacing(12);
        for photo in chunk {
            cells = cells.push(grid_cell(gallery, photo));
        }
        grid = grid.push(cells);
    }

    if gallery.filtered.is_empty() {
        grid = grid.push(text("No photos yet.").size(16));
    }

    grid.into()
}

fn grid_cell<'a>(gallery: &'a GalleryState, photo: &'a Photo) -> Element<'a, Message> {
    let preview: Element<'a, Message> = match gallery.thumbnails.get(&photo.id) {
        Some(handle) => image(handle.clone())
            .width(Length::Fixed(CELL_WIDTH))
            .height(Length::Fixed(CELL_HEIGHT))
            .content_fit(ContentFit::Cover)
            .into(),
        // Thumbnail still downloading: hold the cell's footprint
        None => container(text(&photo.topic).size(14))
            .width(Length::Fixed(CELL_WIDTH))
            .height(Length::Fixed(CELL_HEIGHT))
            .align_x(Alignment::Center)
            .align_y(Alignment::Center)
            .style(container::rounded_box)
            .into(),
    };

    button(preview)
        .on_press(Message::PhotoSelected(photo.clone()))
        .padding(0)
        .style(button::text)
        .into()
}

fn detail_card<'a>(gallery: &'a GalleryState, photo: &'a Photo) -> Element<'a, Message> {
    // Prefer the cached full-size file; fall back to the grid thumbnail
    // while the download is still in flight
    let full: Option<image::Handle> = gallery
        .originals
        .get(&photo.id)
        .map(|path| image::Handle::from_path(path.clone()))
        .or_else(|| gallery.thumbnails.get(&photo.id).cloned());

    let mut card = Column::new().spacing(10).max_width(520);

    if let Some(handle) = full {
        card = card.push(
            image(handle)
                .width(Length::Fixed(480.0))
                .content_fit(ContentFit::Contain),
        );
    }

    card = card
        .push(text(&photo.topic).size(22))
        .push(text(&photo.description).size(14))
        .push(text(photo.upload_date.format("Uploaded %B %e, %Y").to_string()).size(12));

    let tagged = gallery.milestones_for(photo);
    if !tagged.is_empty() {
        let mut milestones = Column::new().spacing(4);
        milestones = milestones.push(text("Milestones:").size(14));
        for milestone in tagged {
            let rate = milestone.completion_percent();
            milestones = milestones.push(
                text(format!("• {} ({}%)", milestone.task, rate.round() as i64))
                    .size(14)
                    .color(crate::color::progress_iced_color(rate)),
            );
        }
        card = card.push(milestones);
    }

    card = card.push(button("Close").on_press(Message::DetailClosed).padding(8));

    container(card)
        .padding(20)
        .style(container::rounded_box)
        .into()
}

/// Overlay `content` above `base`, dimming the rest of the screen;
/// clicking the dimmed area emits `on_blur`.
fn modal<'a>(
    base: Element<'a, Message>,
    content: Element<'a, Message>,
    on_blur: Message,
) -> Element<'a, Message> {
    let backdrop = center(opaque(content)).style(|_theme| container::Style {
        background: Some(
            Color {
                a: 0.8,
                ..Color::BLACK
            }
            .into(),
        ),
        ..container::Style::default()
    });

    stack([base, opaque(mouse_area(backdrop).on_press(on_blur))]).into()
}
