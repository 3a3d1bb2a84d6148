/// Another user's profile page
///
/// Their photo gallery in read-only mode, plus an entry into their
/// milestone tree.
use iced::widget::{button, center, column, horizontal_space, row, text};
use iced::{Alignment, Element};

use super::gallery;
use crate::{Message, ProfileView};

pub fn view(profile: Option<&ProfileView>, columns: usize) -> Element<'_, Message> {
    let title = profile
        .map(|p| p.profile.display_name.clone())
        .unwrap_or_else(|| "Profile".to_string());

    let header = row![
        text(title).size(20),
        horizontal_space(),
        button("View milestone tree")
            .on_press_maybe(profile.map(|_| Message::ProfileTreePressed))
            .padding(8),
        button("Back").on_press(Message::BackPressed).padding(8),
    ]
    .spacing(12)
    .padding(12)
    .align_y(Alignment::Center);

    let body: Element<'_, Message> = match profile {
        Some(view) => gallery::view(&view.gallery, columns),
        None => center(text("Loading profile…").size(16)).into(),
    };

    column![header, body].into()
}
