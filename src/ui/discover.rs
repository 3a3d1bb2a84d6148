/// User discovery screen
///
/// Lists users open to discovery; choosing one opens their profile.
use iced::widget::{button, center, column, container, horizontal_space, row, scrollable, text, Column};
use iced::{Alignment, Element, Length};

use crate::{DiscoverState, Message};

pub fn view(discover: &DiscoverState) -> Element<'_, Message> {
    if discover.loading {
        return center(text("Looking for people…").size(16)).into();
    }

    if discover.users.is_empty() {
        return center(text("Nobody to discover right now.").size(16)).into();
    }

    let mut listing = Column::new().spacing(10);
    for user in &discover.users {
        listing = listing.push(
            container(
                row![
                    text(&user.display_name).size(16),
                    horizontal_space(),
                    button("View profile")
                        .on_press(Message::UserChosen(user.id))
                        .padding(8),
                ]
                .align_y(Alignment::Center),
            )
            .padding(12)
            .style(container::rounded_box),
        );
    }

    column![
        text("Discover").size(24),
        scrollable(listing).height(Length::Fill),
    ]
    .spacing(16)
    .padding(24)
    .into()
}
