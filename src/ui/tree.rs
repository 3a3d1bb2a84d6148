/// Milestone tree page
///
/// Header with a back action, then the interactive canvas. Loading and
/// empty inputs get their own quiet states instead of an error.
use iced::widget::{button, canvas, center, column, horizontal_space, row, text};
use iced::{Alignment, Element, Length};

use super::tree_canvas::TreeCanvas;
use crate::{Message, TreeState};

pub fn view(tree: &TreeState) -> Element<'_, Message> {
    let header = row![
        text(&tree.title).size(20),
        horizontal_space(),
        button("Back").on_press(Message::BackPressed).padding(8),
    ]
    .spacing(12)
    .padding(12)
    .align_y(Alignment::Center);

    let body: Element<'_, Message> = if tree.loading {
        center(text("Loading milestones…").size(16)).into()
    } else if tree.graph.is_empty() {
        center(text("No milestones yet.").size(16)).into()
    } else {
        canvas(TreeCanvas {
            graph: &tree.graph,
            positions: &tree.positions,
            pan: tree.pan,
        })
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    };

    column![header, body].into()
}
