use std::collections::HashMap;

use iced::alignment::{Horizontal, Vertical};
use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Program, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::color::progress_iced_color;
use crate::graph::layout::{NODE_HEIGHT, NODE_WIDTH};
use crate::state::tree::MilestoneGraph;
use crate::Message;

/// Canvas background, matching the web client's dark slate page
const BACKGROUND: Color = Color {
    r: 0.066,
    g: 0.094,
    b: 0.153,
    a: 1.0,
};
/// Node fill behind the label
const NODE_FILL: Color = Color {
    r: 0.118,
    g: 0.118,
    b: 0.118,
    a: 1.0,
};
/// Background grid dots
const GRID_DOT: Color = Color {
    r: 0.3,
    g: 0.32,
    b: 0.36,
    a: 1.0,
};

/// Spacing of the background dot grid
const GRID_GAP: f32 = 32.0;
/// Dash pattern for edges whose target is not yet complete
const ANIMATED_DASH: [f32; 2] = [6.0, 4.0];
/// Longest label drawn before truncation
const MAX_LABEL_CHARS: usize = 30;

/// Interactive renderer for the milestone tree
///
/// Draws the laid-out graph and lets the user reposition nodes or pan
/// the viewport by dragging. Position changes are passed back to the
/// application as messages; the canvas itself owns no layout state.
pub struct TreeCanvas<'a> {
    pub graph: &'a MilestoneGraph,
    /// Top-left node positions, layout output plus any user dragging
    pub positions: &'a HashMap<i64, Point>,
    /// Viewport pan offset
    pub pan: cgmath::Vector2<f32>,
}

impl<'a> TreeCanvas<'a> {
    fn node_position(&self, id: i64) -> Point {
        self.positions.get(&id).copied().unwrap_or(Point::ORIGIN)
    }

    /// The node under a widget-relative point, topmost (last drawn) first
    fn hit_node(&self, at: Point) -> Option<i64> {
        let world = Point::new(at.x - self.pan.x, at.y - self.pan.y);
        self.graph
            .nodes
            .iter()
            .rev()
            .map(|node| node.id)
            .find(|id| {
                Rectangle::new(self.node_position(*id), Size::new(NODE_WIDTH, NODE_HEIGHT))
                    .contains(world)
            })
    }
}

/// State for drag interactions
#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub dragging: Drag,
    pub last_position: Option<Point>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Drag {
    #[default]
    Idle,
    /// Repositioning one node
    Node(i64),
    /// Panning the viewport
    Viewport,
}

impl<'a> Program<Message> for TreeCanvas<'a> {
    type State = DragState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        frame.fill_rectangle(Point::ORIGIN, bounds.size(), BACKGROUND);
        draw_grid(&mut frame, bounds.size(), self.pan);

        let pan = iced::Vector::new(self.pan.x, self.pan.y);

        for edge in &self.graph.edges {
            let color = progress_iced_color(edge.rate);

            let source = self.node_position(edge.source);
            let target = self.node_position(edge.target);

            // Bottom center of the parent to top center of the child
            let from = Point::new(source.x + NODE_WIDTH / 2.0, source.y + NODE_HEIGHT) + pan;
            let to = Point::new(target.x + NODE_WIDTH / 2.0, target.y) + pan;

            let path = Path::new(|builder| {
                builder.move_to(from);
                builder.bezier_curve_to(
                    Point::new(from.x, from.y + 30.0),
                    Point::new(to.x, to.y - 30.0),
                    to,
                );
            });

            let stroke = Stroke::default().with_color(color).with_width(2.0);
            let stroke = if edge.animated {
                Stroke {
                    line_dash: canvas::LineDash {
                        segments: &ANIMATED_DASH,
                        offset: 0,
                    },
                    ..stroke
                }
            } else {
                stroke
            };

            frame.stroke(&path, stroke);
            draw_arrow_head(&mut frame, to, color);
        }

        for node in &self.graph.nodes {
            let color = progress_iced_color(node.rate);
            let top_left = self.node_position(node.id) + pan;

            let body = Path::rounded_rectangle(
                top_left,
                Size::new(NODE_WIDTH, NODE_HEIGHT),
                8.0.into(),
            );
            frame.fill(&body, NODE_FILL);
            frame.stroke(&body, Stroke::default().with_color(color).with_width(2.0));

            let mut label = node.label.clone();
            if label.chars().count() > MAX_LABEL_CHARS {
                label = label.chars().take(MAX_LABEL_CHARS - 1).collect();
                label.push('…');
            }

            frame.fill_text(canvas::Text {
                content: label,
                position: Point::new(
                    top_left.x + NODE_WIDTH / 2.0,
                    top_left.y + NODE_HEIGHT / 2.0,
                ),
                color: Color::WHITE,
                size: 14.0.into(),
                horizontal_alignment: Horizontal::Center,
                vertical_alignment: Vertical::Center,
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Mouse button press - grab a node, or the viewport
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(position) = cursor.position_in(bounds) {
                    state.dragging = match self.hit_node(position) {
                        Some(id) => Drag::Node(id),
                        None => Drag::Viewport,
                    };
                    state.last_position = Some(position);
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Mouse button release - stop dragging
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.dragging != Drag::Idle {
                    state.dragging = Drag::Idle;
                    state.last_position = None;
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Mouse move - reposition the grabbed node or pan
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if state.dragging == Drag::Idle {
                    return (canvas::event::Status::Ignored, None);
                }

                if let (Some(current), Some(last)) =
                    (cursor.position_in(bounds), state.last_position)
                {
                    let delta = cgmath::Vector2::new(current.x - last.x, current.y - last.y);
                    state.last_position = Some(current);

                    let message = match state.dragging {
                        Drag::Node(id) => {
                            let position = self.node_position(id);
                            Message::TreeNodeMoved {
                                id,
                                position: Point::new(position.x + delta.x, position.y + delta.y),
                            }
                        }
                        Drag::Viewport => Message::TreePanned(delta),
                        Drag::Idle => unreachable!(),
                    };

                    return (canvas::event::Status::Captured, Some(message));
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if state.dragging != Drag::Idle {
            return mouse::Interaction::Grabbing;
        }

        match cursor.position_in(bounds).and_then(|at| self.hit_node(at)) {
            Some(_) => mouse::Interaction::Grab,
            None => mouse::Interaction::default(),
        }
    }
}

/// Dot grid in the manner of the web client's diagram background
fn draw_grid(frame: &mut canvas::Frame, size: Size, pan: cgmath::Vector2<f32>) {
    let offset_x = pan.x.rem_euclid(GRID_GAP);
    let offset_y = pan.y.rem_euclid(GRID_GAP);

    let mut y = offset_y;
    while y < size.height {
        let mut x = offset_x;
        while x < size.width {
            frame.fill(&Path::circle(Point::new(x, y), 1.0), GRID_DOT);
            x += GRID_GAP;
        }
        y += GRID_GAP;
    }
}

/// Closed arrow head at the edge's target end, pointing down into the node
fn draw_arrow_head(frame: &mut canvas::Frame, tip: Point, color: Color) {
    let path = Path::new(|builder| {
        builder.move_to(tip);
        builder.line_to(Point::new(tip.x - 5.0, tip.y - 9.0));
        builder.line_to(Point::new(tip.x + 5.0, tip.y - 9.0));
        builder.close();
    });

    frame.fill(&path, color);
}
