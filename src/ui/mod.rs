/// View modules
///
/// Each screen gets a pure render function over the application state;
/// the tree canvas additionally owns its drag interaction handling.

pub mod discover;
pub mod gallery;
pub mod profile;
pub mod tree;
pub mod tree_canvas;
