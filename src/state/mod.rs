/// State management module
///
/// This module handles all application state, including:
/// - The local photo catalog database (library.rs)
/// - Photo gallery state: tag filter, selection, upload panel (gallery.rs)
/// - Milestone graph derivation for the tree view (tree.rs)

pub mod gallery;
pub mod library;
pub mod tree;
