//! dotkeep — track, archive, and remove dotfiles from a terminal UI.
//!
//! Tracked files live as (name, path) records in a JSON file next to the
//! invocation directory. The TUI has two screens: a list of tracked
//! dotfiles and an add form that matches typed names against the user's
//! configuration directory. `z` bundles everything into `~/dotfiles.zip`
//! via a background zip subprocess.

pub mod app;
pub mod archive;
pub mod screens;
pub mod store;
pub mod styles;
pub mod suggest;
pub mod tui;
pub mod widgets;

// Re-exports for convenience
pub use store::{DotfileRecord, RecordStore};
pub use suggest::SuggestionIndex;
