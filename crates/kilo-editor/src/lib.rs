//! # kilo-editor — Editor core for kilo
//!
//! What the editor does on top of the terminal layer:
//!
//! - **[`config`]** — `EditorConfig`, the resolved window geometry
//! - **[`render`]** — screen repaint, one buffered write per frame
//! - **[`keys`]** — blocking key read and keypress dispatch
//! - **[`editor`]** — `Editor`, the init → render/dispatch loop
//!
//! Everything is written against [`kilo_term::Console`], so the whole loop
//! runs against a scripted console in tests.

pub mod config;
pub mod editor;
pub mod keys;
pub mod render;

pub use config::EditorConfig;
pub use editor::Editor;
pub use keys::Action;
