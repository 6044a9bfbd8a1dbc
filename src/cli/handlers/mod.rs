//! Command handlers for CLI operations
//!
//! This module contains handlers for the notify, render and check commands.

pub mod check;
pub mod notify;
pub mod render;

pub use check::CheckCommandHandler;
pub use notify::NotifyCommandHandler;
pub use render::RenderCommandHandler;
