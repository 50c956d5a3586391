//! Text helpers shared by extraction and prompt building.

mod text;

pub use text::{truncate_chars, truncate_with_ellipsis};
