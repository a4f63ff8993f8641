pub mod jsonl;
pub mod text;

pub use jsonl::JsonlRenderer;
pub use text::{tone_color, TextOptions, TextRenderer};
