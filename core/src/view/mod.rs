mod present;
mod render;

pub use present::{present, status_style, style_of, DetailPanel, EventView, Icon, Tone};
pub use render::RunRenderer;
