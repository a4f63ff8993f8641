mod load;
mod types;

pub use load::{load, resolve_config_path};
pub use types::*;
