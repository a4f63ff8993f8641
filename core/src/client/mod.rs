pub mod r#trait;

pub use r#trait::{EventCallback, OptimizationClient};
