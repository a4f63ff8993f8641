mod model;
mod store;

pub use model::{Run, RunStatus};
pub use store::{RunStore, Transition, STREAM_ENDED_MESSAGE};
