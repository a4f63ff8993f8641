pub mod decoder;
pub mod model;
pub mod protocol;

pub use decoder::FrameDecoder;
pub use model::{EventKind, EventPayload, OptimizationEvent};
pub use protocol::{client_tag, normalize_result, parse_frame_line, ServerFrame, DATA_PREFIX};
