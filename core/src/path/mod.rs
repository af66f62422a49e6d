mod aggregate;
mod info;
mod recorder;

pub use aggregate::{AggregateStats, PathAggregates};
pub use info::{CheckpointInfo, PathInfo, RoomInfo};
pub use recorder::{DEFAULT_CHECKPOINT_NAME, PathRecorder};
