pub mod chapter;
pub mod codec;
pub mod config;
pub mod context;
pub mod events;
pub mod path;
pub mod stats;
pub mod summary;
pub mod tracker;

// Re-exports for convenience
pub use chapter::{ChapterStats, ModState, RoomStats};
pub use codec::CodecError;
pub use config::{ListFormat, RoomNameFormat, TrackerConfig, TrackerConfigExt};
pub use context::{ChapterContext, DataStore, GoldenRunStore, StoreError};
pub use events::{ExitMode, TrackerEvent};
pub use path::{CheckpointInfo, PathInfo, PathRecorder, RoomInfo};
pub use stats::{LiveFormat, StatContext, StatManager, StatSettings};
pub use tracker::Tracker;
