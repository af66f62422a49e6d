//! Per-chapter attempt bookkeeping: room records and their aggregation.

mod mod_state;
mod room;
mod stats;

pub use mod_state::ModState;
pub use room::{MAX_ATTEMPTS, RoomStats};
pub use stats::ChapterStats;
