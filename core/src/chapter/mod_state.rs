/// Transient session flags persisted alongside the chapter stats. Not part of
/// the attempt-history contract; consumers read these from the mod-state file
/// to mirror what the tracker is currently doing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModState {
    pub holding_golden: bool,
    pub chapter_completed: bool,
    pub death_tracking_paused: bool,
    pub recording_path: bool,
    pub tracker_version: Option<String>,
}
