//! Events fed into the tracker by the host integration (or the CLI).

/// How a run ended when the player left the chapter early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitMode {
    /// Quick restart of the chapter.
    Restart,
    /// Restart triggered by dying with the golden berry.
    GoldenRestart,
    /// Any other exit (menu, save and quit).
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    // Chapter lifecycle
    ChapterEntered {
        chapter_key: String,
        chapter_name: String,
        campaign_name: String,
        starting_room: String,
    },
    ChapterCompleted,

    // Room movement
    RoomEntered {
        room: String,
        /// Re-spawning after a death re-enters the room without a new attempt.
        is_respawn: bool,
        holding_golden: bool,
    },
    /// The current room's goal was reached; a later death can still undo the
    /// attempt when `reset_on_death` is set.
    RoomCompleted {
        reset_on_death: bool,
    },

    PlayerDied {
        holding_golden: bool,
    },
    RunExited {
        mode: ExitMode,
    },

    /// A checkpoint trigger fired, with its physical position if known.
    CheckpointReached {
        marker: Option<(i32, i32)>,
        name: Option<String>,
    },
}
