//! The event-driven façade tying everything together: one open chapter
//! context, the recorder, the golden-run store, and the save pipeline.

use hashbrown::HashSet;

use crate::chapter::ChapterStats;
use crate::config::TrackerConfig;
use crate::context::{ChapterContext, DataStore, GoldenRunStore, StoreError};
use crate::events::{ExitMode, TrackerEvent};
use crate::path::{DEFAULT_CHECKPOINT_NAME, PathAggregates, PathInfo, PathRecorder};
use crate::stats::{StatContext, StatManager, StatSettings};
use crate::summary;


const NO_PATH_SUMMARY: &str = "No path info was found for the current chapter.\nPlease create a path before using the summary feature\n";

pub struct Tracker {
    config: TrackerConfig,
    store: DataStore,
    manager: StatManager,
    golden_runs: GoldenRunStore,
    context: Option<ChapterContext>,
    recorder: Option<PathRecorder>,

    previous_room: Option<String>,
    room_completed: bool,
    room_completed_reset_on_death: bool,
    /// Set by a run exit; the next room entry resets the previous-room
    /// pointer instead of counting an attempt.
    restart_armed: bool,
    chapters_this_session: HashSet<String>,
}

impl Tracker {
    /// Opens the data store (the one fatal file operation) and loads the
    /// live formats, writing the defaults when none exist yet.
    pub fn new(config: TrackerConfig) -> Result<Self, StoreError> {
        let store = DataStore::open(config.data_root())?;
        let mut manager = StatManager::new();
        match store.load_formats() {
            Some(text) => manager.load_formats(&text),
            None => store.save_formats(&manager.serialize_formats()),
        }
        Ok(Self {
            config,
            store,
            manager,
            golden_runs: GoldenRunStore::default(),
            context: None,
            recorder: None,
            previous_room: None,
            room_completed: false,
            room_completed_reset_on_death: false,
            restart_armed: false,
            chapters_this_session: HashSet::new(),
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut TrackerConfig {
        &mut self.config
    }

    pub fn context(&self) -> Option<&ChapterContext> {
        self.context.as_ref()
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    /// Single entry point for everything the host observes.
    pub fn handle(&mut self, event: TrackerEvent) {
        tracing::debug!(?event, "handling event");
        match event {
            TrackerEvent::ChapterEntered {
                chapter_key,
                chapter_name,
                campaign_name,
                starting_room,
            } => self.enter_chapter(&chapter_key, &chapter_name, &campaign_name, &starting_room),
            TrackerEvent::RoomEntered {
                room,
                is_respawn,
                holding_golden,
            } => self.enter_room(&room, is_respawn, holding_golden),
            TrackerEvent::RoomCompleted { reset_on_death } => {
                self.room_completed = true;
                self.room_completed_reset_on_death = reset_on_death;
            }
            TrackerEvent::PlayerDied { holding_golden } => self.player_died(holding_golden),
            TrackerEvent::RunExited { mode } => self.run_exited(mode),
            TrackerEvent::ChapterCompleted => self.chapter_completed(),
            TrackerEvent::CheckpointReached { marker, name } => {
                if let Some(recorder) = &mut self.recorder {
                    recorder.add_checkpoint(marker, name.as_deref());
                }
            }
        }
    }

    fn enter_chapter(&mut self, key: &str, chapter_name: &str, campaign_name: &str, room: &str) {
        self.stop_recording();
        if let Some(previous) = self.context.take() {
            previous.close(&self.store);
        }

        let mut context = ChapterContext::open(&self.store, key, chapter_name, campaign_name);
        if self.chapters_this_session.insert(key.to_string()) {
            context.stats.reset_session();
        }
        // A chapter entry always begins a fresh run.
        context.stats.reset_current_run();
        context.stats.set_current_room(room);
        context.stats.mod_state.holding_golden = false;
        context.stats.mod_state.chapter_completed = false;
        self.context = Some(context);

        self.previous_room = None;
        self.room_completed = false;
        self.room_completed_reset_on_death = false;
        self.restart_armed = false;

        if self.config.record_path {
            self.start_recording();
        }
        self.save();
    }

    fn enter_room(&mut self, room: &str, is_respawn: bool, holding_golden: bool) {
        let counted = self.attempts_counted(holding_golden);
        let Some(context) = &mut self.context else {
            tracing::warn!("room entered with no open chapter");
            return;
        };
        context.stats.mod_state.holding_golden = holding_golden;

        if self.restart_armed {
            self.restart_armed = false;
            self.previous_room = None;
            context.stats.set_current_room(room);
            self.room_completed = false;
            self.save();
            return;
        }

        // Backtracking into the previous room without finishing the current
        // one only moves the pointer.
        if self.previous_room.as_deref() == Some(room) && !self.room_completed {
            self.previous_room = context.stats.current_room.clone();
            context.stats.set_current_room(room);
            self.save();
            return;
        }

        self.previous_room = context.stats.current_room.clone();
        self.room_completed = false;

        if let Some(recorder) = &mut self.recorder {
            recorder.add_room(room);
        }

        if !is_respawn && counted {
            context.stats.add_attempt(true);
        }
        context.stats.set_current_room(room);
        self.save();
    }

    fn player_died(&mut self, holding_golden: bool) {
        let counted = self.attempts_counted(holding_golden);
        let Some(context) = &mut self.context else {
            return;
        };
        if self.room_completed_reset_on_death {
            self.room_completed = false;
        }
        if counted {
            context.stats.add_attempt(false);
            if let Some(current) = context.stats.current_room_mut() {
                current.deaths_in_current_run += 1;
            }
        }
        self.save();
    }

    fn run_exited(&mut self, mode: ExitMode) {
        match mode {
            ExitMode::Restart => self.restart_armed = true,
            ExitMode::GoldenRestart => {
                self.restart_armed = true;
                if let Some(context) = &mut self.context {
                    if !self.config.pause_death_tracking {
                        if let Some(room) = context.stats.add_golden_death() {
                            self.golden_runs
                                .record(&context.stats.chapter_key, room);
                        }
                        if self.config.only_track_with_golden {
                            context.stats.add_attempt(false);
                        }
                    }
                }
            }
            ExitMode::Other => {}
        }

        // Any exit ends path recording and the current run.
        self.stop_recording();
        if let Some(context) = &mut self.context {
            context.stats.reset_current_run();
            context.stats.mod_state.holding_golden = false;
        }
        self.save();
    }

    fn chapter_completed(&mut self) {
        let Some(context) = &mut self.context else {
            return;
        };
        if !self.config.pause_death_tracking {
            context.stats.add_attempt(true);
        }
        context.stats.mod_state.chapter_completed = true;
        self.save();
    }

    fn attempts_counted(&self, holding_golden: bool) -> bool {
        !self.config.pause_death_tracking
            && (!self.config.only_track_with_golden || holding_golden)
    }

    // --- Path recording ---

    /// Starts a fresh recording seeded with a default checkpoint and the
    /// room the player is standing in.
    pub fn start_recording(&mut self) {
        let Some(context) = &mut self.context else {
            tracing::warn!("cannot record a path with no open chapter");
            return;
        };
        let mut recorder = PathRecorder::new();
        recorder.add_checkpoint(None, Some(DEFAULT_CHECKPOINT_NAME));
        if let Some(room) = &context.stats.current_room {
            recorder.add_room(room);
        }
        self.recorder = Some(recorder);
        context.stats.mod_state.recording_path = true;
        tracing::info!("path recording started");
    }

    /// Finishes the recording, installing and persisting the new path.
    pub fn stop_recording(&mut self) {
        let Some(recorder) = self.recorder.take() else {
            return;
        };
        let Some(context) = &mut self.context else {
            return;
        };
        let path = recorder.into_path_info();
        tracing::info!(rooms = path.room_count(), "path recording finished");
        self.store.save_path(&context.stats.chapter_key, &path);
        context.path = Some(path);
        context.stats.mod_state.recording_path = false;
    }

    // --- Output ---

    /// Renders a template against the open chapter. None when no chapter is
    /// open.
    pub fn render_template(&self, template: &str) -> Option<String> {
        let context = self.context.as_ref()?;
        let aggregates = context
            .path
            .as_ref()
            .map(|p| PathAggregates::compute(p, &context.stats, self.config.attempt_window));
        let ctx = StatContext {
            path: context.path.as_ref(),
            aggregates: aggregates.as_ref(),
            stats: &context.stats,
            golden_runs: self.golden_runs.runs(&context.stats.chapter_key),
            settings: StatSettings::from(&self.config),
        };
        Some(self.manager.render(&ctx, template))
    }

    /// Writes the human-readable report for the open chapter.
    pub fn write_summary(&self) {
        let Some(context) = &self.context else {
            return;
        };
        let text = match &context.path {
            Some(path) => summary::render(
                &context.stats,
                path,
                self.config.summary_attempt_window,
            ),
            None => NO_PATH_SUMMARY.to_string(),
        };
        self.store.write_summary(&context.stats.chapter_key, &text);
    }

    /// Persists stats and session state, then refreshes every live output.
    fn save(&mut self) {
        let Some(context) = &mut self.context else {
            return;
        };
        context.stats.mod_state.death_tracking_paused = self.config.pause_death_tracking;
        context.stats.mod_state.tracker_version =
            Some(env!("CARGO_PKG_VERSION").to_string());
        context.save(&self.store);

        for format in &self.manager.formats {
            let aggregates = context.path.as_ref().map(|p| {
                PathAggregates::compute(p, &context.stats, self.config.attempt_window)
            });
            let ctx = StatContext {
                path: context.path.as_ref(),
                aggregates: aggregates.as_ref(),
                stats: &context.stats,
                golden_runs: self.golden_runs.runs(&context.stats.chapter_key),
                settings: StatSettings::from(&self.config),
            };
            let text = self.manager.render(&ctx, &format.template);
            self.store.write_live(&format.name, &text);
        }
    }

    // --- Data control ---

    pub fn wipe_chapter(&mut self) {
        self.mutate_stats(ChapterStats::wipe_chapter);
    }

    pub fn wipe_room_attempts(&mut self) {
        self.mutate_stats(ChapterStats::wipe_current_room_attempts);
    }

    pub fn remove_last_attempt(&mut self) {
        self.mutate_stats(ChapterStats::remove_last_attempt);
    }

    pub fn remove_last_death_streak(&mut self) {
        self.mutate_stats(ChapterStats::remove_last_death_streak);
    }

    pub fn remove_room_golden_deaths(&mut self) {
        self.mutate_stats(ChapterStats::remove_current_room_golden_deaths);
    }

    pub fn wipe_chapter_golden_deaths(&mut self) {
        self.mutate_stats(ChapterStats::wipe_chapter_golden_deaths);
    }

    fn mutate_stats(&mut self, op: fn(&mut ChapterStats)) {
        if let Some(context) = &mut self.context {
            op(&mut context.stats);
            self.save();
        }
    }

    /// Current path, recorded or loaded.
    pub fn path(&self) -> Option<&PathInfo> {
        self.context.as_ref().and_then(|c| c.path.as_ref())
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        if let Some(context) = self.context.take() {
            context.close(&self.store);
        }
    }
}
