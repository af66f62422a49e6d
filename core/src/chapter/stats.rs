use hashbrown::HashMap;

use super::{ModState, RoomStats};

/// All recorded state for one chapter: a room map keyed by room name, the
/// current-room pointer, descriptive names, and the transient mod state.
///
/// Rooms are created lazily on first reference; a room that was visited but
/// is not on the recorded path still gets a record here.
#[derive(Debug, Clone, Default)]
pub struct ChapterStats {
    pub chapter_key: String,
    pub chapter_name: String,
    pub campaign_name: String,
    pub current_room: Option<String>,
    pub rooms: HashMap<String, RoomStats>,
    pub mod_state: ModState,
}

impl ChapterStats {
    pub fn new(chapter_key: impl Into<String>) -> Self {
        Self {
            chapter_key: chapter_key.into(),
            ..Default::default()
        }
    }

    /// Look up a room without creating it.
    pub fn room(&self, name: &str) -> Option<&RoomStats> {
        self.rooms.get(name)
    }

    /// Look up a room, creating an empty record on first reference.
    pub fn room_mut(&mut self, name: &str) -> &mut RoomStats {
        self.rooms
            .entry_ref(name)
            .or_insert_with(|| RoomStats::new(name))
    }

    pub fn set_current_room(&mut self, name: &str) {
        self.room_mut(name);
        self.current_room = Some(name.to_string());
    }

    pub fn current_room(&self) -> Option<&RoomStats> {
        self.current_room.as_deref().and_then(|name| self.rooms.get(name))
    }

    pub fn current_room_mut(&mut self) -> Option<&mut RoomStats> {
        let name = self.current_room.clone()?;
        Some(self.room_mut(&name))
    }

    /// Record an attempt outcome for the current room.
    pub fn add_attempt(&mut self, success: bool) {
        if let Some(room) = self.current_room_mut() {
            room.add_attempt(success);
        }
    }

    /// Record a golden-run death in the current room, returning the room name
    /// so the caller can append it to the golden-run store.
    pub fn add_golden_death(&mut self) -> Option<String> {
        let room = self.current_room_mut()?;
        room.golden_deaths += 1;
        room.golden_deaths_session += 1;
        Some(room.name.clone())
    }

    /// Session boundary: the per-session golden-death counters restart, the
    /// lifetime counters do not.
    pub fn reset_session(&mut self) {
        for room in self.rooms.values_mut() {
            room.golden_deaths_session = 0;
        }
    }

    /// A fresh run begins: per-run death counters restart everywhere.
    pub fn reset_current_run(&mut self) {
        for room in self.rooms.values_mut() {
            room.deaths_in_current_run = 0;
        }
    }

    // --- Data control operations ---

    /// Drop every room except the current one, and clear the current room's
    /// attempts.
    pub fn wipe_chapter(&mut self) {
        let keep = self.current_room.clone();
        self.rooms.retain(|name, _| Some(name.as_str()) == keep.as_deref());
        self.wipe_current_room_attempts();
    }

    pub fn wipe_current_room_attempts(&mut self) {
        if let Some(room) = self.current_room_mut() {
            room.attempts.clear();
        }
    }

    pub fn remove_current_room_golden_deaths(&mut self) {
        if let Some(room) = self.current_room_mut() {
            room.golden_deaths = 0;
            room.golden_deaths_session = 0;
        }
    }

    pub fn wipe_chapter_golden_deaths(&mut self) {
        for room in self.rooms.values_mut() {
            room.golden_deaths = 0;
            room.golden_deaths_session = 0;
        }
    }

    pub fn remove_last_attempt(&mut self) {
        if let Some(room) = self.current_room_mut() {
            room.remove_last_attempt();
        }
    }

    pub fn remove_last_death_streak(&mut self) {
        if let Some(room) = self.current_room_mut() {
            room.remove_last_death_streak();
        }
    }
}
