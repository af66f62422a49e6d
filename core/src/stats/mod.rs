//! Placeholder statistics engine.
//!
//! Each provider owns a fixed set of `{scope:name}` tokens and rewrites them
//! in a template. Providers are side-effect-free and touch only their own
//! tokens, so running them in any order gives the same output; the manager
//! runs them in registration order.
//!
//! Three data tiers apply uniformly: with no path loaded every owned token
//! becomes the missing-path marker; with a path but the current room off it,
//! position-dependent tokens become the not-on-path marker; otherwise full
//! computation.

mod choke_rate;
mod colors;
mod current_run_pb;
mod lists;
mod progress;
mod run_distance;
mod streak;
mod success_rate;

#[cfg(test)]
mod render_tests;

pub use choke_rate::ChokeRateStat;
pub use colors::SuccessRateColorsStat;
pub use current_run_pb::CurrentRunPbStat;
pub use lists::ListStat;
pub use progress::ProgressStat;
pub use run_distance::RunDistanceStat;
pub use streak::StreakStat;
pub use success_rate::SuccessRateStat;

use crate::chapter::ChapterStats;
use crate::config::{ListFormat, RoomNameFormat, TrackerConfig};
use crate::path::{CheckpointInfo, PathAggregates, PathInfo, RoomInfo};

/// Rendered for every owned token when no path is loaded.
pub const MISSING_PATH: &str = "-";
pub const MISSING_PATH_PERCENT: &str = "-%";
/// Rendered for position-dependent tokens when the current room is off-path.
pub const NOT_ON_PATH: &str = "?";
pub const NOT_ON_PATH_PERCENT: &str = "?%";

pub fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

pub fn format_double(value: f64) -> String {
    format!("{value:.2}")
}

/// Formatting knobs shared by all providers.
#[derive(Debug, Clone, Copy)]
pub struct StatSettings {
    pub attempt_window: usize,
    pub list_format: ListFormat,
    pub room_name_format: RoomNameFormat,
}

impl From<&TrackerConfig> for StatSettings {
    fn from(config: &TrackerConfig) -> Self {
        Self {
            attempt_window: config.attempt_window,
            list_format: config.list_format,
            room_name_format: config.room_name_format,
        }
    }
}

/// Everything a provider may read during one render pass. Aggregates are
/// computed once per pass and shared.
pub struct StatContext<'a> {
    pub path: Option<&'a PathInfo>,
    pub aggregates: Option<&'a PathAggregates>,
    pub stats: &'a ChapterStats,
    /// Golden-run history, oldest first; one room name per golden death.
    pub golden_runs: &'a [String],
    pub settings: StatSettings,
}

impl<'a> StatContext<'a> {
    /// The current room's place on the path, if it has one.
    pub fn current_room_on_path(&self) -> Option<(&'a CheckpointInfo, &'a RoomInfo)> {
        let path = self.path?;
        let current = self.stats.current_room.as_deref()?;
        path.checkpoints.iter().find_map(|cp| {
            cp.rooms
                .iter()
                .find(|r| r.name == current)
                .map(|room| (cp, room))
        })
    }

    pub fn formatted_room_name(&self, cp: &CheckpointInfo, room: &RoomInfo) -> String {
        cp.formatted_room_name(room, self.settings.room_name_format)
    }

    /// Join list entries per the configured list format.
    pub fn join_list(&self, entries: &[String]) -> String {
        let joined = entries.join(", ");
        match self.settings.list_format {
            ListFormat::Plain => joined,
            ListFormat::Json => format!("[{joined}]"),
        }
    }
}

pub trait Stat {
    /// The literal tokens this provider owns.
    fn tokens(&self) -> &'static [&'static str];

    fn applies_to(&self, template: &str) -> bool {
        self.tokens().iter().any(|t| template.contains(t))
    }

    fn render(&self, ctx: &StatContext<'_>, template: &str) -> String;
}

/// Replace every owned token with its marker, percent tokens getting the
/// percent flavor.
pub(crate) fn mark_all(template: &str, tokens: &[&str], plain: &str, percent: &str) -> String {
    let mut out = template.to_string();
    for token in tokens {
        let marker = if is_percent_token(token) { percent } else { plain };
        out = out.replace(token, marker);
    }
    out
}

fn is_percent_token(token: &str) -> bool {
    token.contains("Rate}")
        || token.contains("RateSession}")
        || token.contains("Percent}")
        || token.contains("PercentSession}")
}

/// Collect the argument strings of parameterized tokens, e.g. the `3` of
/// `{chapter:lastRunDistance#3}` for prefix `{chapter:lastRunDistance#`.
/// Duplicates are dropped, order of first appearance kept.
pub(crate) fn param_args(template: &str, prefix: &str) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find(prefix) {
        let tail = &rest[start + prefix.len()..];
        let Some(end) = tail.find('}') else { break };
        let arg = &tail[..end];
        if !args.iter().any(|a| a == arg) {
            args.push(arg.to_string());
        }
        rest = &tail[end + 1..];
    }
    args
}

/// A named live-output template, rendered to `live-data/<name>.txt` on every
/// save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveFormat {
    pub name: String,
    pub template: String,
}

impl LiveFormat {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
        }
    }
}

/// Runs the registered providers over templates and owns the live formats.
pub struct StatManager {
    providers: Vec<Box<dyn Stat>>,
    pub formats: Vec<LiveFormat>,
}

impl Default for StatManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StatManager {
    pub fn new() -> Self {
        Self {
            providers: vec![
                Box::new(SuccessRateStat),
                Box::new(ChokeRateStat),
                Box::new(CurrentRunPbStat),
                Box::new(RunDistanceStat),
                Box::new(StreakStat),
                Box::new(SuccessRateColorsStat),
                Box::new(ListStat),
                Box::new(ProgressStat),
            ],
            formats: default_formats(),
        }
    }

    pub fn render(&self, ctx: &StatContext<'_>, template: &str) -> String {
        let mut out = template.to_string();
        for provider in &self.providers {
            if provider.applies_to(&out) {
                out = provider.render(ctx, &out);
            }
        }
        out
    }

    /// Load live formats from `name;template` lines. `\n` escapes in the
    /// template expand to newlines. Malformed lines are skipped with a
    /// warning rather than failing the file.
    pub fn load_formats(&mut self, text: &str) {
        let mut formats = Vec::new();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            match line.split_once(';') {
                Some((name, template)) if !name.is_empty() => {
                    formats.push(LiveFormat::new(name, template.replace("\\n", "\n")));
                }
                _ => tracing::warn!("skipping malformed format line: {line}"),
            }
        }
        if !formats.is_empty() {
            self.formats = formats;
        }
    }

    pub fn serialize_formats(&self) -> String {
        let mut out = String::new();
        for format in &self.formats {
            out.push_str(&format.name);
            out.push(';');
            out.push_str(&format.template.replace('\n', "\\n"));
            out.push('\n');
        }
        out
    }
}

fn default_formats() -> Vec<LiveFormat> {
    vec![
        LiveFormat::new(
            "success-rate",
            "Room SR: {room:successRate} ({room:successes}/{room:attempts}) | CP: {checkpoint:successRate} | Total: {chapter:successRate}",
        ),
        LiveFormat::new(
            "choke-rate",
            "Room Choke Rate: {room:chokeRate} (CP: {checkpoint:chokeRate})",
        ),
        LiveFormat::new(
            "current-run-pb",
            "Current run: #{run:currentPbStatus}, better than {run:currentPbStatusPercent} of all runs (Top {run:topXPercent})",
        ),
        LiveFormat::new(
            "avg-run-distance",
            "Avg. run distance: {chapter:averageRunDistance}/{chapter:roomCount}\nAvg. over last 10 runs: {chapter:averageRunDistanceSession#10}/{chapter:roomCount}",
        ),
        LiveFormat::new(
            "current-streak",
            "Current Room Streak: {room:currentStreak}, Checkpoint: {checkpoint:currentStreak}",
        ),
        LiveFormat::new(
            "color-tracker",
            "Reds: {chapter:color-red}, Yellows: {chapter:color-yellow}, Greens: {chapter:color-green}, Light-Greens: {chapter:color-lightGreen}",
        ),
        LiveFormat::new(
            "list-checkpoint-deaths",
            "Current run: {list:checkpointDeaths}",
        ),
        LiveFormat::new(
            "live-progress",
            "Room {room:numberInChapter}/{chapter:roomCount} ({room:name})",
        ),
    ]
}
