use super::{
    MISSING_PATH, MISSING_PATH_PERCENT, NOT_ON_PATH, NOT_ON_PATH_PERCENT, Stat, StatContext,
    format_percent, mark_all,
};

const PB_STATUS: &str = "{run:currentPbStatus}";
const PB_STATUS_SESSION: &str = "{run:currentPbStatusSession}";
const PB_STATUS_PERCENT: &str = "{run:currentPbStatusPercent}";
const PB_STATUS_PERCENT_SESSION: &str = "{run:currentPbStatusPercentSession}";
const TOP_X_PERCENT: &str = "{run:topXPercent}";
const TOP_X_PERCENT_SESSION: &str = "{run:topXPercentSession}";

const TOKENS: &[&str] = &[
    PB_STATUS,
    PB_STATUS_SESSION,
    PB_STATUS_PERCENT,
    PB_STATUS_PERCENT_SESSION,
    TOP_X_PERCENT,
    TOP_X_PERCENT_SESSION,
];

/// Where the current golden run ranks among all recorded runs. Only
/// meaningful while the player is actually holding the golden berry.
pub struct CurrentRunPbStat;

struct Rank {
    status: String,
    percent: String,
    top_x: String,
}

/// Rank 1 means every recorded run died before this room. The percent pair
/// has an explicit zero-deaths branch instead of a 0/0 division.
fn rank(total_deaths: u32, deaths_before: u32) -> Rank {
    let status = total_deaths - deaths_before + 1;
    let status = if status == 1 {
        "PB".to_string()
    } else {
        status.to_string()
    };
    let (percent, top_x) = if total_deaths == 0 {
        ("100%".to_string(), "0%".to_string())
    } else {
        let better_than = f64::from(deaths_before) / f64::from(total_deaths);
        (format_percent(better_than), format_percent(1.0 - better_than))
    };
    Rank { status, percent, top_x }
}

impl Stat for CurrentRunPbStat {
    fn tokens(&self) -> &'static [&'static str] {
        TOKENS
    }

    fn render(&self, ctx: &StatContext<'_>, template: &str) -> String {
        let (Some(path), Some(aggregates)) = (ctx.path, ctx.aggregates) else {
            return mark_all(template, TOKENS, MISSING_PATH, MISSING_PATH_PERCENT);
        };

        if !ctx.stats.mod_state.holding_golden {
            return mark_all(template, TOKENS, MISSING_PATH, MISSING_PATH_PERCENT);
        }

        let current = ctx.stats.current_room.as_deref();
        if ctx.current_room_on_path().is_none() {
            return mark_all(template, TOKENS, NOT_ON_PATH, NOT_ON_PATH_PERCENT);
        }

        // Golden deaths in rooms strictly before the current one.
        let mut deaths_before = (0, 0);
        for room in path.rooms() {
            if current == Some(room.name.as_str()) {
                break;
            }
            if let Some(stats) = ctx.stats.room(&room.name) {
                deaths_before.0 += stats.golden_deaths;
                deaths_before.1 += stats.golden_deaths_session;
            }
        }

        let lifetime = rank(aggregates.chapter.golden_deaths, deaths_before.0);
        let session = rank(aggregates.chapter.golden_deaths_session, deaths_before.1);

        template
            .replace(PB_STATUS, &lifetime.status)
            .replace(PB_STATUS_SESSION, &session.status)
            .replace(PB_STATUS_PERCENT, &lifetime.percent)
            .replace(PB_STATUS_PERCENT_SESSION, &session.percent)
            .replace(TOP_X_PERCENT, &lifetime.top_x)
            .replace(TOP_X_PERCENT_SESSION, &session.top_x)
    }
}
