use super::{
    MISSING_PATH, MISSING_PATH_PERCENT, NOT_ON_PATH, NOT_ON_PATH_PERCENT, Stat, StatContext,
    format_percent, mark_all,
};

const ROOM_CHOKE_RATE: &str = "{room:chokeRate}";
const ROOM_CHOKE_RATE_SESSION: &str = "{room:chokeRateSession}";
const CHECKPOINT_CHOKE_RATE: &str = "{checkpoint:chokeRate}";
const CHECKPOINT_CHOKE_RATE_SESSION: &str = "{checkpoint:chokeRateSession}";

const TOKENS: &[&str] = &[
    ROOM_CHOKE_RATE,
    ROOM_CHOKE_RATE_SESSION,
    CHECKPOINT_CHOKE_RATE,
    CHECKPOINT_CHOKE_RATE_SESSION,
];

/// How often a golden run that reached a point died there: deaths in the
/// room (or checkpoint) over deaths in it plus deaths anywhere after it.
pub struct ChokeRateStat;

/// None when the denominator is zero; that renders the dash marker.
fn choke(deaths_in: u32, deaths_after: u32) -> Option<f64> {
    let total = deaths_in + deaths_after;
    if total == 0 {
        return None;
    }
    Some(f64::from(deaths_in) / f64::from(total))
}

impl Stat for ChokeRateStat {
    fn tokens(&self) -> &'static [&'static str] {
        TOKENS
    }

    fn render(&self, ctx: &StatContext<'_>, template: &str) -> String {
        let (Some(path), Some(aggregates)) = (ctx.path, ctx.aggregates) else {
            return mark_all(template, TOKENS, MISSING_PATH, MISSING_PATH_PERCENT);
        };
        // Every choke token is anchored at the current room's position, so
        // off the path none of them is computable.
        if ctx.current_room_on_path().is_none() {
            return mark_all(template, TOKENS, NOT_ON_PATH, NOT_ON_PATH_PERCENT);
        }

        let current = ctx.stats.current_room.as_deref();

        // Room-level: walk the path once, summing deaths after the current
        // room.
        let mut deaths_in = (0, 0);
        let mut deaths_after = (0, 0);
        let mut past_room = false;
        for room in path.rooms() {
            let (gold, session) = match ctx.stats.room(&room.name) {
                Some(stats) => (stats.golden_deaths, stats.golden_deaths_session),
                None => (0, 0),
            };
            if past_room {
                deaths_after.0 += gold;
                deaths_after.1 += session;
            }
            if current == Some(room.name.as_str()) {
                past_room = true;
                deaths_in = (gold, session);
            }
        }

        let mut out = template.replace(
            ROOM_CHOKE_RATE,
            &rate_text(choke(deaths_in.0, deaths_after.0)),
        );
        out = out.replace(
            ROOM_CHOKE_RATE_SESSION,
            &rate_text(choke(deaths_in.1, deaths_after.1)),
        );

        // Checkpoint-level, from the per-checkpoint aggregates.
        let checkpoint_rates = aggregates.current_checkpoint.map(|index| {
            let after = |f: fn(&crate::path::AggregateStats) -> u32| {
                aggregates.checkpoints[index + 1..].iter().map(f).sum::<u32>()
            };
            let cp = &aggregates.checkpoints[index];
            (
                choke(cp.golden_deaths, after(|a| a.golden_deaths)),
                choke(cp.golden_deaths_session, after(|a| a.golden_deaths_session)),
            )
        });
        let (cp_rate, cp_rate_session) = match checkpoint_rates {
            Some(rates) => rates,
            None => (None, None),
        };

        out = out.replace(CHECKPOINT_CHOKE_RATE, &rate_text(cp_rate));
        out.replace(CHECKPOINT_CHOKE_RATE_SESSION, &rate_text(cp_rate_session))
    }
}

fn rate_text(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format_percent(rate),
        None => MISSING_PATH_PERCENT.to_string(),
    }
}
