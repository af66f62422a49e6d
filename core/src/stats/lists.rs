use crate::config::ListFormat;

use super::{MISSING_PATH, Stat, StatContext, format_percent, mark_all};

const LIST_ROOM_NAMES: &str = "{list:roomNames}";
const LIST_SUCCESS_RATES: &str = "{list:successRates}";
const LIST_CHOKE_RATES: &str = "{list:chokeRates}";
const LIST_CHOKE_RATES_SESSION: &str = "{list:chokeRatesSession}";
const LIST_CHECKPOINT_DEATHS: &str = "{list:checkpointDeaths}";

const TOKENS: &[&str] = &[
    LIST_ROOM_NAMES,
    LIST_SUCCESS_RATES,
    LIST_CHOKE_RATES,
    LIST_CHOKE_RATES_SESSION,
    LIST_CHECKPOINT_DEATHS,
];

/// Whole-path lists, one entry per room in path order.
pub struct ListStat;

impl Stat for ListStat {
    fn tokens(&self) -> &'static [&'static str] {
        TOKENS
    }

    fn render(&self, ctx: &StatContext<'_>, template: &str) -> String {
        let Some(path) = ctx.path else {
            return mark_all(template, TOKENS, MISSING_PATH, MISSING_PATH);
        };

        let window = ctx.settings.attempt_window;
        let json = ctx.settings.list_format == ListFormat::Json;

        let mut names = Vec::new();
        let mut rates = Vec::new();
        for cp in &path.checkpoints {
            for room in &cp.rooms {
                let display = ctx.formatted_room_name(cp, room);
                names.push(if json { format!("'{display}'") } else { display });

                let rate = ctx
                    .stats
                    .room(&room.name)
                    .map_or(0.0, |r| r.average_success_over(window));
                rates.push(if json {
                    rate.to_string()
                } else {
                    format_percent(f64::from(rate))
                });
            }
        }

        // Per-room choke rates; a zero denominator lists as 0 rather than
        // the undefined marker, so columns stay aligned.
        let deaths: Vec<(u32, u32)> = path
            .rooms()
            .map(|room| match ctx.stats.room(&room.name) {
                Some(stats) => (stats.golden_deaths, stats.golden_deaths_session),
                None => (0, 0),
            })
            .collect();
        let choke_list = |pick: fn(&(u32, u32)) -> u32| -> Vec<String> {
            let mut remaining: u32 = deaths.iter().map(pick).sum();
            deaths
                .iter()
                .map(|entry| {
                    let in_room = pick(entry);
                    let rate = if remaining == 0 {
                        0.0
                    } else {
                        f64::from(in_room) / f64::from(remaining)
                    };
                    remaining -= in_room;
                    if json {
                        rate.to_string()
                    } else {
                        format_percent(rate)
                    }
                })
                .collect()
        };
        let chokes = choke_list(|d| d.0);
        let chokes_session = choke_list(|d| d.1);

        let checkpoint_deaths: Vec<String> = path
            .checkpoints
            .iter()
            .map(|cp| {
                cp.rooms
                    .iter()
                    .map(|room| {
                        ctx.stats
                            .room(&room.name)
                            .map_or(0, |r| r.deaths_in_current_run)
                    })
                    .sum::<u32>()
                    .to_string()
            })
            .collect();

        template
            .replace(LIST_ROOM_NAMES, &ctx.join_list(&names))
            .replace(LIST_SUCCESS_RATES, &ctx.join_list(&rates))
            .replace(LIST_CHOKE_RATES, &ctx.join_list(&chokes))
            .replace(LIST_CHOKE_RATES_SESSION, &ctx.join_list(&chokes_session))
            .replace(LIST_CHECKPOINT_DEATHS, &checkpoint_deaths.join("/"))
    }
}
