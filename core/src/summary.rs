//! On-demand human-readable chapter report. Write-only output, never parsed
//! back.

use std::fmt::Write;

use crate::chapter::ChapterStats;
use crate::path::PathInfo;
use crate::stats::format_percent;

/// Renders the full report. Unvisited rooms show as zero lines but are left
/// out of the averages and products, so a half-explored chapter still reads
/// sensibly.
pub fn render(stats: &ChapterStats, path: &PathInfo, window: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tracker summary for chapter '{}'", stats.chapter_key);
    let _ = writeln!(
        out,
        "Generated {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out);

    golden_deaths_section(&mut out, stats, path);
    success_rate_section(&mut out, stats, path, window);
    choke_rate_section(&mut out, stats, path);
    golden_chance_section(&mut out, stats, path, window);
    run_products_section(&mut out, stats, path, window);
    out
}

fn label(path: &PathInfo, cp_index: usize, room_index: usize) -> String {
    let cp = &path.checkpoints[cp_index];
    format!("{}-{}", cp.abbreviation, cp.rooms[room_index].number_in_checkpoint)
}

fn golden_deaths_section(out: &mut String, stats: &ChapterStats, path: &PathInfo) {
    let _ = writeln!(out, "--- Golden Berry Deaths ---");
    let deaths = |name: &str| stats.room(name).map_or(0, |r| r.golden_deaths);
    let total: u32 = path.rooms().map(|r| deaths(&r.name)).sum();

    for (cp_index, cp) in path.checkpoints.iter().enumerate() {
        let cp_total: u32 = cp.rooms.iter().map(|r| deaths(&r.name)).sum();
        let share = if total == 0 {
            0.0
        } else {
            f64::from(cp_total) / f64::from(total)
        };
        let _ = writeln!(out, "{}: {} ({})", cp.name, cp_total, format_percent(share));
        for (room_index, room) in cp.rooms.iter().enumerate() {
            let _ = writeln!(
                out,
                "\t{}: {}",
                label(path, cp_index, room_index),
                deaths(&room.name)
            );
        }
    }
    let _ = writeln!(out, "Total Golden Berry Deaths: {total}");
    let _ = writeln!(out);
    let _ = writeln!(out);
}

fn success_rate_section(out: &mut String, stats: &ChapterStats, path: &PathInfo, window: usize) {
    let _ = writeln!(out, "--- Consistency Stats ---");
    let _ = writeln!(out, "- Success Rate");

    let mut chapter = (0.0f64, 0u32, 0u32, 0u32); // rate sum, rooms, successes, attempts
    for (cp_index, cp) in path.checkpoints.iter().enumerate() {
        let mut checkpoint = (0.0f64, 0u32, 0u32, 0u32);
        for room in &cp.rooms {
            let Some(room_stats) = stats.room(&room.name) else {
                continue;
            };
            let rate = f64::from(room_stats.average_success_over(window));
            checkpoint.0 += rate;
            checkpoint.1 += 1;
            checkpoint.2 += room_stats.successes_over(window);
            checkpoint.3 += room_stats.attempts_over(window);
            chapter.0 += rate;
            chapter.1 += 1;
            chapter.2 += room_stats.successes_over(window);
            chapter.3 += room_stats.attempts_over(window);
        }
        let cp_rate = mean(checkpoint.0, checkpoint.1);
        let _ = writeln!(
            out,
            "{}: {} ({} successes / {} attempts)",
            cp.name,
            format_percent(cp_rate),
            checkpoint.2,
            checkpoint.3
        );
        for (room_index, room) in cp.rooms.iter().enumerate() {
            let (rate, successes, attempts) = match stats.room(&room.name) {
                Some(r) => (
                    f64::from(r.average_success_over(window)),
                    r.successes_over(window),
                    r.attempts_over(window),
                ),
                None => (0.0, 0, 0),
            };
            let _ = writeln!(
                out,
                "\t{}: {} ({} / {})",
                label(path, cp_index, room_index),
                format_percent(rate),
                successes,
                attempts
            );
        }
    }
    let _ = writeln!(
        out,
        "Total Success Rate: {} ({} successes / {} attempts)",
        format_percent(mean(chapter.0, chapter.1)),
        chapter.2,
        chapter.3
    );
    let _ = writeln!(out);
}

fn choke_rate_section(out: &mut String, stats: &ChapterStats, path: &PathInfo) {
    let _ = writeln!(out, "- Choke Rate");
    let _ = writeln!(out);
    let _ = writeln!(out, "Room Name,Choke Rate,Golden Runs to Room,Room Deaths");

    let deaths: Vec<u32> = path
        .rooms()
        .map(|r| stats.room(&r.name).map_or(0, |s| s.golden_deaths))
        .collect();
    // Runs that reached each room: every death from here on, plus one for
    // the run the golden was eventually achieved with.
    let mut remaining: u32 = deaths.iter().sum::<u32>() + 1;

    let mut flat = 0;
    for (cp_index, cp) in path.checkpoints.iter().enumerate() {
        for room_index in 0..cp.rooms.len() {
            let in_room = deaths[flat];
            let rate = f64::from(in_room) / f64::from(remaining);
            let _ = writeln!(
                out,
                "{},{}, {}, {}",
                label(path, cp_index, room_index),
                format_percent(rate),
                remaining,
                in_room
            );
            remaining -= in_room;
            flat += 1;
        }
    }
    let _ = writeln!(out);
}

fn golden_chance_section(out: &mut String, stats: &ChapterStats, path: &PathInfo, window: usize) {
    let _ = writeln!(out, "- Golden Chance");
    let mut chapter_chance = 1.0f64;
    for cp in &path.checkpoints {
        let mut cp_chance = 1.0f64;
        for room in &cp.rooms {
            if let Some(room_stats) = stats.room(&room.name) {
                let rate = f64::from(room_stats.average_success_over(window));
                cp_chance *= rate;
                chapter_chance *= rate;
            }
        }
        let _ = writeln!(out, "{}: {}", cp.name, format_percent(cp_chance));
    }
    let _ = writeln!(out, "Total Golden Chance: {}", format_percent(chapter_chance));
    let _ = writeln!(out);
}

/// For every room, the chance of carrying the golden from the start to it
/// and from it to the end of the chapter.
fn run_products_section(out: &mut String, stats: &ChapterStats, path: &PathInfo, window: usize) {
    let _ = writeln!(out, "- Golden Chance Over A Run");

    let rates: Vec<Option<f64>> = path
        .rooms()
        .map(|r| {
            stats
                .room(&r.name)
                .map(|s| f64::from(s.average_success_over(window)))
        })
        .collect();

    let mut flat = 0;
    for (cp_index, cp) in path.checkpoints.iter().enumerate() {
        for room_index in 0..cp.rooms.len() {
            let to_room: f64 = rates[..flat].iter().map(|r| r.unwrap_or(0.0)).product();
            let from_room: f64 = rates[flat..].iter().map(|r| r.unwrap_or(0.0)).product();
            let _ = writeln!(
                out,
                "\t{}:\tStart -> Room: '{}',\tRoom -> End '{}'",
                label(path, cp_index, room_index),
                format_percent(to_room),
                format_percent(from_room)
            );
            flat += 1;
        }
    }
}

fn mean(sum: f64, count: u32) -> f64 {
    if count == 0 { 0.0 } else { sum / f64::from(count) }
}
