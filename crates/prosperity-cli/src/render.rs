//! Text rendering of the session for the terminal.
//!
//! Every function returns a finished `String`; the read loop only prints.

use prosperity_core::config::DisplayConfig;
use prosperity_core::session::Notice;
use prosperity_types::{ClauseSelection, GameState, MAX_ASSEMBLED_CLAUSES, SceneType, StreetView};

use crate::command::START_HELP;

const RULE: &str = "────────────────────────────────────────";

/// The start screen.
pub fn start_screen(has_save: bool) -> String {
    let save_line = if has_save {
        "存档可用 / SAVE FOUND"
    } else {
        "无存档 / NO SAVE"
    };
    [
        RULE,
        "  最后的繁荣 · THE LAST PROSPERITY",
        RULE,
        save_line,
        START_HELP,
    ]
    .join("\n")
}

/// The full dashboard for the current turn.
///
/// `upcoming` is the scene the next decree will move the day into.
pub fn dashboard(
    state: &GameState,
    upcoming: SceneType,
    display: &DisplayConfig,
    selection: &ClauseSelection,
) -> String {
    let windows = &state.windows;
    let mut lines = vec![
        RULE.to_owned(),
        header(state),
        format!("下一时段: {}", upcoming.title()),
        RULE.to_owned(),
        state.scene_context.clone(),
        String::new(),
        format!(
            "[作战室] {} | 资源分配 {}% 民生 / {}% 聚变",
            windows.war_room.status,
            windows.war_room.resource_allocation,
            100_u8.saturating_sub(windows.war_room.resource_allocation),
        ),
        if windows.war_room.is_all_clear() {
            "  威胁: 无".to_owned()
        } else {
            format!("  威胁: {}", windows.war_room.active_threats.join(" / "))
        },
        format!(
            "[媒体] 情绪 {} | 热议 #{} | 头条: {}",
            windows.media.sentiment.label(),
            windows.media.trending_topic,
            windows.media.lead_headline().unwrap_or("无"),
        ),
    ];
    lines.extend(
        windows
            .media
            .headlines
            .iter()
            .skip(1)
            .map(|h| format!("  · {h}")),
    );
    lines.extend(street_view(&windows.street_view));
    lines.push(format!(
        "[内参] {} ({}, 可信度 {}%)",
        windows.internal_report.title,
        windows.internal_report.intelligence_level.label(),
        windows.internal_report.veracity_score,
    ));
    lines.push(format!("  {}", windows.internal_report.content));
    lines.push(String::new());

    lines.push(format!(
        "条款 ({}/{MAX_ASSEMBLED_CLAUSES} 已选):",
        selection.len()
    ));
    lines.extend(
        numbered(&state.available_clauses, display.max_clauses).map(|(n, clause)| {
            let picked = n.checked_sub(1).is_some_and(|index| selection.contains(index));
            let mark = if picked { "x" } else { " " };
            format!("  [{mark}] {n}. {clause}")
        }),
    );
    lines.push("快速回复:".to_owned());
    lines.extend(
        numbered(&state.available_quick_replies, display.max_quick_replies)
            .map(|(n, reply)| format!("  {n}. {reply}")),
    );
    lines.push(String::new());
    lines.extend(history_lines(state, display.history_tail));
    lines.join("\n")
}

/// One-line status header: year, clock, era, gauges, turn.
pub fn header(state: &GameState) -> String {
    format!(
        "[{}] {} · {} | 迷雾 {} | 清晰 {} | 第 {} 回合",
        state.year,
        state.current_scene.title(),
        state.era.title(),
        state.social_fog,
        state.social_clarity,
        state.turn,
    )
}

fn street_view(view: &StreetView) -> Vec<String> {
    let image = view.image.as_ref().map_or_else(
        || "无画面".to_owned(),
        |url| format!("画面 {} 字节", url.len()),
    );
    vec![
        format!("[街景] {} | {} | {}", view.weather, view.crowd_mood, image),
        format!("  {}", view.description),
        format!("  {}", view.visual_details.join(", ")),
    ]
}

/// The last `tail` history lines.
pub fn history_lines(state: &GameState, tail: usize) -> Vec<String> {
    let skip = state.history.len().saturating_sub(tail);
    state.history.iter().skip(skip).cloned().collect()
}

/// The whole history log.
pub fn full_history(state: &GameState) -> String {
    if state.history.is_empty() {
        return "（尚无记录）".to_owned();
    }
    history_lines(state, state.history.len()).join("\n")
}

/// A notice as shown to the player.
pub fn notice(notice: Notice) -> String {
    format!("!! {}", notice.text())
}

/// Up to `limit` items paired with their 1-based position.
fn numbered(items: &[String], limit: usize) -> impl Iterator<Item = (usize, &String)> {
    (1_usize..).zip(items.iter().take(limit))
}
