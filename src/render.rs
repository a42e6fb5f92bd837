//! Plain-text rendering of engine state for the terminal.

use std::fmt::Write as _;

use hunter_guidance::Guidance;
use hunter_protocol::{Notification, PlayerStats, ProgressionEngine, Severity, Task};

use crate::session::short_id;

/// A percentage in `[0, 100]` rounded for display.
pub(crate) fn percent(value: f64) -> u32 {
    value.clamp(0.0, 100.0).round() as u32
}

/// One listing line: short id, rank letter, progress and title.
#[must_use]
pub fn task_line(task: &Task) -> String {
    let mut line = format!(
        "{}  {}  {:>3}%  {}",
        short_id(task.id),
        task.rank.letter(),
        percent(task.progress),
        task.title
    );
    if !task.subtasks.is_empty() {
        let _ = write!(
            line,
            "  ({}/{} objectives)",
            task.completed_subtasks(),
            task.subtasks.len()
        );
    }
    line
}

/// Active dungeons, followed by cleared ones when `include_cleared` is set.
#[must_use]
pub fn task_list(engine: &ProgressionEngine, include_cleared: bool) -> String {
    let active: Vec<&Task> = engine.active_tasks().collect();
    let mut out = format!("Active dungeons ({}):", active.len());
    if active.is_empty() {
        out.push_str("\n  none, register one with `hunter add`");
    }
    for task in active {
        let _ = write!(out, "\n  {}", task_line(task));
    }

    if include_cleared {
        let cleared: Vec<&Task> = engine.cleared_tasks().collect();
        let _ = write!(out, "\n\nCleared dungeons ({}):", cleared.len());
        for task in cleared {
            let _ = write!(out, "\n  {}", task_line(task));
        }
    }
    out
}

/// Everything known about one dungeon.
#[must_use]
pub fn task_detail(task: &Task) -> String {
    let status = if task.completed { "cleared" } else { "active" };
    let mut out = format!(
        "{title}\n  id:          {id}\n  rank:        {rank} (+{xp} XP)\n  category:    {category}\n  status:      {status}\n  progress:    {progress}%\n  time:        {spent} / {estimate} min",
        title = task.title,
        id = task.id,
        rank = task.rank,
        xp = task.reward_xp,
        category = task.category,
        progress = percent(task.progress),
        spent = task.time_spent_minutes,
        estimate = task.estimated_minutes,
    );

    if !task.description.is_empty() {
        let _ = write!(out, "\n  description: {}", task.description);
    }

    if !task.subtasks.is_empty() {
        let _ = write!(
            out,
            "\n  objectives:  {}/{}",
            task.completed_subtasks(),
            task.subtasks.len()
        );
        for (index, subtask) in task.subtasks.iter().enumerate() {
            let mark = if subtask.completed { 'x' } else { ' ' };
            let _ = write!(out, "\n    {}. [{mark}] {}", index + 1, subtask.title);
        }
    }
    out
}

/// The hunter dashboard.
#[must_use]
pub fn stats(stats: &PlayerStats) -> String {
    let streak_unit = if stats.streak == 1 { "day" } else { "days" };
    format!(
        "Hunter Level {level} ({rank})\n  XP:        {xp} ({to_next} to next level)\n  Streak:    {streak} {streak_unit}\n  Dungeons:  {completed} cleared, {active} active, {total} total ({rate}%)\n  Time:      {minutes} min logged",
        level = stats.level,
        rank = stats.rank,
        xp = stats.xp,
        to_next = stats.xp_to_next_level,
        streak = stats.streak,
        completed = stats.completed_tasks,
        active = stats.active_tasks,
        total = stats.total_tasks,
        rate = percent(stats.completion_rate * 100.0),
        minutes = stats.minutes_logged,
    )
}

#[must_use]
pub fn notification(note: &Notification) -> String {
    match note.severity() {
        Severity::Highlight => format!("*** {} *** {}", note.title(), note.description()),
        Severity::Info | Severity::Error => {
            format!("[{}] {}", note.title(), note.description())
        }
    }
}

/// Guidance text, preceded by a notice when it is a fallback.
#[must_use]
pub fn guidance(guidance: &Guidance) -> String {
    if guidance.is_fallback() {
        format!("{}\n\n{}", notification(&guidance.notification()), guidance.text)
    } else {
        guidance.text.clone()
    }
}
