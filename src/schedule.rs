//! Date policies applied when a task is stored or marked done.
//!
//! An empty repeat text means a one-off task.

use crate::{
    CalendarDate, EngineError, RecurrenceRule, calc,
    engine::{DateRole, parse_date},
};

/// What happens to a task when it is marked done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Completion {
    /// One-off task: delete it
    Remove,
    /// Recurring task: move it to its next occurrence
    Reschedule(CalendarDate),
}

/// Checks a task's repeat text. Empty text is accepted and yields `None`.
///
/// # Errors
/// Returns `InvalidRuleFormat` or `InvalidRuleParameter` for non-empty text
/// that does not parse.
pub fn validate_repeat(repeat_text: &str) -> Result<Option<RecurrenceRule>, EngineError> {
    if repeat_text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(repeat_text.parse()?))
}

/// Date to store for a new or edited task.
///
/// - no date: `today`
/// - a date before `today`: `today` for a one-off task, otherwise the rule's
///   next occurrence after `today`
/// - a date on or after `today`: stored as given
///
/// # Errors
/// Returns `EngineError` for a malformed date or rule, or when the rule has
/// no occurrence after `today`.
pub fn initial_date(
    today: CalendarDate,
    date_text: &str,
    repeat_text: &str,
) -> Result<CalendarDate, EngineError> {
    let rule = validate_repeat(repeat_text)?;
    if date_text.trim().is_empty() {
        return Ok(today);
    }

    let date = parse_date(date_text, DateRole::Base)?;
    if date >= today {
        return Ok(date);
    }
    match rule {
        None => Ok(today),
        Some(rule) => Ok(calc::next(date, today, &rule)?),
    }
}

/// Outcome of marking the task stored at `date_text` done on `today`.
///
/// # Errors
/// Returns `EngineError` for a malformed date or rule, or when the rule has
/// no occurrence after `today`.
pub fn complete(
    today: CalendarDate,
    date_text: &str,
    repeat_text: &str,
) -> Result<Completion, EngineError> {
    let date = parse_date(date_text, DateRole::Base)?;
    match validate_repeat(repeat_text)? {
        None => Ok(Completion::Remove),
        Some(rule) => Ok(Completion::Reschedule(calc::next(date, today, &rule)?)),
    }
}
