//! Relative date-phrase resolution.
//!
//! Pure functions that turn a phrase plus a caller-supplied reference instant
//! into an absolute calendar date. No hidden clock: every function takes `now`
//! so date logic stays deterministic under test. An invalid computed date
//! (out-of-range arithmetic, nonexistent day-of-month) yields `None`, which
//! calling plugins treat as "no date found".

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc, Weekday};
use regex::Regex;

/// Hour (UTC) assigned to resolved dates when the phrase names no time.
pub const DEFAULT_HOUR: u32 = 9;

/// Weekday modifier for [`resolve_weekday`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shift {
    /// Next future occurrence; a weekday that already passed this week
    /// (including today) rolls to next week.
    #[default]
    This,
    /// Always at least 7 days in the future — never same-week.
    Next,
    /// Most recent past occurrence, at least one full week back.
    Last,
}

/// Unit modifier for week/month/quarter/year resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitShift {
    #[default]
    This,
    Next,
    Last,
    BeginningOf,
    EndOf,
}

/// Timeframe for [`find_last_occurrence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Month,
    Quarter,
    Year,
}

// ---------------------------------------------------------------------------
// Weekday arithmetic
// ---------------------------------------------------------------------------

/// Fixed Sun–Sat day-name table; matching is case-insensitive and accepts
/// the standard three-letter abbreviations.
const DAY_NAMES: &[(&str, Weekday)] = &[
    ("sunday", Weekday::Sun),
    ("sun", Weekday::Sun),
    ("monday", Weekday::Mon),
    ("mon", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("tue", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("wed", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("thu", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("fri", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sat", Weekday::Sat),
];

/// Resolve a day name to a weekday. Unknown names yield `None`.
pub fn weekday_from_name(name: &str) -> Option<Weekday> {
    let lower = name.trim().to_lowercase();
    DAY_NAMES
        .iter()
        .find(|(n, _)| *n == lower)
        .map(|(_, wd)| *wd)
}

static RE_WEEKEND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:(next|this|last)\s+)?weekend\b").unwrap()
});

/// Rewrite "weekend"/"next weekend" into "saturday"/"next saturday" so the
/// weekday resolver can handle it. Weekend is an alias for Saturday.
pub fn preprocess_weekend(text: &str) -> String {
    RE_WEEKEND
        .replace_all(text, |caps: &regex::Captures<'_>| match caps.get(1) {
            Some(modifier) => format!("{} saturday", modifier.as_str()),
            None => "saturday".to_string(),
        })
        .into_owned()
}

/// Resolve `(modifier, day name)` against `now`.
///
/// - `Next`: `((target - today) mod 7) + 7` days ahead — at least a week out.
/// - `This`: days until the next occurrence, with today's weekday rolling a
///   full week (the occurrence is treated as already passed).
/// - `Last`: `((today - target) mod 7) + 7` days back — the most recent past
///   occurrence at least one full week back.
pub fn resolve_weekday(now: DateTime<Utc>, day_name: &str, shift: Shift) -> Option<NaiveDate> {
    let target = weekday_from_name(day_name)?;
    let today = now.date_naive();
    let today_idx = today.weekday().num_days_from_sunday() as i64;
    let target_idx = target.num_days_from_sunday() as i64;

    match shift {
        Shift::Next => {
            let ahead = (target_idx - today_idx).rem_euclid(7) + 7;
            today.checked_add_days(Days::new(ahead as u64))
        }
        Shift::This => {
            let mut ahead = (target_idx - today_idx).rem_euclid(7);
            if ahead == 0 {
                ahead = 7;
            }
            today.checked_add_days(Days::new(ahead as u64))
        }
        Shift::Last => {
            let back = (today_idx - target_idx).rem_euclid(7) + 7;
            today.checked_sub_days(Days::new(back as u64))
        }
    }
}

// ---------------------------------------------------------------------------
// Unit arithmetic
// ---------------------------------------------------------------------------

/// Start of the week containing `date` (weeks run Sun–Sat).
fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(date.weekday().num_days_from_sunday() as u64))
}

/// First month (1-based) of the quarter containing `month`.
fn quarter_start_month(month: u32) -> u32 {
    ((month - 1) / 3) * 3 + 1
}

/// Last day of the given month.
fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first
        .checked_add_months(Months::new(1))?
        .checked_sub_days(Days::new(1))
}

/// Shift by one week, or snap to the current week's Sunday/Saturday.
pub fn resolve_week(now: DateTime<Utc>, shift: UnitShift) -> Option<NaiveDate> {
    let today = now.date_naive();
    match shift {
        UnitShift::This => Some(today),
        UnitShift::Next => today.checked_add_days(Days::new(7)),
        UnitShift::Last => today.checked_sub_days(Days::new(7)),
        UnitShift::BeginningOf => week_start(today),
        UnitShift::EndOf => week_start(today)?.checked_add_days(Days::new(6)),
    }
}

/// Shift by one month (same day-of-month; a nonexistent day yields `None`),
/// or snap to the current month's first/last day.
pub fn resolve_month(now: DateTime<Utc>, shift: UnitShift) -> Option<NaiveDate> {
    let today = now.date_naive();
    let (y, m, d) = (today.year(), today.month(), today.day());
    match shift {
        UnitShift::This => Some(today),
        UnitShift::Next => {
            let (ny, nm) = if m == 12 { (y + 1, 1) } else { (y, m + 1) };
            NaiveDate::from_ymd_opt(ny, nm, d)
        }
        UnitShift::Last => {
            let (py, pm) = if m == 1 { (y - 1, 12) } else { (y, m - 1) };
            NaiveDate::from_ymd_opt(py, pm, d)
        }
        UnitShift::BeginningOf => NaiveDate::from_ymd_opt(y, m, 1),
        UnitShift::EndOf => month_end(y, m),
    }
}

/// Shift by one quarter (three months, same day-of-month), or snap to the
/// current quarter's first/last day.
pub fn resolve_quarter(now: DateTime<Utc>, shift: UnitShift) -> Option<NaiveDate> {
    let today = now.date_naive();
    let (y, m, d) = (today.year(), today.month(), today.day());
    let qs = quarter_start_month(m);
    match shift {
        UnitShift::This => Some(today),
        UnitShift::Next => {
            let (ny, nm) = if m + 3 > 12 { (y + 1, m + 3 - 12) } else { (y, m + 3) };
            NaiveDate::from_ymd_opt(ny, nm, d)
        }
        UnitShift::Last => {
            let (py, pm) = if m <= 3 { (y - 1, m + 12 - 3) } else { (y, m - 3) };
            NaiveDate::from_ymd_opt(py, pm, d)
        }
        UnitShift::BeginningOf => NaiveDate::from_ymd_opt(y, qs, 1),
        UnitShift::EndOf => month_end(y, qs + 2),
    }
}

/// Shift by one year (Feb 29 in a non-leap target yields `None`), or snap to
/// Jan 1 / Dec 31 of the current year.
pub fn resolve_year(now: DateTime<Utc>, shift: UnitShift) -> Option<NaiveDate> {
    let today = now.date_naive();
    let (y, m, d) = (today.year(), today.month(), today.day());
    match shift {
        UnitShift::This => Some(today),
        UnitShift::Next => NaiveDate::from_ymd_opt(y + 1, m, d),
        UnitShift::Last => NaiveDate::from_ymd_opt(y - 1, m, d),
        UnitShift::BeginningOf => NaiveDate::from_ymd_opt(y, 1, 1),
        UnitShift::EndOf => NaiveDate::from_ymd_opt(y, 12, 31),
    }
}

/// Walk backward from the end of the timeframe containing `now` to the most
/// recent day matching `weekday` ("last Friday of the month").
pub fn find_last_occurrence(
    now: DateTime<Utc>,
    weekday: Weekday,
    timeframe: Timeframe,
) -> Option<NaiveDate> {
    let today = now.date_naive();
    let end = match timeframe {
        Timeframe::Month => month_end(today.year(), today.month())?,
        Timeframe::Quarter => {
            month_end(today.year(), quarter_start_month(today.month()) + 2)?
        }
        Timeframe::Year => NaiveDate::from_ymd_opt(today.year(), 12, 31)?,
    };

    let mut cursor = end;
    for _ in 0..7 {
        if cursor.weekday() == weekday {
            return Some(cursor);
        }
        cursor = cursor.checked_sub_days(Days::new(1))?;
    }
    None
}

// ---------------------------------------------------------------------------
// Phrase resolution
// ---------------------------------------------------------------------------

static RE_ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap());

static RE_DAY_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(today|tonight|tomorrow|yesterday)\b").unwrap()
});

static RE_REL_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(this|next|last)\s+)?(sunday|monday|tuesday|wednesday|thursday|friday|saturday)\b",
    )
    .unwrap()
});

static RE_REL_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(this|next|last)\s+(week|month|quarter|year)\b").unwrap()
});

static RE_UNIT_EDGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(beginning|start|end)\s+of\s+(?:the\s+)?(week|month|quarter|year)\b")
        .unwrap()
});

static RE_IN_N_UNITS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bin\s+(\d{1,3})\s+(days?|weeks?|months?)\b").unwrap()
});

fn unit_shift_from(modifier: Option<&str>) -> UnitShift {
    match modifier.map(str::to_lowercase).as_deref() {
        Some("next") => UnitShift::Next,
        Some("last") => UnitShift::Last,
        _ => UnitShift::This,
    }
}

fn shift_from(modifier: Option<&str>) -> Shift {
    match modifier.map(str::to_lowercase).as_deref() {
        Some("next") => Shift::Next,
        Some("last") => Shift::Last,
        _ => Shift::This,
    }
}

/// Put a resolved calendar date at the default hour, UTC.
pub fn at_default_hour(date: NaiveDate) -> Option<DateTime<Utc>> {
    Some(date.and_hms_opt(DEFAULT_HOUR, 0, 0)?.and_utc())
}

/// Permissive scan of free text for the first recognizable date phrase,
/// resolved against `now`. Recognizes ISO dates, today/tomorrow/yesterday,
/// `(this|next|last)` weekdays and units, unit edges ("end of month"),
/// weekend forms, and "in N days/weeks/months". Resolved instants carry the
/// default hour when the phrase names no time.
pub fn resolve_phrase(now: DateTime<Utc>, text: &str) -> Option<DateTime<Utc>> {
    let text = preprocess_weekend(text);
    let today = now.date_naive();

    if let Some(caps) = RE_ISO_DATE.captures(&text) {
        let date = NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        )?;
        return at_default_hour(date);
    }

    if let Some(caps) = RE_DAY_WORD.captures(&text) {
        let date = match caps[1].to_lowercase().as_str() {
            "today" | "tonight" => Some(today),
            "tomorrow" => today.checked_add_days(Days::new(1)),
            "yesterday" => today.checked_sub_days(Days::new(1)),
            _ => None,
        }?;
        return at_default_hour(date);
    }

    if let Some(caps) = RE_IN_N_UNITS.captures(&text) {
        let n: u64 = caps[1].parse().ok()?;
        let unit = caps[2].to_lowercase();
        let date = if unit.starts_with("day") {
            today.checked_add_days(Days::new(n))
        } else if unit.starts_with("week") {
            today.checked_add_days(Days::new(n * 7))
        } else {
            today.checked_add_months(Months::new(n as u32))
        }?;
        return at_default_hour(date);
    }

    if let Some(caps) = RE_REL_WEEKDAY.captures(&text) {
        let modifier = caps.get(1).map(|m| m.as_str());
        let date = resolve_weekday(now, &caps[2], shift_from(modifier))?;
        return at_default_hour(date);
    }

    if let Some(caps) = RE_REL_UNIT.captures(&text) {
        let shift = unit_shift_from(Some(&caps[1]));
        let date = match caps[2].to_lowercase().as_str() {
            "week" => resolve_week(now, shift),
            "month" => resolve_month(now, shift),
            "quarter" => resolve_quarter(now, shift),
            _ => resolve_year(now, shift),
        }?;
        return at_default_hour(date);
    }

    if let Some(caps) = RE_UNIT_EDGE.captures(&text) {
        let shift = match caps[1].to_lowercase().as_str() {
            "end" => UnitShift::EndOf,
            _ => UnitShift::BeginningOf,
        };
        let date = match caps[2].to_lowercase().as_str() {
            "week" => resolve_week(now, shift),
            "month" => resolve_month(now, shift),
            "quarter" => resolve_quarter(now, shift),
            _ => resolve_year(now, shift),
        }?;
        return at_default_hour(date);
    }

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
