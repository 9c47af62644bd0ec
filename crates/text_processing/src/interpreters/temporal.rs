//! Date, datetime and time interpreters
//!
//! Dates are canonicalized to `YYYY-MM-DD`, times to `HH:MM`. Datetimes are
//! emitted as `YYYY-MM-DDTHH:MM:00Z`; the local wall time is labelled UTC
//! without conversion.

use std::ops::Range;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use travel_chat_config::constants::confidence;
use travel_chat_core::{Clock, FieldValue, ParseResult};

/// A date found inside an utterance
#[derive(Debug, Clone, PartialEq)]
pub struct DateMatch {
    pub date: NaiveDate,
    pub confidence: f32,
    /// Byte range of the matched phrase
    pub span: Range<usize>,
}

/// A time of day found inside an utterance
#[derive(Debug, Clone, PartialEq)]
pub struct TimeMatch {
    pub time: NaiveTime,
    pub confidence: f32,
    pub span: Range<usize>,
}

// =============================================================================
// STATIC REGEX PATTERNS
// =============================================================================

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap());

static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4})\b").unwrap());

const MONTHS: &str = "gennaio|febbraio|marzo|aprile|maggio|giugno|luglio|agosto|settembre|ottobre|novembre|dicembre|gen|feb|mar|apr|mag|giu|lug|ago|set|ott|nov|dic";

static DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})\s+(?:di\s+)?({})\b\.?(?:\s+(\d{{4}}))?",
        MONTHS
    ))
    .unwrap()
});

static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b({})\.?\s+(\d{{1,2}})\b,?(?:\s+(\d{{4}}))?",
        MONTHS
    ))
    .unwrap()
});

static RELATIVE_DAYS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:fra|tra)\s+(\d{1,3})\s+giorn[oi]\b").unwrap());

static RELATIVE_WEEKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:fra|tra)\s+(\d{1,2})\s+settiman[ae]\b").unwrap());

static RELATIVE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(dopodomani|domani|oggi)\b").unwrap());

static TIME_12H: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:[:.](\d{2}))?\s*(am|pm|a\.m\.|p\.m\.)").unwrap()
});

static TIME_24H: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[:.](\d{2})\b").unwrap());

static TIME_ORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bore\s+(\d{1,2})(?:[:.](\d{2}))?\b").unwrap());

static TIME_ALLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\ball[e']\s*(\d{1,2})(?:[:.](\d{2}))?\b").unwrap());

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let month = match lower.get(..3)? {
        "gen" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "mag" => 5,
        "giu" => 6,
        "lug" => 7,
        "ago" => 8,
        "set" => 9,
        "ott" => 10,
        "nov" => 11,
        "dic" => 12,
        _ => return None,
    };
    Some(month)
}

fn capture_u32(caps: &regex::Captures<'_>, idx: usize) -> Option<u32> {
    caps.get(idx)?.as_str().parse().ok()
}

fn capture_i32(caps: &regex::Captures<'_>, idx: usize) -> Option<i32> {
    caps.get(idx)?.as_str().parse().ok()
}

/// Locate the first date phrase in `text`
///
/// Formats are tried in a fixed order: ISO, European, American, Italian
/// month names, relative terms.
pub fn find_date(text: &str, today: NaiveDate) -> Option<DateMatch> {
    if let Some(caps) = ISO_DATE.captures(text) {
        if let (Some(y), Some(m), Some(d)) = (
            capture_i32(&caps, 1),
            capture_u32(&caps, 2),
            capture_u32(&caps, 3),
        ) {
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                return Some(DateMatch {
                    date,
                    confidence: confidence::EXACT,
                    span: caps.get(0)?.range(),
                });
            }
        }
    }

    if let Some(caps) = NUMERIC_DATE.captures(text) {
        if let (Some(a), Some(b), Some(y)) = (
            capture_u32(&caps, 1),
            capture_u32(&caps, 2),
            capture_i32(&caps, 3),
        ) {
            let span = caps.get(0)?.range();
            // DD/MM/YYYY first, MM/DD/YYYY when that is not a real date
            if let Some(date) = NaiveDate::from_ymd_opt(y, b, a) {
                return Some(DateMatch {
                    date,
                    confidence: 0.95,
                    span,
                });
            }
            if let Some(date) = NaiveDate::from_ymd_opt(y, a, b) {
                return Some(DateMatch {
                    date,
                    confidence: confidence::KEYWORD,
                    span,
                });
            }
        }
    }

    if let Some(caps) = DAY_MONTH.captures(text) {
        let day = capture_u32(&caps, 1);
        let month = caps.get(2).and_then(|m| month_number(m.as_str()));
        let year = capture_i32(&caps, 3).unwrap_or_else(|| today.year());
        if let (Some(d), Some(m)) = (day, month) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, m, d) {
                return Some(DateMatch {
                    date,
                    confidence: 0.9,
                    span: caps.get(0)?.range(),
                });
            }
        }
    }

    if let Some(caps) = MONTH_DAY.captures(text) {
        let month = caps.get(1).and_then(|m| month_number(m.as_str()));
        let day = capture_u32(&caps, 2);
        let year = capture_i32(&caps, 3).unwrap_or_else(|| today.year());
        if let (Some(d), Some(m)) = (day, month) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, m, d) {
                return Some(DateMatch {
                    date,
                    confidence: 0.9,
                    span: caps.get(0)?.range(),
                });
            }
        }
    }

    find_relative_date(text, today)
}

fn find_relative_date(text: &str, today: NaiveDate) -> Option<DateMatch> {
    if let Some(caps) = RELATIVE_WORD.captures(text) {
        let word = caps.get(1)?.as_str().to_lowercase();
        let offset = match word.as_str() {
            "oggi" => 0,
            "domani" => 1,
            "dopodomani" => 2,
            _ => return None,
        };
        return Some(DateMatch {
            date: today + Duration::days(offset),
            confidence: 0.95,
            span: caps.get(0)?.range(),
        });
    }

    if let Some(caps) = RELATIVE_DAYS.captures(text) {
        let days = capture_u32(&caps, 1)?;
        return Some(DateMatch {
            date: today + Duration::days(i64::from(days)),
            confidence: 0.9,
            span: caps.get(0)?.range(),
        });
    }

    if let Some(caps) = RELATIVE_WEEKS.captures(text) {
        let weeks = capture_u32(&caps, 1)?;
        return Some(DateMatch {
            date: today + Duration::weeks(i64::from(weeks)),
            confidence: 0.9,
            span: caps.get(0)?.range(),
        });
    }

    None
}

fn time_from_caps(
    caps: &regex::Captures<'_>,
    hour_idx: usize,
    minute_idx: usize,
) -> Option<NaiveTime> {
    let hour = capture_u32(caps, hour_idx)?;
    let minute = match caps.get(minute_idx) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Locate the first time-of-day phrase in `text`
pub fn find_time(text: &str) -> Option<TimeMatch> {
    if let Some(caps) = TIME_12H.captures(text) {
        let hour = capture_u32(&caps, 1)?;
        let minute = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        let pm = caps.get(3)?.as_str().to_lowercase().starts_with('p');
        if (1..=12).contains(&hour) {
            let hour = match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            };
            if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
                return Some(TimeMatch {
                    time,
                    confidence: 0.9,
                    span: caps.get(0)?.range(),
                });
            }
        }
    }

    let patterns: [(&Lazy<Regex>, f32); 3] = [
        (&TIME_24H, confidence::EXACT),
        (&TIME_ORE, 0.9),
        (&TIME_ALLE, 0.9),
    ];
    for (pattern, conf) in patterns {
        for caps in pattern.captures_iter(text) {
            if let Some(time) = time_from_caps(&caps, 1, 2) {
                return Some(TimeMatch {
                    time,
                    confidence: conf,
                    span: caps.get(0)?.range(),
                });
            }
        }
    }

    None
}

/// Canonical `YYYY-MM-DDTHH:MM:00Z` form
pub fn format_datetime(date: NaiveDate, time: NaiveTime) -> String {
    format!(
        "{}T{}:00Z",
        date.format("%Y-%m-%d"),
        time.format("%H:%M")
    )
}

/// Date interpreter
pub fn parse_date(input: &str, clock: &dyn Clock) -> ParseResult {
    match find_date(input.trim(), clock.today()) {
        Some(found) => ParseResult::success(
            FieldValue::text(found.date.format("%Y-%m-%d").to_string()),
            found.confidence,
        )
        .with_suggestion(found.date.format("%d/%m/%Y").to_string()),
        None => ParseResult::failure(),
    }
}

/// Datetime interpreter: a date plus an optional time fragment
pub fn parse_datetime(input: &str, clock: &dyn Clock) -> ParseResult {
    let text = input.trim();
    let Some(found) = find_date(text, clock.today()) else {
        return ParseResult::failure();
    };

    // Search the time outside the date phrase so date digits are not reread
    let mut remainder = String::with_capacity(text.len());
    remainder.push_str(&text[..found.span.start]);
    remainder.push(' ');
    remainder.push_str(&text[found.span.end..]);

    match find_time(&remainder) {
        Some(time) => ParseResult::success(
            FieldValue::text(format_datetime(found.date, time.time)),
            found.confidence.min(time.confidence),
        )
        .with_suggestion(format!(
            "{} alle {}",
            found.date.format("%d/%m/%Y"),
            time.time.format("%H:%M")
        )),
        None => ParseResult::success(
            FieldValue::text(format!("{}T00:00:00Z", found.date.format("%Y-%m-%d"))),
            confidence::DATE_ONLY,
        )
        .with_suggestion(found.date.format("%d/%m/%Y").to_string()),
    }
}

/// Time-of-day interpreter
pub fn parse_time(input: &str) -> ParseResult {
    match find_time(input.trim()) {
        Some(found) => {
            let canonical = found.time.format("%H:%M").to_string();
            ParseResult::success(FieldValue::text(canonical.clone()), found.confidence)
                .with_suggestion(canonical)
        },
        None => ParseResult::failure(),
    }
}
