//! Multi-field fast-path extraction for transportation messages
//!
//! Scans a single utterance for several transportation fields at once so the
//! dialogue can skip questions the user already answered. Extraction never
//! fails; an empty result only means nothing was recognized.

use std::collections::HashMap;
use std::ops::Range;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use travel_chat_core::{Clock, FieldValue, RecordData};

use crate::interpreters::money::{find_money, find_money_with_currency};
use crate::interpreters::temporal::{find_date, find_time, format_datetime};
use crate::interpreters::{parse_location, parse_transportation_type};

/// One field recognized by the fast path
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedField {
    pub value: FieldValue,
    /// Extraction confidence (0.0 - 1.0)
    pub confidence: f32,
}

/// Fields recognized in one utterance, keyed by schema field key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FastPathExtraction {
    fields: HashMap<String, ExtractedField>,
}

impl FastPathExtraction {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, key: &str) -> Option<&ExtractedField> {
        self.fields.get(key)
    }

    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key).map(|f| &f.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    fn insert(&mut self, key: &str, value: FieldValue, confidence: f32) {
        self.fields
            .insert(key.to_string(), ExtractedField { value, confidence });
    }

    /// Values only, ready to merge into a context
    pub fn to_record_data(&self) -> RecordData {
        self.fields
            .iter()
            .map(|(k, f)| (k.clone(), f.value.clone()))
            .collect()
    }
}

// =============================================================================
// STATIC REGEX PATTERNS
// =============================================================================

// A location runs until the next connective, date word, punctuation or digit
const LOCATION_TAIL: &str = r"(\p{L}[\p{L}'\- ]*?)\s*(?:\b(?:a|ad|al|alla|alle|verso|per|il|del|della|e|con|costa|costo|che|parte|partenza|arriva|arrivo|di|da|dal|dalla|to|at|for|on|from|ore|oggi|domani|dopodomani|stasera|stamattina|fra|tra|gennaio|febbraio|marzo|aprile|maggio|giugno|luglio|agosto|settembre|ottobre|novembre|dicembre)\b|[,.;!?\d]|$)";

/// Words that follow "per"/"a" without naming a place
const FILLER_WORDS: &[&str] = &[
    "favore", "piacere", "cortesia", "grazie", "me", "noi", "tutti", "sempre", "ora", "adesso",
    "please",
];

static DEPARTURE_LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:(?:da|dal|dalla|dallo|from)\s+|dall')\s*{}",
        LOCATION_TAIL
    ))
    .unwrap()
});

static ARRIVAL_LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:arriva\s+a|arrivo\s+a|arriva\s+ad|arrivo\s+ad|fino\s+a|verso|per|ad|a|to)\s+{}",
        LOCATION_TAIL
    ))
    .unwrap()
});

static DEPARTURE_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:parte|parto|partiamo|partenza|departs?|leaves?)\b").unwrap()
});

static ARRIVAL_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:arriva|arrivo|arriviamo|arrivals?|arrives?)\b").unwrap());

static ANY_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\ball[e']\s*\d{1,2}(?:[:.]\d{2})?").unwrap());

static COST_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:costa|costo|costato|pagato|prezzo|spesa)\b\s*(?:di\s+)?([^,;]+)").unwrap()
});

/// Transportation fast-path extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct TransportationExtractor;

impl TransportationExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract every recognizable transportation field from `utterance`
    pub fn extract(&self, utterance: &str, clock: &dyn Clock) -> FastPathExtraction {
        let mut result = FastPathExtraction::default();

        let kind = parse_transportation_type(utterance);
        if let Some(value) = kind.value.filter(|_| kind.success) {
            result.insert("type", value, kind.confidence);
        }

        let today = clock.today();
        let departure = self.extract_location(&DEPARTURE_LOCATION, utterance, today, None);
        if let Some((location, confidence)) = departure.clone() {
            result.insert("departure_location", FieldValue::text(location), confidence);
        }
        let exclude = departure.as_ref().map(|(loc, _)| loc.as_str());
        if let Some((location, confidence)) =
            self.extract_location(&ARRIVAL_LOCATION, utterance, today, exclude)
        {
            result.insert("arrival_location", FieldValue::text(location), confidence);
        }

        self.extract_times(utterance, clock, &mut result);
        self.extract_cost(utterance, &mut result);

        tracing::debug!(
            fields = result.len(),
            "Transportation fast-path extraction"
        );
        result
    }

    fn extract_location(
        &self,
        pattern: &Regex,
        utterance: &str,
        today: NaiveDate,
        exclude: Option<&str>,
    ) -> Option<(String, f32)> {
        pattern.captures_iter(utterance).find_map(|caps| {
            let raw = caps.get(1)?.as_str();
            let parsed = parse_location(raw);
            let location = parsed.value?.as_str()?.to_string();
            if is_filler(&location) || find_date(&location, today).is_some() {
                return None;
            }
            if exclude.is_some_and(|other| other.eq_ignore_ascii_case(&location)) {
                return None;
            }
            Some((location, parsed.confidence * 0.9))
        })
    }

    fn extract_times(&self, utterance: &str, clock: &dyn Clock, result: &mut FastPathExtraction) {
        let mut departure: Option<Range<usize>> = None;
        let mut arrival: Option<Range<usize>> = None;
        let mut unanchored: Option<Range<usize>> = None;

        for m in ANY_TIME.find_iter(utterance) {
            let slot = match time_role(utterance, m.start()) {
                Some(TimeRole::Departure) => &mut departure,
                Some(TimeRole::Arrival) => &mut arrival,
                None => &mut unanchored,
            };
            if slot.is_none() {
                *slot = Some(m.range());
            }
        }
        // A time with no keyword before it is the departure
        let departure = departure.or(unanchored);

        if departure.is_none() && arrival.is_none() {
            return;
        }

        let (date, date_confidence) = match find_date(utterance, clock.today()) {
            Some(found) => (found.date, found.confidence),
            None => (clock.today(), 0.8),
        };

        for (key, span) in [("departure_time", departure), ("arrival_time", arrival)] {
            let Some(span) = span else { continue };
            if let Some(time) = find_time(&utterance[span]) {
                result.insert(
                    key,
                    FieldValue::text(format_datetime(date, time.time)),
                    date_confidence.min(time.confidence),
                );
            }
        }
    }

    fn extract_cost(&self, utterance: &str, result: &mut FastPathExtraction) {
        let money = COST_PHRASE
            .captures(utterance)
            .and_then(|caps| caps.get(1))
            .and_then(|m| find_money(m.as_str()))
            .or_else(|| find_money_with_currency(utterance));

        if let Some(money) = money {
            result.insert("cost", FieldValue::Number(money.amount), 0.9);
            if let Some(code) = money.currency {
                result.insert("currency", FieldValue::text(code), 0.9);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeRole {
    Departure,
    Arrival,
}

fn is_filler(location: &str) -> bool {
    location
        .split_whitespace()
        .all(|word| FILLER_WORDS.contains(&word.to_lowercase().as_str()))
}

/// Byte offset where the clause containing `at` begins
///
/// A '.' inside a time such as "9.30" does not end a clause.
fn clause_start(utterance: &str, at: usize) -> usize {
    let head = &utterance[..at];
    head.char_indices()
        .filter(|&(i, c)| {
            c == ';'
                || (c == '.'
                    && !head[i + c.len_utf8()..].starts_with(|n: char| n.is_ascii_digit()))
        })
        .last()
        .map_or(0, |(i, c)| i + c.len_utf8())
}

fn last_match_start(pattern: &Regex, text: &str) -> Option<usize> {
    pattern.find_iter(text).last().map(|m| m.start())
}

/// Role of the time phrase starting at `at`, taken from the closest
/// departure or arrival keyword before it in the same clause
fn time_role(utterance: &str, at: usize) -> Option<TimeRole> {
    let clause = &utterance[clause_start(utterance, at)..at];

    match (
        last_match_start(&DEPARTURE_KEYWORD, clause),
        last_match_start(&ARRIVAL_KEYWORD, clause),
    ) {
        (Some(d), Some(a)) if a > d => Some(TimeRole::Arrival),
        (Some(_), _) => Some(TimeRole::Departure),
        (None, Some(_)) => Some(TimeRole::Arrival),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use travel_chat_core::FixedClock;

    fn clock() -> FixedClock {
        FixedClock::on(NaiveDate::from_ymd_opt(2025, 4, 24).unwrap())
    }

    fn text<'a>(extraction: &'a FastPathExtraction, key: &str) -> Option<&'a str> {
        extraction.value(key).and_then(|v| v.as_str())
    }

    #[test]
    fn test_full_sentence() {
        let extraction = TransportationExtractor::new().extract(
            "Ho prenotato un volo da Roma a Milano, parte alle 9:30 e costa 120 euro",
            &clock(),
        );

        assert_eq!(text(&extraction, "type"), Some("flight"));
        assert_eq!(text(&extraction, "departure_location"), Some("Roma"));
        assert_eq!(text(&extraction, "arrival_location"), Some("Milano"));
        assert_eq!(
            text(&extraction, "departure_time"),
            Some("2025-04-24T09:30:00Z")
        );
        assert_eq!(
            extraction.value("cost").and_then(|v| v.as_f64()),
            Some(120.0)
        );
        assert_eq!(text(&extraction, "currency"), Some("EUR"));
        assert!(extraction.get("arrival_time").is_none());
    }

    #[test]
    fn test_departure_and_arrival_times_with_date() {
        let extraction = TransportationExtractor::new().extract(
            "treno per Napoli del 25 aprile, parte alle 8 e arriva alle 11:15",
            &clock(),
        );

        assert_eq!(text(&extraction, "type"), Some("train"));
        assert_eq!(text(&extraction, "arrival_location"), Some("Napoli"));
        assert_eq!(
            text(&extraction, "departure_time"),
            Some("2025-04-25T08:00:00Z")
        );
        assert_eq!(
            text(&extraction, "arrival_time"),
            Some("2025-04-25T11:15:00Z")
        );
    }

    #[test]
    fn test_lone_time_is_departure() {
        let extraction =
            TransportationExtractor::new().extract("nuovo volo domani alle 7", &clock());
        assert_eq!(
            text(&extraction, "departure_time"),
            Some("2025-04-25T07:00:00Z")
        );
        assert!(extraction.get("arrival_time").is_none());
    }

    #[test]
    fn test_date_without_time_is_dropped() {
        let extraction =
            TransportationExtractor::new().extract("aggiungi trasporto del 25 aprile", &clock());
        assert!(extraction.get("departure_time").is_none());
        assert!(extraction.get("arrival_time").is_none());
    }

    #[test]
    fn test_nothing_recognized() {
        let extraction = TransportationExtractor::new().extract("aggiungi trasporto", &clock());
        assert!(extraction.is_empty());
        assert!(extraction.to_record_data().is_empty());
    }

    #[test]
    fn test_confidences_in_range() {
        let extraction = TransportationExtractor::new()
            .extract("volo da Roma a Parigi alle 10 costa €200", &clock());
        for key in extraction.keys() {
            let confidence = extraction.get(key).map(|f| f.confidence).unwrap_or(0.0);
            assert!(confidence > 0.0 && confidence <= 1.0, "{}", key);
        }
        assert_eq!(text(&extraction, "currency"), Some("EUR"));
    }

    #[test]
    fn test_relative_date_is_not_a_location() {
        let extractor = TransportationExtractor::new();

        let extraction = extractor.extract("nuovo volo per domani alle 9", &clock());
        assert!(extraction.get("arrival_location").is_none());
        assert_eq!(
            text(&extraction, "departure_time"),
            Some("2025-04-25T09:00:00Z")
        );

        let extraction = extractor.extract("nuovo volo per Milano domani alle 9", &clock());
        assert_eq!(text(&extraction, "arrival_location"), Some("Milano"));

        let extraction = extractor.extract("nuovo treno da Roma oggi alle 8 per Napoli", &clock());
        assert_eq!(text(&extraction, "departure_location"), Some("Roma"));
        assert_eq!(text(&extraction, "arrival_location"), Some("Napoli"));

        let extraction = extractor.extract("treno per il 3 maggio", &clock());
        assert!(extraction.get("arrival_location").is_none());
    }

    #[test]
    fn test_filler_words_are_not_locations() {
        let extractor = TransportationExtractor::new();

        let extraction = extractor.extract("vorrei aggiungere un treno per favore", &clock());
        assert!(extraction.get("arrival_location").is_none());

        let extraction = extractor.extract("nuovo volo a me", &clock());
        assert!(extraction.get("arrival_location").is_none());
    }

    #[test]
    fn test_time_goes_to_closest_keyword() {
        let extraction = TransportationExtractor::new()
            .extract("treno che arriva a Milano e parte alle 9", &clock());
        assert_eq!(
            text(&extraction, "departure_time"),
            Some("2025-04-24T09:00:00Z")
        );
        assert!(extraction.get("arrival_time").is_none());

        let extraction = TransportationExtractor::new()
            .extract("volo che parte alle 7.45 e arriva alle 9.30", &clock());
        assert_eq!(
            text(&extraction, "departure_time"),
            Some("2025-04-24T07:45:00Z")
        );
        assert_eq!(
            text(&extraction, "arrival_time"),
            Some("2025-04-24T09:30:00Z")
        );
    }
}
