//! Confirmation, contact, location and free-text interpreters

use once_cell::sync::Lazy;
use regex::Regex;
use travel_chat_config::constants::confidence;
use travel_chat_core::{FieldValue, ParseResult};
use unicode_segmentation::UnicodeSegmentation;

const POSITIVE_PHRASES: &[&str] = &[
    "sì", "si", "yes", "ok", "conferma", "confermo", "certo", "va bene", "esatto", "perfetto",
    "salva", "corretto",
];

const NEGATIVE_PHRASES: &[&str] = &[
    "no", "non", "annulla", "cancel", "sbagliato", "modifica", "rifiuta",
];

/// Leading/trailing words removed from a location answer
const LOCATION_STOPWORDS: &[&str] = &[
    "a", "ad", "da", "in", "per", "verso", "di", "al", "allo", "alla", "ai", "agli", "alle",
    "dal", "dallo", "dalla", "dai", "dagli", "dalle", "nel", "nello", "nella", "nei", "negli",
    "nelle", "presso", "il", "lo", "la", "i", "gli", "le", "from", "to", "at",
];

/// Elided forms glued to the next word
const ELIDED_PREFIXES: &[&str] = &["all'", "dall'", "nell'", "l'", "d'"];

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?\d[\d\s./-]{6,}\d").unwrap());

/// Confirmation interpreter
///
/// Plain substring containment, positives first: "non confermo" reads as
/// positive because it contains "confermo".
pub fn parse_confirmation(input: &str) -> ParseResult {
    let lower = input.trim().to_lowercase();
    if lower.is_empty() {
        return ParseResult::failure();
    }

    if POSITIVE_PHRASES.iter().any(|p| lower.contains(p)) {
        return ParseResult::success(FieldValue::Bool(true), confidence::CONFIRMATION)
            .with_suggestion("Sì");
    }
    if NEGATIVE_PHRASES.iter().any(|p| lower.contains(p)) {
        return ParseResult::success(FieldValue::Bool(false), confidence::CONFIRMATION)
            .with_suggestion("No");
    }

    ParseResult::failure()
}

/// Contact interpreter: email and/or phone, else the raw text
pub fn parse_contact(input: &str) -> ParseResult {
    let text = input.trim();
    if text.is_empty() {
        return ParseResult::failure();
    }

    let email = EMAIL.find(text).map(|m| m.as_str().to_string());
    let phone = PHONE.find(text).map(|m| m.as_str().trim().to_string());

    let parts: Vec<String> = email.into_iter().chain(phone).collect();
    if parts.is_empty() {
        return ParseResult::success(FieldValue::text(text), 0.6).with_suggestion(text);
    }

    let joined = parts.join(" | ");
    ParseResult::success(FieldValue::text(joined.clone()), 0.95).with_suggestion(joined)
}

fn strip_elision(word: &str) -> &str {
    let lower = word.to_lowercase();
    ELIDED_PREFIXES
        .iter()
        .find(|prefix| lower.starts_with(*prefix) && lower.len() > prefix.len())
        .map(|prefix| &word[prefix.len()..])
        .unwrap_or(word)
}

fn capitalize_first(text: &str) -> String {
    let mut graphemes = text.graphemes(true);
    match graphemes.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), graphemes.as_str()),
        None => String::new(),
    }
}

/// Location interpreter
pub fn parse_location(input: &str) -> ParseResult {
    let cleaned = input
        .trim()
        .trim_matches(|c: char| c.is_ascii_punctuation() && c != '\'');
    let mut words: Vec<&str> = cleaned.split_whitespace().collect();

    while let Some(first) = words.first() {
        if LOCATION_STOPWORDS.contains(&first.to_lowercase().as_str()) {
            words.remove(0);
        } else {
            break;
        }
    }
    while let Some(last) = words.last() {
        if LOCATION_STOPWORDS.contains(&last.to_lowercase().as_str()) {
            words.pop();
        } else {
            break;
        }
    }
    if let Some(first) = words.first().copied() {
        words[0] = strip_elision(first);
    }

    let residual = words.join(" ");
    if residual.chars().count() <= 1 {
        return ParseResult::failure();
    }

    let location = capitalize_first(&residual);
    ParseResult::success(FieldValue::text(location.clone()), 0.9).with_suggestion(location)
}

/// Free-text interpreter
pub fn parse_free_text(input: &str) -> ParseResult {
    ParseResult::success(FieldValue::text(input.trim()), confidence::EXACT)
}
