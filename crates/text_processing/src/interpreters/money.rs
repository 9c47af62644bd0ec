//! Cost interpreter with optional embedded currency

use once_cell::sync::Lazy;
use regex::Regex;
use travel_chat_config::constants::confidence;
use travel_chat_core::{FieldValue, ParseResult};

use super::categories::currency_code;

/// Amount with the currency it was expressed in, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Money {
    pub amount: f64,
    pub currency: Option<&'static str>,
}

// Italian thousands form ("1.200,50") before plain decimals ("12,5", "12.50")
const NUMBER: &str = r"(\d{1,3}(?:\.\d{3})+(?:,\d{1,2})?|\d+(?:[.,]\d{1,2})?)";

// Symbols may touch the next word, names may not ("cadauno" is not CAD)
const CURRENCY_WORDS: &str = r"(€|\$|£|¥|(?:euro|euri|eur|dollari\s+canadesi|dollari|dollaro|dollars?|usd|cad|sterline|sterlina|pounds?|gbp|franchi|franco|chf|yen|jpy)\b)";

static AMOUNT_THEN_CURRENCY: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i){}\s*{}", NUMBER, CURRENCY_WORDS)).unwrap());

static SYMBOL_THEN_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(€|\$|£|¥)\s*{}", NUMBER)).unwrap());

static BARE_AMOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(NUMBER).unwrap());

static THOUSANDS_FORM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}(?:\.\d{3})+(?:,\d{1,2})?$").unwrap());

/// Parse an Italian or plain number literal
pub fn normalize_number(raw: &str) -> Option<f64> {
    let normalized = if THOUSANDS_FORM.is_match(raw) {
        raw.replace('.', "").replace(',', ".")
    } else {
        raw.replace(',', ".")
    };
    normalized.parse().ok()
}

/// Amount followed or preceded by a currency marker
///
/// Bare numbers are not accepted here, so times and dates in a longer
/// sentence are never mistaken for a cost.
pub fn find_money_with_currency(text: &str) -> Option<Money> {
    if let Some(caps) = AMOUNT_THEN_CURRENCY.captures(text) {
        let amount = normalize_number(caps.get(1)?.as_str())?;
        return Some(Money {
            amount,
            currency: currency_code(caps.get(2)?.as_str()),
        });
    }

    if let Some(caps) = SYMBOL_THEN_AMOUNT.captures(text) {
        let amount = normalize_number(caps.get(2)?.as_str())?;
        return Some(Money {
            amount,
            currency: currency_code(caps.get(1)?.as_str()),
        });
    }

    None
}

/// Amount in any accepted form, currency optional
pub fn find_money(text: &str) -> Option<Money> {
    if let Some(money) = find_money_with_currency(text) {
        return Some(money);
    }

    let caps = BARE_AMOUNT.captures(text)?;
    Some(Money {
        amount: normalize_number(caps.get(1)?.as_str())?,
        currency: None,
    })
}

/// Cost interpreter
///
/// The value is the amount. A currency found alongside it is reported in
/// `additional_data["currency"]`; applying a default is left to the caller.
pub fn parse_cost(input: &str) -> ParseResult {
    let Some(money) = find_money(input.trim()) else {
        return ParseResult::failure();
    };
    if !money.amount.is_finite() || money.amount < 0.0 {
        return ParseResult::failure();
    }

    let amount = FieldValue::Number(money.amount);
    match money.currency {
        Some(code) => ParseResult::success(amount.clone(), 0.95)
            .with_suggestion(format!("{} {}", amount, code))
            .with_additional("currency", FieldValue::text(code)),
        None => ParseResult::success(amount.clone(), confidence::KEYWORD)
            .with_suggestion(amount.to_string()),
    }
}
