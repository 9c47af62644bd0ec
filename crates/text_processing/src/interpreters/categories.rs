//! Closed-set interpreters: accommodation type, transportation type, currency

use travel_chat_config::constants::{confidence, currency};
use travel_chat_core::{FieldValue, ParseResult};

use super::match_category;

/// Accommodation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccommodationType {
    Hotel,
    Hostel,
    Apartment,
    Bnb,
    Resort,
    Camping,
    Villa,
    Other,
}

impl AccommodationType {
    pub const ALL: [AccommodationType; 8] = [
        AccommodationType::Hotel,
        AccommodationType::Hostel,
        AccommodationType::Apartment,
        AccommodationType::Bnb,
        AccommodationType::Resort,
        AccommodationType::Camping,
        AccommodationType::Villa,
        AccommodationType::Other,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            AccommodationType::Hotel => "hotel",
            AccommodationType::Hostel => "hostel",
            AccommodationType::Apartment => "apartment",
            AccommodationType::Bnb => "bnb",
            AccommodationType::Resort => "resort",
            AccommodationType::Camping => "camping",
            AccommodationType::Villa => "villa",
            AccommodationType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccommodationType::Hotel => "Hotel",
            AccommodationType::Hostel => "Ostello",
            AccommodationType::Apartment => "Appartamento",
            AccommodationType::Bnb => "B&B",
            AccommodationType::Resort => "Resort",
            AccommodationType::Camping => "Campeggio",
            AccommodationType::Villa => "Villa",
            AccommodationType::Other => "Altro",
        }
    }

    fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }
}

/// Transportation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportationType {
    Flight,
    Train,
    Bus,
    Car,
    Ferry,
    Taxi,
    Other,
}

impl TransportationType {
    pub const ALL: [TransportationType; 7] = [
        TransportationType::Flight,
        TransportationType::Train,
        TransportationType::Bus,
        TransportationType::Car,
        TransportationType::Ferry,
        TransportationType::Taxi,
        TransportationType::Other,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            TransportationType::Flight => "flight",
            TransportationType::Train => "train",
            TransportationType::Bus => "bus",
            TransportationType::Car => "car",
            TransportationType::Ferry => "ferry",
            TransportationType::Taxi => "taxi",
            TransportationType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransportationType::Flight => "Volo",
            TransportationType::Train => "Treno",
            TransportationType::Bus => "Autobus",
            TransportationType::Car => "Auto",
            TransportationType::Ferry => "Traghetto",
            TransportationType::Taxi => "Taxi",
            TransportationType::Other => "Altro",
        }
    }

    fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }
}

// Scanned in order, first category with a keyword hit wins
const ACCOMMODATION_KEYWORDS: &[(AccommodationType, &[&str])] = &[
    (
        AccommodationType::Hotel,
        &["hotel", "albergo", "boutique", "motel", "locanda"],
    ),
    (
        AccommodationType::Hostel,
        &["ostello", "hostel", "backpacker"],
    ),
    (
        AccommodationType::Apartment,
        &[
            "appartamento",
            "apartment",
            "airbnb",
            "flat",
            "monolocale",
            "casa vacanza",
        ],
    ),
    (
        AccommodationType::Bnb,
        &["b&b", "bed and breakfast", "bnb", "affittacamere"],
    ),
    (AccommodationType::Resort, &["resort", "villaggio", "spa"]),
    (
        AccommodationType::Camping,
        &["campeggio", "camping", "glamping", "tenda"],
    ),
    (AccommodationType::Villa, &["villa", "agriturismo"]),
    (AccommodationType::Other, &["altro", "other"]),
];

// Bus precedes car so "autobus" never falls through to a car keyword
const TRANSPORTATION_KEYWORDS: &[(TransportationType, &[&str])] = &[
    (
        TransportationType::Flight,
        &["volo", "aereo", "flight", "plane", "aeroporto"],
    ),
    (
        TransportationType::Train,
        &[
            "treno",
            "train",
            "frecciarossa",
            "italo",
            "intercity",
            "regionale",
        ],
    ),
    (
        TransportationType::Bus,
        &["autobus", "bus", "pullman", "flixbus"],
    ),
    (
        TransportationType::Car,
        &["auto", "macchina", "noleggio", "car", "rental"],
    ),
    (
        TransportationType::Ferry,
        &["traghetto", "nave", "ferry", "aliscafo"],
    ),
    (TransportationType::Taxi, &["taxi", "uber", "ncc"]),
    (TransportationType::Other, &["altro", "other"]),
];

// CAD precedes USD so "dollari canadesi" is not read as US dollars
const CURRENCY_KEYWORDS: &[(&str, &[&str])] = &[
    ("EUR", &["euro", "euri", "eur", "€"]),
    (
        "CAD",
        &[
            "dollari canadesi",
            "dollaro canadese",
            "canadian dollar",
            "canadian dollars",
            "c$",
        ],
    ),
    (
        "USD",
        &["dollari", "dollaro", "dollar", "dollars", "usd", "$"],
    ),
    (
        "GBP",
        &["sterline", "sterlina", "pound", "pounds", "gbp", "£"],
    ),
    (
        "CHF",
        &[
            "franchi svizzeri",
            "franco svizzero",
            "franchi",
            "franco",
            "chf",
        ],
    ),
    ("JPY", &["yen", "jpy", "¥"]),
];

/// Accommodation type interpreter
pub fn parse_accommodation_type(input: &str) -> ParseResult {
    let normalized = input.trim().to_lowercase();
    if let Some(kind) = AccommodationType::from_id(&normalized) {
        return ParseResult::success(FieldValue::text(kind.id()), confidence::EXACT)
            .with_suggestion(kind.label());
    }

    match match_category(&normalized, ACCOMMODATION_KEYWORDS) {
        Some(kind) => ParseResult::success(FieldValue::text(kind.id()), confidence::KEYWORD)
            .with_suggestion(kind.label()),
        None => ParseResult::failure(),
    }
}

/// Transportation type interpreter
pub fn parse_transportation_type(input: &str) -> ParseResult {
    let normalized = input.trim().to_lowercase();
    if let Some(kind) = TransportationType::from_id(&normalized) {
        return ParseResult::success(FieldValue::text(kind.id()), confidence::EXACT)
            .with_suggestion(kind.label());
    }

    match match_category(&normalized, TRANSPORTATION_KEYWORDS) {
        Some(kind) => ParseResult::success(FieldValue::text(kind.id()), confidence::KEYWORD)
            .with_suggestion(kind.label()),
        None => ParseResult::failure(),
    }
}

/// Map a currency word or symbol to its ISO code
pub fn currency_code(input: &str) -> Option<&'static str> {
    let upper = input.trim().to_uppercase();
    if let Some(code) = currency::SUPPORTED.iter().copied().find(|code| *code == upper) {
        return Some(code);
    }
    match_category(input, CURRENCY_KEYWORDS)
}

/// Currency interpreter
pub fn parse_currency(input: &str) -> ParseResult {
    let upper = input.trim().to_uppercase();
    if currency::is_supported(&upper) {
        return ParseResult::success(FieldValue::text(upper.clone()), confidence::EXACT)
            .with_suggestion(upper);
    }

    match match_category(input, CURRENCY_KEYWORDS) {
        Some(code) => ParseResult::success(FieldValue::text(code), confidence::KEYWORD)
            .with_suggestion(code),
        None => ParseResult::failure(),
    }
}

/// Option lists for type selectors
pub fn accommodation_type_options() -> Vec<String> {
    AccommodationType::ALL
        .iter()
        .map(|t| t.id().to_string())
        .collect()
}

pub fn transportation_type_options() -> Vec<String> {
    TransportationType::ALL
        .iter()
        .map(|t| t.id().to_string())
        .collect()
}

pub fn currency_options() -> Vec<String> {
    currency::SUPPORTED.iter().map(|c| c.to_string()).collect()
}
