//! Trigger detection
//!
//! A message starts a new guided dialogue when it carries both an action
//! keyword and a domain noun, or one of a few fixed phrases.

use travel_chat_config::constants::dialogue::CANCEL_KEYWORDS;
use travel_chat_core::RecordKind;

use crate::interpreters::contains_word;

const ACTION_KEYWORDS: &[&str] = &[
    "aggiungi",
    "aggiungere",
    "nuovo",
    "nuova",
    "vorrei",
    "prenota",
    "prenotato",
    "inserisci",
    "registra",
    "add",
    "new",
    "book",
];

const ACCOMMODATION_NOUNS: &[&str] = &[
    "hotel",
    "alloggio",
    "albergo",
    "b&b",
    "appartamento",
    "ostello",
    "airbnb",
    "resort",
    "campeggio",
    "accommodation",
];

const TRANSPORTATION_NOUNS: &[&str] = &[
    "volo",
    "treno",
    "trasporto",
    "autobus",
    "bus",
    "traghetto",
    "aereo",
    "flight",
    "train",
    "transport",
    "transportation",
];

const ACCOMMODATION_PHRASES: &[&str] = &[
    "nuovo alloggio",
    "aggiungi alloggio",
    "aggiungi un alloggio",
    "add accommodation",
    "new accommodation",
    "ho prenotato un hotel",
];

const TRANSPORTATION_PHRASES: &[&str] = &[
    "nuovo trasporto",
    "aggiungi trasporto",
    "aggiungi un trasporto",
    "add transport",
    "new transportation",
    "ho prenotato un volo",
];

/// Keyword sets for one record kind
#[derive(Debug, Clone, Copy)]
pub struct TriggerVocabulary {
    pub actions: &'static [&'static str],
    pub nouns: &'static [&'static str],
    pub phrases: &'static [&'static str],
}

impl TriggerVocabulary {
    pub fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Accommodation => Self {
                actions: ACTION_KEYWORDS,
                nouns: ACCOMMODATION_NOUNS,
                phrases: ACCOMMODATION_PHRASES,
            },
            RecordKind::Transportation => Self {
                actions: ACTION_KEYWORDS,
                nouns: TRANSPORTATION_NOUNS,
                phrases: TRANSPORTATION_PHRASES,
            },
        }
    }
}

/// Trigger detector for one record kind
#[derive(Debug, Clone, Copy)]
pub struct TriggerDetector {
    kind: RecordKind,
    vocabulary: TriggerVocabulary,
}

impl TriggerDetector {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            vocabulary: TriggerVocabulary::for_kind(kind),
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Whether `message` should start a new dialogue of this kind
    pub fn is_triggered(&self, message: &str) -> bool {
        let lower = message.to_lowercase();
        if self.vocabulary.phrases.iter().any(|p| lower.contains(p)) {
            return true;
        }

        let has_action = self
            .vocabulary
            .actions
            .iter()
            .any(|kw| contains_word(&lower, kw));
        let has_noun = self
            .vocabulary
            .nouns
            .iter()
            .any(|kw| contains_word(&lower, kw));

        has_action && has_noun
    }
}

/// Whether `message` asks to abort the dialogue in progress
pub fn is_cancel_request(message: &str) -> bool {
    let lower = message.to_lowercase();
    CANCEL_KEYWORDS.iter().any(|kw| contains_word(&lower, kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accommodation_trigger() {
        let detector = TriggerDetector::new(RecordKind::Accommodation);
        assert!(detector.is_triggered("aggiungi un hotel"));
        assert!(detector.is_triggered("Vorrei inserire un B&B a Firenze"));
        assert!(detector.is_triggered("Nuovo alloggio"));
        assert!(!detector.is_triggered("che tempo fa a Roma?"));
        // noun without action
        assert!(!detector.is_triggered("l'hotel era bello"));
    }

    #[test]
    fn test_transportation_trigger() {
        let detector = TriggerDetector::new(RecordKind::Transportation);
        assert!(detector.is_triggered("ho prenotato un volo da Roma a Milano"));
        assert!(detector.is_triggered("aggiungi trasporto"));
        assert!(detector.is_triggered("book a train to Paris"));
        assert!(!detector.is_triggered("aggiungi un hotel"));
    }

    #[test]
    fn test_word_boundaries() {
        let detector = TriggerDetector::new(RecordKind::Transportation);
        // "busta" must not count as "bus"
        assert!(!detector.is_triggered("aggiungi una busta"));
    }

    #[test]
    fn test_cancel_request() {
        assert!(is_cancel_request("annulla"));
        assert!(is_cancel_request("No, ANNULLA tutto"));
        assert!(is_cancel_request("cancel"));
        // whole words only
        assert!(!is_cancel_request("annullamento gratuito"));
        assert!(!is_cancel_request("cancellation policy"));
    }
}
