//! End-to-end dialogue scenarios through the router
//!
//! Every test drives `TravelAssistant` the way a transport layer would and
//! checks both the envelopes and what is left in the context store.

use std::sync::Arc;

use chrono::NaiveDate;
use travel_chat_agent::{InMemoryContextStore, TravelAssistant};
use travel_chat_config::EngineConfig;
use travel_chat_core::{
    CompletionOutcome, ContextKey, ContextStore, ConversationState, EnvelopeAction, FieldValue,
    FixedClock, RecordKind, UiComponent,
};

const TRIP: &str = "trip-42";
const USER: &str = "user-7";

fn setup() -> (TravelAssistant, Arc<dyn ContextStore>) {
    let store: Arc<dyn ContextStore> = Arc::new(InMemoryContextStore::new());
    let clock = FixedClock::on(NaiveDate::from_ymd_opt(2025, 4, 24).unwrap());
    let assistant = TravelAssistant::new(
        Arc::clone(&store),
        &EngineConfig::default(),
        Arc::new(clock),
    );
    (assistant, store)
}

fn accommodation_key() -> ContextKey {
    ContextKey::new(RecordKind::Accommodation, TRIP, USER)
}

fn transportation_key() -> ContextKey {
    ContextKey::new(RecordKind::Transportation, TRIP, USER)
}

/// Full accommodation walk: trigger, ten answers, confirmation, completion
#[test]
fn test_accommodation_end_to_end() {
    let (assistant, store) = setup();

    let opened = assistant.handle("aggiungi un hotel", TRIP, USER).unwrap();
    assert_eq!(opened.kind, Some(RecordKind::Accommodation));
    assert!(opened.envelope.should_continue);
    let ctx = store.get(&accommodation_key()).unwrap().unwrap();
    assert_eq!(ctx.state, ConversationState::Collecting);
    assert_eq!(ctx.current_field.as_deref(), Some("name"));

    let answers = [
        "Hotel Roma",
        "hotel",
        "Via Roma 1",
        "25/04/2025",
        "28 aprile 2025",
        "320 euro",
        "",
        "ABC123",
        "info@hotelroma.it",
        "",
    ];
    let mut last = None;
    for answer in answers {
        let routed = assistant.handle(answer, TRIP, USER).unwrap();
        assert_eq!(routed.kind, Some(RecordKind::Accommodation), "{}", answer);
        assert!(routed.envelope.should_continue, "{}", answer);
        last = Some(routed.envelope);
    }

    let summary = last.unwrap();
    assert_eq!(summary.ui_component, Some(UiComponent::DataSummary));
    assert!(summary.message.starts_with("Ecco il riepilogo"));
    let ctx = store.get(&accommodation_key()).unwrap().unwrap();
    assert_eq!(ctx.state, ConversationState::Confirming);
    assert!(ctx.current_field.is_none());

    let saved = assistant.handle("sì", TRIP, USER).unwrap().envelope;
    assert!(!saved.should_continue);
    assert_eq!(saved.action, Some(EnvelopeAction::Save));
    let data = saved.data.unwrap();
    assert_eq!(data.len(), 10);
    assert_eq!(data["name"], FieldValue::text("Hotel Roma"));
    assert_eq!(data["type"], FieldValue::text("hotel"));
    assert_eq!(data["check_in_date"], FieldValue::text("2025-04-25"));
    assert_eq!(data["check_out_date"], FieldValue::text("2025-04-28"));
    assert_eq!(data["cost"], FieldValue::Number(320.0));
    assert_eq!(data["currency"], FieldValue::text("EUR"));
    assert_eq!(data["booking_reference"], FieldValue::text("ABC123"));
    assert_eq!(data["contact_info"], FieldValue::text("info@hotelroma.it"));
    assert!(data["notes"].is_null());

    let ctx = store.get(&accommodation_key()).unwrap().unwrap();
    assert_eq!(ctx.state, ConversationState::Saving);

    let done = assistant
        .complete(
            RecordKind::Accommodation,
            TRIP,
            USER,
            &CompletionOutcome::succeeded(),
        )
        .unwrap();
    assert!(!done.should_continue);
    assert_eq!(done.message, "Alloggio salvato con successo!");
    assert!(store.is_empty().unwrap());
}

/// Three bad answers for one field drop the dialogue entirely
#[test]
fn test_retry_exhaustion_resets_dialogue() {
    let (assistant, store) = setup();
    assistant.handle("aggiungi un hotel", TRIP, USER).unwrap();
    assistant.handle("Hotel Roma", TRIP, USER).unwrap();

    let first = assistant.handle("pippo", TRIP, USER).unwrap().envelope;
    assert!(first.should_continue);
    assert!(first.message.contains("(tentativo 1/3)"));
    assistant.handle("pluto", TRIP, USER).unwrap();
    let last = assistant.handle("paperino", TRIP, USER).unwrap().envelope;

    assert!(!last.should_continue);
    assert!(store.get(&accommodation_key()).unwrap().is_none());

    // The old field and data are not resumed
    let after = assistant.handle("ostello", TRIP, USER).unwrap();
    assert!(!after.is_handled());
    assert!(store.is_empty().unwrap());
}

/// "annulla" while collecting clears the dialogue; a new trigger starts clean
#[test]
fn test_cancel_does_not_leak_data() {
    let (assistant, store) = setup();
    assistant.handle("aggiungi un hotel", TRIP, USER).unwrap();
    assistant.handle("Hotel Roma", TRIP, USER).unwrap();
    assistant.handle("ostello", TRIP, USER).unwrap();

    let cancelled = assistant.handle("annulla", TRIP, USER).unwrap().envelope;
    assert_eq!(cancelled.action, Some(EnvelopeAction::Cancel));
    assert!(!cancelled.should_continue);
    assert!(store.get(&accommodation_key()).unwrap().is_none());

    assistant.handle("nuovo alloggio", TRIP, USER).unwrap();
    let ctx = store.get(&accommodation_key()).unwrap().unwrap();
    assert!(ctx.data.is_empty());
    assert!(ctx.completed_fields.is_empty());
    assert_eq!(ctx.current_field.as_deref(), Some("name"));
}

/// A rich trigger message skips straight to partial-data confirmation
#[test]
fn test_transportation_fast_path() {
    let (assistant, store) = setup();

    let routed = assistant
        .handle(
            "Ho prenotato un volo da Roma a Milano, parte alle 9:30 e costa 120 euro",
            TRIP,
            USER,
        )
        .unwrap();
    assert_eq!(routed.kind, Some(RecordKind::Transportation));
    let envelope = routed.envelope;
    assert_eq!(
        envelope.ui_component,
        Some(UiComponent::PartialDataConfirmation)
    );
    assert!(envelope.should_continue);

    let props = envelope.ui_props.unwrap();
    assert_eq!(props.missing_fields, vec!["arrival_time".to_string()]);
    let data = props.data.unwrap();
    assert_eq!(data["type"], FieldValue::text("flight"));
    assert_eq!(data["departure_location"], FieldValue::text("Roma"));
    assert_eq!(data["arrival_location"], FieldValue::text("Milano"));
    assert_eq!(
        data["departure_time"],
        FieldValue::text("2025-04-24T09:30:00Z")
    );
    assert_eq!(data["cost"], FieldValue::Number(120.0));
    assert_eq!(data["currency"], FieldValue::text("EUR"));

    let ctx = store.get(&transportation_key()).unwrap().unwrap();
    assert_eq!(ctx.state, ConversationState::Collecting);
    assert_eq!(ctx.current_field.as_deref(), Some("arrival_time"));

    // The only missing required field, then straight to the summary
    let summary = assistant
        .handle("oggi alle 11:00", TRIP, USER)
        .unwrap()
        .envelope;
    assert_eq!(summary.ui_component, Some(UiComponent::DataSummary));
    let ctx = store.get(&transportation_key()).unwrap().unwrap();
    assert_eq!(ctx.state, ConversationState::Confirming);
    assert_eq!(
        ctx.data["arrival_time"],
        FieldValue::text("2025-04-24T11:00:00Z")
    );
}

/// Date words after "per" stay out of the location fields
#[test]
fn test_fast_path_keeps_date_words_out_of_locations() {
    let (assistant, store) = setup();

    let envelope = assistant
        .handle("nuovo volo per domani alle 9", TRIP, USER)
        .unwrap()
        .envelope;
    let props = envelope.ui_props.unwrap();
    assert_eq!(
        props.missing_fields,
        vec![
            "departure_location".to_string(),
            "arrival_location".to_string(),
            "arrival_time".to_string(),
        ]
    );

    let ctx = store.get(&transportation_key()).unwrap().unwrap();
    assert!(!ctx.data.contains_key("arrival_location"));
    assert_eq!(
        ctx.data["departure_time"],
        FieldValue::text("2025-04-25T09:00:00Z")
    );
    assert_eq!(ctx.current_field.as_deref(), Some("departure_location"));
}

/// Transportation without fast-path hits walks the required fields only
#[test]
fn test_transportation_required_only_walk() {
    let (assistant, store) = setup();

    let opened = assistant.handle("aggiungi trasporto", TRIP, USER).unwrap();
    assert_eq!(opened.envelope.ui_component, Some(UiComponent::TypeSelector));

    for answer in [
        "treno",
        "Firenze",
        "Bologna",
        "25/04/2025 08:15",
        "25/04/2025 09:00",
    ] {
        assistant.handle(answer, TRIP, USER).unwrap();
    }

    let ctx = store.get(&transportation_key()).unwrap().unwrap();
    assert_eq!(ctx.state, ConversationState::Confirming);
    assert_eq!(ctx.data.len(), 5);
    assert!(!ctx.data.contains_key("provider"));
    assert_eq!(
        ctx.data["departure_time"],
        FieldValue::text("2025-04-25T08:15:00Z")
    );
}

/// UI sentinels: continue, confirm-save and a failed save
#[test]
fn test_control_tokens_and_failed_completion() {
    let (assistant, store) = setup();
    assistant
        .handle("nuovo volo da Roma a Parigi", TRIP, USER)
        .unwrap();

    let resumed = assistant
        .handle("__transportation_continue_partial__", TRIP, USER)
        .unwrap()
        .envelope;
    assert!(resumed.should_continue);
    assert_eq!(resumed.ui_component, Some(UiComponent::DatetimeSelector));

    let saved = assistant
        .handle("__transportation_confirm_save__", TRIP, USER)
        .unwrap()
        .envelope;
    assert_eq!(saved.action, Some(EnvelopeAction::Save));
    assert_eq!(
        saved.data.unwrap()["arrival_location"],
        FieldValue::text("Parigi")
    );

    // Another domain's token is not a command for this one
    let foreign = assistant
        .handle("__accommodation_confirm_save__", TRIP, USER)
        .unwrap();
    assert_eq!(foreign.kind, Some(RecordKind::Accommodation));
    assert!(!foreign.envelope.is_handled());

    let failed = assistant
        .complete(
            RecordKind::Transportation,
            TRIP,
            USER,
            &CompletionOutcome::failed("database non raggiungibile"),
        )
        .unwrap();
    assert!(!failed.should_continue);
    assert!(failed.message.contains("database non raggiungibile"));
    assert!(store.is_empty().unwrap());
}

/// Dialogues are scoped per requester and per kind
#[test]
fn test_dialogues_are_isolated() {
    let (assistant, store) = setup();
    assistant.handle("aggiungi un hotel", TRIP, "anna").unwrap();
    assistant.handle("aggiungi trasporto", TRIP, "marco").unwrap();

    assistant.handle("Hotel Roma", TRIP, "anna").unwrap();
    assistant.handle("treno", TRIP, "marco").unwrap();

    let anna = store
        .get(&ContextKey::new(RecordKind::Accommodation, TRIP, "anna"))
        .unwrap()
        .unwrap();
    let marco = store
        .get(&ContextKey::new(RecordKind::Transportation, TRIP, "marco"))
        .unwrap()
        .unwrap();
    assert_eq!(anna.data["name"], FieldValue::text("Hotel Roma"));
    assert_eq!(marco.data["type"], FieldValue::text("train"));
    assert_eq!(store.len().unwrap(), 2);
}
