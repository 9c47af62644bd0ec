//! User-facing copy (Italian)

use travel_chat_core::{FieldValue, RecordData, RecordKind};

use crate::schema::FieldSchema;

/// "l'alloggio" / "il trasporto"
fn with_article(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Accommodation => "l'alloggio",
        RecordKind::Transportation => "il trasporto",
    }
}

/// "dell'alloggio" / "del trasporto"
fn of_the(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Accommodation => "dell'alloggio",
        RecordKind::Transportation => "del trasporto",
    }
}

pub fn opening(kind: RecordKind, prompt: &str) -> String {
    format!(
        "Perfetto! Aggiungiamo un nuovo {}. {}",
        kind.display_noun(),
        prompt
    )
}

pub fn retry(hint: &str, prompt: &str, attempt: u8, max_retries: u8) -> String {
    format!(
        "Non ho capito. {} {} (tentativo {}/{})",
        hint, prompt, attempt, max_retries
    )
}

pub fn abandoned(kind: RecordKind) -> String {
    format!(
        "Non sono riuscito a capire la risposta. Ho interrotto l'inserimento {}: puoi ricominciare quando vuoi.",
        of_the(kind)
    )
}

pub fn cancelled(kind: RecordKind) -> String {
    format!(
        "Va bene, ho annullato l'inserimento {}.",
        of_the(kind)
    )
}

pub fn save_in_progress(kind: RecordKind) -> String {
    format!(
        "Sto salvando {}, un attimo di pazienza.",
        with_article(kind)
    )
}

pub fn saving(kind: RecordKind) -> String {
    format!("Salvo {}...", with_article(kind))
}

pub fn completed(kind: RecordKind) -> String {
    match kind {
        RecordKind::Accommodation => "Alloggio salvato con successo!".to_string(),
        RecordKind::Transportation => "Trasporto salvato con successo!".to_string(),
    }
}

pub fn completion_failed(kind: RecordKind, error: Option<&str>) -> String {
    match error {
        Some(error) => format!(
            "Non sono riuscito a salvare {}: {}. Riprova più tardi.",
            with_article(kind),
            error
        ),
        None => format!(
            "Non sono riuscito a salvare {}. Riprova più tardi.",
            with_article(kind)
        ),
    }
}

/// Summary lines in schema order, skipped optional fields left out
pub fn summary(schema: &FieldSchema, data: &RecordData) -> String {
    let lines: Vec<String> = schema
        .fields
        .iter()
        .filter_map(|field| match data.get(field.key) {
            Some(FieldValue::Null) | None => None,
            Some(value) => Some(format!("- {}: {}", field.label, value)),
        })
        .collect();

    format!(
        "Ecco il riepilogo:\n{}\nConfermi? (sì/no)",
        lines.join("\n")
    )
}

/// First response after the fast path filled part of the record
pub fn partial_data(schema: &FieldSchema, data: &RecordData, next_prompt: Option<&str>) -> String {
    let recognized: Vec<String> = schema
        .fields
        .iter()
        .filter_map(|field| {
            data.get(field.key)
                .filter(|v| !v.is_null())
                .map(|value| format!("- {}: {}", field.label, value))
        })
        .collect();

    let head = format!(
        "Perfetto! Aggiungiamo un nuovo {}. Ho già capito:\n{}",
        schema.kind.display_noun(),
        recognized.join("\n")
    );
    match next_prompt {
        Some(prompt) => format!("{}\n{}", head, prompt),
        None => format!("{}\nConfermi? (sì/no)", head),
    }
}

pub fn ambiguous_confirmation(schema: &FieldSchema, data: &RecordData) -> String {
    format!(
        "Non ho capito se vuoi salvare. {}",
        summary(schema, data)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_follows_schema_order_and_skips_nulls() {
        let schema = FieldSchema::for_kind(RecordKind::Accommodation);
        let mut data = RecordData::new();
        data.insert("type".into(), FieldValue::text("hotel"));
        data.insert("name".into(), FieldValue::text("Hotel Roma"));
        data.insert("notes".into(), FieldValue::Null);

        let text = summary(schema, &data);
        let name_at = text.find("Nome: Hotel Roma").unwrap();
        let type_at = text.find("Tipo: hotel").unwrap();
        assert!(name_at < type_at);
        assert!(!text.contains("Note"));
        assert!(text.ends_with("Confermi? (sì/no)"));
    }

    #[test]
    fn test_articles() {
        assert_eq!(
            cancelled(RecordKind::Accommodation),
            "Va bene, ho annullato l'inserimento dell'alloggio."
        );
        assert_eq!(saving(RecordKind::Transportation), "Salvo il trasporto...");
        assert!(opening(RecordKind::Accommodation, "Nome?").starts_with("Perfetto! Aggiungiamo un nuovo alloggio."));
    }

    #[test]
    fn test_retry_shows_attempt() {
        let text = retry("Rispondi sì o no.", "Confermi?", 2, 3);
        assert_eq!(text, "Non ho capito. Rispondi sì o no. Confermi? (tentativo 2/3)");
    }
}
