use travel_chat_core::{FieldKind, RecordKind};

use super::{validators, FieldDescriptor, FieldSchema, TraversalPolicy};

pub static TRANSPORTATION_SCHEMA: FieldSchema = FieldSchema {
    kind: RecordKind::Transportation,
    policy: TraversalPolicy::RequiredOnly,
    fields: &[
        FieldDescriptor {
            key: "type",
            label: "Tipo",
            required: true,
            prompt: "Che mezzo di trasporto è? (volo, treno, autobus, auto, traghetto, taxi, altro)",
            kind: FieldKind::TransportationType,
            validate: validators::non_empty,
        },
        FieldDescriptor {
            key: "departure_location",
            label: "Partenza",
            required: true,
            prompt: "Da dove parti?",
            kind: FieldKind::Location,
            validate: validators::short_text,
        },
        FieldDescriptor {
            key: "arrival_location",
            label: "Arrivo",
            required: true,
            prompt: "Dove arrivi?",
            kind: FieldKind::Location,
            validate: validators::short_text,
        },
        FieldDescriptor {
            key: "departure_time",
            label: "Orario di partenza",
            required: true,
            prompt: "Quando parti? (data e ora)",
            kind: FieldKind::DateTime,
            validate: validators::non_empty,
        },
        FieldDescriptor {
            key: "arrival_time",
            label: "Orario di arrivo",
            required: true,
            prompt: "Quando arrivi? (data e ora)",
            kind: FieldKind::DateTime,
            validate: validators::non_empty,
        },
        FieldDescriptor {
            key: "provider",
            label: "Compagnia",
            required: false,
            prompt: "Con quale compagnia viaggi?",
            kind: FieldKind::Text,
            validate: validators::short_text,
        },
        FieldDescriptor {
            key: "booking_reference",
            label: "Riferimento prenotazione",
            required: false,
            prompt: "Hai un codice di prenotazione?",
            kind: FieldKind::Text,
            validate: validators::short_text,
        },
        FieldDescriptor {
            key: "cost",
            label: "Costo",
            required: false,
            prompt: "Quanto hai speso?",
            kind: FieldKind::Cost,
            validate: validators::contains_digit,
        },
        FieldDescriptor {
            key: "currency",
            label: "Valuta",
            required: false,
            prompt: "In che valuta?",
            kind: FieldKind::Currency,
            validate: validators::non_empty,
        },
        FieldDescriptor {
            key: "notes",
            label: "Note",
            required: false,
            prompt: "Vuoi aggiungere delle note?",
            kind: FieldKind::Text,
            validate: validators::accept_any,
        },
    ],
};
