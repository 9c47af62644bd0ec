use travel_chat_core::{FieldKind, RecordKind};

use super::{validators, FieldDescriptor, FieldSchema, TraversalPolicy};

pub static ACCOMMODATION_SCHEMA: FieldSchema = FieldSchema {
    kind: RecordKind::Accommodation,
    policy: TraversalPolicy::Sequential,
    fields: &[
        FieldDescriptor {
            key: "name",
            label: "Nome",
            required: true,
            prompt: "Come si chiama la struttura?",
            kind: FieldKind::Text,
            validate: validators::short_text,
        },
        FieldDescriptor {
            key: "type",
            label: "Tipo",
            required: true,
            prompt: "Che tipo di alloggio è? (hotel, ostello, appartamento, B&B, resort, campeggio, villa, altro)",
            kind: FieldKind::AccommodationType,
            validate: validators::non_empty,
        },
        FieldDescriptor {
            key: "address",
            label: "Indirizzo",
            required: true,
            prompt: "Qual è l'indirizzo?",
            kind: FieldKind::Text,
            validate: validators::short_text,
        },
        FieldDescriptor {
            key: "check_in_date",
            label: "Check-in",
            required: true,
            prompt: "Quando fai il check-in?",
            kind: FieldKind::Date,
            validate: validators::non_empty,
        },
        FieldDescriptor {
            key: "check_out_date",
            label: "Check-out",
            required: true,
            prompt: "E il check-out?",
            kind: FieldKind::Date,
            validate: validators::non_empty,
        },
        FieldDescriptor {
            key: "cost",
            label: "Costo",
            required: false,
            prompt: "Quanto costa il soggiorno? (lascia vuoto per saltare)",
            kind: FieldKind::Cost,
            validate: validators::contains_digit,
        },
        FieldDescriptor {
            key: "currency",
            label: "Valuta",
            required: false,
            prompt: "In che valuta? (lascia vuoto per saltare)",
            kind: FieldKind::Currency,
            validate: validators::non_empty,
        },
        FieldDescriptor {
            key: "booking_reference",
            label: "Riferimento prenotazione",
            required: false,
            prompt: "Hai un codice di prenotazione? (lascia vuoto per saltare)",
            kind: FieldKind::Text,
            validate: validators::short_text,
        },
        FieldDescriptor {
            key: "contact_info",
            label: "Contatti",
            required: false,
            prompt: "Un contatto della struttura, email o telefono? (lascia vuoto per saltare)",
            kind: FieldKind::Contact,
            validate: validators::accept_any,
        },
        FieldDescriptor {
            key: "notes",
            label: "Note",
            required: false,
            prompt: "Vuoi aggiungere delle note? (lascia vuoto per saltare)",
            kind: FieldKind::Text,
            validate: validators::accept_any,
        },
    ],
};
