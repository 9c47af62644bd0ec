//! Dialogue reducer
//!
//! `(context, event) -> (context, envelope)` for one record kind. The engine
//! holds no state of its own: the caller loads the context, hands it in, and
//! persists whatever comes back. `None` on either side means no dialogue is
//! in progress for the key.

use std::sync::Arc;

use travel_chat_config::EngineConfig;
use travel_chat_core::{
    has_value, Clock, CompletionOutcome, ControlToken, ConversationContext, ConversationState,
    FieldKind, FieldValue, InputEvent, ParseResult, RecordData, RecordKind, ResponseEnvelope,
    UiComponent, UiProps,
};
use travel_chat_text_processing::{
    accommodation_type_options, currency_options, is_cancel_request, transportation_type_options,
    IntelligentParser, TransportationExtractor, TriggerDetector,
};

use crate::messages;
use crate::schema::{FieldDescriptor, FieldSchema};
use crate::AgentError;

/// How a freshly triggered dialogue starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opening {
    /// Ask the first field
    PromptFirstField,
    /// Pull as many fields as possible out of the triggering message first
    FastPath,
}

/// Tunables shared by every dialogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub max_retries: u8,
    pub default_currency: String,
}

impl From<&EngineConfig> for EngineOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            default_currency: config.default_currency.clone(),
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

/// Reducer output
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Context to keep, `None` to drop it
    pub context: Option<ConversationContext>,
    pub envelope: ResponseEnvelope,
}

impl Transition {
    fn keep(context: ConversationContext, envelope: ResponseEnvelope) -> Self {
        Self {
            context: Some(context),
            envelope,
        }
    }

    fn end(envelope: ResponseEnvelope) -> Self {
        Self {
            context: None,
            envelope,
        }
    }

    fn pass(context: Option<ConversationContext>) -> Self {
        Self {
            context,
            envelope: ResponseEnvelope::not_handled(),
        }
    }
}

/// State machine for one record kind
pub struct DialogueEngine {
    schema: &'static FieldSchema,
    opening: Opening,
    trigger: TriggerDetector,
    parser: IntelligentParser,
    extractor: TransportationExtractor,
    options: EngineOptions,
}

impl DialogueEngine {
    pub fn new(
        kind: RecordKind,
        opening: Opening,
        options: EngineOptions,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            schema: FieldSchema::for_kind(kind),
            opening,
            trigger: TriggerDetector::new(kind),
            parser: IntelligentParser::new(clock),
            extractor: TransportationExtractor::new(),
            options,
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.schema.kind
    }

    pub fn clock(&self) -> &dyn Clock {
        self.parser.clock()
    }

    /// Advance the dialogue by one inbound event
    pub fn reduce(
        &self,
        current: Option<ConversationContext>,
        event: &InputEvent,
    ) -> Result<Transition, AgentError> {
        let current = match current {
            Some(ctx) if !ctx.state.is_active() => {
                tracing::warn!(
                    conversation_id = %ctx.conversation_id,
                    kind = %self.kind(),
                    "Discarding stored idle context"
                );
                None
            },
            other => other,
        };

        match (current, event) {
            (Some(ctx), InputEvent::Control(token)) => Ok(self.on_control(ctx, *token)),
            (None, InputEvent::Control(token)) => {
                tracing::debug!(kind = %self.kind(), token = ?token, "Control token without a dialogue");
                Ok(Transition::pass(None))
            },
            (None, InputEvent::FreeText(message)) => {
                if self.trigger.is_triggered(message) {
                    self.open(message)
                } else {
                    Ok(Transition::pass(None))
                }
            },
            (Some(ctx), InputEvent::FreeText(message)) => {
                if is_cancel_request(message) {
                    tracing::info!(
                        conversation_id = %ctx.conversation_id,
                        kind = %self.kind(),
                        state = %ctx.state,
                        "Dialogue cancelled by user"
                    );
                    return Ok(Transition::end(ResponseEnvelope::cancel(
                        messages::cancelled(self.kind()),
                    )));
                }

                match ctx.state {
                    ConversationState::Collecting => self.on_answer(ctx, message),
                    ConversationState::Confirming => Ok(self.on_confirmation(ctx, message)),
                    ConversationState::Saving => Ok(Transition::keep(
                        ctx,
                        ResponseEnvelope::finished(messages::save_in_progress(self.kind())),
                    )),
                    ConversationState::Idle => Ok(Transition::pass(None)),
                }
            },
        }
    }

    /// Final message once the persistence layer reported back
    ///
    /// The dialogue always ends here, whatever the outcome.
    pub fn complete(
        &self,
        current: Option<&ConversationContext>,
        outcome: &CompletionOutcome,
    ) -> Transition {
        match current {
            Some(ctx) if ctx.state != ConversationState::Saving => tracing::debug!(
                conversation_id = %ctx.conversation_id,
                state = %ctx.state,
                "Completion reported outside the saving state"
            ),
            Some(_) => {},
            None => tracing::warn!(kind = %self.kind(), "Completion reported without a dialogue"),
        }

        let message = if outcome.success {
            messages::completed(self.kind())
        } else {
            messages::completion_failed(self.kind(), outcome.error.as_deref())
        };
        Transition::end(ResponseEnvelope::finished(message))
    }

    fn on_control(&self, mut ctx: ConversationContext, token: ControlToken) -> Transition {
        tracing::debug!(
            conversation_id = %ctx.conversation_id,
            token = ?token,
            state = %ctx.state,
            "Control token"
        );

        match token {
            ControlToken::ConfirmSave => self.save(ctx),
            ControlToken::Cancel => {
                Transition::end(ResponseEnvelope::cancel(messages::cancelled(self.kind())))
            },
            ControlToken::ContinuePartial => match ctx.state {
                ConversationState::Collecting => {
                    match ctx.current_field.as_deref().and_then(|k| self.schema.field(k)) {
                        Some(field) => {
                            let envelope = self.field_envelope(field, field.prompt.to_string());
                            ctx.last_question = Some(field.prompt.to_string());
                            Transition::keep(ctx, envelope)
                        },
                        None => self.advance(ctx),
                    }
                },
                ConversationState::Confirming => {
                    let envelope = self.summary_envelope(&ctx);
                    Transition::keep(ctx, envelope)
                },
                ConversationState::Saving => Transition::keep(
                    ctx,
                    ResponseEnvelope::finished(messages::save_in_progress(self.kind())),
                ),
                ConversationState::Idle => Transition::pass(None),
            },
        }
    }

    fn open(&self, message: &str) -> Result<Transition, AgentError> {
        let mut ctx = ConversationContext::new(self.kind());

        if self.opening == Opening::FastPath {
            let extraction = self.extractor.extract(message, self.clock());
            if !extraction.is_empty() {
                return Ok(self.open_with_partial_data(ctx, extraction.to_record_data()));
            }
        }

        let field = self.schema.next_field(&ctx).ok_or_else(|| {
            AgentError::Initialization(format!("no fields declared for {}", self.kind()))
        })?;
        ctx.collect(field.key);
        ctx.last_question = Some(field.prompt.to_string());

        tracing::info!(
            conversation_id = %ctx.conversation_id,
            kind = %self.kind(),
            field = field.key,
            "Dialogue started"
        );
        let envelope = self.field_envelope(field, messages::opening(self.kind(), field.prompt));
        Ok(Transition::keep(ctx, envelope))
    }

    fn open_with_partial_data(
        &self,
        mut ctx: ConversationContext,
        data: RecordData,
    ) -> Transition {
        ctx.data = self.schema.retain_known(data);
        for field in self.schema.fields {
            if has_value(&ctx.data, field.key) {
                ctx.mark_completed(field.key);
            }
        }

        let missing: Vec<String> = self
            .schema
            .missing_required(&ctx.data)
            .into_iter()
            .map(str::to_string)
            .collect();

        let next_prompt = match self.schema.next_field(&ctx) {
            Some(field) => {
                ctx.collect(field.key);
                ctx.last_question = Some(field.prompt.to_string());
                Some(field.prompt)
            },
            None => {
                self.apply_default_currency(&mut ctx);
                ctx.confirm();
                None
            },
        };

        tracing::info!(
            conversation_id = %ctx.conversation_id,
            kind = %self.kind(),
            recognized = ctx.completed_fields.len(),
            missing = missing.len(),
            "Dialogue started from fast-path extraction"
        );

        let message = messages::partial_data(self.schema, &ctx.data, next_prompt);
        let envelope = ResponseEnvelope::prompt(message).with_ui(
            UiComponent::PartialDataConfirmation,
            UiProps {
                data: Some(ctx.data.clone()),
                missing_fields: missing,
                ..Default::default()
            },
        );
        Transition::keep(ctx, envelope)
    }

    fn on_answer(
        &self,
        mut ctx: ConversationContext,
        message: &str,
    ) -> Result<Transition, AgentError> {
        let key = ctx
            .current_field
            .clone()
            .ok_or_else(|| AgentError::UnknownField("<none>".to_string()))?;
        let field = self
            .schema
            .field(&key)
            .ok_or_else(|| AgentError::UnknownField(key.clone()))?;

        let answer = message.trim();
        if answer.is_empty() && !field.required {
            // A value picked up earlier from another answer survives the skip
            if !has_value(&ctx.data, field.key) {
                ctx.data.insert(field.key.to_string(), FieldValue::Null);
            }
            ctx.mark_completed(field.key);
            ctx.retry_count = 0;
            tracing::debug!(conversation_id = %ctx.conversation_id, field = field.key, "Optional field skipped");
            return Ok(self.advance(ctx));
        }

        let result = if (field.validate)(answer) {
            self.parser.parse(field.kind, answer)
        } else {
            ParseResult::failure()
        };

        match result.value.filter(|_| result.success) {
            Some(value) => {
                ctx.accept(field.key, value);
                ctx.data
                    .extend(self.schema.retain_known(result.additional_data));
                tracing::debug!(
                    conversation_id = %ctx.conversation_id,
                    field = field.key,
                    confidence = result.confidence,
                    "Field accepted"
                );
                Ok(self.advance(ctx))
            },
            None => Ok(self.reject(ctx, field)),
        }
    }

    fn reject(&self, mut ctx: ConversationContext, field: &FieldDescriptor) -> Transition {
        ctx.retry_count = ctx.retry_count.saturating_add(1);

        if ctx.retry_count >= self.options.max_retries {
            tracing::info!(
                conversation_id = %ctx.conversation_id,
                kind = %self.kind(),
                field = field.key,
                retry_count = ctx.retry_count,
                "Dialogue abandoned after repeated invalid answers"
            );
            return Transition::end(ResponseEnvelope::finished(messages::abandoned(self.kind())));
        }

        tracing::debug!(
            conversation_id = %ctx.conversation_id,
            field = field.key,
            retry_count = ctx.retry_count,
            "Field rejected"
        );
        let message = messages::retry(
            field.kind.error_hint(),
            field.prompt,
            ctx.retry_count,
            self.options.max_retries,
        );
        ctx.last_question = Some(field.prompt.to_string());
        let envelope = self.field_envelope(field, message);
        Transition::keep(ctx, envelope)
    }

    fn advance(&self, mut ctx: ConversationContext) -> Transition {
        match self.schema.next_field(&ctx) {
            Some(next) => {
                ctx.collect(next.key);
                ctx.last_question = Some(next.prompt.to_string());
                let envelope = self.field_envelope(next, next.prompt.to_string());
                Transition::keep(ctx, envelope)
            },
            None => {
                self.apply_default_currency(&mut ctx);
                ctx.confirm();
                let envelope = self.summary_envelope(&ctx);
                ctx.last_question = Some(envelope.message.clone());
                tracing::debug!(conversation_id = %ctx.conversation_id, "All fields collected");
                Transition::keep(ctx, envelope)
            },
        }
    }

    fn on_confirmation(&self, ctx: ConversationContext, message: &str) -> Transition {
        let result = self.parser.parse(FieldKind::Confirmation, message);
        match result.value.filter(|_| result.success).and_then(|v| v.as_bool()) {
            Some(true) => self.save(ctx),
            Some(false) => {
                tracing::info!(conversation_id = %ctx.conversation_id, "Summary rejected");
                Transition::end(ResponseEnvelope::cancel(messages::cancelled(self.kind())))
            },
            None => {
                let envelope = ResponseEnvelope::prompt(messages::ambiguous_confirmation(
                    self.schema,
                    &ctx.data,
                ))
                .with_ui(
                    UiComponent::ConfirmationButtons,
                    UiProps {
                        data: Some(ctx.data.clone()),
                        options: vec!["Sì".to_string(), "No".to_string()],
                        ..Default::default()
                    },
                );
                Transition::keep(ctx, envelope)
            },
        }
    }

    fn save(&self, mut ctx: ConversationContext) -> Transition {
        self.apply_default_currency(&mut ctx);
        ctx.begin_saving();
        tracing::info!(
            conversation_id = %ctx.conversation_id,
            kind = %self.kind(),
            fields = ctx.data.len(),
            "Save requested"
        );
        let envelope = ResponseEnvelope::save(messages::saving(self.kind()), ctx.data.clone());
        Transition::keep(ctx, envelope)
    }

    /// A cost with no expressed currency is in the default currency
    fn apply_default_currency(&self, ctx: &mut ConversationContext) {
        if self.schema.contains("currency")
            && has_value(&ctx.data, "cost")
            && !has_value(&ctx.data, "currency")
        {
            ctx.data.insert(
                "currency".to_string(),
                FieldValue::text(self.options.default_currency.clone()),
            );
        }
    }

    fn summary_envelope(&self, ctx: &ConversationContext) -> ResponseEnvelope {
        ResponseEnvelope::prompt(messages::summary(self.schema, &ctx.data)).with_ui(
            UiComponent::DataSummary,
            UiProps {
                label: Some("Riepilogo".to_string()),
                data: Some(ctx.data.clone()),
                ..Default::default()
            },
        )
    }

    /// Prompt for `field` with the UI directive its kind calls for
    fn field_envelope(&self, field: &FieldDescriptor, message: String) -> ResponseEnvelope {
        let envelope = ResponseEnvelope::prompt(message);
        let props = UiProps {
            label: Some(field.label.to_string()),
            ..Default::default()
        };

        match field.kind {
            FieldKind::Date => envelope.with_ui(UiComponent::DateSelector, props),
            FieldKind::DateTime => envelope.with_ui(UiComponent::DatetimeSelector, props),
            FieldKind::AccommodationType => envelope.with_ui(
                UiComponent::TypeSelector,
                UiProps {
                    options: accommodation_type_options(),
                    ..props
                },
            ),
            FieldKind::TransportationType => envelope.with_ui(
                UiComponent::TypeSelector,
                UiProps {
                    options: transportation_type_options(),
                    ..props
                },
            ),
            FieldKind::Currency => envelope.with_ui(
                UiComponent::CurrencySelector,
                UiProps {
                    options: currency_options(),
                    placeholder: Some(self.options.default_currency.clone()),
                    ..props
                },
            ),
            _ if !field.required => envelope.with_ui(
                UiComponent::TextInputWithCancel,
                UiProps {
                    placeholder: Some("Lascia vuoto per saltare".to_string()),
                    ..props
                },
            ),
            _ => envelope,
        }
    }
}

impl std::fmt::Debug for DialogueEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueEngine")
            .field("kind", &self.kind())
            .field("opening", &self.opening)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
