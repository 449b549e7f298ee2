//! Submission controller
//!
//! [`PaymentForm`] owns one [`FormState`] and drives it through
//! `Idle → Validating → (Invalid | Submitting) → (Success | Failed)`.
//!
//! # Concurrency
//!
//! State sits behind a `Mutex` that is never held across an `.await`. The in-flight check
//! and the `submitting = true` write happen under one lock acquisition, so concurrent
//! [`PaymentForm::submit`] calls on the same form issue at most one gateway call.
//!
//! The round trip itself only holds a `Weak` reference to the state. Dropping the form
//! while a [`PaymentForm::submit_detached`] task is pending is the "unmount" case: the
//! response is discarded when it arrives.

use super::events::{BlockReason, Field, FormEvent, FormEventBus, FormEventEnvelope};
use super::state::{FormPhase, FormState, SUCCESS_MESSAGE, UNREACHABLE_DETAIL, failure_message};
use super::view::FormView;
use crate::core::error::ValidationError;
use crate::core::payment::PaymentRequest;
use crate::core::validation::{self, AmountInput, ValidationResult};
use crate::gateway::PaymentGateway;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;
use validator::Validate;

/// How a submit attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The gateway accepted the payment
    Succeeded,
    /// The gateway call failed; carries the status line now shown on the form
    Failed(String),
    /// Validation failed; no gateway call was made
    Invalid,
    /// Another submission was already in flight; no gateway call was made
    Busy,
    /// The form was dropped before the attempt finished; any response was ignored
    Discarded,
}

impl SubmitOutcome {
    /// Whether a gateway response was applied to the form
    pub fn reached_gateway(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded | SubmitOutcome::Failed(_))
    }
}

/// Headless payment form bound to a gateway
pub struct PaymentForm {
    state: Arc<Mutex<FormState>>,
    gateway: Arc<dyn PaymentGateway>,
    events: FormEventBus,
}

impl PaymentForm {
    /// Mount a fresh form: empty fields, no errors, no result
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self::with_event_bus(gateway, FormEventBus::default())
    }

    /// Mount a fresh form publishing on the given bus
    pub fn with_event_bus(gateway: Arc<dyn PaymentGateway>, events: FormEventBus) -> Self {
        Self {
            state: Arc::new(Mutex::new(FormState::default())),
            gateway,
            events,
        }
    }

    /// Phone field changed
    pub fn set_phone(&self, raw: impl Into<String>) -> ValidationResult {
        let raw = raw.into();
        let result = validation::validate_phone(&raw);
        {
            let mut state = lock(&self.state);
            state.phone = raw;
            state.phone_error = result.error_message.clone();
            settle_after_edit(&mut state);
        }
        self.field_validated(Field::Phone, &result);
        result
    }

    /// Amount field changed
    pub fn set_amount(&self, raw: impl Into<AmountInput>) -> ValidationResult {
        let raw = raw.into();
        let result = validation::validate_amount(&raw);
        {
            let mut state = lock(&self.state);
            state.amount = raw;
            state.amount_error = result.error_message.clone();
            settle_after_edit(&mut state);
        }
        self.field_validated(Field::Amount, &result);
        result
    }

    /// Snapshot of the current state
    pub fn state(&self) -> FormState {
        lock(&self.state).clone()
    }

    /// Whether the submit control is enabled
    pub fn can_submit(&self) -> bool {
        lock(&self.state).can_submit()
    }

    /// Renderable view of the current state
    pub fn view(&self) -> FormView {
        FormView::from(&*lock(&self.state))
    }

    /// Receive an event for every observable change
    pub fn subscribe(&self) -> broadcast::Receiver<FormEventEnvelope> {
        self.events.subscribe()
    }

    /// Validate both fields and, if they pass, initiate the payment
    pub async fn submit(&self) -> SubmitOutcome {
        run_submission(
            Arc::downgrade(&self.state),
            Arc::clone(&self.gateway),
            self.events.clone(),
        )
        .await
    }

    /// Like [`submit`](Self::submit), but on a spawned task that does not keep the form alive
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit_detached(&self) -> JoinHandle<SubmitOutcome> {
        tokio::spawn(run_submission(
            Arc::downgrade(&self.state),
            Arc::clone(&self.gateway),
            self.events.clone(),
        ))
    }

    fn field_validated(&self, field: Field, result: &ValidationResult) {
        tracing::debug!(field = field.as_str(), valid = result.valid, "Field validated");
        self.events.publish(FormEvent::FieldValidated {
            field,
            valid: result.valid,
        });
    }
}

impl std::fmt::Debug for PaymentForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentForm")
            .field("state", &*lock(&self.state))
            .finish_non_exhaustive()
    }
}

fn lock(state: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    // Poisoned only if a renderer panicked while holding the guard; the data is plain.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn settle_after_edit(state: &mut FormState) {
    if state.submitting {
        return;
    }
    state.phase = if state.has_field_errors() {
        FormPhase::Invalid
    } else {
        FormPhase::Idle
    };
}

/// Re-run both validators and write the error slots; returns the request if both pass
fn validate_for_submit(state: &mut FormState) -> Result<PaymentRequest, ValidationError> {
    state.phase = FormPhase::Validating;

    state.phone_error = validation::validate_phone(&state.phone).error_message;
    state.amount_error = validation::validate_amount(&state.amount).error_message;

    let request = PaymentRequest::from_fields(&state.phone, &state.amount)?;
    request.validate()?;
    Ok(request)
}

async fn run_submission(
    handle: Weak<Mutex<FormState>>,
    gateway: Arc<dyn PaymentGateway>,
    events: FormEventBus,
) -> SubmitOutcome {
    let Some(shared) = handle.upgrade() else {
        return SubmitOutcome::Discarded;
    };

    let request = {
        let mut state = lock(&shared);

        if state.submitting {
            drop(state);
            tracing::debug!("Submit ignored: a submission is already in flight");
            events.publish(FormEvent::SubmissionBlocked {
                reason: BlockReason::InFlight,
            });
            return SubmitOutcome::Busy;
        }

        state.result_message = None;
        state.result_is_success = false;

        match validate_for_submit(&mut state) {
            Ok(request) => {
                state.submitting = true;
                state.phase = FormPhase::Submitting;
                request
            }
            Err(err) => {
                state.phase = FormPhase::Invalid;
                drop(state);
                tracing::debug!(error = %err, "Submit blocked by validation");
                events.publish(FormEvent::SubmissionBlocked {
                    reason: BlockReason::Invalid,
                });
                return SubmitOutcome::Invalid;
            }
        }
    };
    drop(shared);

    let submission_id = Uuid::new_v4();
    let span = tracing::info_span!("submission", %submission_id);
    span.in_scope(|| {
        tracing::info!(
            phone = %request.masked_phone(),
            amount = request.amount,
            "Initiating payment"
        );
    });
    events.publish(FormEvent::SubmissionStarted { submission_id });

    let result = gateway
        .initiate_payment(&request)
        .instrument(span.clone())
        .await;

    let Some(shared) = handle.upgrade() else {
        span.in_scope(|| tracing::debug!("Form dropped before response; discarding it"));
        return SubmitOutcome::Discarded;
    };

    let (outcome, event) = {
        let mut state = lock(&shared);
        state.submitting = false;

        let finished = match result {
            Ok(ack) => {
                span.in_scope(|| tracing::info!(status = ack.status, "Payment initiated"));
                state.result_message = Some(SUCCESS_MESSAGE.to_string());
                state.result_is_success = true;
                state.phase = FormPhase::Success;
                (
                    SubmitOutcome::Succeeded,
                    FormEvent::SubmissionSucceeded { submission_id },
                )
            }
            Err(err) => {
                let message = failure_message(err.detail().unwrap_or(UNREACHABLE_DETAIL));
                span.in_scope(|| {
                    tracing::warn!(
                        code = err.error_code(),
                        status = err.status(),
                        error = %err,
                        "Payment initiation failed"
                    )
                });
                state.result_message = Some(message.clone());
                state.result_is_success = false;
                state.phase = FormPhase::Failed;
                (
                    SubmitOutcome::Failed(message.clone()),
                    FormEvent::SubmissionFailed {
                        submission_id,
                        message,
                    },
                )
            }
        };

        // Fields edited into an invalid value during flight outrank the result phase.
        if state.has_field_errors() {
            state.phase = FormPhase::Invalid;
        }
        finished
    };

    events.publish(event);
    outcome
}
