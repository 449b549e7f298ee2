//! Submission controller, its state and what it exposes to renderers

pub mod controller;
pub mod events;
pub mod state;
pub mod view;

pub use controller::{PaymentForm, SubmitOutcome};
pub use events::{BlockReason, Field, FormEvent, FormEventBus, FormEventEnvelope};
pub use state::{
    FAILURE_MARKER, FAILURE_PREFIX, FormPhase, FormState, SUCCESS_MARKER, SUCCESS_MESSAGE,
    UNREACHABLE_DETAIL, failure_message,
};
pub use view::{FormView, StatusTone};
