//! The selection-flow wizard core.
//!
//! A wizard walk is never stored server-side: the accumulated answers
//! travel inside the opaque component token attached to each
//! interaction, and are reconstructed fresh on every event. The pieces:
//! - `step`: the immutable step table and its startup validation.
//! - `codec`: encode/decode between `WizardState` and the token.
//! - `engine`: the linear transition function.
//! - `submit`: assembly of the final outbound record.

pub mod codec;
pub mod engine;
pub mod error;
pub mod step;
pub mod submit;

pub use codec::WizardState;
pub use engine::NextAction;
pub use error::WizardError;
pub use step::{FieldStyle, FormField, StepDefinition, StepKind, StepOption, StepTable};
pub use submit::SubmissionRecord;
