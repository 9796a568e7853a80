pub mod backend;
pub mod controller;
pub mod error;
pub mod share;
pub mod store;
pub mod trigger;

pub use backend::{hyper_generate_endpoint, GenerationBackend, HttpGenerationBackend};
pub use controller::{Completion, LifecycleState, RequestController, DEFAULT_REQUEST_TIMEOUT};
pub use error::GenerationError;
pub use share::{
    select_share_action, ClipboardShareAction, ClipboardWriter, NativeShare, NativeShareAction,
    ShareAction, ShareError, ShareOutcome, SharePayload,
};
pub use store::ResultStore;
pub use trigger::{LifecycleTrigger, DEFAULT_PROMPT};

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod backend_tests;

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;

#[cfg(test)]
#[path = "tests/share_tests.rs"]
mod share_tests;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
