//! Conversational item assignment.
//!
//! Holds the per-session assignment store, turns free-text utterances into
//! roster and assignment changes, and composes the replies.

pub mod engine;
pub mod error;
pub mod parser;
pub mod response;
pub mod session;
pub mod store;

pub use engine::ConversationEngine;
pub use error::ChatError;
pub use parser::{AssigneeSource, Utterance};
pub use response::ResponseGenerator;
pub use session::SharedSession;
pub use store::AssignmentStore;
