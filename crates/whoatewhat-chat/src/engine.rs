//! Conversation engine: one utterance in, roster changes and a reply out.

use std::sync::Arc;

use tracing::{debug, info};

use whoatewhat_core::config::{ConversationConfig, SplitConfig};
use whoatewhat_core::{ConversationMessage, ReceiptItem};

use crate::error::ChatError;
use crate::parser::{self, Utterance};
use crate::response::ResponseGenerator;
use crate::store::AssignmentStore;

/// Turns free text into assignments on an [`AssignmentStore`].
#[derive(Debug, Clone, Default)]
pub struct ConversationEngine {
    conversation: ConversationConfig,
    responses: ResponseGenerator,
}

impl ConversationEngine {
    pub fn new(config: &SplitConfig) -> Self {
        Self {
            conversation: config.conversation.clone(),
            responses: ResponseGenerator::new(config.display.clone()),
        }
    }

    pub fn responses(&self) -> &ResponseGenerator {
        &self.responses
    }

    /// Seed the welcome message into an empty log. Returns whether it did.
    pub fn greet(&self, store: &mut AssignmentStore) -> bool {
        if !self.conversation.show_welcome || !store.history().is_empty() {
            return false;
        }
        store.push_message(ConversationMessage::system(
            self.conversation.welcome_message.clone(),
        ));
        true
    }

    /// Process one utterance and return the system reply.
    ///
    /// Blank input is rejected before anything is logged. Unrecognised names
    /// or items are never errors; the reply is the only feedback.
    pub fn process(&self, store: &mut AssignmentStore, input: &str) -> Result<String, ChatError> {
        if input.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        store.push_message(ConversationMessage::user(input));

        let utterance = Utterance::new(input);
        for name in utterance.names() {
            store.add_person(name);
        }

        let items: Vec<Arc<ReceiptItem>> = store
            .receipt()
            .map(|r| r.items.clone())
            .unwrap_or_default();

        let mut assigned = 0usize;
        for item in &items {
            if !utterance.mentions_item(&item.name) {
                continue;
            }
            match parser::resolve_assignee(&utterance, &item.name) {
                Some((name, source)) => {
                    debug!(item = %item.name, person = name, ?source, "Assignee resolved");
                    if store.assign_item(item, name, 1, 1.0) {
                        assigned += 1;
                    }
                }
                None => debug!(item = %item.name, "Item mentioned without a person"),
            }
        }

        let unassigned = store.unassigned_items();
        let reply = self.responses.acknowledgment(&unassigned);
        store.push_message(ConversationMessage::system(reply.clone()));

        info!(
            assigned,
            unassigned = unassigned.len(),
            people = store.people().len(),
            "Utterance processed"
        );
        Ok(reply)
    }
}
