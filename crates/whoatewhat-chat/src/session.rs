//! A session shared across threads behind a single lock.
//!
//! Each utterance runs under one lock acquisition, so name additions, item
//! assignments and the reply all see the same state.

use std::sync::{Mutex, MutexGuard};

use tracing::info;

use whoatewhat_core::allocation::SplitSummary;
use whoatewhat_core::{AnalysisResult, SessionState, SplitConfig};

use crate::engine::ConversationEngine;
use crate::error::ChatError;
use crate::store::AssignmentStore;

/// Exclusive owner of one session's store.
pub struct SharedSession {
    engine: ConversationEngine,
    store: Mutex<AssignmentStore>,
    tolerance: f64,
}

impl SharedSession {
    pub fn new(config: &SplitConfig) -> Self {
        Self {
            engine: ConversationEngine::new(config),
            store: Mutex::new(AssignmentStore::new()),
            tolerance: config.reconciliation.tolerance,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, AssignmentStore>, ChatError> {
        self.store
            .lock()
            .map_err(|e| ChatError::SessionPoisoned(e.to_string()))
    }

    pub fn engine(&self) -> &ConversationEngine {
        &self.engine
    }

    /// Accept an analysis result; success starts a fresh conversation.
    pub fn accept_analysis(&self, result: AnalysisResult) -> Result<SessionState, ChatError> {
        let mut store = self.lock()?;
        store.accept_analysis(result);
        Ok(store.state())
    }

    pub fn greet(&self) -> Result<bool, ChatError> {
        let mut store = self.lock()?;
        Ok(self.engine.greet(&mut store))
    }

    /// Process one utterance atomically.
    pub fn handle_message(&self, input: &str) -> Result<(String, SessionState), ChatError> {
        let mut store = self.lock()?;
        let reply = self.engine.process(&mut store, input)?;
        Ok((reply, store.state()))
    }

    /// Run an arbitrary change against the store under the lock.
    pub fn with_store<T>(&self, f: impl FnOnce(&mut AssignmentStore) -> T) -> Result<T, ChatError> {
        let mut store = self.lock()?;
        Ok(f(&mut store))
    }

    pub fn reset(&self) -> Result<(), ChatError> {
        self.lock()?.reset();
        info!("Session reset");
        Ok(())
    }

    /// A copy of the current state for display.
    pub fn snapshot(&self) -> Result<AssignmentStore, ChatError> {
        Ok(self.lock()?.clone())
    }

    pub fn summary(&self) -> Result<Option<SplitSummary>, ChatError> {
        Ok(self.lock()?.summary(self.tolerance))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use whoatewhat_core::{AnalysisError, Receipt, ReceiptItem};

    fn loaded_session() -> SharedSession {
        let session = SharedSession::new(&SplitConfig::default());
        let receipt = Receipt::new(
            vec![
                ReceiptItem::new("Burger", 12.99, 1),
                ReceiptItem::new("Fries", 4.99, 1),
            ],
            2.99,
            4.50,
            25.47,
            "USD",
        );
        session.accept_analysis(Ok(receipt)).unwrap();
        session
    }

    #[test]
    fn test_accept_analysis_state() {
        let session = SharedSession::new(&SplitConfig::default());
        let state = session.accept_analysis(Err(AnalysisError::InvalidUrl)).unwrap();
        assert_eq!(state, SessionState::AwaitingReceipt);
        assert_eq!(
            session.snapshot().unwrap().error_message(),
            Some("Invalid API URL")
        );
    }

    #[test]
    fn test_handle_message_reports_state() {
        let session = loaded_session();
        let (_, state) = session.handle_message("Julia got the burger").unwrap();
        assert_eq!(state, SessionState::AwaitingAssignment);
        let (reply, state) = session.handle_message("Peter got the fries").unwrap();
        assert_eq!(state, SessionState::Complete);
        assert!(reply.starts_with("Great!"));
    }

    #[test]
    fn test_handle_message_empty() {
        let session = loaded_session();
        assert!(matches!(
            session.handle_message("  "),
            Err(ChatError::EmptyMessage)
        ));
    }

    #[test]
    fn test_with_store_selection() {
        let session = loaded_session();
        session
            .with_store(|store| {
                let id = store.unassigned_items()[0].id;
                store.select_item(id);
                store.assign_selected("Julia");
            })
            .unwrap();
        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.person("Julia").unwrap().assignments.len(), 1);
    }

    #[test]
    fn test_concurrent_utterances_are_atomic() {
        let session = Arc::new(loaded_session());
        let handles: Vec<_> = ["Julia got the burger", "Peter got the fries"]
            .into_iter()
            .map(|text| {
                let session = Arc::clone(&session);
                thread::spawn(move || session.handle_message(text).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.history().len(), 4);
        for pair in snapshot.history().chunks(2) {
            assert!(pair[0].is_user);
            assert!(!pair[1].is_user);
        }
        assert!(snapshot.is_complete());
    }

    #[test]
    fn test_summary_and_reset() {
        let session = loaded_session();
        session.handle_message("Julia got the burger").unwrap();
        session.handle_message("Peter got the fries").unwrap();
        let summary = session.summary().unwrap().unwrap();
        assert!(summary.reconciliation.is_match());

        session.reset().unwrap();
        assert!(session.summary().unwrap().is_none());
        assert_eq!(session.snapshot().unwrap().state(), SessionState::AwaitingReceipt);
    }
}
