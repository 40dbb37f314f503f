//! Assignment store: the single source of truth for who has what.
//!
//! Owns the receipt, the roster, the conversation log and any pending item
//! selection for one splitting session. Name lookups are case-insensitive.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use whoatewhat_core::allocation::{self, SplitSummary};
use whoatewhat_core::{
    AnalysisResult, AssignedItem, ConversationMessage, Person, Receipt, ReceiptItem, SessionState,
};

/// Mutable state of one splitting session.
#[derive(Debug, Clone, Default)]
pub struct AssignmentStore {
    receipt: Option<Receipt>,
    people: Vec<Person>,
    history: Vec<ConversationMessage>,
    selected_item: Option<Uuid>,
    error_message: Option<String>,
}

impl AssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for a receipt with an empty roster.
    pub fn with_receipt(receipt: Receipt) -> Self {
        let mut store = Self::new();
        store.set_receipt(receipt);
        store
    }

    // -----------------------------------------------------------------
    // Receipt lifecycle
    // -----------------------------------------------------------------

    /// Install a receipt, discarding the previous roster and conversation.
    pub fn set_receipt(&mut self, receipt: Receipt) {
        info!(
            receipt_id = %receipt.id,
            items = receipt.items.len(),
            "Receipt loaded"
        );
        self.reset();
        self.receipt = Some(receipt);
    }

    /// Accept the outcome of a receipt analysis run.
    ///
    /// A failure is kept as a displayable message and leaves the session untouched.
    pub fn accept_analysis(&mut self, result: AnalysisResult) {
        match result {
            Ok(receipt) => self.set_receipt(receipt),
            Err(err) => {
                warn!("Receipt analysis failed: {}", err);
                self.error_message = Some(err.to_string());
            }
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Return to the initial empty state.
    pub fn reset(&mut self) {
        self.receipt = None;
        self.people.clear();
        self.history.clear();
        self.selected_item = None;
        self.error_message = None;
        debug!("Session reset");
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn history(&self) -> &[ConversationMessage] {
        &self.history
    }

    pub fn person(&self, name: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.is_named(name))
    }

    pub(crate) fn push_message(&mut self, message: ConversationMessage) {
        self.history.push(message);
    }

    // -----------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------

    /// Add a person unless the trimmed name is empty or already on the roster.
    pub fn add_person(&mut self, name: &str) {
        let trimmed = name.trim();
        if trimmed.is_empty() || self.person(trimmed).is_some() {
            return;
        }
        debug!(name = trimmed, "Person added");
        self.people.push(Person::new(trimmed));
    }

    /// Return the person with this name, adding them first if needed.
    pub fn find_or_create_person(&mut self, name: &str) -> &Person {
        let trimmed = name.trim();
        let index = match self.people.iter().position(|p| p.is_named(trimmed)) {
            Some(index) => index,
            None => {
                debug!(name = trimmed, "Person added");
                self.people.push(Person::new(trimmed));
                self.people.len() - 1
            }
        };
        &self.people[index]
    }

    // -----------------------------------------------------------------
    // Assignment
    // -----------------------------------------------------------------

    /// Append an assignment of `item` to the named person.
    ///
    /// Does nothing if nobody on the roster has that name. The same item may
    /// be assigned any number of times, to the same or different people.
    /// Returns whether an assignment was made.
    pub fn assign_item(
        &mut self,
        item: &Arc<ReceiptItem>,
        person_name: &str,
        quantity: u32,
        share_percentage: f64,
    ) -> bool {
        let Some(person) = self.people.iter_mut().find(|p| p.is_named(person_name)) else {
            debug!(person = person_name, item = %item.name, "No such person, assignment skipped");
            return false;
        };
        person.assignments.push(AssignedItem::new(
            Arc::clone(item),
            quantity,
            share_percentage,
        ));
        debug!(
            person = %person.name,
            item = %item.name,
            quantity,
            share_percentage,
            "Item assigned"
        );
        true
    }

    /// Remove every assignment of receipt item `item_id` from the named person.
    pub fn unassign_item(&mut self, item_id: Uuid, person_name: &str) {
        if let Some(person) = self.people.iter_mut().find(|p| p.is_named(person_name)) {
            let before = person.assignments.len();
            person
                .assignments
                .retain(|assigned| assigned.receipt_item.id != item_id);
            debug!(
                person = %person.name,
                removed = before - person.assignments.len(),
                "Item unassigned"
            );
        }
    }

    /// Remove one specific assignment from the named person.
    pub fn remove_assignment(&mut self, assignment_id: Uuid, person_name: &str) {
        if let Some(person) = self.people.iter_mut().find(|p| p.is_named(person_name)) {
            person.assignments.retain(|assigned| assigned.id != assignment_id);
        }
    }

    /// Split one item evenly between the named people, adding them as needed.
    pub fn split_item(&mut self, item: &Arc<ReceiptItem>, names: &[&str]) {
        let names: Vec<&str> = names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            return;
        }
        let share = 1.0 / names.len() as f64;
        for name in names {
            let resolved = self.find_or_create_person(name).name.clone();
            self.assign_item(item, &resolved, 1, share);
        }
    }

    // -----------------------------------------------------------------
    // Pending selection
    // -----------------------------------------------------------------

    /// Mark a receipt item as awaiting a person. Unknown ids are ignored.
    pub fn select_item(&mut self, item_id: Uuid) {
        if self.receipt.as_ref().and_then(|r| r.item(item_id)).is_some() {
            self.selected_item = Some(item_id);
        }
    }

    pub fn selected_item(&self) -> Option<&Arc<ReceiptItem>> {
        let id = self.selected_item?;
        self.receipt.as_ref()?.item(id)
    }

    pub fn clear_selection(&mut self) {
        self.selected_item = None;
    }

    /// Give the selected item to the named person and clear the selection.
    pub fn assign_selected(&mut self, person_name: &str) {
        if person_name.trim().is_empty() {
            return;
        }
        let Some(item) = self.selected_item().cloned() else {
            return;
        };
        let resolved = self.find_or_create_person(person_name).name.clone();
        self.assign_item(&item, &resolved, 1, 1.0);
        self.selected_item = None;
    }

    // -----------------------------------------------------------------
    // Derived views
    // -----------------------------------------------------------------

    /// Receipt items nobody has been assigned, in receipt order.
    pub fn unassigned_items(&self) -> Vec<Arc<ReceiptItem>> {
        let Some(receipt) = &self.receipt else {
            return Vec::new();
        };
        receipt
            .items
            .iter()
            .filter(|item| !self.people.iter().any(|p| p.has_item(item.id)))
            .cloned()
            .collect()
    }

    /// True once every item is assigned and at least one person exists.
    pub fn is_complete(&self) -> bool {
        !self.people.is_empty() && self.unassigned_items().is_empty()
    }

    pub fn state(&self) -> SessionState {
        if self.receipt.is_none() {
            SessionState::AwaitingReceipt
        } else if self.is_complete() {
            SessionState::Complete
        } else {
            SessionState::AwaitingAssignment
        }
    }

    /// Sum of every person's final total; zero without a receipt.
    pub fn calculated_total(&self) -> f64 {
        self.receipt
            .as_ref()
            .map(|r| allocation::calculated_total(&self.people, r))
            .unwrap_or(0.0)
    }

    pub fn summary(&self, tolerance: f64) -> Option<SplitSummary> {
        self.receipt
            .as_ref()
            .map(|r| allocation::summarize(&self.people, r, tolerance))
    }
}
