//! Utterance parsing: people and item references in free text.
//!
//! Tokens are whitespace-separated and keep their punctuation. A token is a
//! candidate name when it is longer than one character and starts with an
//! uppercase letter. Item matching is substring-based and deliberately loose.

/// Whether a token looks like a person's name.
pub fn is_name_candidate(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.is_uppercase() && chars.next().is_some(),
        None => false,
    }
}

/// Lower-cased words of an item name.
fn item_words(item_name_lower: &str) -> impl Iterator<Item = &str> {
    item_name_lower.split_whitespace()
}

// =============================================================================
// Utterance
// =============================================================================

/// One tokenized user utterance.
#[derive(Debug, Clone)]
pub struct Utterance<'a> {
    tokens: Vec<&'a str>,
    lower: String,
}

impl<'a> Utterance<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            tokens: input.split_whitespace().collect(),
            lower: input.to_lowercase(),
        }
    }

    pub fn tokens(&self) -> &[&'a str] {
        &self.tokens
    }

    /// Candidate names in utterance order, duplicates included.
    pub fn names(&self) -> Vec<&'a str> {
        self.tokens
            .iter()
            .copied()
            .filter(|t| is_name_candidate(t))
            .collect()
    }

    /// The last candidate name in the utterance.
    pub fn last_name(&self) -> Option<&'a str> {
        self.tokens.iter().rev().copied().find(|t| is_name_candidate(t))
    }

    /// Whether the utterance refers to an item.
    ///
    /// True if the whole lower-cased item name occurs anywhere in the
    /// utterance, or if any single word of it does.
    pub fn mentions_item(&self, item_name: &str) -> bool {
        let item_lower = item_name.to_lowercase();
        if item_lower.trim().is_empty() {
            return false;
        }
        self.lower.contains(&item_lower)
            || item_words(&item_lower).any(|word| self.lower.contains(word))
    }

    /// The nearest candidate name preceding a token that names the item.
    ///
    /// Item tokens are tried left to right; the first one with a name before
    /// it wins.
    pub fn name_before_item(&self, item_name: &str) -> Option<&'a str> {
        let item_lower = item_name.to_lowercase();
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| {
                let token_lower = token.to_lowercase();
                token_lower == item_lower || item_words(&item_lower).any(|w| w == token_lower)
            })
            .find_map(|(index, _)| {
                self.tokens[..index]
                    .iter()
                    .rev()
                    .copied()
                    .find(|t| is_name_candidate(t))
            })
    }
}

// =============================================================================
// Assignee resolution
// =============================================================================

/// Where an item's assignee was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneeSource {
    /// A name appears before the item in the utterance.
    PrecedingName,
    /// Fallback: the last name anywhere in the utterance.
    LastMentioned,
}

/// Matchers tried in order; the first hit decides the assignee.
pub const ASSIGNEE_PIPELINE: [AssigneeSource; 2] =
    [AssigneeSource::PrecedingName, AssigneeSource::LastMentioned];

impl AssigneeSource {
    pub fn resolve<'a>(&self, utterance: &Utterance<'a>, item_name: &str) -> Option<&'a str> {
        match self {
            AssigneeSource::PrecedingName => utterance.name_before_item(item_name),
            AssigneeSource::LastMentioned => utterance.last_name(),
        }
    }
}

/// Resolve who an item mentioned in the utterance belongs to.
pub fn resolve_assignee<'a>(
    utterance: &Utterance<'a>,
    item_name: &str,
) -> Option<(&'a str, AssigneeSource)> {
    ASSIGNEE_PIPELINE
        .iter()
        .find_map(|source| source.resolve(utterance, item_name).map(|name| (name, *source)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Name candidates ----

    #[test]
    fn test_name_candidate_capitalized() {
        assert!(is_name_candidate("Julia"));
        assert!(is_name_candidate("Él"));
    }

    #[test]
    fn test_name_candidate_rejects_short_and_lower() {
        assert!(!is_name_candidate("I"));
        assert!(!is_name_candidate("julia"));
        assert!(!is_name_candidate(""));
        assert!(!is_name_candidate("42"));
    }

    #[test]
    fn test_name_candidate_keeps_punctuation() {
        assert!(is_name_candidate("Julia,"));
        assert!(!is_name_candidate(",Julia"));
    }

    // ---- Tokenizing ----

    #[test]
    fn test_tokens_split_on_whitespace_and_newlines() {
        let u = Utterance::new("Julia got\nthe   burger");
        assert_eq!(u.tokens(), &["Julia", "got", "the", "burger"]);
    }

    #[test]
    fn test_names_in_order() {
        let u = Utterance::new("Julia and Peter and Julia");
        assert_eq!(u.names(), vec!["Julia", "Peter", "Julia"]);
        assert_eq!(u.last_name(), Some("Julia"));
    }

    #[test]
    fn test_no_names() {
        let u = Utterance::new("we all split it");
        assert!(u.names().is_empty());
        assert_eq!(u.last_name(), None);
    }

    // ---- Item mentions ----

    #[test]
    fn test_mentions_item_whole_name() {
        let u = Utterance::new("Julia got the Caesar Salad");
        assert!(u.mentions_item("caesar salad"));
    }

    #[test]
    fn test_mentions_item_single_word() {
        let u = Utterance::new("Peter had the salad");
        assert!(u.mentions_item("Caesar Salad"));
    }

    #[test]
    fn test_mentions_item_substring_overmatches() {
        let u = Utterance::new("Peter had cokes");
        assert!(u.mentions_item("Coke"));
        let u = Utterance::new("what a day");
        assert!(u.mentions_item("A"));
    }

    #[test]
    fn test_mentions_item_no_match() {
        let u = Utterance::new("Julia got the burger");
        assert!(!u.mentions_item("Fries"));
    }

    #[test]
    fn test_blank_item_name_never_matches() {
        let u = Utterance::new("anything");
        assert!(!u.mentions_item("  "));
    }

    // ---- Preceding names ----

    #[test]
    fn test_name_before_item() {
        let u = Utterance::new("Julia got the burger and Peter got the fries");
        assert_eq!(u.name_before_item("Burger"), Some("Julia"));
        assert_eq!(u.name_before_item("Fries"), Some("Peter"));
    }

    #[test]
    fn test_name_before_item_multi_word() {
        let u = Utterance::new("Peter wants the salad");
        assert_eq!(u.name_before_item("Caesar Salad"), Some("Peter"));
    }

    #[test]
    fn test_name_before_item_requires_exact_token() {
        let u = Utterance::new("Julia got the burger.");
        assert_eq!(u.name_before_item("Burger"), None);
    }

    #[test]
    fn test_name_after_item_not_preceding() {
        let u = Utterance::new("the burger was for Julia");
        assert_eq!(u.name_before_item("Burger"), None);
    }

    #[test]
    fn test_later_item_token_used_when_first_has_no_name() {
        let u = Utterance::new("burger first, then Peter got another burger");
        assert_eq!(u.name_before_item("Burger"), Some("Peter"));
    }

    // ---- Pipeline ----

    #[test]
    fn test_resolve_prefers_preceding_name() {
        let u = Utterance::new("Julia got the burger for Peter");
        assert_eq!(
            resolve_assignee(&u, "Burger"),
            Some(("Julia", AssigneeSource::PrecedingName))
        );
    }

    #[test]
    fn test_resolve_falls_back_to_last_name() {
        let u = Utterance::new("the nachos went to Julia and Peter");
        assert_eq!(
            resolve_assignee(&u, "Nachos"),
            Some(("Peter", AssigneeSource::LastMentioned))
        );
    }

    #[test]
    fn test_resolve_none_without_names() {
        let u = Utterance::new("we all split the nachos");
        assert_eq!(resolve_assignee(&u, "Nachos"), None);
    }
}
