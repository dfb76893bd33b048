//! Intent classification using regex patterns.
//!
//! Questions are matched against an ordered rule table; the first rule whose
//! pattern matches wins. No ML model required - pure Rust regex matching.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Coarse category of a question, used to pick a reply template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Reporting a dirty spot / asking what to do right now
    QuickAction,
    /// Asking why something happens or what its impact is
    ExplainWhy,
    /// Tourism and recommendations
    Travel,
    /// Anything else
    Default,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Intent {
    /// Returns a human-readable label for the intent
    pub fn label(&self) -> &'static str {
        match self {
            Intent::QuickAction => "quick_action",
            Intent::ExplainWhy => "explain_why",
            Intent::Travel => "travel",
            Intent::Default => "default",
        }
    }
}

/// Result of intent classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: Intent,
    /// The text that triggered the rule, if any
    pub matched: Option<String>,
}

/// One entry of the rule table.
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub intent: Intent,
    pub pattern: Regex,
}

impl IntentRule {
    pub fn new(intent: Intent, pattern: Regex) -> Self {
        Self { intent, pattern }
    }
}

// Priority order: quick action > explain why > travel.
// NOTE: expect() is fine here, the patterns are compile-time constants.
static DEFAULT_RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    vec![
        IntentRule::new(
            Intent::QuickAction,
            Regex::new(r"(?i)\b(lapor|melapor|report|titik|koordinat|lokasi|foto|kotor|numpuk|muara|rob)\b")
                .expect("Invalid regex: quick action keywords"),
        ),
        IntentRule::new(
            Intent::ExplainWhy,
            Regex::new(r"(?i)\b(kenapa|mengapa|alasan|dampak|bahaya|pengaruh|akibat)\b")
                .expect("Invalid regex: explain-why keywords"),
        ),
        IntentRule::new(
            Intent::Travel,
            Regex::new(r"(?i)\b(wisata|liburan|rekomendasi|jalan\s?jalan|spot|pantai\s+mana|destinasi)\b")
                .expect("Invalid regex: travel keywords"),
        ),
    ]
});

/// Intent classifier over an ordered rule table.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a classifier with the built-in rules
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES.clone(),
        }
    }

    /// Create a classifier with a custom rule table, checked in order.
    pub fn with_rules(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Classify a question; falls back to [`Intent::Default`].
    pub fn classify(&self, question: &str) -> IntentResult {
        self.rules
            .iter()
            .find_map(|rule| {
                rule.pattern.find(question).map(|m| IntentResult {
                    intent: rule.intent,
                    matched: Some(m.as_str().to_string()),
                })
            })
            .unwrap_or(IntentResult {
                intent: Intent::Default,
                matched: None,
            })
    }
}
