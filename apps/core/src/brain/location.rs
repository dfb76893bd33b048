//! Beach name detection.
//!
//! An ordered table of (substring, display name) pairs; the first key found in
//! the lowercased question wins, so longer or more specific keys must come
//! before keys they contain.

/// Known local places, checked in order.
pub const KNOWN_PLACES: &[(&str, &str)] = &[
    ("pai", "Pantai Alam Indah (PAI)"),
    ("alam indah", "Pantai Alam Indah (PAI)"),
    ("muarareja", "Pantai Muarareja"),
    ("dampyak", "Pantai Dampyak"),
    ("purwahamba", "Pantai Purwahamba Indah"),
    ("randusanga", "Pantai Randusanga"),
    ("pulau kodok", "Pulau Kodok"),
    ("komodo", "Pantai Komodo"),
    ("batam sari", "Pantai Batam Sari"),
];

/// Keyword that marks a question as being about the region in general.
pub const REGIONAL_KEYWORD: &str = "tegal";
/// Label used when only the regional keyword is present.
pub const REGIONAL_LABEL: &str = "pantai sekitar Tegal";

/// Resolves place names mentioned in a question.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    places: Vec<(String, String)>,
    regional_keyword: String,
    regional_label: String,
}

impl Default for LocationResolver {
    fn default() -> Self {
        Self::new(
            KNOWN_PLACES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl LocationResolver {
    /// Creates a resolver over `places`; keys are matched case-insensitively.
    pub fn new(places: Vec<(String, String)>) -> Self {
        Self {
            places: places
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
            regional_keyword: REGIONAL_KEYWORD.to_string(),
            regional_label: REGIONAL_LABEL.to_string(),
        }
    }

    /// Returns the display name of the first known place in `question`.
    pub fn resolve(&self, question: &str) -> Option<String> {
        let q = question.to_lowercase();
        self.places
            .iter()
            .find(|(key, _)| q.contains(key.as_str()))
            .map(|(_, name)| name.clone())
            .or_else(|| {
                q.contains(self.regional_keyword.as_str())
                    .then(|| self.regional_label.clone())
            })
    }

    /// Whether `location` is the generic regional label rather than a place.
    pub fn is_regional(&self, location: &str) -> bool {
        location == self.regional_label
    }
}
