//! Categorical label encoding
//!
//! Maps a label to its 0-based position in the sorted, deduplicated label
//! set fixed at training time. Labels outside that set encode to
//! [`UNKNOWN_CATEGORY`] so that an unseen brand or fuel type degrades to an
//! out-of-distribution code instead of failing the request.

use serde::{Deserialize, Serialize};

/// Code for a label that was not seen at training time. Never a valid index.
pub const UNKNOWN_CATEGORY: i64 = -1;

/// Immutable label → code mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEncoder")]
pub struct CategoricalEncoder {
    classes: Vec<String>,
}

#[derive(Deserialize)]
struct RawEncoder {
    classes: Option<Vec<String>>,
}

impl TryFrom<RawEncoder> for CategoricalEncoder {
    type Error = String;

    fn try_from(raw: RawEncoder) -> Result<Self, Self::Error> {
        let classes = raw.classes.ok_or_else(|| "has no class list".to_string())?;
        Self::from_classes(classes)
    }
}

impl CategoricalEncoder {
    /// Build an encoder from observed labels (duplicates allowed, any order)
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = labels.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Rebuild an encoder from a persisted class list.
    ///
    /// The list is the encoding contract, so it must already be non-empty,
    /// sorted and free of duplicates.
    pub fn from_classes(classes: Vec<String>) -> Result<Self, String> {
        if classes.is_empty() {
            return Err("has an empty class list".to_string());
        }
        if let Some(pair) = classes.windows(2).find(|w| w[0] >= w[1]) {
            return Err(format!(
                "class list is not strictly ascending ('{}' before '{}')",
                pair[0], pair[1]
            ));
        }
        Ok(Self { classes })
    }

    /// Known labels in encoding order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index_of(label).is_some()
    }

    /// Encode a label, returning [`UNKNOWN_CATEGORY`] for unseen labels
    pub fn encode(&self, label: &str) -> i64 {
        self.index_of(label)
            .map(|idx| idx as i64)
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(label))
            .ok()
    }
}
