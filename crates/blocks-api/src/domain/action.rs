//! # Mark Actions
//!
//! Classification of the free-text `action` field of a mark request.
//!
//! Matching is exact: no trimming, no case folding. A near miss such as
//! `"deletion"` or `"DELETE"` is [`ActionKind::Unknown`].

use serde::Deserialize;

/// Kind of mark requested for a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Write a deletion marker.
    Deletion,
    /// Write a no-compaction marker.
    NoCompaction,
    /// Anything else, including the empty string.
    Unknown,
}

impl ActionKind {
    /// Wire text for [`ActionKind::Deletion`].
    pub const DELETION: &'static str = "DELETION";
    /// Wire text for [`ActionKind::NoCompaction`].
    pub const NO_COMPACTION: &'static str = "NO_COMPACTION";

    /// Classify free text. Total: never fails.
    pub fn classify(text: &str) -> Self {
        match text {
            Self::DELETION => ActionKind::Deletion,
            Self::NO_COMPACTION => ActionKind::NoCompaction,
            _ => ActionKind::Unknown,
        }
    }

    /// Wire text of a recognized kind.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            ActionKind::Deletion => Some(Self::DELETION),
            ActionKind::NoCompaction => Some(Self::NO_COMPACTION),
            ActionKind::Unknown => None,
        }
    }
}

impl From<&str> for ActionKind {
    fn from(text: &str) -> Self {
        Self::classify(text)
    }
}

/// A mark request as submitted by the viewer form.
///
/// Missing fields decode as empty strings; emptiness is reported by the
/// dispatcher, not by the decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MarkRequest {
    /// Block ULID text.
    #[serde(default)]
    pub id: String,
    /// `DELETION`, `NO_COMPACTION` or anything else.
    #[serde(default)]
    pub action: String,
    /// Free-text reason stored in the marker.
    #[serde(default)]
    pub detail: String,
}

impl MarkRequest {
    pub fn new(id: impl Into<String>, action: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            action: action.into(),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_recognized_actions() {
        assert_eq!(ActionKind::classify("DELETION"), ActionKind::Deletion);
        assert_eq!(ActionKind::classify("NO_COMPACTION"), ActionKind::NoCompaction);
    }

    #[test]
    fn test_near_misses_are_unknown() {
        for text in [
            "",
            "DELETE",
            "deletion",
            "Deletion",
            " DELETION",
            "DELETION ",
            "NO-COMPACTION",
            "no_compaction",
            "NOCOMPACTION",
        ] {
            assert_eq!(ActionKind::classify(text), ActionKind::Unknown, "{text:?}");
        }
    }

    #[test]
    fn test_as_str_round_trips_recognized_kinds() {
        for kind in [ActionKind::Deletion, ActionKind::NoCompaction] {
            assert_eq!(ActionKind::from(kind.as_str().unwrap()), kind);
        }
        assert_eq!(ActionKind::Unknown.as_str(), None);
    }

    #[test]
    fn test_mark_request_missing_fields_decode_empty() {
        let request: MarkRequest = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert_eq!(request.id, "x");
        assert!(request.action.is_empty());
        assert!(request.detail.is_empty());
    }

    proptest! {
        #[test]
        fn prop_everything_else_is_unknown(text in ".*") {
            prop_assume!(text != "DELETION" && text != "NO_COMPACTION");
            prop_assert_eq!(ActionKind::classify(&text), ActionKind::Unknown);
        }

        #[test]
        fn prop_case_variants_are_unknown(text in "[dD][eE][lL][eE][tT][iI][oO][nN]") {
            prop_assume!(text != "DELETION");
            prop_assert_eq!(ActionKind::classify(&text), ActionKind::Unknown);
        }
    }
}
