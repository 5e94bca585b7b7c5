//! Blocks API configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flag that switches off every mark operation when set to `"true"`.
pub const DISABLE_ADMIN_OPERATIONS_FLAG: &str = "disable-admin-operations";

/// Configuration of the blocks API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlocksApiConfig {
    /// Display label of the global and loaded views.
    pub label: String,
    /// Refuse every mark request.
    pub disable_admin_operations: bool,
    /// Do not attach CORS headers.
    pub disable_cors: bool,
    /// Flags the process was started with, served by the flags endpoint.
    pub flags: BTreeMap<String, String>,
}

impl BlocksApiConfig {
    /// Build from the process flag map.
    ///
    /// Admin operations are disabled only by the literal value `"true"`.
    pub fn from_flags(
        label: impl Into<String>,
        disable_cors: bool,
        flags: BTreeMap<String, String>,
    ) -> Self {
        let disable_admin_operations = flags
            .get(DISABLE_ADMIN_OPERATIONS_FLAG)
            .is_some_and(|value| value == "true");

        Self {
            label: label.into(),
            disable_admin_operations,
            disable_cors,
            flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(value: &str) -> BTreeMap<String, String> {
        BTreeMap::from([(DISABLE_ADMIN_OPERATIONS_FLAG.to_string(), value.to_string())])
    }

    #[test]
    fn test_default_allows_admin_operations() {
        let config = BlocksApiConfig::default();
        assert!(!config.disable_admin_operations);
        assert!(!config.disable_cors);
    }

    #[test]
    fn test_only_literal_true_disables() {
        assert!(BlocksApiConfig::from_flags("l", false, flags("true")).disable_admin_operations);
        for value in ["false", "TRUE", "1", "yes", " true", ""] {
            let config = BlocksApiConfig::from_flags("l", false, flags(value));
            assert!(!config.disable_admin_operations, "{value:?}");
        }
    }

    #[test]
    fn test_missing_flag_enables() {
        let config = BlocksApiConfig::from_flags("bucket", true, BTreeMap::new());
        assert!(!config.disable_admin_operations);
        assert!(config.disable_cors);
        assert_eq!(config.label, "bucket");
    }

    #[test]
    fn test_flags_are_kept() {
        let config = BlocksApiConfig::from_flags("l", false, flags("true"));
        assert_eq!(config.flags[DISABLE_ADMIN_OPERATIONS_FLAG], "true");
    }

    #[test]
    fn test_deserialize_partial() {
        let config: BlocksApiConfig = serde_json::from_str(r#"{"label": "eu-1"}"#).unwrap();
        assert_eq!(config.label, "eu-1");
        assert!(!config.disable_admin_operations);
    }
}
