//! Action File
//!
//! The driver reads a JSON list of actions to run, each with a thread count
//! and free-form keyword arguments handed to the action's `set_up`:
//!
//! ```json
//! [
//!   {"action": "share_create_delete", "threads": 4, "kwargs": {}},
//!   {"action": "share_access_rules_create_delete", "threads": 1,
//!    "kwargs": {"access_to": "10.0.0.0/24"}}
//! ]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{StressError, StressResult};

fn default_threads() -> usize {
    1
}

/// One entry of the action file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Action name (see `ActionKind`)
    pub action: String,
    /// Number of concurrent runners for this action
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Keyword arguments passed through to `set_up`
    #[serde(default)]
    pub kwargs: ActionParams,
}

impl ActionSpec {
    pub fn new<S: Into<String>>(action: S) -> Self {
        Self {
            action: action.into(),
            threads: default_threads(),
            kwargs: ActionParams::default(),
        }
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn kwargs(mut self, kwargs: ActionParams) -> Self {
        self.kwargs = kwargs;
        self
    }
}

/// Free-form action keyword arguments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionParams(Map<String, Value>);

impl ActionParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// String parameter; `null` and absence both read as `None`
    pub fn get_str(&self, key: &str) -> StressResult<Option<&str>> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(StressError::InvalidParams {
                key: key.to_string(),
                message: format!("expected a string, got {other}"),
            }),
        }
    }

    /// Object parameter whose values are all strings
    pub fn get_string_map(&self, key: &str) -> StressResult<Option<HashMap<String, String>>> {
        let object = match self.0.get(key) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Object(object)) => object,
            Some(other) => {
                return Err(StressError::InvalidParams {
                    key: key.to_string(),
                    message: format!("expected an object, got {other}"),
                });
            }
        };

        object
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => Ok((k.clone(), s.clone())),
                other => Err(StressError::InvalidParams {
                    key: format!("{key}.{k}"),
                    message: format!("expected a string, got {other}"),
                }),
            })
            .collect::<StressResult<HashMap<_, _>>>()
            .map(Some)
    }
}

/// Parse action specs from JSON text
///
/// Accepts either a list of actions or a single action object.
pub fn parse_action_specs(json: &str) -> StressResult<Vec<ActionSpec>> {
    let value: Value = serde_json::from_str(json)?;
    let specs: Vec<ActionSpec> = match value {
        Value::Array(_) => serde_json::from_value(value)?,
        other => vec![serde_json::from_value(other)?],
    };

    if specs.is_empty() {
        return Err(StressError::config("actions", "action file lists no actions"));
    }
    if let Some(spec) = specs.iter().find(|spec| spec.threads == 0) {
        return Err(StressError::config(
            "threads",
            format!("action '{}' must run at least one thread", spec.action),
        ));
    }

    Ok(specs)
}

/// Load action specs from a JSON file
pub fn load_action_file(path: &Path) -> StressResult<Vec<ActionSpec>> {
    let json = std::fs::read_to_string(path)?;
    parse_action_specs(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_parse_list_with_defaults() {
        let specs = parse_action_specs(
            r#"[
                {"action": "share_create_delete", "threads": 3},
                {"action": "snapshot_create_delete"}
            ]"#,
        )
        .unwrap();

        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].threads, 3);
        assert_eq!(specs[1].threads, 1);
        assert!(specs[1].kwargs.is_empty());
    }

    #[test]
    fn test_parse_single_object_and_unknown_fields() {
        let raw = r#"{
            "action": "share_create_delete",
            "use_admin": true,
            "kwargs": {"driver": "generic"}
        }"#;
        let specs = parse_action_specs(raw).unwrap();

        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].kwargs.get_str("driver").unwrap(), Some("generic"));
    }

    #[test]
    fn test_parse_rejects_empty_and_zero_threads() {
        assert!(matches!(
            parse_action_specs("[]"),
            Err(StressError::Config { .. })
        ));
        assert!(matches!(
            parse_action_specs(r#"[{"action": "share_create_delete", "threads": 0}]"#),
            Err(StressError::Config { .. })
        ));
        assert!(matches!(parse_action_specs("not json"), Err(StressError::Json(_))));
    }

    #[test]
    fn test_params_accessors() {
        let params = ActionParams::new()
            .with("access_to", "10.0.0.1")
            .with("volume_type_id", Value::Null)
            .with("threads", 4)
            .with("extra_specs", json!({"share_backend_name": "backend1"}));

        assert_eq!(params.get_str("access_to").unwrap(), Some("10.0.0.1"));
        assert_eq!(params.get_str("volume_type_id").unwrap(), None);
        assert_eq!(params.get_str("missing").unwrap(), None);
        assert!(params.get_str("threads").is_err());

        let specs = params.get_string_map("extra_specs").unwrap().unwrap();
        assert_eq!(specs.get("share_backend_name").map(String::as_str), Some("backend1"));
        assert!(params.get_string_map("access_to").is_err());
    }

    #[test]
    fn test_string_map_rejects_non_string_values() {
        let params = ActionParams::new().with("extra_specs", json!({"snapshot_support": true}));
        let err = params.get_string_map("extra_specs").unwrap_err();
        assert!(matches!(
            err,
            StressError::InvalidParams { ref key, .. } if key == "extra_specs.snapshot_support"
        ));
    }

    #[test]
    fn test_load_action_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"action": "share_create_delete", "threads": 2}}]"#).unwrap();

        let specs = load_action_file(file.path()).unwrap();
        assert_eq!(specs, vec![ActionSpec::new("share_create_delete").threads(2)]);
    }
}
