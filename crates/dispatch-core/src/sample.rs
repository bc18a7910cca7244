//! The unit of work handed to a task.

use crate::ids::SampleId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One unit of input data to be processed by a task.
///
/// Immutable once created. When the id is absent in the incoming JSON a fresh
/// one is generated for that request; the `serde(default = ...)` call runs per
/// deserialization, so two samples never share a generated id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSample {
    /// Unique sample identifier; doubles as the execution id.
    #[serde(default = "SampleId::generate")]
    pub id: SampleId,

    /// Opaque payload: string keys to arbitrary JSON values.
    pub data: Map<String, Value>,
}

impl TaskSample {
    /// Create a new TaskSample with a generated id.
    pub fn new(data: Map<String, Value>) -> Self {
        Self {
            id: SampleId::generate(),
            data,
        }
    }

    /// Builder method to set a specific id.
    pub fn with_id(mut self, id: SampleId) -> Self {
        self.id = id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_omitted_id_is_generated_per_sample() {
        let raw = r#"{"data": {"x": 1}}"#;
        let a: TaskSample = serde_json::from_str(raw).unwrap();
        let b: TaskSample = serde_json::from_str(raw).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_explicit_id_is_kept() {
        let raw = r#"{"id": "s1", "data": {"x": 1}}"#;
        let sample: TaskSample = serde_json::from_str(raw).unwrap();
        assert_eq!(sample.id, SampleId::new("s1"));
        assert_eq!(sample.data.get("x"), Some(&json!(1)));
    }
}
