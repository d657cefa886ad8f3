//! Core data types for the AulaSense service
//!
//! Classrooms, teachers and stored survey submissions. Recommendation and
//! statistics types live next to the code that produces them in `insights`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a classroom (aula)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassroomId(pub i64);

impl ClassroomId {
    /// Interpret a loosely typed request value as a classroom id.
    ///
    /// Accepts JSON numbers and numeric strings. Zero, negative, empty and
    /// non-numeric values count as missing.
    pub fn from_json(value: &Value) -> Option<Self> {
        let id = match value {
            Value::Number(n) => n.as_i64()?,
            Value::String(s) => s.trim().parse::<i64>().ok()?,
            _ => return None,
        };
        (id > 0).then_some(Self(id))
    }
}

impl std::fmt::Display for ClassroomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ClassroomId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

/// A classroom as listed to the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    pub id: ClassroomId,
    pub nombre: String,
}

/// An authenticated teacher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i64,
    pub username: String,
    /// Classroom the teacher is responsible for
    #[serde(rename = "aulaId")]
    pub aula_id: Option<ClassroomId>,
}

/// A stored survey submission
///
/// `data` is `None` when the stored payload no longer decodes as JSON; the
/// listing endpoints report it as `null` rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSubmission {
    pub id: i64,
    pub aula_id: ClassroomId,
    pub created_at: DateTime<Utc>,
    pub data: Option<Value>,
}

impl StoredSubmission {
    /// Payload usable for aggregation: decoded and not [blank](is_blank_payload)
    pub fn usable_payload(&self) -> Option<&Value> {
        self.data.as_ref().filter(|v| !is_blank_payload(v))
    }
}

/// True for payloads that carry nothing: `null`, `false`, zero and `""`
///
/// Such values are rejected on submission and skipped during aggregation.
pub fn is_blank_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classroom_id_from_json() {
        assert_eq!(ClassroomId::from_json(&json!(3)), Some(ClassroomId(3)));
        assert_eq!(ClassroomId::from_json(&json!("4")), Some(ClassroomId(4)));
        assert_eq!(ClassroomId::from_json(&json!(" 5 ")), Some(ClassroomId(5)));
        assert_eq!(ClassroomId::from_json(&json!(0)), None);
        assert_eq!(ClassroomId::from_json(&json!("")), None);
        assert_eq!(ClassroomId::from_json(&json!("abc")), None);
        assert_eq!(ClassroomId::from_json(&json!(null)), None);
        assert_eq!(ClassroomId::from_json(&json!(2.5)), None);
    }

    #[test]
    fn test_teacher_serializes_camel_case_classroom() {
        let teacher = Teacher {
            id: 1,
            username: "profesor1".to_string(),
            aula_id: Some(ClassroomId(1)),
        };
        let value = serde_json::to_value(&teacher).unwrap();
        assert_eq!(value, json!({"id": 1, "username": "profesor1", "aulaId": 1}));
    }

    #[test]
    fn test_usable_payload_skips_null() {
        let mut submission = StoredSubmission {
            id: 1,
            aula_id: ClassroomId(1),
            created_at: Utc::now(),
            data: Some(Value::Null),
        };
        assert!(submission.usable_payload().is_none());

        submission.data = Some(json!({"p1": "si"}));
        assert!(submission.usable_payload().is_some());

        submission.data = None;
        assert!(submission.usable_payload().is_none());

        for blank in [json!(""), json!(0), json!(0.0), json!(false)] {
            submission.data = Some(blank);
            assert!(submission.usable_payload().is_none());
        }
    }

    #[test]
    fn test_blank_payloads() {
        for blank in [json!(null), json!(false), json!(0), json!(""), json!(-0.0)] {
            assert!(is_blank_payload(&blank), "{} should be blank", blank);
        }
        for present in [json!(true), json!(1), json!(" "), json!([]), json!({}), json!("0")] {
            assert!(!is_blank_payload(&present), "{} should be present", present);
        }
    }
}
