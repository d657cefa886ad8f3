//! Recommendation records, as proposed by the model and as rendered for display

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default title for a recommendation without one
pub const DEFAULT_TITLE: &str = "Recomendación";
/// Default session length in minutes
pub const DEFAULT_DURATION_MIN: i64 = 15;
/// Default manual reference
pub const DEFAULT_REF_UNIT: &str = "MINEDU";

/// A recommendation as proposed by the generation service
///
/// Nothing is guaranteed to be present. Fields of the wrong JSON type are
/// treated as absent when decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecommendationRaw {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materials: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub areas_minedu: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_unit: Option<String>,
}

impl RecommendationRaw {
    /// Synthetic record holding only a title and free text
    pub fn synthetic(title: &str, text: String) -> Self {
        Self {
            title: Some(title.to_string()),
            text: Some(text),
            ..Default::default()
        }
    }

    /// Decode one element of a model's `recs` list, field by field
    pub fn from_value(value: &Value) -> Self {
        Self {
            title: string_field(value, "title"),
            summary: string_field(value, "summary"),
            text: string_field(value, "text"),
            steps: list_field(value, "steps"),
            materials: list_field(value, "materials"),
            areas_minedu: list_field(value, "areas_minedu"),
            duration_min: value.get("duration_min").and_then(duration_minutes),
            ref_unit: string_field(value, "ref_unit"),
        }
    }
}

impl From<&RecommendationRendered> for RecommendationRaw {
    fn from(rendered: &RecommendationRendered) -> Self {
        Self {
            title: Some(rendered.title.clone()),
            text: Some(rendered.text.clone()),
            duration_min: Some(rendered.duration_min),
            ref_unit: Some(rendered.ref_unit.clone()),
            ..Default::default()
        }
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn list_field(value: &Value, key: &str) -> Option<Vec<String>> {
    value.get(key).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    })
}

/// Whole minutes from a JSON number; fractional values are truncated
fn duration_minutes(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

/// A recommendation ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRendered {
    pub title: String,
    /// Sectioned prose composed by the formatter
    pub text: String,
    pub duration_min: i64,
    pub ref_unit: String,
}

impl RecommendationRendered {
    /// Fixed record returned when no generation credential is configured
    pub fn generation_disabled() -> Self {
        Self {
            title: "IA desactivada".to_string(),
            text: "Configura tu OPENAI_API_KEY".to_string(),
            duration_min: DEFAULT_DURATION_MIN,
            ref_unit: DEFAULT_REF_UNIT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_full_record() {
        let value = json!({
            "title": "Círculo de diálogo",
            "areas_minedu": ["Personal Social"],
            "summary": "Fortalecer la expresión emocional.",
            "duration_min": 20,
            "steps": ["Saludo", "Ronda"],
            "materials": ["Pelota"],
            "ref_unit": "Unidad 2"
        });
        let rec = RecommendationRaw::from_value(&value);

        assert_eq!(rec.title.as_deref(), Some("Círculo de diálogo"));
        assert_eq!(rec.steps, Some(vec!["Saludo".to_string(), "Ronda".to_string()]));
        assert_eq!(rec.duration_min, Some(20));
        assert_eq!(rec.ref_unit.as_deref(), Some("Unidad 2"));
        assert!(rec.text.is_none());
    }

    #[test]
    fn test_from_value_ignores_wrong_types() {
        let value = json!({
            "title": 7,
            "steps": "not a list",
            "duration_min": "20",
            "materials": [1, "hojas"]
        });
        let rec = RecommendationRaw::from_value(&value);

        assert!(rec.title.is_none());
        assert!(rec.steps.is_none());
        assert!(rec.duration_min.is_none());
        assert_eq!(rec.materials, Some(vec!["1".to_string(), "hojas".to_string()]));
    }

    #[test]
    fn test_from_value_non_object() {
        assert_eq!(RecommendationRaw::from_value(&json!("texto")), RecommendationRaw::default());
    }

    #[test]
    fn test_fractional_duration_truncates() {
        let rec = RecommendationRaw::from_value(&json!({"duration_min": 25.7}));
        assert_eq!(rec.duration_min, Some(25));
    }
}
