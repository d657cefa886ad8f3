//! Classroom statistics extraction
//!
//! Reduces loosely structured survey payloads into per-category frequency
//! counts. Payloads come in three shapes (a bare answers array, an object
//! with an `answers` array, or a flat question→answer object); anything else
//! contributes nothing.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Fixed aggregation categories, serialized with the dashboard's keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    #[serde(rename = "emocion")]
    Emotion,
    #[serde(rename = "motivacion")]
    Motivation,
    #[serde(rename = "atencion")]
    Attention,
    #[serde(rename = "energia")]
    Energy,
    #[serde(rename = "ambiente")]
    Environment,
    #[serde(rename = "acompanamiento")]
    Companionship,
    #[serde(rename = "tema")]
    Topic,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Emotion,
        Category::Motivation,
        Category::Attention,
        Category::Energy,
        Category::Environment,
        Category::Companionship,
        Category::Topic,
    ];
}

/// Classification rules, evaluated top to bottom; the first rule with a
/// fragment contained in the lowercased question id wins.
const RULES: &[(&[&str], Category)] = &[
    (&["emoc"], Category::Emotion),
    (&["motiv"], Category::Motivation),
    (&["aten", "clase"], Category::Attention),
    (&["energ"], Category::Energy),
    (&["ambi"], Category::Environment),
    (&["acom", "amig"], Category::Companionship),
    (&["tema"], Category::Topic),
];

/// Classify a lowercased question id, `None` when no rule matches
pub fn classify(qid: &str) -> Option<Category> {
    RULES
        .iter()
        .find(|(fragments, _)| fragments.iter().any(|f| qid.contains(f)))
        .map(|(_, category)| *category)
}

/// One question/answer pair taken from a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub qid: String,
    pub value: String,
}

/// Per-category value counts; always holds all seven categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatsBucket(BTreeMap<Category, BTreeMap<String, u64>>);

impl Default for StatsBucket {
    fn default() -> Self {
        Self(Category::ALL.iter().map(|c| (*c, BTreeMap::new())).collect())
    }
}

impl StatsBucket {
    /// Count one more occurrence of `value` under `category`
    pub fn record(&mut self, category: Category, value: &str) {
        *self
            .0
            .entry(category)
            .or_default()
            .entry(value.to_string())
            .or_insert(0) += 1;
    }

    /// Counts observed for a category
    pub fn counts(&self, category: Category) -> &BTreeMap<String, u64> {
        // Every category is inserted on construction and never removed
        &self.0[&category]
    }

    /// Count for a single value, zero when never observed
    pub fn count(&self, category: Category, value: &str) -> u64 {
        self.counts(category).get(value).copied().unwrap_or(0)
    }

    /// Sum of every count in every category
    pub fn total_count(&self) -> u64 {
        self.0.values().flat_map(|m| m.values()).sum()
    }
}

/// Aggregated statistics for one classroom
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ClassroomStats {
    /// Number of submissions considered
    pub total: usize,
    #[serde(flatten)]
    pub buckets: StatsBucket,
}

/// Render a JSON value as answer text
///
/// Strings pass through unchanged. Numbers drop a redundant fractional part
/// (`1.0` is "1"). Arrays join their elements' text with "," and `null`
/// elements become empty. Objects collapse to "[object Object]" so that
/// structured answers in one category share a single count.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => OBJECT_TEXT.to_string(),
        other => other.to_string(),
    }
}

const OBJECT_TEXT: &str = "[object Object]";

fn number_text(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    // f64 Display already prints whole floats without ".0"
    n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string())
}

/// Text of an `answers` entry field; anything but a string is empty
fn field_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

fn answer_from_entry(entry: &Value) -> Answer {
    Answer {
        qid: field_text(entry.get("qid")),
        value: field_text(entry.get("value")),
    }
}

/// Derive the answers carried by one payload
///
/// Precedence: a bare array, then an `answers` array, then one pair per key
/// of a flat object. Scalars yield nothing.
pub fn derive_answers(payload: &Value) -> Vec<Answer> {
    if let Value::Array(entries) = payload {
        return entries.iter().map(answer_from_entry).collect();
    }

    if let Some(Value::Array(entries)) = payload.get("answers") {
        return entries.iter().map(answer_from_entry).collect();
    }

    match payload {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| Answer {
                qid: key.clone(),
                value: value_text(value),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Reduce a set of decoded payloads into classroom statistics
pub fn extract_stats<'a, I>(payloads: I) -> ClassroomStats
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut stats = ClassroomStats::default();

    for payload in payloads {
        stats.total += 1;

        for answer in derive_answers(payload) {
            let qid = answer.qid.to_lowercase();
            if let Some(category) = classify(&qid) {
                stats.buckets.record(category, answer.value.trim());
            }
        }
    }

    debug!(
        "Extracted stats from {} submissions ({} classified answers)",
        stats.total,
        stats.buckets.total_count()
    );

    stats
}
