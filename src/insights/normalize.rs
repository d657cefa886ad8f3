//! Recovery of recommendation records from free-form model output
//!
//! The model is asked for pure JSON but regularly wraps it in code fences,
//! prefixes prose, or returns something else entirely. Output is run through
//! an ordered list of strategies and the first one that yields records wins.
//! The last strategy always succeeds, so normalization never fails.

use super::recommendation::RecommendationRaw;
use crate::utils::string::{strip_chars, truncate_at_char_boundary};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

/// Title of the record built from JSON that parsed but had no usable `recs`
pub const FALLBACK_TITLE: &str = "Recomendación IA (fallback)";
/// Title of the record built from output that is not JSON at all
pub const NON_STANDARD_TITLE: &str = "Recomendación IA (formato no estándar)";
/// Longest free text kept from non-JSON output
pub const MAX_FALLBACK_CHARS: usize = 400;

static FENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```json|```").expect("valid fence regex"));
static RECS_LABEL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)recs:").expect("valid label regex"));

/// Which strategy produced the records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// JSON object found from the first `{`
    Direct,
    /// Valid JSON with `recs` once code fences were removed
    Cleaned,
    /// Valid JSON without a usable `recs` list
    CleanedFallback,
    /// Output that does not parse as JSON
    LastResort,
}

/// Records recovered from one model response
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub tier: Tier,
    pub recs: Vec<RecommendationRaw>,
}

type Strategy = fn(&str) -> Option<Vec<RecommendationRaw>>;

const STRATEGIES: &[(Tier, Strategy)] = &[
    (Tier::Direct, direct),
    (Tier::Cleaned, cleaned),
    (Tier::CleanedFallback, cleaned_fallback),
    (Tier::LastResort, last_resort),
];

/// Turn raw model output into at least one recommendation record
pub fn normalize(raw: &str) -> Normalized {
    for (tier, strategy) in STRATEGIES {
        if let Some(recs) = strategy(raw) {
            match tier {
                Tier::Direct | Tier::Cleaned => {
                    debug!("Parsed {} recommendations ({:?})", recs.len(), tier)
                }
                _ => warn!("Model output not in expected shape, using {:?} record", tier),
            }
            return Normalized { tier: *tier, recs };
        }
    }

    // last_resort never declines
    Normalized {
        tier: Tier::LastResort,
        recs: vec![RecommendationRaw::synthetic(NON_STANDARD_TITLE, String::new())],
    }
}

/// Non-empty `recs` list of a parsed document
fn recs_list(doc: &Value) -> Option<Vec<RecommendationRaw>> {
    let items = doc.get("recs")?.as_array()?;
    if items.is_empty() {
        return None;
    }
    Some(items.iter().map(RecommendationRaw::from_value).collect())
}

fn direct(raw: &str) -> Option<Vec<RecommendationRaw>> {
    let start = raw.find('{')?;
    let doc: Value = serde_json::from_str(&raw[start..]).ok()?;
    recs_list(&doc)
}

/// Output with code fence markers removed and whitespace trimmed
fn strip_fences(raw: &str) -> String {
    FENCE_PATTERN.replace_all(raw, "").trim().to_string()
}

/// Fence-free output without braces, quotes or the `recs:` label
fn plain_text(cleaned: &str) -> String {
    let unbraced = strip_chars(cleaned, &['{', '}', '"']);
    RECS_LABEL_PATTERN
        .replace_all(&unbraced, "")
        .trim()
        .to_string()
}

fn cleaned(raw: &str) -> Option<Vec<RecommendationRaw>> {
    let doc: Value = serde_json::from_str(&strip_fences(raw)).ok()?;
    recs_list(&doc)
}

fn cleaned_fallback(raw: &str) -> Option<Vec<RecommendationRaw>> {
    let cleaned = strip_fences(raw);
    // Only applies when the cleaned text is valid, non-null JSON of the wrong shape
    let doc: Value = serde_json::from_str(&cleaned).ok()?;
    if doc.is_null() {
        return None;
    }
    Some(vec![RecommendationRaw::synthetic(
        FALLBACK_TITLE,
        plain_text(&cleaned),
    )])
}

fn last_resort(raw: &str) -> Option<Vec<RecommendationRaw>> {
    let text = truncate_at_char_boundary(&plain_text(&strip_fences(raw)), MAX_FALLBACK_CHARS);
    Some(vec![RecommendationRaw::synthetic(NON_STANDARD_TITLE, text)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_json_round_trip() {
        let raw = r#"{"recs": [{"title": "Pausa activa", "summary": "Mover el cuerpo", "steps": ["Estirar"], "duration_min": 10, "ref_unit": "Unidad 2"}]}"#;
        let result = normalize(raw);

        assert_eq!(result.tier, Tier::Direct);
        assert_eq!(
            result.recs,
            vec![RecommendationRaw {
                title: Some("Pausa activa".into()),
                summary: Some("Mover el cuerpo".into()),
                steps: Some(vec!["Estirar".into()]),
                duration_min: Some(10),
                ref_unit: Some("Unidad 2".into()),
                ..Default::default()
            }]
        );
    }

    #[test]
    fn test_direct_skips_leading_prose() {
        let raw = "Aquí tienes las recomendaciones:\n{\"recs\": [{\"title\": \"A\"}, {\"title\": \"B\"}]}";
        let result = normalize(raw);
        assert_eq!(result.tier, Tier::Direct);
        assert_eq!(result.recs.len(), 2);
    }

    #[test]
    fn test_fenced_json_uses_cleaned_tier() {
        let raw = "```json\n{\"recs\": [{\"title\": \"Tutoría\"}]}\n```";
        let result = normalize(raw);

        assert_eq!(result.tier, Tier::Cleaned);
        assert_eq!(result.recs[0].title.as_deref(), Some("Tutoría"));
    }

    #[test]
    fn test_uppercase_fence_tag() {
        let raw = "```JSON\n{\"recs\": [{\"title\": \"X\"}]}\n```";
        assert_eq!(normalize(raw).tier, Tier::Cleaned);
    }

    #[test]
    fn test_valid_json_without_recs_uses_fallback_record() {
        let raw = r#"```json
{"recomendacion": "Trabajar la escucha activa"}
```"#;
        let result = normalize(raw);

        assert_eq!(result.tier, Tier::CleanedFallback);
        assert_eq!(result.recs.len(), 1);
        assert_eq!(result.recs[0].title.as_deref(), Some(FALLBACK_TITLE));
        assert_eq!(
            result.recs[0].text.as_deref(),
            Some("recomendacion: Trabajar la escucha activa")
        );
    }

    #[test]
    fn test_recs_not_a_list_uses_fallback_record() {
        let raw = r#"{"recs": "Hacer una dinámica de integración"}"#;
        let result = normalize(raw);

        assert_eq!(result.tier, Tier::CleanedFallback);
        assert_eq!(
            result.recs[0].text.as_deref(),
            Some("Hacer una dinámica de integración")
        );
    }

    #[test]
    fn test_empty_recs_list_falls_through() {
        let result = normalize(r#"{"recs": []}"#);
        assert_eq!(result.tier, Tier::CleanedFallback);
        assert_eq!(result.recs.len(), 1);
        assert_eq!(result.recs[0].text.as_deref(), Some("[]"));
    }

    #[test]
    fn test_plain_text_uses_last_resort() {
        let raw = "Recomiendo trabajar en equipo y reforzar la autoestima.";
        let result = normalize(raw);

        assert_eq!(result.tier, Tier::LastResort);
        assert_eq!(result.recs.len(), 1);
        assert_eq!(result.recs[0].title.as_deref(), Some(NON_STANDARD_TITLE));
        assert_eq!(result.recs[0].text.as_deref(), Some(raw));
    }

    #[test]
    fn test_broken_json_is_stripped_in_last_resort() {
        let raw = "```json\n{\"recs\": [{\"title\": \"Sin cerrar\"\n```";
        let result = normalize(raw);

        assert_eq!(result.tier, Tier::LastResort);
        assert_eq!(result.recs[0].text.as_deref(), Some("[title: Sin cerrar"));
    }

    #[test]
    fn test_last_resort_truncates_long_output() {
        let raw = "a".repeat(MAX_FALLBACK_CHARS + 50);
        let result = normalize(&raw);
        let text = result.recs[0].text.clone().unwrap();

        assert_eq!(result.tier, Tier::LastResort);
        assert_eq!(text.len(), MAX_FALLBACK_CHARS + 3);
        assert!(text.ends_with("..."));
    }

    #[test]
    fn test_last_resort_keeps_exactly_400_chars() {
        let raw = "b".repeat(MAX_FALLBACK_CHARS);
        let text = normalize(&raw).recs[0].text.clone().unwrap();
        assert_eq!(text, raw);
    }

    #[test]
    fn test_empty_output() {
        let result = normalize("");
        assert_eq!(result.tier, Tier::LastResort);
        assert_eq!(result.recs[0].text.as_deref(), Some(""));
    }

    #[test]
    fn test_json_null_output_is_non_standard() {
        for raw in ["null", "```json\nnull\n```"] {
            let result = normalize(raw);
            assert_eq!(result.tier, Tier::LastResort);
            assert_eq!(result.recs[0].title.as_deref(), Some(NON_STANDARD_TITLE));
            assert_eq!(result.recs[0].text.as_deref(), Some("null"));
        }
    }

    #[test]
    fn test_json_scalar_output_uses_fallback_record() {
        let result = normalize("42");
        assert_eq!(result.tier, Tier::CleanedFallback);
        assert_eq!(result.recs[0].text.as_deref(), Some("42"));
    }

    #[test]
    fn test_recs_label_removed_case_insensitively() {
        assert_eq!(plain_text(r#"{"RECS": "uno"}"#), "uno");
    }
}
