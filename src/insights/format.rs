//! Rendering of recommendation records into sectioned display text
//!
//! Block order is fixed: summary, steps, materials, areas, manual reference.
//! Blocks without data are left out and the rest are separated by a blank line.

use super::recommendation::{
    RecommendationRaw, RecommendationRendered, DEFAULT_DURATION_MIN, DEFAULT_REF_UNIT,
    DEFAULT_TITLE,
};

const SUMMARY_LABEL: &str = "📘 *Resumen pedagógico:*";
const STEPS_LABEL: &str = "📝 *Pasos sugeridos:*";
const MATERIALS_LABEL: &str = "📎 *Materiales:*";
const AREAS_LABEL: &str = "🏷️ *Área(s) MINEDU:*";
const REFERENCE_LABEL: &str = "📚 *Referencia al manual:*";
const BLOCK_SEPARATOR: &str = "\n\n";

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn non_empty_list(value: &Option<Vec<String>>) -> Option<&[String]> {
    value.as_deref().filter(|items| !items.is_empty())
}

fn summary_block(rec: &RecommendationRaw) -> Option<String> {
    let summary = non_empty(&rec.summary).or_else(|| non_empty(&rec.text))?;
    Some(format!("{}\n{}", SUMMARY_LABEL, summary.trim()))
}

fn steps_block(rec: &RecommendationRaw) -> Option<String> {
    let steps = non_empty_list(&rec.steps)?
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step))
        .collect::<Vec<_>>()
        .join("\n");
    Some(format!("{}\n{}", STEPS_LABEL, steps))
}

fn materials_block(rec: &RecommendationRaw) -> Option<String> {
    let materials = non_empty_list(&rec.materials)?
        .iter()
        .map(|m| format!("• {}", m))
        .collect::<Vec<_>>()
        .join("\n");
    Some(format!("{}\n{}", MATERIALS_LABEL, materials))
}

fn areas_block(rec: &RecommendationRaw) -> Option<String> {
    let areas = non_empty_list(&rec.areas_minedu)?;
    Some(format!("{} {}", AREAS_LABEL, areas.join(", ")))
}

fn reference_block(rec: &RecommendationRaw) -> Option<String> {
    non_empty(&rec.ref_unit).map(|unit| format!("{} {}", REFERENCE_LABEL, unit))
}

/// Compose the display text of one recommendation
pub fn render_text(rec: &RecommendationRaw) -> String {
    [
        summary_block(rec),
        steps_block(rec),
        materials_block(rec),
        areas_block(rec),
        reference_block(rec),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(BLOCK_SEPARATOR)
}

/// Render one record, filling in defaults
pub fn format_recommendation(rec: &RecommendationRaw) -> RecommendationRendered {
    RecommendationRendered {
        title: non_empty(&rec.title).unwrap_or(DEFAULT_TITLE).to_string(),
        text: render_text(rec),
        duration_min: rec
            .duration_min
            .filter(|d| *d != 0)
            .unwrap_or(DEFAULT_DURATION_MIN),
        ref_unit: non_empty(&rec.ref_unit)
            .unwrap_or(DEFAULT_REF_UNIT)
            .to_string(),
    }
}

/// Render every record in order
pub fn format_recommendations(recs: &[RecommendationRaw]) -> Vec<RecommendationRendered> {
    recs.iter().map(format_recommendation).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> RecommendationRaw {
        RecommendationRaw {
            title: Some("Círculo de confianza".into()),
            summary: Some("  Se detecta tristeza en el aula.  ".into()),
            text: Some("ignorado".into()),
            steps: Some(vec!["Formar un círculo".into(), "Compartir emociones".into()]),
            materials: Some(vec!["Tarjetas".into(), "Plumones".into()]),
            areas_minedu: Some(vec!["Personal Social".into(), "Salud Corporal y Mental".into()]),
            duration_min: Some(30),
            ref_unit: Some("Unidad 2".into()),
        }
    }

    #[test]
    fn test_all_blocks_in_order() {
        let rendered = format_recommendation(&full_record());

        assert_eq!(rendered.title, "Círculo de confianza");
        assert_eq!(rendered.duration_min, 30);
        assert_eq!(rendered.ref_unit, "Unidad 2");
        assert_eq!(
            rendered.text,
            "📘 *Resumen pedagógico:*\nSe detecta tristeza en el aula.\n\n\
             📝 *Pasos sugeridos:*\n1. Formar un círculo\n2. Compartir emociones\n\n\
             📎 *Materiales:*\n• Tarjetas\n• Plumones\n\n\
             🏷️ *Área(s) MINEDU:* Personal Social, Salud Corporal y Mental\n\n\
             📚 *Referencia al manual:* Unidad 2"
        );
    }

    #[test]
    fn test_text_only_record() {
        let rec = RecommendationRaw {
            text: Some(" Reforzar la convivencia ".into()),
            ..Default::default()
        };
        let rendered = format_recommendation(&rec);

        assert_eq!(rendered.title, DEFAULT_TITLE);
        assert_eq!(rendered.text, "📘 *Resumen pedagógico:*\nReforzar la convivencia");
        assert!(!rendered.text.contains(BLOCK_SEPARATOR));
        assert_eq!(rendered.duration_min, 15);
        assert_eq!(rendered.ref_unit, "MINEDU");
    }

    #[test]
    fn test_empty_lists_are_omitted() {
        let rec = RecommendationRaw {
            summary: Some("Resumen".into()),
            steps: Some(vec![]),
            materials: Some(vec![]),
            areas_minedu: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(render_text(&rec), "📘 *Resumen pedagógico:*\nResumen");
    }

    #[test]
    fn test_empty_summary_falls_back_to_text() {
        let rec = RecommendationRaw {
            summary: Some(String::new()),
            text: Some("Desde texto".into()),
            ..Default::default()
        };
        assert_eq!(render_text(&rec), "📘 *Resumen pedagógico:*\nDesde texto");
    }

    #[test]
    fn test_empty_record() {
        let rendered = format_recommendation(&RecommendationRaw::default());
        assert_eq!(rendered.text, "");
        assert_eq!(rendered.title, "Recomendación");
    }

    #[test]
    fn test_zero_duration_and_empty_ref_use_defaults() {
        let rec = RecommendationRaw {
            duration_min: Some(0),
            ref_unit: Some(String::new()),
            ..Default::default()
        };
        let rendered = format_recommendation(&rec);
        assert_eq!(rendered.duration_min, DEFAULT_DURATION_MIN);
        assert_eq!(rendered.ref_unit, DEFAULT_REF_UNIT);
        assert_eq!(rendered.text, "");
    }

    #[test]
    fn test_reformatting_rendered_output_is_stable() {
        let rec = RecommendationRaw {
            text: Some("Solo texto".into()),
            ..Default::default()
        };
        let first = format_recommendation(&rec);
        let second = format_recommendation(&RecommendationRaw::from(&first));

        assert_eq!(second.title, first.title);
        assert_eq!(second.duration_min, first.duration_min);
        assert_eq!(second.ref_unit, first.ref_unit);
        assert!(second.text.contains("Solo texto"));
    }

    #[test]
    fn test_reformatting_rendered_json_does_not_fail() {
        let rendered = format_recommendations(&[full_record(), RecommendationRaw::default()]);
        let as_json = serde_json::to_value(&rendered).unwrap();
        let reparsed: Vec<RecommendationRaw> = as_json
            .as_array()
            .unwrap()
            .iter()
            .map(RecommendationRaw::from_value)
            .collect();

        let again = format_recommendations(&reparsed);
        assert_eq!(again.len(), 2);
        assert_eq!(again[1].duration_min, 15);
        assert_eq!(again[1].ref_unit, "MINEDU");
    }
}
