//! Prompt construction for MINEDU tutoring recommendations

use super::stats::ClassroomStats;
use crate::error::Result;

/// Role given to the model before the user prompt
pub const SYSTEM_PROMPT: &str = "Eres experto en tutoría escolar del Perú.";

const PROMPT_HEADER: &str = r#"Eres un especialista peruano en Tutoría y Orientación Educativa del Ministerio de Educación (MINEDU).
Genera recomendaciones pedagógicas que sean:
- basadas en el "Manual de Tutoría y Orientación Educativa" del MINEDU (obligatorio),
- pero también creativas y generativas,
- siempre manteniendo coherencia con los enfoques, áreas y unidades del manual.

### BASE DOCUMENTAL (OBLIGATORIA)
Usa como fundamento el manual en sus unidades:
- Unidad 1: marco conceptual, pilares y áreas oficiales de la tutoría.
- Unidad 2: sesiones por cada área (personal social, académica, vocacional, salud corporal y mental,
  ayuda social, cultura y actualidad, convivencia y disciplina escolar).
- Unidad 3: prevención y detección de riesgos (depresión, ansiedad, violencia, drogas, sexualidad, TIC).
- Unidad 4: convivencia democrática, buen trato, derechos humanos.
- Unidad 5: recuperación socioemocional tras desastres.

### ORIENTACIÓN
Genera **2 o 3 recomendaciones**, según la necesidad detectada en las estadísticas reales del aula.
Cada recomendación puede trabajar **1 o 2 áreas de tutoría**, según análisis pedagógico.

Las 7 áreas oficiales (obligatorias) son:
1. Personal Social
2. Académica
3. Vocacional
4. Salud Corporal y Mental
5. Ayuda Social
6. Cultura y Actualidad
7. Convivencia y Disciplina Escolar

### FORMATO DE CADA RECOMENDACIÓN (SECCIONES SEPARADAS)
Debe incluir los siguientes campos:

- "title": título breve.
- "areas_minedu": lista con 1 o 2 áreas oficiales.
- "summary": justificación pedagógica clara (explicar por qué esta recomendación es necesaria,
  vinculando la necesidad con el manual).
- "duration_min": duración estimada en minutos.
- "steps": pasos concretos.
- "materials": materiales simples.
- "ref_unit": una unidad del manual (Unidad 1, 2, 3, 4 o 5).

### ESTADÍSTICAS REALES DEL AULA
"#;

const PROMPT_FOOTER: &str = r#"

### GENERA LA RESPUESTA ÚNICAMENTE EN JSON:
{
 "recs": [
   {
     "title": "",
     "areas_minedu": [],
     "summary": "",
     "duration_min": 20,
     "steps": [],
     "materials": [],
     "ref_unit": "Unidad X"
   }
 ]
}
NO añadas nada fuera del JSON.
NO escribas explicaciones.
NO uses comillas triples ni bloques de código.
Debes devolver SOLO el JSON puro, sin texto adicional.
"#;

/// Build the user prompt with the classroom statistics embedded as JSON
pub fn build_prompt(stats: &ClassroomStats) -> Result<String> {
    let stats_json = serde_json::to_string_pretty(stats)?;
    Ok(format!("{}{}{}", PROMPT_HEADER, stats_json, PROMPT_FOOTER))
}
