//! Classroom insights: statistics, prompting and recommendation shaping
//!
//! The pipeline pulls a classroom's submissions, reduces them to
//! [`ClassroomStats`], asks the generation service for recommendations and
//! turns whatever comes back into display-ready records.

pub mod format;
pub mod normalize;
pub mod prompt;
pub mod recommendation;
pub mod stats;

pub use format::{format_recommendation, format_recommendations};
pub use normalize::{normalize, Normalized, Tier};
pub use recommendation::{RecommendationRaw, RecommendationRendered};
pub use stats::{extract_stats, Category, ClassroomStats, StatsBucket};

use crate::error::Result;
use crate::services::Generation;
use crate::storage::StorageBackend;
use crate::types::ClassroomId;
use serde::Serialize;
use tracing::{debug, info};

/// Response of the recommendations endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationReport {
    pub stats: ClassroomStats,
    pub recs: Vec<RecommendationRendered>,
}

/// Statistics for one classroom, straight from storage
pub async fn classroom_stats(
    storage: &dyn StorageBackend,
    classroom: ClassroomId,
) -> Result<ClassroomStats> {
    let submissions = storage.list_submissions(classroom).await?;
    let stats = extract_stats(submissions.iter().filter_map(|s| s.usable_payload()));
    debug!(
        "Classroom {}: {} of {} submissions usable",
        classroom,
        stats.total,
        submissions.len()
    );
    Ok(stats)
}

/// Shape raw model output into rendered recommendations
pub fn shape_recommendations(raw: &str) -> Vec<RecommendationRendered> {
    let normalized = normalize(raw);
    format_recommendations(&normalized.recs)
}

/// Full recommendation run for one classroom
///
/// With generation disabled the fixed notice record is returned and nothing
/// external is called. Generation failures propagate; unexpected output
/// shapes never do.
pub async fn recommend(
    storage: &dyn StorageBackend,
    generation: &Generation,
    classroom: ClassroomId,
) -> Result<RecommendationReport> {
    let stats = classroom_stats(storage, classroom).await?;

    let generator = match generation {
        Generation::Disabled => {
            debug!("Generation disabled, returning notice record");
            return Ok(RecommendationReport {
                stats,
                recs: vec![RecommendationRendered::generation_disabled()],
            });
        }
        Generation::Enabled(generator) => generator,
    };

    let prompt = prompt::build_prompt(&stats)?;
    let raw = generator.generate(&prompt).await?;
    let recs = shape_recommendations(&raw);

    info!(
        "Generated {} recommendations for classroom {}",
        recs.len(),
        classroom
    );

    Ok(RecommendationReport { stats, recs })
}
