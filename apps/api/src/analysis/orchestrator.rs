//! Orchestrator — sequences the pipeline and decides which failures are
//! fatal. The legacy chain (skills → skill-gap match) is load-bearing: its
//! failure is terminal. The enhanced chain (profile → job analysis → report)
//! is best-effort: any failure is logged and absorbed, and the response
//! simply carries no enhanced data.

use tracing::{debug, info, warn};

use crate::analysis::job_analyzer::{self, JobAnalysis};
use crate::analysis::matcher::{self, SkillGapAnalysis};
use crate::analysis::profiler::{self, ResumeProfile, SkillCategories};
use crate::analysis::report::{self, ComprehensiveReport};
use crate::analysis::sanitize::sanitize_job_html;
use crate::analysis::skill_extractor;
use crate::errors::AppError;
use crate::llm_client::TextModel;

/// Where the flat skill list for the legacy match came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillSource {
    /// The resume's cached flat `extracted_skills` list. Wins over the
    /// categorized profile: cheaper and already persisted.
    CachedList,
    /// The nine profile categories, flattened.
    ProfileCategories,
    /// On-demand legacy extraction; the caller should persist the result.
    LegacyExtraction,
}

/// The fallback order is an explicit list, not ad-hoc branching: each
/// strategy is tried in turn until one yields a non-empty skill set.
pub const SKILL_STRATEGIES: [SkillSource; 3] = [
    SkillSource::CachedList,
    SkillSource::ProfileCategories,
    SkillSource::LegacyExtraction,
];

#[derive(Debug)]
pub struct ResolvedSkills {
    pub skills: Vec<String>,
    pub source: SkillSource,
}

/// Resolves the flat skill list for the legacy match. Returns
/// `SkillsRequired` when every strategy yields zero skills — the caller
/// surfaces that to the user before any job analysis runs.
pub async fn resolve_skills(
    cached_skills: &[String],
    profile_categories: Option<&SkillCategories>,
    resume_text: &str,
    model: &dyn TextModel,
) -> Result<ResolvedSkills, AppError> {
    for source in SKILL_STRATEGIES {
        let skills = match source {
            SkillSource::CachedList => {
                skill_extractor::normalize_skills(cached_skills.to_vec())
            }
            SkillSource::ProfileCategories => profile_categories
                .map(SkillCategories::flatten)
                .unwrap_or_default(),
            SkillSource::LegacyExtraction => {
                info!("No cached skills found, attempting on-demand extraction");
                skill_extractor::extract_skills(resume_text, model).await?
            }
        };
        if !skills.is_empty() {
            debug!("Resolved {} skills via {:?}", skills.len(), source);
            return Ok(ResolvedSkills { skills, source });
        }
    }
    Err(AppError::SkillsRequired)
}

/// Everything the enhanced tier produced, kept all-or-nothing: a partial
/// bundle is never persisted.
#[derive(Debug)]
pub struct EnhancedBundle {
    pub resume_profile: ResumeProfile,
    pub job_analysis: JobAnalysis,
    pub final_report: ComprehensiveReport,
}

/// Merged pipeline output. Legacy fields are always populated; the enhanced
/// bundle is present only when every enhanced stage succeeded.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub legacy: SkillGapAnalysis,
    pub enhanced: Option<EnhancedBundle>,
}

impl PipelineOutcome {
    pub fn has_enhanced_data(&self) -> bool {
        self.enhanced.is_some()
    }

    /// The persisted overall match score. Always present: the model-provided
    /// score when the enhanced tier delivered one, else the legacy
    /// percentage. The two are treated as interchangeable 0–100 scores.
    pub fn overall_match(&self) -> f64 {
        let model_score = self
            .enhanced
            .as_ref()
            .and_then(|e| e.job_analysis.match_analysis.overall_match);
        match model_score {
            Some(score) => score,
            None => {
                debug!(
                    "overall_match absent from enhanced output, falling back to legacy {}",
                    self.legacy.match_percentage
                );
                self.legacy.match_percentage
            }
        }
    }
}

/// Runs the full job-analysis pipeline for one request.
///
/// `resume_skills` is the already-resolved flat list (see
/// [`resolve_skills`]); the categorized profile only feeds the enhanced
/// stages. The profile is re-run fresh on every job analysis.
pub async fn run_job_analysis(
    resume_text: &str,
    resume_skills: &[String],
    job_html: &str,
    model: &dyn TextModel,
) -> Result<PipelineOutcome, AppError> {
    let sanitized = sanitize_job_html(job_html);

    // PROFILE: feeds the enhanced tier only; its failure must never block
    // the legacy result.
    let profile = match profiler::profile_resume(resume_text, model).await {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!("Resume profiling failed, enhanced tier skipped: {e}");
            None
        }
    };

    // LEGACY_MATCH: terminal on failure, no further fallback exists.
    let legacy = matcher::analyze_skill_gap(job_html, resume_skills, model).await?;
    info!(
        "Legacy match completed: {}% ({} matched, {} missing)",
        legacy.match_percentage,
        legacy.matched_skills.len(),
        legacy.missing_skills.len()
    );

    // ENHANCED: best-effort, all-or-nothing.
    let enhanced = match profile {
        Some(profile) => run_enhanced(&sanitized, profile, model).await,
        None => None,
    };

    Ok(PipelineOutcome { legacy, enhanced })
}

async fn run_enhanced(
    sanitized_html: &str,
    profile: ResumeProfile,
    model: &dyn TextModel,
) -> Option<EnhancedBundle> {
    let job_analysis = match job_analyzer::analyze_job(sanitized_html, &profile, model).await {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!("Job analysis failed, proceeding with legacy only: {e}");
            return None;
        }
    };

    let final_report = match report::synthesize_report(&profile, &job_analysis, model).await {
        Ok(report) => report,
        Err(e) => {
            warn!("Report synthesis failed, proceeding with legacy only: {e}");
            return None;
        }
    };

    Some(EnhancedBundle {
        resume_profile: profile,
        job_analysis,
        final_report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Deterministic scripted model: each call pops the next response from
    /// its queue. `None` simulates an upstream failure.
    struct StubModel {
        plain: Mutex<VecDeque<Option<String>>>,
        structured: Mutex<VecDeque<Option<String>>>,
    }

    impl StubModel {
        fn new(
            plain: Vec<Option<Value>>,
            structured: Vec<Option<Value>>,
        ) -> Self {
            let to_queue = |items: Vec<Option<Value>>| {
                items
                    .into_iter()
                    .map(|v| v.map(|v| v.to_string()))
                    .collect::<VecDeque<_>>()
            };
            StubModel {
                plain: Mutex::new(to_queue(plain)),
                structured: Mutex::new(to_queue(structured)),
            }
        }

        fn remaining_structured(&self) -> usize {
            self.structured.lock().unwrap().len()
        }

        fn pop(queue: &Mutex<VecDeque<Option<String>>>) -> Result<String, LlmError> {
            match queue.lock().unwrap().pop_front() {
                Some(Some(text)) => Ok(text),
                Some(None) => Err(LlmError::Api {
                    status: 500,
                    message: "stub failure".to_string(),
                }),
                None => Err(LlmError::EmptyContent),
            }
        }
    }

    #[async_trait]
    impl TextModel for StubModel {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            Self::pop(&self.plain)
        }

        async fn complete_structured(
            &self,
            _prompt: &str,
            _schema: Option<&Value>,
            _max_output_tokens: Option<u32>,
        ) -> Result<String, LlmError> {
            Self::pop(&self.structured)
        }
    }

    fn profile_json() -> Value {
        json!({
            "careerLevel": {"experienceYears": 5, "level": "senior", "isFresher": false},
            "skills": {"programming": ["Python"], "frameworks": ["Django"], "cloud": ["AWS"]},
            "careerFit": {"primaryDomain": "backend", "readinessLevel": "job-ready"}
        })
    }

    fn legacy_json() -> Value {
        json!({
            "matchedSkills": ["Python", "Django"],
            "missingSkills": ["Kubernetes"],
            "partialSkills": [],
            "matchPercentage": 72.0,
            "experienceLevel": "senior"
        })
    }

    fn job_json(overall: Option<f64>) -> Value {
        let mut match_analysis = json!({"skillMatch": 85});
        if let Some(overall) = overall {
            match_analysis["overallMatch"] = json!(overall);
        }
        json!({
            "jobDetails": {"title": "Backend Engineer"},
            "matchAnalysis": match_analysis,
            "recommendation": {"shouldApply": true, "applicationPriority": "high"}
        })
    }

    fn report_json() -> Value {
        json!({
            "executiveSummary": {"recommendation": "APPLY", "matchScore": 78}
        })
    }

    const RESUME: &str = "5 years Python, Django, AWS";
    const JOB: &str = "<p>Requires Python, Django, Kubernetes</p>";

    fn skills() -> Vec<String> {
        vec!["Python".to_string(), "Django".to_string(), "AWS".to_string()]
    }

    #[tokio::test]
    async fn test_full_pipeline_success() {
        // Structured order: profile, legacy match, job analysis, report.
        let model = StubModel::new(
            vec![],
            vec![
                Some(profile_json()),
                Some(legacy_json()),
                Some(job_json(Some(81.0))),
                Some(report_json()),
            ],
        );

        let outcome = run_job_analysis(RESUME, &skills(), JOB, &model).await.unwrap();
        assert!(outcome.has_enhanced_data());
        assert_eq!(outcome.legacy.matched_skills, vec!["Python", "Django"]);
        assert_eq!(outcome.legacy.missing_skills, vec!["Kubernetes"]);
        assert!(outcome.legacy.match_percentage > 50.0);
        assert_eq!(outcome.overall_match(), 81.0);
    }

    #[tokio::test]
    async fn test_overall_match_falls_back_to_legacy_percentage() {
        let model = StubModel::new(
            vec![],
            vec![
                Some(profile_json()),
                Some(legacy_json()),
                Some(job_json(None)), // model omitted overallMatch
                Some(report_json()),
            ],
        );

        let outcome = run_job_analysis(RESUME, &skills(), JOB, &model).await.unwrap();
        assert!(outcome.has_enhanced_data());
        assert_eq!(outcome.overall_match(), 72.0);
    }

    #[tokio::test]
    async fn test_job_analysis_failure_is_absorbed() {
        let model = StubModel::new(
            vec![],
            vec![Some(profile_json()), Some(legacy_json()), None],
        );

        let outcome = run_job_analysis(RESUME, &skills(), JOB, &model).await.unwrap();
        assert!(!outcome.has_enhanced_data());
        assert_eq!(outcome.legacy.matched_skills, vec!["Python", "Django"]);
        assert_eq!(outcome.overall_match(), 72.0);
        // Report stage never ran.
        assert_eq!(model.remaining_structured(), 0);
    }

    #[tokio::test]
    async fn test_report_failure_discards_whole_bundle() {
        let model = StubModel::new(
            vec![],
            vec![
                Some(profile_json()),
                Some(legacy_json()),
                Some(job_json(Some(90.0))),
                None,
            ],
        );

        let outcome = run_job_analysis(RESUME, &skills(), JOB, &model).await.unwrap();
        assert!(!outcome.has_enhanced_data());
        assert_eq!(outcome.overall_match(), 72.0);
    }

    #[tokio::test]
    async fn test_profile_failure_skips_enhanced_tier() {
        let model = StubModel::new(vec![], vec![None, Some(legacy_json())]);

        let outcome = run_job_analysis(RESUME, &skills(), JOB, &model).await.unwrap();
        assert!(!outcome.has_enhanced_data());
        // Neither the job analyzer nor the report ran.
        assert_eq!(model.remaining_structured(), 0);
    }

    #[tokio::test]
    async fn test_legacy_failure_is_terminal() {
        let model = StubModel::new(vec![], vec![Some(profile_json()), None]);

        let result = run_job_analysis(RESUME, &skills(), JOB, &model).await;
        assert!(matches!(result, Err(AppError::UpstreamModel(_))));
    }

    #[tokio::test]
    async fn test_pipeline_is_deterministic_for_identical_inputs() {
        let responses = || {
            vec![
                Some(profile_json()),
                Some(legacy_json()),
                Some(job_json(Some(81.0))),
                Some(report_json()),
            ]
        };
        let first = run_job_analysis(RESUME, &skills(), JOB, &StubModel::new(vec![], responses()))
            .await
            .unwrap();
        let second = run_job_analysis(RESUME, &skills(), JOB, &StubModel::new(vec![], responses()))
            .await
            .unwrap();

        assert_eq!(first.legacy.matched_skills, second.legacy.matched_skills);
        assert_eq!(first.legacy.missing_skills, second.legacy.missing_skills);
        assert_eq!(first.legacy.match_percentage, second.legacy.match_percentage);
        assert_eq!(first.overall_match(), second.overall_match());
    }

    #[tokio::test]
    async fn test_resolve_skills_cached_list_wins() {
        // Cached list takes precedence even when a profile exists; no model
        // call is made.
        let model = StubModel::new(vec![], vec![]);
        let categories = SkillCategories {
            programming: vec!["Go".to_string()],
            ..Default::default()
        };
        let cached = vec!["Python".to_string()];

        let resolved = resolve_skills(&cached, Some(&categories), RESUME, &model)
            .await
            .unwrap();
        assert_eq!(resolved.source, SkillSource::CachedList);
        assert_eq!(resolved.skills, vec!["Python"]);
    }

    #[tokio::test]
    async fn test_resolve_skills_flattens_profile_categories() {
        let model = StubModel::new(vec![], vec![]);
        let categories = SkillCategories {
            programming: vec!["Go".to_string()],
            cloud: vec!["GCP".to_string()],
            ..Default::default()
        };

        let resolved = resolve_skills(&[], Some(&categories), RESUME, &model)
            .await
            .unwrap();
        assert_eq!(resolved.source, SkillSource::ProfileCategories);
        assert_eq!(resolved.skills, vec!["Go", "GCP"]);
    }

    #[tokio::test]
    async fn test_resolve_skills_falls_back_to_extraction() {
        let model = StubModel::new(vec![Some(json!(["Python", "SQL"]))], vec![]);

        let resolved = resolve_skills(&[], None, RESUME, &model).await.unwrap();
        assert_eq!(resolved.source, SkillSource::LegacyExtraction);
        assert_eq!(resolved.skills, vec!["Python", "SQL"]);
    }

    #[tokio::test]
    async fn test_resolve_skills_zero_everywhere_is_skills_required() {
        // Extraction parse-fails → empty list → SkillsRequired, and no
        // structured (job-analyzer) call was ever attempted.
        let model = StubModel::new(vec![Some(json!("not an array"))], vec![]);
        let empty_categories = SkillCategories::default();

        let result = resolve_skills(&[], Some(&empty_categories), RESUME, &model).await;
        assert!(matches!(result, Err(AppError::SkillsRequired)));
        assert_eq!(model.remaining_structured(), 0);
    }
}
