use serde::{Deserialize, Serialize};

/// Per-dimension percentages (0–100, two decimals).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword_match: f64,
    pub section_completeness: f64,
    pub readability: f64,
    pub uae_market_fit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsCheckResult {
    pub overall_score: f64,
    pub breakdown: ScoreBreakdown,
    pub missing_keywords: Vec<String>,
    pub matched_keywords: Vec<String>,
    pub section_gaps: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordGapResult {
    pub missing_keywords: Vec<String>,
    pub high_priority_keywords: Vec<String>,
    pub coverage_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResult {
    pub optimized_summary: String,
    pub rewritten_bullets: Vec<String>,
    pub skills_to_add: Vec<String>,
    pub uae_localization_tips: Vec<String>,
}
