//! ATS compatibility check: keyword overlap, section coverage, readability and
//! UAE market fit, combined into one weighted score.
//!
//! overall = 0.45·keyword + 0.20·sections + 0.15·readability + 0.20·uae_fit

use crate::ats::models::{AtsCheckResult, ScoreBreakdown};
use crate::ats::tokenizer::{extract_keywords, non_empty_lines, percentage, round2, words};

pub const REQUIRED_SECTIONS: &[&str] = &["summary", "experience", "skills", "education"];

pub const UAE_KEYWORDS: &[&str] = &[
    "uae",
    "gcc",
    "dubai",
    "abu dhabi",
    "emirates",
    "labour law",
    "free zone",
    "visa",
    "residency",
    "mohre",
    "vat",
    "esr",
];

const KEYWORD_WEIGHT: f64 = 0.45;
const SECTION_WEIGHT: f64 = 0.20;
const READABILITY_WEIGHT: f64 = 0.15;
const UAE_FIT_WEIGHT: f64 = 0.20;

const MAX_LISTED_KEYWORDS: usize = 25;

pub fn check_ats(resume_text: &str, job_description: &str) -> AtsCheckResult {
    let resume_tokens = extract_keywords(resume_text);
    let jd_tokens = extract_keywords(job_description);

    // matched and missing keywords, alphabetical
    let matched: Vec<String> = jd_tokens.intersection(&resume_tokens).cloned().collect();
    let missing: Vec<String> = jd_tokens.difference(&resume_tokens).cloned().collect();

    let keyword_match = percentage(matched.len(), jd_tokens.len().max(1));
    let (section_completeness, section_gaps) = evaluate_sections(resume_text);
    let readability = readability_score(resume_text);
    let uae_market_fit = uae_fit_score(resume_text, job_description);

    let overall_score = round2(
        keyword_match * KEYWORD_WEIGHT
            + section_completeness * SECTION_WEIGHT
            + readability * READABILITY_WEIGHT
            + uae_market_fit * UAE_FIT_WEIGHT,
    );

    let recommendations =
        build_recommendations(&missing, &section_gaps, readability, uae_market_fit);

    AtsCheckResult {
        overall_score,
        breakdown: ScoreBreakdown {
            keyword_match,
            section_completeness,
            readability,
            uae_market_fit,
        },
        missing_keywords: missing.into_iter().take(MAX_LISTED_KEYWORDS).collect(),
        matched_keywords: matched.into_iter().take(MAX_LISTED_KEYWORDS).collect(),
        section_gaps,
        recommendations,
    }
}

/// Returns the section score and the required sections absent from the resume.
pub fn evaluate_sections(resume_text: &str) -> (f64, Vec<String>) {
    let lower = resume_text.to_lowercase();
    let gaps: Vec<String> = REQUIRED_SECTIONS
        .iter()
        .filter(|section| !lower.contains(**section))
        .map(|section| section.to_string())
        .collect();
    let present = REQUIRED_SECTIONS.len() - gaps.len();
    (percentage(present, REQUIRED_SECTIONS.len()), gaps)
}

/// Scores average words per non-empty line into fixed bands.
pub fn readability_score(resume_text: &str) -> f64 {
    let word_count = words(resume_text).count();
    if word_count == 0 {
        return 0.0;
    }
    let lines = non_empty_lines(resume_text).count();
    let avg_words_per_line = word_count as f64 / lines.max(1) as f64;

    match avg_words_per_line {
        avg if avg <= 14.0 => 90.0,
        avg if avg <= 20.0 => 75.0,
        avg if avg <= 28.0 => 60.0,
        _ => 45.0,
    }
}

pub fn uae_fit_score(resume_text: &str, job_description: &str) -> f64 {
    let combined = format!(
        "{} {}",
        resume_text.to_lowercase(),
        job_description.to_lowercase()
    );
    let matches = UAE_KEYWORDS
        .iter()
        .filter(|keyword| combined.contains(**keyword))
        .count();
    percentage(matches, UAE_KEYWORDS.len())
}

fn build_recommendations(
    missing_keywords: &[String],
    section_gaps: &[String],
    readability: f64,
    uae_fit: f64,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if !missing_keywords.is_empty() {
        recommendations.push(
            "Add missing job keywords naturally in your experience and skills sections."
                .to_string(),
        );
    }
    if !section_gaps.is_empty() {
        recommendations.push(format!(
            "Include missing sections: {}.",
            section_gaps.join(", ")
        ));
    }
    if readability < 70.0 {
        recommendations.push(
            "Use shorter bullet points with measurable outcomes for better ATS readability."
                .to_string(),
        );
    }
    if uae_fit < 30.0 {
        recommendations.push(
            "Add UAE/GCC context like local regulations, visa status, or regional project exposure."
                .to_string(),
        );
    }

    if recommendations.is_empty() {
        recommendations
            .push("Resume is ATS-friendly. Fine-tune with role-specific achievements.".to_string());
    }

    recommendations
}
