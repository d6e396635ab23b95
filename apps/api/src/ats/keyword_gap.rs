use std::collections::BTreeSet;

use crate::ats::models::KeywordGapResult;
use crate::ats::tokenizer::{extract_keywords, percentage, token_frequency};

const MAX_MISSING: usize = 30;
const MAX_HIGH_PRIORITY: usize = 15;

/// Job-description keywords absent from the resume, plus the most frequent of
/// them in JD order of importance.
pub fn keyword_gap(resume_text: &str, job_description: &str) -> KeywordGapResult {
    let resume_tokens = extract_keywords(resume_text);
    let jd_tokens = extract_keywords(job_description);

    let missing: BTreeSet<&String> = jd_tokens.difference(&resume_tokens).collect();

    let high_priority_keywords: Vec<String> = token_frequency(job_description)
        .into_iter()
        .map(|(token, _)| token)
        .filter(|token| missing.contains(token))
        .take(MAX_HIGH_PRIORITY)
        .collect();

    let matched = jd_tokens.intersection(&resume_tokens).count();

    KeywordGapResult {
        missing_keywords: missing
            .into_iter()
            .take(MAX_MISSING)
            .cloned()
            .collect(),
        high_priority_keywords,
        coverage_percentage: percentage(matched, jd_tokens.len().max(1)),
    }
}
