//! Resume optimizer: impact-style bullet rewrites, a UAE-targeted summary and
//! localization tips.

use crate::ats::keyword_gap::keyword_gap;
use crate::ats::models::OptimizeResult;
use crate::ats::tokenizer::{extract_keywords, non_empty_lines, trim_blank, words};

pub const ACTION_VERBS: &[&str] = &[
    "Led",
    "Delivered",
    "Optimized",
    "Implemented",
    "Automated",
    "Improved",
    "Reduced",
    "Increased",
];

const LINES_CONSIDERED: usize = 12;
const MIN_WORDS_PER_BULLET: usize = 4;
const MAX_BULLETS: usize = 8;
const MAX_SKILLS_TO_ADD: usize = 10;
const SUMMARY_SKILLS: usize = 4;
const MAX_TIPS: usize = 6;

pub fn optimize_resume(
    resume_text: &str,
    job_description: Option<&str>,
    target_role: Option<&str>,
    preferred_emirate: Option<&str>,
) -> OptimizeResult {
    let lines: Vec<&str> = non_empty_lines(resume_text).map(trim_blank).collect();
    let mut rewritten_bullets = rewrite_bullets_for_impact(&lines);
    rewritten_bullets.truncate(MAX_BULLETS);

    let skills_to_add = match job_description {
        Some(jd) => keyword_gap(resume_text, jd)
            .high_priority_keywords
            .into_iter()
            .take(MAX_SKILLS_TO_ADD)
            .collect(),
        None => Vec::new(),
    };

    OptimizeResult {
        optimized_summary: build_summary(resume_text, target_role, preferred_emirate),
        rewritten_bullets,
        skills_to_add,
        uae_localization_tips: localization_tips(resume_text, preferred_emirate),
    }
}

/// The verb is picked by the line's position among the first twelve lines, so
/// skipped short lines still advance the rotation.
fn rewrite_bullets_for_impact(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .take(LINES_CONSIDERED)
        .enumerate()
        .filter(|(_, line)| words(line).count() >= MIN_WORDS_PER_BULLET)
        .map(|(index, line)| {
            let verb = ACTION_VERBS[index % ACTION_VERBS.len()];
            let sentence = line.trim_end_matches('.');
            format!("{verb} {sentence} with measurable impact across KPIs.")
        })
        .collect()
}

fn build_summary(
    resume_text: &str,
    target_role: Option<&str>,
    preferred_emirate: Option<&str>,
) -> String {
    let role = target_role.unwrap_or("target role");
    let emirate = preferred_emirate.unwrap_or("UAE");

    let top_skills: Vec<String> = extract_keywords(resume_text)
        .into_iter()
        .take(SUMMARY_SKILLS)
        .collect();
    let skills = if top_skills.is_empty() {
        "cross-functional execution".to_string()
    } else {
        top_skills.join(", ")
    };

    format!(
        "Results-driven professional targeting {role} opportunities in {emirate}, \
         with strengths in {skills}. Proven ability to deliver business outcomes in \
         fast-paced, multicultural environments aligned with UAE market expectations."
    )
}

fn localization_tips(resume_text: &str, preferred_emirate: Option<&str>) -> Vec<String> {
    let lower = resume_text.to_lowercase();
    let mut tips = Vec::new();

    if !lower.contains("visa") {
        tips.push("Add work authorization/visa status for UAE recruiters.".to_string());
    }
    if !lower.contains("phone") && !lower.contains("mobile") {
        tips.push("Include UAE-reachable contact number with country code.".to_string());
    }
    if !lower.contains("linkedin") {
        tips.push("Add an updated LinkedIn URL.".to_string());
    }

    tips.push(format!(
        "Tailor achievements for hiring trends in {} sectors.",
        preferred_emirate.unwrap_or("Dubai/Abu Dhabi")
    ));
    tips.push(
        "Highlight region-relevant tools, standards, or compliance exposure when applicable."
            .to_string(),
    );

    tips.truncate(MAX_TIPS);
    tips
}
