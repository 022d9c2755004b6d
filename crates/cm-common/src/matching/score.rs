use std::collections::HashSet;

use serde::Serialize;

/// Skill-overlap breakdown between one candidate and one job.
///
/// `matched_skills` and `missing_skills` partition the job's required skills
/// and keep the job's declared order and casing, so
/// `matched.len() + missing.len() == required.len()` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub match_percentage: u32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

/// Compare a candidate's skills with a job's required skills.
///
/// Comparison is case-insensitive; output casing comes from the job side.
/// Required skills need not belong to the extraction vocabulary; they are
/// compared literally. An empty requirement list scores 0 by definition.
pub fn calculate_match(candidate_skills: &[String], required_skills: &[String]) -> MatchResult {
    let candidate: HashSet<String> = candidate_skills
        .iter()
        .map(|skill| skill.to_lowercase())
        .collect();

    let mut matched_skills = Vec::new();
    let mut missing_skills = Vec::new();

    for skill in required_skills {
        if candidate.contains(&skill.to_lowercase()) {
            matched_skills.push(skill.clone());
        } else {
            missing_skills.push(skill.clone());
        }
    }

    let match_percentage = if required_skills.is_empty() {
        0
    } else {
        let ratio = matched_skills.len() as f64 / required_skills.len() as f64;
        (ratio * 100.0).round() as u32
    };

    MatchResult {
        match_percentage,
        matched_skills,
        missing_skills,
    }
}
