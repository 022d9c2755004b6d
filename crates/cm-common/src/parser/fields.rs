//! Heuristic field extraction over plain résumé text. Three independent
//! pure functions driven by the injected [`Vocabulary`]; none of them fails
//! on empty or unhelpful input; they return an empty set or the
//! "Not specified" sentinel instead.

use super::vocabulary::Vocabulary;

/// Sentinel for fields no heuristic could fill.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Maximum length of the experience summary taken from a section scan.
const EXPERIENCE_SUMMARY_CHARS: usize = 100;

/// Case-insensitive whole-word scan of the text against the skill
/// vocabulary. The result is deduplicated (the vocabulary is) and ordered by
/// vocabulary position, reporting each term's canonical casing rather than
/// whatever casing the source text used.
pub fn extract_skills(vocabulary: &Vocabulary, text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    vocabulary
        .skills()
        .iter()
        .filter(|skill| skill.matches(text))
        .map(|skill| skill.term().to_string())
        .collect()
}

/// First up-to-3 lines mentioning an education keyword, trimmed and joined
/// with `" | "`. Keyword matching is case-insensitive; the returned lines
/// keep their original casing.
pub fn extract_education(vocabulary: &Vocabulary, text: &str) -> String {
    let mut qualifying: Vec<&str> = Vec::new();

    for line in text.lines() {
        let lower = line.to_lowercase();
        if vocabulary
            .education_keywords()
            .iter()
            .any(|keyword| lower.contains(keyword.as_str()))
        {
            qualifying.push(line.trim());
            if qualifying.len() == 3 {
                break;
            }
        }
    }

    if qualifying.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        qualifying.join(" | ")
    }
}

/// Experience summary, trying two strategies in order:
///
/// 1. a duration mention ("5+ years", "3 yrs"); the first match is returned
///    verbatim;
/// 2. the first line containing an experience keyword plus the two lines
///    after it, joined by spaces and cut to 100 characters.
pub fn extract_experience(vocabulary: &Vocabulary, text: &str) -> String {
    if let Some(found) = vocabulary.duration().find(text) {
        return found.as_str().to_string();
    }

    let lines: Vec<&str> = text.lines().collect();
    for (idx, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();
        if vocabulary
            .experience_keywords()
            .iter()
            .any(|keyword| lower.contains(keyword.as_str()))
        {
            let end = (idx + 3).min(lines.len());
            let summary = lines[idx..end].join(" ");
            return truncate_chars(&summary, EXPERIENCE_SUMMARY_CHARS);
        }
    }

    NOT_SPECIFIED.to_string()
}

/// Strip embedded NUL bytes and surrounding whitespace. Postgres `text`
/// columns reject NUL, so this runs on every extracted string before it
/// reaches the storage layer.
pub fn sanitize(text: &str) -> String {
    text.replace('\0', "").trim().to_string()
}

/// [`sanitize`] applied per entry, dropping entries that end up empty.
pub fn sanitize_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| sanitize(item))
        .filter(|item| !item.is_empty())
        .collect()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
