use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Recognized skill terms, in the order results are reported. Entries are
/// the canonical casing echoed back to callers.
const SKILL_TERMS: &[&str] = &[
    // Programming languages
    "javascript", "typescript", "python", "java", "c++", "c#", "ruby", "php", "swift", "kotlin",
    "go", "rust",
    // Frontend
    "react", "angular", "vue", "html", "css", "sass", "tailwind", "bootstrap", "jquery", "webpack",
    "vite",
    // Backend
    "node.js", "express", "nestjs", "django", "flask", "spring", "laravel", ".net", "fastapi",
    // Databases
    "postgresql", "mysql", "mongodb", "redis", "elasticsearch", "dynamodb", "sqlite", "oracle",
    // Cloud & DevOps
    "aws", "azure", "gcp", "docker", "kubernetes", "jenkins", "gitlab", "github actions",
    "terraform", "ansible",
    // Process & other
    "git", "rest api", "graphql", "microservices", "agile", "scrum", "jira", "testing", "jest",
    "cypress",
];

const EDUCATION_KEYWORDS: &[&str] = &[
    "bachelor", "master", "phd", "doctorate", "diploma", "degree", "b.tech", "m.tech", "b.sc",
    "m.sc", "mba", "bba", "engineering",
];

const EXPERIENCE_KEYWORDS: &[&str] = &["experience", "work history"];

/// Duration mentions such as "5 years", "3+ yrs", "1 year".
const DURATION_PATTERN: &str = r"(?i)\d+\+?\s*(?:years?|yrs?)";

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("failed to read vocabulary file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse vocabulary file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid duration pattern: {0}")]
    BadDurationPattern(#[from] regex::Error),
    #[error("vocabulary must declare at least one skill term")]
    EmptySkills,
}

/// On-disk override format for `CM_VOCABULARY_PATH`. Omitted sections fall
/// back to the built-in lists.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VocabularyFile {
    pub skills: Option<Vec<String>>,
    pub education_keywords: Option<Vec<String>>,
    pub experience_keywords: Option<Vec<String>>,
    pub duration_pattern: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SkillPattern {
    term: String,
    pattern: Regex,
}

impl SkillPattern {
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// The controlled vocabulary driving the field extractor. Constructed once
/// (patterns pre-compiled) and shared read-only across requests.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    skills: Vec<SkillPattern>,
    education_keywords: Vec<String>,
    experience_keywords: Vec<String>,
    duration: Regex,
}

lazy_static! {
    static ref BUILTIN: Vocabulary = Vocabulary::build(
        SKILL_TERMS.iter().map(|term| term.to_string()).collect(),
        EDUCATION_KEYWORDS.iter().map(|kw| kw.to_string()).collect(),
        EXPERIENCE_KEYWORDS.iter().map(|kw| kw.to_string()).collect(),
        DURATION_PATTERN,
    )
    .unwrap();
}

impl Default for Vocabulary {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl Vocabulary {
    /// Built-in vocabulary unless `CM_VOCABULARY_PATH` points at a JSON
    /// override. A broken override logs a warning and falls back rather than
    /// taking the parser down.
    pub fn from_env() -> Self {
        match std::env::var("CM_VOCABULARY_PATH") {
            Ok(path) => match Self::from_json_file(&path) {
                Ok(vocabulary) => vocabulary,
                Err(err) => {
                    warn!(error = %err, path, "invalid vocabulary override; using built-in lists");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        let raw = std::fs::read_to_string(path)?;
        let file: VocabularyFile = serde_json::from_str(&raw)?;
        Self::from_file(file)
    }

    pub fn from_file(file: VocabularyFile) -> Result<Self, VocabularyError> {
        let skills = file
            .skills
            .unwrap_or_else(|| SKILL_TERMS.iter().map(|term| term.to_string()).collect());
        let education = file
            .education_keywords
            .unwrap_or_else(|| EDUCATION_KEYWORDS.iter().map(|kw| kw.to_string()).collect());
        let experience = file
            .experience_keywords
            .unwrap_or_else(|| EXPERIENCE_KEYWORDS.iter().map(|kw| kw.to_string()).collect());
        let duration = file.duration_pattern.as_deref().unwrap_or(DURATION_PATTERN);

        Self::build(skills, education, experience, duration)
    }

    fn build(
        skills: Vec<String>,
        education_keywords: Vec<String>,
        experience_keywords: Vec<String>,
        duration_pattern: &str,
    ) -> Result<Self, VocabularyError> {
        let mut patterns = Vec::with_capacity(skills.len());
        let mut seen = std::collections::HashSet::new();

        for term in skills {
            let term = term.trim().to_string();
            if term.is_empty() || !seen.insert(term.to_lowercase()) {
                continue;
            }
            let pattern = compile_skill_pattern(&term)?;
            patterns.push(SkillPattern { term, pattern });
        }

        if patterns.is_empty() {
            return Err(VocabularyError::EmptySkills);
        }

        Ok(Self {
            skills: patterns,
            education_keywords: lowercase_all(education_keywords),
            experience_keywords: lowercase_all(experience_keywords),
            duration: Regex::new(duration_pattern)?,
        })
    }

    pub fn skills(&self) -> &[SkillPattern] {
        &self.skills
    }

    pub fn education_keywords(&self) -> &[String] {
        &self.education_keywords
    }

    pub fn experience_keywords(&self) -> &[String] {
        &self.experience_keywords
    }

    pub fn duration(&self) -> &Regex {
        &self.duration
    }
}

fn lowercase_all(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Whole-word pattern for one skill term. Word boundaries are only anchored
/// where the term itself starts or ends with a word character; a blanket
/// `\b` around terms like "c++" or ".net" would never match because the
/// boundary assertion fails next to punctuation.
fn compile_skill_pattern(term: &str) -> Result<Regex, regex::Error> {
    let escaped = regex::escape(&term.to_lowercase());

    let mut pattern = String::from("(?i)");
    if term.chars().next().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&escaped);
    if term.chars().last().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }

    Regex::new(&pattern)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_vocabulary_dedupes_and_keeps_order() {
        let vocabulary = Vocabulary::default();
        let terms: Vec<&str> = vocabulary.skills().iter().map(|s| s.term()).collect();

        assert_eq!(terms.len(), SKILL_TERMS.len());
        assert_eq!(terms.first(), Some(&"javascript"));
        assert_eq!(terms.last(), Some(&"cypress"));
    }

    #[test]
    fn special_character_terms_match_literally() {
        let vocabulary = Vocabulary::default();
        let find = |term: &str| {
            vocabulary
                .skills()
                .iter()
                .find(|s| s.term() == term)
                .unwrap()
        };

        assert!(find("c++").matches("Fluent in C++ and Python"));
        assert!(find("c#").matches("backend in c# services"));
        assert!(find("node.js").matches("APIs with Node.js"));
        assert!(find(".net").matches("ASP.NET stack"));
        // "c" alone must not be promoted by the "c++" pattern.
        assert!(!find("c++").matches("plain c code"));
    }

    #[test]
    fn file_override_replaces_builtin_lists() {
        let file = VocabularyFile {
            skills: Some(vec!["cobol".into(), "fortran".into(), "cobol".into()]),
            education_keywords: Some(vec!["Licenciatura".into()]),
            experience_keywords: None,
            duration_pattern: None,
        };

        let vocabulary = Vocabulary::from_file(file).unwrap();
        let terms: Vec<&str> = vocabulary.skills().iter().map(|s| s.term()).collect();
        assert_eq!(terms, vec!["cobol", "fortran"]);
        assert_eq!(vocabulary.education_keywords(), ["licenciatura"]);
        assert_eq!(vocabulary.experience_keywords(), ["experience", "work history"]);
    }

    #[test]
    fn empty_skill_list_is_rejected() {
        let file = VocabularyFile {
            skills: Some(vec!["   ".into()]),
            education_keywords: None,
            experience_keywords: None,
            duration_pattern: None,
        };

        assert!(matches!(
            Vocabulary::from_file(file),
            Err(VocabularyError::EmptySkills)
        ));
    }
}
