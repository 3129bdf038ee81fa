//! Input validation rules
//!
//! Pure checks applied by the ledger book before any state changes.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::core::models::{Amount, MAX_SCORE, RatingScores};
use crate::error::{LedgerError, Result};

/// Longest accepted rating feedback, in characters
pub const MAX_FEEDBACK_CHARS: usize = 1000;

/// Longest accepted skill name, in characters
pub const MAX_SKILL_CHARS: usize = 40;

/// Longest accepted issue reference, in characters
pub const MAX_ISSUE_CHARS: usize = 512;

const GITHUB_PREFIXES: [&str; 2] = ["https://github.com/", "http://github.com/"];

/// A bounty amount must be positive
pub fn validate_amount(amount: Amount) -> Result<()> {
    if amount.is_zero() {
        return Err(LedgerError::InvalidAmount("amount must be greater than zero".to_string()));
    }
    Ok(())
}

/// A deadline must lie strictly after `now`
pub fn validate_deadline(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
    if deadline <= now {
        return Err(LedgerError::InvalidDeadline(format!(
            "{} is not in the future",
            deadline.to_rfc3339()
        )));
    }
    Ok(())
}

/// Normalise a repository reference to `owner/name`
///
/// Accepts `owner/name`, a GitHub URL, and an optional `.git` suffix.
pub fn normalize_repository(repository: &str) -> Result<String> {
    let mut repo = repository.trim();
    for prefix in GITHUB_PREFIXES {
        if let Some(rest) = repo.strip_prefix(prefix) {
            repo = rest;
        }
    }
    let repo = repo.trim_end_matches('/');
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    let mut parts = repo.split('/');
    let (Some(owner), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(LedgerError::InvalidRepository(format!(
            "{repository} (expected owner/name)"
        )));
    };

    let valid = |segment: &str| {
        !segment.is_empty()
            && segment.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };
    if !valid(owner) || !valid(name) {
        return Err(LedgerError::InvalidRepository(repository.to_string()));
    }

    Ok(format!("{owner}/{name}"))
}

/// An issue reference must be a single non-empty token
pub fn validate_issue(issue: &str) -> Result<()> {
    let issue = issue.trim();
    if issue.is_empty() {
        return Err(LedgerError::InvalidIssue("issue reference is empty".to_string()));
    }
    if issue.chars().count() > MAX_ISSUE_CHARS {
        return Err(LedgerError::InvalidIssue(format!(
            "longer than {MAX_ISSUE_CHARS} characters"
        )));
    }
    if issue.chars().any(char::is_whitespace) {
        return Err(LedgerError::InvalidIssue(format!("{issue} (contains whitespace)")));
    }
    Ok(())
}

/// Every score must lie in `0..=MAX_SCORE` and feedback must be bounded
pub fn validate_scores(scores: &RatingScores) -> Result<()> {
    let names = ["code quality", "communication", "timeliness", "reliability"];
    for (name, score) in names.iter().zip(scores.scores()) {
        if score > MAX_SCORE {
            return Err(LedgerError::InvalidRating(format!(
                "{name} score {score} is outside 0..={MAX_SCORE}"
            )));
        }
    }
    if scores.feedback.chars().count() > MAX_FEEDBACK_CHARS {
        return Err(LedgerError::InvalidRating(format!(
            "feedback longer than {MAX_FEEDBACK_CHARS} characters"
        )));
    }
    Ok(())
}

/// Normalise a skill name: trimmed, lowercase, inner whitespace collapsed
pub fn normalize_skill(skill: &str) -> Result<String> {
    let normalized = skill.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();

    if normalized.is_empty() {
        return Err(LedgerError::InvalidSkill("skill is empty".to_string()));
    }
    if normalized.chars().count() > MAX_SKILL_CHARS {
        return Err(LedgerError::InvalidSkill(format!(
            "{skill} (longer than {MAX_SKILL_CHARS} characters)"
        )));
    }
    if !normalized
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '+' | '#' | '.' | '-' | '_'))
    {
        return Err(LedgerError::InvalidSkill(format!("{skill} (unsupported character)")));
    }

    Ok(normalized)
}

/// Normalise a list of skills into a set, rejecting the first invalid one
pub fn normalize_skills<S: AsRef<str>>(skills: &[S]) -> Result<BTreeSet<String>> {
    skills.iter().map(|s| normalize_skill(s.as_ref())).collect()
}
