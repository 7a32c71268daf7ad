//! osler-rubric
//!
//! The clinical-interview scoring rubric. Pure data and a pure scorer —
//! no dependency on how tags were produced, so the deterministic engine,
//! the LLM-backed engine, and any external reporting layer all score
//! identically.
//!
//! Tag spellings here are the join key with engine output. They are fixed
//! historical strings (note `asked_sdoH_transport`) and changing one
//! silently zeroes that rubric item for every session.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One rubric line: the tag that earns it, its point weight, and the
/// human-readable label shown in score reports.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RubricItem {
    pub tag: &'static str,
    pub weight: f64,
    pub label: &'static str,
}

/// The full rubric, in report order. Total achievable score is 9.5.
pub const RUBRIC: &[RubricItem] = &[
    RubricItem { tag: "asked_onset", weight: 1.0, label: "Asked onset/timeline" },
    RubricItem { tag: "asked_mechanism", weight: 1.0, label: "Clarified mechanism/context" },
    RubricItem { tag: "asked_location", weight: 0.5, label: "Clarified pain location" },
    RubricItem { tag: "asked_severity", weight: 0.5, label: "Quantified severity (NRS)" },
    RubricItem { tag: "asked_aggravators", weight: 1.0, label: "Identified aggravating factors" },
    RubricItem { tag: "asked_easers", weight: 1.0, label: "Identified easing factors" },
    RubricItem { tag: "asked_24h_pattern", weight: 0.5, label: "Explored 24-hour pattern" },
    RubricItem { tag: "screened_red_flags", weight: 2.0, label: "Screened red flags" },
    RubricItem { tag: "asked_work_status", weight: 0.5, label: "Checked work/role demands" },
    RubricItem { tag: "asked_sdoH_transport", weight: 0.5, label: "Checked transport/access" },
    RubricItem { tag: "asked_goals", weight: 1.0, label: "Established patient goals" },
    RubricItem { tag: "asked_exam", weight: 1.5, label: "Discussed or referenced exam findings" },
];

/// Per-item scoring detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreDetail {
    pub item: String,
    pub label: String,
    pub hit: bool,
    pub points: f64,
    pub max: f64,
}

/// A full score report for one session's accumulated tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Total points earned, rounded to 2 decimals.
    pub score: f64,
    /// Sum of all rubric weights, rounded to 2 decimals.
    pub max: f64,
    /// `100 * score / max`, rounded to 1 decimal.
    pub percent: f64,
    pub details: Vec<ScoreDetail>,
}

/// Sum of all rubric weights.
pub fn max_score() -> f64 {
    RUBRIC.iter().map(|item| item.weight).sum()
}

/// Score a session's accumulated tag history against the rubric.
///
/// Duplicates and ordering are ignored: the tag list is reduced to a set,
/// and each rubric item scores its full weight if its tag is present, else
/// zero. Tags outside the rubric vocabulary (e.g. `shared_cc`,
/// `guardrails_invoked`) contribute nothing.
pub fn score_from_tags<S: AsRef<str>>(tags: &[S]) -> ScoreReport {
    let tag_set: HashSet<&str> = tags.iter().map(|t| t.as_ref()).collect();

    let mut total = 0.0;
    let mut details = Vec::with_capacity(RUBRIC.len());
    for item in RUBRIC {
        let hit = tag_set.contains(item.tag);
        let points = if hit { item.weight } else { 0.0 };
        total += points;
        details.push(ScoreDetail {
            item: item.tag.to_string(),
            label: item.label.to_string(),
            hit,
            points,
            max: item.weight,
        });
    }

    let max = max_score();
    ScoreReport {
        score: round_to(total, 2),
        max: round_to(max, 2),
        percent: round_to(100.0 * total / max, 1),
        details,
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
