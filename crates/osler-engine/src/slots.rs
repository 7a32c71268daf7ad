//! Slot detection: maps free-text learner input to clinical-interview
//! topics using a fixed table of ordered patterns.
//!
//! This is a non-exclusive classifier. Slots are independent, several may
//! fire on one input, and there is no priority or mutual exclusion: a slot
//! is hit if any of its patterns matches anywhere in the lowercased input.

use std::sync::LazyLock;

use regex::Regex;

use osler_core::models::tag::Tag;

/// A clinical-interview topic the learner can touch on.
///
/// `ALL` defines the canonical table order; the composer always emits
/// sentences in this order regardless of where the phrases appeared in
/// the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Onset,
    Mechanism,
    Location,
    Severity,
    Aggravators,
    Easers,
    Pattern,
    RedFlags,
    Goals,
    Work,
    Transport,
    Summary,
    Exam,
}

impl Slot {
    pub const ALL: &'static [Slot] = &[
        Slot::Onset,
        Slot::Mechanism,
        Slot::Location,
        Slot::Severity,
        Slot::Aggravators,
        Slot::Easers,
        Slot::Pattern,
        Slot::RedFlags,
        Slot::Goals,
        Slot::Work,
        Slot::Transport,
        Slot::Summary,
        Slot::Exam,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Slot::Onset => "onset",
            Slot::Mechanism => "mechanism",
            Slot::Location => "location",
            Slot::Severity => "severity",
            Slot::Aggravators => "aggravators",
            Slot::Easers => "easers",
            Slot::Pattern => "pattern",
            Slot::RedFlags => "red_flags",
            Slot::Goals => "goals",
            Slot::Work => "work",
            Slot::Transport => "transport",
            Slot::Summary => "summary",
            Slot::Exam => "exam",
        }
    }

    /// The rubric tag this slot earns when composed into a reply.
    ///
    /// The mapping is an irregular fixed vocabulary, not a mechanical
    /// transform (`transport` earns `asked_sdoH_transport`, `red_flags`
    /// earns `screened_red_flags`). `summary` carries no tag.
    pub fn tag(&self) -> Option<Tag> {
        match self {
            Slot::Onset => Some(Tag::AskedOnset),
            Slot::Mechanism => Some(Tag::AskedMechanism),
            Slot::Location => Some(Tag::AskedLocation),
            Slot::Severity => Some(Tag::AskedSeverity),
            Slot::Aggravators => Some(Tag::AskedAggravators),
            Slot::Easers => Some(Tag::AskedEasers),
            Slot::Pattern => Some(Tag::Asked24hPattern),
            Slot::RedFlags => Some(Tag::ScreenedRedFlags),
            Slot::Goals => Some(Tag::AskedGoals),
            Slot::Work => Some(Tag::AskedWorkStatus),
            Slot::Transport => Some(Tag::AskedSdohTransport),
            Slot::Summary => None,
            Slot::Exam => Some(Tag::AskedExam),
        }
    }
}

/// Patterns are matched against lowercased input, so they are written in
/// lowercase.
const SLOT_PATTERNS: &[(Slot, &[&str])] = &[
    (Slot::Onset, &[r"\bonset\b", r"\bstart(ed)?\b", r"\bwhen did\b", r"\bsince\b"]),
    (
        Slot::Mechanism,
        &[
            r"\bhow happen(ed)?\b",
            r"\bhow did (it|this|that) happen\b",
            r"\bmechanism\b",
            r"\bwhat were you doing\b",
            r"\binjur(ed|y)\b",
        ],
    ),
    (Slot::Location, &[r"\bwhere\b", r"\blocation\b", r"\bexactly hurts?\b"]),
    (
        Slot::Severity,
        &[
            r"\bsever(ity|e)\b",
            r"\b(0|1|2|3|4|5|6|7|8|9|10)\b.*\bpain\b",
            r"\bpain scale\b",
            r"\bhow bad\b",
            r"\b(0|zero) (to|-) ?(10|ten)\b",
            r"\bout of (10|ten)\b",
        ],
    ),
    (Slot::Aggravators, &[r"\bwhat makes.*worse\b", r"\bworse with\b", r"aggravat"]),
    (Slot::Easers, &[r"\bwhat helps\b", r"\bbetter with\b", r"reliev"]),
    (Slot::Pattern, &[r"\b24.?hour\b", r"\bmorning\b", r"\bat night\b", r"\bpattern\b"]),
    (
        Slot::RedFlags,
        &[
            r"\bred flag",
            r"\bnumb|tingl",
            r"\bsaddle\b",
            r"\bfever\b",
            r"\bunexplained\b",
            r"\bweight loss\b",
        ],
    ),
    (
        Slot::Goals,
        &[r"\bgoal", r"\bwhat do you want to get back to\b", r"\breturn to\b"],
    ),
    (Slot::Work, &[r"\bwork\b", r"\bjob\b", r"\bduty\b", r"\brestriction"]),
    (
        Slot::Transport,
        &[r"\btransport\b", r"\bdrive\b", r"\brides?\b", r"\bget here\b"],
    ),
    (Slot::Summary, &[r"\bsummar(y|ize)\b", r"\brecap\b", r"\blet me make sure\b"]),
    (
        Slot::Exam,
        &[
            r"\btest\b",
            r"\bexam\b",
            r"\bpalpate\b",
            r"\brange\b",
            r"\barom\b",
            r"\border\b",
            r"\bdo.*(drawer|tilt|hawkins|neer|patell)",
        ],
    ),
];

static COMPILED: LazyLock<Vec<(Slot, Vec<Regex>)>> = LazyLock::new(|| {
    SLOT_PATTERNS
        .iter()
        .map(|(slot, patterns)| {
            let compiled = patterns
                .iter()
                .map(|p| Regex::new(p).expect("slot pattern must compile"))
                .collect();
            (*slot, compiled)
        })
        .collect()
});

/// Detect which slots the input touches. Each hit slot appears at most
/// once, in canonical table order. Deterministic, no side effects.
pub fn detect_slots(user_text: &str) -> Vec<Slot> {
    let text = user_text.to_lowercase();
    COMPILED
        .iter()
        .filter(|(_, patterns)| patterns.iter().any(|p| p.is_match(&text)))
        .map(|(slot, _)| *slot)
        .collect()
}
