//! Template-based reply composition: one patient-voiced sentence per hit
//! slot, populated from persona fields.
//!
//! Missing fields never fail the turn — each template degrades to generic
//! phrasing ("while being active", "recently") when the persona does not
//! script the detail.

use osler_core::models::persona::Persona;
use osler_core::models::tag::Tag;

use crate::slots::Slot;

/// Build the sentence and rubric tag for one slot. `None` for slots with
/// no composed content (currently only `summary`).
pub fn sentence_for(slot: Slot, persona: &Persona) -> Option<(String, Tag)> {
    let hpi = &persona.hpi;
    let sentence = match slot {
        Slot::Onset => format!("It started {}.", hpi.onset.as_deref().unwrap_or("recently")),
        Slot::Mechanism => format!(
            "It happened {}.",
            hpi.mechanism.as_deref().unwrap_or("while being active")
        ),
        Slot::Location => match hpi.location.as_deref() {
            Some(location) => format!("The pain is mostly in the {location}."),
            None => "The pain is mostly in the same area I described.".to_string(),
        },
        Slot::Severity => {
            let severity = hpi.severity_nrs.unwrap_or(5.0);
            format!("On a 0–10 scale it's about a {severity} right now.")
        }
        Slot::Aggravators => format!("It gets worse with {}.", list_or(&hpi.aggravators, "activity")),
        Slot::Easers => format!("It feels better with {}.", list_or(&hpi.easers, "rest")),
        Slot::Pattern => format!(
            "Over 24 hours: {}",
            hpi.pattern_24h.as_deref().unwrap_or("it comes and goes.")
        ),
        Slot::RedFlags => {
            if hpi.red_flags.is_empty() {
                "I haven't noticed anything scary—no numbness, no tingling, no fever, \
                 nothing like that."
                    .to_string()
            } else {
                format!("I have noticed: {}", hpi.red_flags.join(", "))
            }
        }
        Slot::Goals => {
            if persona.goals.is_empty() {
                "My goals are: getting back to my usual activities.".to_string()
            } else {
                format!("My goals are: {}", persona.goals.join("; "))
            }
        }
        Slot::Work => format!(
            "For work, I'm currently {}.",
            persona.context.work_status.as_deref().unwrap_or("no restrictions")
        ),
        Slot::Transport => format!(
            "Getting to visits: my transportation is {}.",
            persona.sdoh.transport.as_deref().unwrap_or("reliable")
        ),
        Slot::Summary => return None,
        Slot::Exam => {
            let exam = &persona.exam_script;
            let observation = exam
                .observation
                .as_deref()
                .unwrap_or("nothing obvious to report");
            let specials = if exam.special_tests.is_empty() {
                "no special test findings reported".to_string()
            } else {
                exam.special_tests
                    .iter()
                    .take(3)
                    .map(|(name, finding)| format!("{name}: {finding}"))
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            format!("From the exam: {observation}. Special tests: {specials}.")
        }
    };

    // sentence_for only reaches here for tagged slots
    slot.tag().map(|tag| (sentence, tag))
}

fn list_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}
