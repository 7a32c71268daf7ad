use osler_rubric::{RUBRIC, max_score, score_from_tags};

#[test]
fn empty_tags_score_zero() {
    let report = score_from_tags::<&str>(&[]);
    assert_eq!(report.score, 0.0);
    assert_eq!(report.percent, 0.0);
    assert_eq!(report.max, 9.5);
    assert_eq!(report.details.len(), RUBRIC.len());
    assert!(report.details.iter().all(|d| !d.hit && d.points == 0.0));
}

#[test]
fn max_score_is_nine_and_a_half() {
    assert_eq!(max_score(), 9.5);
}

#[test]
fn duplicates_and_order_do_not_change_the_score() {
    let once = score_from_tags(&["asked_onset", "screened_red_flags"]);
    let shuffled = score_from_tags(&["screened_red_flags", "asked_onset"]);
    let repeated = score_from_tags(&[
        "asked_onset",
        "asked_onset",
        "screened_red_flags",
        "asked_onset",
        "screened_red_flags",
    ]);

    assert_eq!(once.score, 3.0);
    assert_eq!(shuffled.score, once.score);
    assert_eq!(repeated.score, once.score);
    assert_eq!(repeated.percent, once.percent);
}

#[test]
fn full_house_scores_one_hundred_percent() {
    let all_tags: Vec<&str> = RUBRIC.iter().map(|item| item.tag).collect();
    let report = score_from_tags(&all_tags);
    assert_eq!(report.score, 9.5);
    assert_eq!(report.percent, 100.0);
    assert!(report.details.iter().all(|d| d.hit));
}

#[test]
fn non_rubric_tags_contribute_nothing() {
    let report = score_from_tags(&["shared_cc", "guardrails_invoked", "interpreter_needed"]);
    assert_eq!(report.score, 0.0);
}

#[test]
fn irregular_transport_spelling_is_the_join_key() {
    // The historical casing must match exactly; a "fixed" spelling
    // would silently zero the item.
    let hit = score_from_tags(&["asked_sdoH_transport"]);
    assert_eq!(hit.score, 0.5);

    let miss = score_from_tags(&["asked_sdoh_transport"]);
    assert_eq!(miss.score, 0.0);
}

#[test]
fn weighted_subset_rounds_like_the_report_layer() {
    // 1.0 + 0.5 + 2.0 = 3.5 of 9.5 -> 36.8%
    let report = score_from_tags(&["asked_onset", "asked_location", "screened_red_flags"]);
    assert_eq!(report.score, 3.5);
    assert_eq!(report.percent, 36.8);
}
