use universe_map::{ConfidenceBand, MappingError, MappingState};
use universe_taxonomy::default_taxonomy;

fn state(names: &[&str]) -> MappingState {
    let headers = names.iter().map(|name| name.to_string()).collect();
    MappingState::from_suggestions(default_taxonomy().unwrap(), headers)
}

#[test]
fn manual_mapping_recomputes_score() {
    let mut state = state(&["Full Name", "City"]);
    assert!(state.mapping().get("Full Name").is_none());

    let previous = state.set_mapping("Full Name", Some("first_name")).unwrap();
    assert!(previous.is_none());

    let entry = state.mapping().get("Full Name").unwrap();
    assert_eq!(entry.target_field, "first_name");
    assert!((entry.score - 5.0 / 9.0).abs() < 1e-12);
    assert_eq!(state.band_for("Full Name"), Some(ConfidenceBand::Low));
}

#[test]
fn remapping_replaces_score() {
    let mut state = state(&["City"]);
    assert_eq!(state.mapping().score_for("City"), Some(1.0));

    let previous = state.set_mapping("City", Some("state")).unwrap().unwrap();
    assert_eq!(previous.target_field, "city");
    assert_eq!(state.mapping().target_for("City"), Some("state"));
    assert!((state.mapping().score_for("City").unwrap() - 0.2).abs() < 1e-12);
}

#[test]
fn clearing_removes_entry_and_score() {
    let mut state = state(&["City", "Phone"]);
    let removed = state.set_mapping("City", None).unwrap().unwrap();
    assert_eq!(removed.target_field, "city");
    assert!(state.mapping().get("City").is_none());
    assert_eq!(state.mapping().score_for("City"), None);
    assert_eq!(state.band_for("City"), None);
    assert_eq!(state.unmapped_headers(), vec!["City"]);

    // clearing again is a no-op
    assert!(state.set_mapping("City", None).unwrap().is_none());
}

#[test]
fn rejects_unknown_field_without_changing_state() {
    let mut state = state(&["City"]);
    let before = state.mapping().clone();
    let err = state.set_mapping("City", Some("favourite_colour")).unwrap_err();
    assert_eq!(
        err,
        MappingError::UnknownField {
            field: "favourite_colour".to_string()
        }
    );
    assert_eq!(state.mapping(), &before);
}

#[test]
fn rejects_unknown_header() {
    let mut state = state(&["City"]);
    let err = state.set_mapping("Town", Some("city")).unwrap_err();
    assert!(matches!(err, MappingError::UnknownHeader { .. }));
    assert!(!state.mapping().contains_header("Town"));
}

#[test]
fn manual_edits_do_not_enforce_one_to_one() {
    let mut state = state(&["City", "Town"]);
    state.set_mapping("Town", Some("city")).unwrap();

    assert_eq!(state.mapping().target_for("City"), Some("city"));
    assert_eq!(state.mapping().target_for("Town"), Some("city"));
    assert_eq!(state.conflicts().len(), 1);
    assert_eq!(state.summary().conflicts, 1);
}

#[test]
fn reset_is_idempotent() {
    let mut state = state(&["City", "Phone", "ZIP"]);
    assert_eq!(state.mapping().len(), 3);

    state.reset();
    assert!(state.mapping().is_empty());
    assert!(state.mapping().entries().next().is_none());

    state.reset();
    assert!(state.mapping().is_empty());
    assert_eq!(state.unmapped_headers().len(), 3);
    assert_eq!(state.unmapped_fields().len(), state.taxonomy().len());
}

#[test]
fn auto_map_restores_suggestions() {
    let mut state = state(&["City", "Phone"]);
    state.reset();
    let result = state.auto_map();
    assert_eq!(result.mapping.len(), 2);
    assert_eq!(state.mapping(), &result.mapping);
}

#[test]
fn summary_counts_bands() {
    let state = state(&["City", "Phone", "Qqq"]);
    let summary = state.summary();
    assert_eq!(summary.total_headers, 3);
    assert_eq!(summary.mapped, 2);
    assert_eq!(summary.unmapped_headers, 1);
    assert_eq!(summary.unmapped_fields, state.taxonomy().len() - 2);
    assert_eq!(summary.high, 1);
    assert_eq!(summary.medium, 1);
    assert_eq!(summary.low, 0);
}

#[test]
fn rows_follow_file_order() {
    let state = state(&["Phone", "Qqq", "City"]);
    let rows = state.rows();
    let order: Vec<&str> = rows.iter().map(|row| row.header.as_str()).collect();
    assert_eq!(order, vec!["Phone", "Qqq", "City"]);

    assert_eq!(rows[0].label.as_deref(), Some("Phone Number"));
    assert_eq!(rows[0].band, Some(ConfidenceBand::Medium));
    assert!(rows[1].field.is_none());
    assert!(rows[1].band.is_none());
    assert_eq!(rows[2].score, Some(1.0));
}

#[test]
fn stored_field_map_shape() {
    let mut state = state(&["E-mail", "Phone", "City", "ZIP", "Notes"]);
    state.set_mapping("Notes", None).unwrap();
    let mapping = state.into_mapping();

    insta::assert_json_snapshot!(mapping.field_map(), @r#"
    {
      "City": "city",
      "E-mail": "email_address",
      "Phone": "phone_number",
      "ZIP": "zip"
    }
    "#);
}
