#![allow(clippy::pedantic)]
use labelled_rs::{
    Dataset, LabelSet, LabelledVector, MissingSpec, SearchOptions, Substring, ValueType,
    long_rows, look_for,
};
use regex::Regex;

fn vectors() -> Vec<LabelledVector> {
    let health = LabelledVector::from_numbers("health", [Some(1.0), Some(2.0), Some(9.0)])
        .unwrap()
        .with_variable_label("health status")
        .with_labels(LabelSet::from_pairs([(1.0, "Good"), (2.0, "Fair")]))
        .unwrap()
        .with_missing(MissingSpec::discrete([9.0]))
        .unwrap();

    let income = LabelledVector::from_numbers("income", [Some(1000.0), Some(2000.0)])
        .unwrap()
        .with_variable_label("household income");

    let mood = LabelledVector::from_numbers("mood", [Some(1.0), Some(2.0)])
        .unwrap()
        .with_variable_label("self-reported mood")
        .with_labels(LabelSet::from_pairs([
            (1.0, "in good spirits"),
            (2.0, "low"),
        ]))
        .unwrap();

    vec![health, income, mood]
}

#[test]
fn variable_labels_match_regardless_of_value_labels() {
    let matches = look_for(&vectors(), &Substring::new("heal"), &SearchOptions::new());
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].variable, "health");
    assert_eq!(matches[0].variable_label.as_deref(), Some("health status"));
    assert_eq!(matches[0].value_type, ValueType::Numeric);
    assert!(matches[0].values.is_empty());
}

#[test]
fn value_labels_match_only_when_requested() {
    let narrow = look_for(&vectors(), &Substring::new("Good"), &SearchOptions::new());
    assert!(narrow.is_empty());

    let options = SearchOptions::new().with_search_values(true);
    let wide = look_for(&vectors(), &Substring::new("ood"), &options);
    let names: Vec<&str> = wide.iter().map(|m| m.variable.as_str()).collect();
    assert_eq!(names, vec!["health", "mood"]);
    assert_eq!(wide[0].values.len(), 1);
    assert_eq!(wide[0].values[0].value, "1");
    assert_eq!(wide[0].values[0].label, "Good");
}

#[test]
fn no_match_returns_empty_not_error() {
    let matches = look_for(
        &vectors(),
        &Substring::new("no such label"),
        &SearchOptions::new().with_search_values(true),
    );
    assert!(matches.is_empty());
}

#[test]
fn caller_supplied_regex_drives_matching() {
    let re = Regex::new(r"(?i)^HOUSEHOLD\b").unwrap();
    let matches = look_for(
        &vectors(),
        &|text: &str| re.is_match(text),
        &SearchOptions::new(),
    );
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].variable, "income");
}

#[test]
fn long_rows_expand_value_hits() {
    let options = SearchOptions::new().with_search_values(true);
    let matches = look_for(&vectors(), &Substring::new("ood"), &options);
    let rows = long_rows(&matches);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].variable, "health");
    assert_eq!(rows[0].value.as_deref(), Some("1"));
    assert_eq!(rows[0].value_label.as_deref(), Some("Good"));
    assert_eq!(rows[1].variable, "mood");
    assert_eq!(rows[1].value_label.as_deref(), Some("in good spirits"));
}

#[test]
fn variable_only_match_yields_single_row() {
    let matches = look_for(&vectors(), &Substring::new("heal"), &SearchOptions::new());
    let rows = long_rows(&matches);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value, None);
    assert_eq!(rows[0].value_label, None);
}

#[test]
fn report_serializes_to_json() {
    let matches = look_for(
        &vectors(),
        &Substring::new("heal"),
        &SearchOptions::new(),
    );
    let json = serde_json::to_value(&matches).unwrap();
    assert_eq!(json[0]["variable"], "health");
    assert_eq!(json[0]["value_type"], "Numeric");
}

#[test]
fn dataset_forwards_search() {
    let dataset = Dataset::new(vectors()).with_name("survey");
    let matches = dataset.look_for(&Substring::new("mood"), &SearchOptions::new());
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].variable, "mood");
    assert!(dataset.column("health").is_some());
    assert!(dataset.column("absent").is_none());
}
