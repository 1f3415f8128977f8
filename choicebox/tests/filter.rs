use choicebox::choice::Choice;
use choicebox::filter::{FilterMode, filter_choices, fuzzy_filter, substring_filter};

fn cities() -> Vec<Choice> {
    vec![
        Choice::new("1", "Lisboa"),
        Choice::new("2", "Porto"),
        Choice::new("3", "Faro"),
    ]
}

#[test]
fn test_empty_query_returns_all_in_order() {
    let choices = cities();
    let matches = filter_choices("", &choices, FilterMode::Substring);
    let indices: Vec<usize> = matches.iter().map(|m| m.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn test_substring_keeps_source_order() {
    let choices = cities();
    // "o" matches Lisboa and Porto and Faro? Faro has an o too.
    let matches = substring_filter("rto", &choices);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].index, 1);

    let matches = substring_filter("a", &choices);
    let indices: Vec<usize> = matches.iter().map(|m| m.index).collect();
    assert_eq!(indices, vec![0, 2]); // Lisboa, Faro in source order
}

#[test]
fn test_substring_is_case_insensitive() {
    let choices = cities();
    let matches = substring_filter("LISBOA", &choices);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].index, 0);

    let matches = substring_filter("faro", &choices);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].index, 2);
}

#[test]
fn test_substring_matches_description() {
    let choices: Vec<Choice> = vec![
        Choice::new("1", "Lisboa").with_description("Capital"),
        Choice::new("2", "Porto"),
    ];
    let matches = substring_filter("capital", &choices);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].index, 0);
}

#[test]
fn test_substring_never_matches_value() {
    // Identity string is not display text.
    let choices: Vec<Choice> = vec![Choice::new("hidden-id", "Visible")];
    let matches = substring_filter("hidden", &choices);
    assert!(matches.is_empty());
}

#[test]
fn test_no_matches_yields_empty() {
    let choices = cities();
    let matches = filter_choices("xyz", &choices, FilterMode::Substring);
    assert!(matches.is_empty());
}

#[test]
fn test_fuzzy_scores_and_sorts() {
    let choices: Vec<Choice> = vec![
        Choice::new("1", "apple"),
        Choice::new("2", "banana"),
        Choice::new("3", "apricot"),
    ];
    let matches = fuzzy_filter("ap", &choices);
    assert_eq!(matches.len(), 2);
    let indices: Vec<usize> = matches.iter().map(|m| m.index).collect();
    assert!(indices.contains(&0));
    assert!(indices.contains(&2));
    // Sorted best-first.
    assert!(matches[0].score >= matches[1].score);
}

#[test]
fn test_fuzzy_empty_query_returns_all() {
    let choices = cities();
    let matches = filter_choices("", &choices, FilterMode::Fuzzy);
    assert_eq!(matches.len(), 3);
}
