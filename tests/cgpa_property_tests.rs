//! Property-based tests for the CGPA engine.

use bteb_results::cgpa::{cgpa_from_entries, compute_cgpa, parse_gpa, weighted_cgpa, SemesterEntry};
use bteb_results::regulation::{Regulation, WeightTable, SEMESTER_COUNT};
use proptest::prelude::*;
use quickcheck::QuickCheck;

fn regulation_strategy() -> impl Strategy<Value = Regulation> {
    prop::sample::select(Regulation::ALL.to_vec())
}

/// GPAs in whole hundredths, so the expected display is unambiguous.
fn gpa_strategy() -> impl Strategy<Value = f64> {
    (0u32..=400).prop_map(|n| f64::from(n) / 100.0)
}

fn slots(values: &[(usize, &str)]) -> Vec<Option<String>> {
    let mut slots = vec![None; SEMESTER_COUNT];
    for (position, text) in values {
        slots[position - 1] = Some(text.to_string());
    }
    slots
}

proptest! {
    // A single populated semester's weight cancels out.
    #[test]
    fn prop_single_semester_is_its_own_cgpa(
        regulation in regulation_strategy(),
        position in 1usize..=SEMESTER_COUNT,
        gpa in gpa_strategy(),
    ) {
        let result = cgpa_from_entries(
            regulation,
            &[SemesterEntry { semester: position, gpa: Some(gpa) }],
        );
        prop_assert!((result.value - gpa).abs() < 1e-9);
        prop_assert_eq!(result.to_string(), format!("{gpa:.2}"));
        prop_assert_eq!(result.semesters_counted, 1);
    }

    // Uniform input is invariant under any weighting.
    #[test]
    fn prop_uniform_input_ignores_weights(
        regulation in regulation_strategy(),
        gpa in gpa_strategy(),
    ) {
        let gpas = [Some(gpa); SEMESTER_COUNT];
        let result = weighted_cgpa(&regulation.weight_table(), &gpas);
        prop_assert!((result.value - gpa).abs() < 1e-9);
        prop_assert_eq!(result.to_string(), format!("{gpa:.2}"));
        prop_assert_eq!(result.total_weight, 100);
    }

    #[test]
    fn prop_out_of_range_equals_unset(
        regulation in regulation_strategy(),
        bad in prop_oneof![4.0001f64..1000.0, -1000.0f64..-0.0001],
        position in 1usize..=SEMESTER_COUNT,
        other in gpa_strategy(),
    ) {
        let other_position = if position == SEMESTER_COUNT { 1 } else { position + 1 };
        let bad_text = bad.to_string();
        let other_text = other.to_string();

        let with_bad = compute_cgpa(
            regulation.id(),
            &slots(&[(position, &bad_text), (other_position, &other_text)]),
        ).unwrap();
        let without = compute_cgpa(
            regulation.id(),
            &slots(&[(other_position, &other_text)]),
        ).unwrap();
        prop_assert_eq!(with_bad, without);
    }

    #[test]
    fn prop_result_stays_in_gpa_range(
        regulation in regulation_strategy(),
        gpas in prop::collection::vec(prop::option::of(gpa_strategy()), 0..=12),
    ) {
        let result = weighted_cgpa(&regulation.weight_table(), &gpas);
        prop_assert!((0.0..=4.0).contains(&result.value));
        prop_assert!(result.semesters_counted <= SEMESTER_COUNT);
    }

    #[test]
    fn prop_positions_past_eight_are_ignored(
        regulation in regulation_strategy(),
        gpas in prop::collection::vec(prop::option::of(gpa_strategy()), SEMESTER_COUNT),
        extra in prop::collection::vec(prop::option::of(gpa_strategy()), 1..5),
    ) {
        let mut longer = gpas.clone();
        longer.extend(extra);
        let table = regulation.weight_table();
        prop_assert_eq!(weighted_cgpa(&table, &gpas), weighted_cgpa(&table, &longer));
    }
}

#[test]
fn prop_compute_is_idempotent() {
    fn check(raw: Vec<Option<String>>, pick: u8) -> bool {
        let regulation = Regulation::ALL[usize::from(pick) % Regulation::ALL.len()];
        let first = compute_cgpa(regulation.id(), &raw).unwrap();
        let second = compute_cgpa(regulation.id(), &raw).unwrap();
        first == second || (first.value.is_nan() && second.value.is_nan())
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(check as fn(Vec<Option<String>>, u8) -> bool);
}

#[test]
fn prop_parse_gpa_only_accepts_valid_range() {
    fn check(input: String) -> bool {
        match parse_gpa(&input) {
            Some(gpa) => gpa.is_finite() && (0.0..=4.0).contains(&gpa),
            None => true,
        }
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(check as fn(String) -> bool);
}

#[test]
fn test_empty_input_is_zero_for_every_regulation() {
    for regulation in Regulation::ALL {
        let none: [Option<&str>; 0] = [];
        let result = compute_cgpa(regulation.id(), &none).unwrap();
        assert_eq!(result.to_string(), "0.00");

        let blanks = [Some(""), Some("  "), None, Some("n/a")];
        assert_eq!(compute_cgpa(regulation.id(), &blanks).unwrap().to_string(), "0.00");
    }
}

#[test]
fn test_documented_scenarios() {
    let result = compute_cgpa("2022", &[Some("3.0"), Some("3.5")]).unwrap();
    assert_eq!(result.total_weight, 10);
    assert_eq!(result.to_string(), "3.25");

    let result = compute_cgpa("2010", &slots(&[(7, "4.0")])).unwrap();
    assert_eq!(result.to_string(), "4.00");

    // 2016, semesters 1-3 weigh 5 each: (3 + 3 + 4) / 3
    let result = compute_cgpa("2016", &[Some("3"), Some("3"), Some("4")]).unwrap();
    assert_eq!(result.to_string(), "3.33");

    let result = compute_cgpa("2022", &[Some("-1"), Some("3.0")]).unwrap();
    assert_eq!(result, compute_cgpa("2022", &[None, Some("3.0")]).unwrap());
}

#[test]
fn test_short_table_weighs_missing_positions_as_zero() {
    let table = WeightTable::new(&[10, 10]);
    let result = weighted_cgpa(&table, &[Some(2.0), Some(4.0), Some(1.0)]);
    assert_eq!(result.to_string(), "3.00");
    assert_eq!(result.total_weight, 20);

    // Only a zero-weight semester present.
    let result = weighted_cgpa(&table, &[None, None, Some(3.5)]);
    assert_eq!(result.to_string(), "0.00");
}

#[test]
fn test_unknown_regulation_is_an_error() {
    for id in ["", "2019", "twenty-two", "20220"] {
        assert!(compute_cgpa(id, &[Some("3.0")]).is_err(), "{id:?}");
    }
}
