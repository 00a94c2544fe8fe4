//! Assertion helpers for common test patterns.

use crate::cgpa::CgpaResult;
use crate::error::BtebError;

/// Asserts the two-decimal display of a CGPA.
pub fn assert_cgpa_display(result: &CgpaResult, expected: &str) {
    assert_eq!(
        result.to_string(),
        expected,
        "CGPA {result:?} should display as {expected}"
    );
}

/// Asserts that two CGPA results agree to within floating-point noise.
pub fn assert_cgpa_close(a: &CgpaResult, b: &CgpaResult) {
    assert!(
        (a.value - b.value).abs() < 1e-9,
        "Expected {} and {} to be equal",
        a.value,
        b.value
    );
}

/// Asserts that an error's rendered message contains every fragment.
pub fn assert_error_contains(error: &BtebError, expected: &[&str]) {
    let rendered = error.to_string();
    for fragment in expected {
        assert!(
            rendered.contains(fragment),
            "Expected error to contain '{fragment}', but got: {rendered}"
        );
    }
}
