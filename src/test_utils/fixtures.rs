//! Result payloads shaped like the upstream service's responses.

use crate::result::{ExamResult, Institute, SemesterResult, StudentResult};

/// Three semesters: two passed, the third referred on the first attempt
/// and cleared on the second.
pub const SAMPLE_RESULT_JSON: &str = r#"{
  "exam": "Diploma In Engineering",
  "roll": 123456,
  "regulation": 2022,
  "otherRegulations": ["2016"],
  "institute": {
    "code": 10053,
    "name": "Dhaka Polytechnic Institute",
    "district": "Dhaka"
  },
  "current_reffereds": [
    {
      "subject_semester": 3,
      "subject_code": 25931,
      "subject_name": "Mathematics-III",
      "reffered_type": "T",
      "passed": false
    }
  ],
  "semester_results": [
    {
      "semester": 1,
      "exam_results": [
        {"date": "2023-06-14T00:00:00.000Z", "instituteCode": 10053, "gpa": 3.5, "reffereds": []}
      ]
    },
    {
      "semester": 3,
      "exam_results": [
        {
          "date": "2024-06-20",
          "instituteCode": 10053,
          "reffereds": [
            {
              "subject_semester": 3,
              "subject_code": 25931,
              "subject_name": "Mathematics-III",
              "reffered_type": "T",
              "passed": false
            }
          ]
        },
        {"date": "2024-12-02", "instituteCode": 10053, "gpa": 3.0, "reffereds": []}
      ]
    },
    {
      "semester": 2,
      "exam_results": [
        {"date": "2023-12-10", "instituteCode": 10053, "gpa": 3.75, "reffereds": []}
      ]
    }
  ],
  "latest_result": {"date": "2024-12-02", "instituteCode": 10053, "gpa": 3.0, "reffereds": []}
}"#;

/// Upstream response for an unknown roll.
pub const NOT_FOUND_JSON: &str = r#"{"error": "Result not found"}"#;

pub fn sample_result() -> StudentResult {
    serde_json::from_str(SAMPLE_RESULT_JSON).expect("fixture must decode")
}

/// Build a result whose semesters carry the given first-attempt GPAs.
pub fn result_with_gpas(roll: u64, semesters: &[(u32, Option<f64>)]) -> StudentResult {
    StudentResult {
        exam: "Diploma In Engineering".to_string(),
        roll,
        regulation: 2022,
        other_regulations: vec![],
        institute: Institute {
            code: 1,
            name: "Test Polytechnic Institute".to_string(),
            district: "Test".to_string(),
        },
        current_referreds: vec![],
        semester_results: semesters
            .iter()
            .map(|(semester, gpa)| SemesterResult {
                semester: *semester,
                exam_results: vec![ExamResult {
                    date: "2024-01-01".to_string(),
                    institute_code: Some(1),
                    gpa: *gpa,
                    referreds: vec![],
                }],
            })
            .collect(),
        latest_result: None,
        cgpa: None,
    }
}
