//! Wire types for the upstream result service.
//!
//! Field names follow the upstream JSON, including its `reffered` spelling.
//! Numeric fields arrive as numbers or numeric strings depending on the
//! upstream source, so they are decoded leniently.

use serde::{Deserialize, Deserializer, Serialize};

use crate::cgpa::is_valid_gpa;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentResult {
    #[serde(default)]
    pub exam: String,
    #[serde(deserialize_with = "lenient::int_u64")]
    pub roll: u64,
    #[serde(deserialize_with = "lenient::int_u32")]
    pub regulation: u32,
    #[serde(rename = "otherRegulations", default)]
    pub other_regulations: Vec<String>,
    pub institute: Institute,
    #[serde(rename = "current_reffereds", default)]
    pub current_referreds: Vec<ReferredSubject>,
    #[serde(default)]
    pub semester_results: Vec<SemesterResult>,
    #[serde(default)]
    pub latest_result: Option<ExamResult>,
    #[serde(default, deserialize_with = "lenient::opt_float")]
    pub cgpa: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institute {
    #[serde(deserialize_with = "lenient::int_u32")]
    pub code: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub district: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterResult {
    #[serde(deserialize_with = "lenient::int_u32")]
    pub semester: u32,
    #[serde(default)]
    pub exam_results: Vec<ExamResult>,
}

impl SemesterResult {
    /// The first exam attempt carries the semester's authoritative GPA.
    /// `None` when there is no attempt, the attempt was referred, or the
    /// reported GPA is outside the valid range.
    pub fn authoritative_gpa(&self) -> Option<f64> {
        self.exam_results
            .first()
            .and_then(|exam| exam.gpa)
            .filter(|g| is_valid_gpa(*g))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    #[serde(default)]
    pub date: String,
    #[serde(
        rename = "instituteCode",
        default,
        deserialize_with = "lenient::opt_int_u32"
    )]
    pub institute_code: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_float")]
    pub gpa: Option<f64>,
    #[serde(rename = "reffereds", default)]
    pub referreds: Vec<ReferredSubject>,
}

impl ExamResult {
    pub fn is_referred(&self) -> bool {
        self.gpa.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferredSubject {
    #[serde(deserialize_with = "lenient::int_u32")]
    pub subject_semester: u32,
    #[serde(deserialize_with = "lenient::int_u32")]
    pub subject_code: u32,
    #[serde(default)]
    pub subject_name: String,
    #[serde(rename = "reffered_type", default)]
    pub referred_type: String,
    #[serde(default)]
    pub passed: bool,
}

mod lenient {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrText {
        Int(u64),
        Float(f64),
        Text(String),
    }

    fn to_f64(value: NumOrText) -> Option<f64> {
        match value {
            NumOrText::Int(n) => Some(n as f64),
            NumOrText::Float(f) => Some(f),
            NumOrText::Text(s) => s.trim().parse().ok(),
        }
    }

    fn to_u64(value: NumOrText) -> Option<u64> {
        match value {
            NumOrText::Int(n) => Some(n),
            NumOrText::Float(f) if f >= 0.0 && f.fract() == 0.0 => Some(f as u64),
            NumOrText::Float(_) => None,
            NumOrText::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn int_u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        to_u64(NumOrText::deserialize(d)?)
            .ok_or_else(|| serde::de::Error::custom("expected a non-negative integer"))
    }

    pub fn int_u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let n = int_u64(d)?;
        u32::try_from(n).map_err(|_| serde::de::Error::custom("integer out of range"))
    }

    pub fn opt_int_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        Ok(Option::<NumOrText>::deserialize(d)?
            .and_then(to_u64)
            .and_then(|n| u32::try_from(n).ok()))
    }

    /// Absent, null, empty or non-numeric values all decode to `None`.
    pub fn opt_float<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(Option::<NumOrText>::deserialize(d)?
            .and_then(to_f64)
            .filter(|f| f.is_finite()))
    }
}
