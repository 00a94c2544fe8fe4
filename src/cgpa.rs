//! CGPA computation over regulation-weighted semester GPAs.
//!
//! Only semesters with a valid GPA take part: their weights are renormalized
//! against the sum of weights actually present, so an unfinished program
//! still yields a meaningful running CGPA.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::regulation::{Regulation, WeightTable, SEMESTER_COUNT};

pub const MIN_GPA: f64 = 0.0;
pub const MAX_GPA: f64 = 4.0;

/// Parse a user-entered GPA.
///
/// Returns `None` for anything that should count as "not entered": blank
/// text, non-numeric text, non-finite values, and values outside
/// `[0.0, 4.0]`.
pub fn parse_gpa(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|g| is_valid_gpa(*g))
}

pub fn is_valid_gpa(gpa: f64) -> bool {
    gpa.is_finite() && (MIN_GPA..=MAX_GPA).contains(&gpa)
}

/// One semester's reported GPA, if any.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SemesterEntry {
    /// 1-based semester index.
    pub semester: usize,
    pub gpa: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CgpaResult {
    /// Full-precision weighted average.
    pub value: f64,
    pub semesters_counted: usize,
    pub total_weight: u32,
}

impl CgpaResult {
    pub fn zero() -> Self {
        Self {
            value: 0.0,
            semesters_counted: 0,
            total_weight: 0,
        }
    }

    /// Value rounded half away from zero to two decimal places.
    pub fn rounded(&self) -> f64 {
        if !self.value.is_finite() {
            return 0.0;
        }
        (self.value * 100.0).round() / 100.0
    }

    pub fn is_empty(&self) -> bool {
        self.semesters_counted == 0
    }
}

impl fmt::Display for CgpaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

/// Compute the CGPA for a regulation identifier and up to eight raw GPA
/// strings. Slots past the eighth are ignored; unparseable or out-of-range
/// slots count as unset.
pub fn compute_cgpa<S: AsRef<str>>(
    regulation: &str,
    semester_gpas: &[Option<S>],
) -> Result<CgpaResult> {
    let regulation: Regulation = regulation.parse()?;
    let gpas: Vec<Option<f64>> = semester_gpas
        .iter()
        .take(SEMESTER_COUNT)
        .map(|slot| slot.as_ref().and_then(|s| parse_gpa(s.as_ref())))
        .collect();

    let result = weighted_cgpa(&regulation.weight_table(), &gpas);
    tracing::debug!(
        regulation = regulation.id(),
        counted = result.semesters_counted,
        total_weight = result.total_weight,
        cgpa = %result,
        "Computed CGPA"
    );
    Ok(result)
}

/// Weighted average of the valid GPAs, renormalized over the weights of the
/// semesters that are present.
pub fn weighted_cgpa(table: &WeightTable<'_>, gpas: &[Option<f64>]) -> CgpaResult {
    let counted: Vec<(f64, u32)> = gpas
        .iter()
        .copied()
        .take(SEMESTER_COUNT)
        .enumerate()
        .filter_map(|(i, gpa)| {
            gpa.filter(|g| is_valid_gpa(*g))
                .map(|g| (g, table.weight_at(i + 1)))
        })
        .collect();

    let total_weight: u32 = counted.iter().map(|(_, w)| w).sum();
    if counted.is_empty() || total_weight == 0 {
        return CgpaResult {
            total_weight,
            ..CgpaResult::zero()
        };
    }

    let weighted_sum: f64 = counted.iter().map(|(g, w)| g * f64::from(*w)).sum();
    CgpaResult {
        value: weighted_sum / f64::from(total_weight),
        semesters_counted: counted.len(),
        total_weight,
    }
}

/// Convenience over [`weighted_cgpa`] for explicit semester entries.
/// Entries with an index outside `1..=8` are ignored; when an index repeats
/// the last entry wins.
pub fn cgpa_from_entries(regulation: Regulation, entries: &[SemesterEntry]) -> CgpaResult {
    let mut slots = [None; SEMESTER_COUNT];
    for entry in entries {
        if (1..=SEMESTER_COUNT).contains(&entry.semester) {
            slots[entry.semester - 1] = entry.gpa;
        }
    }
    weighted_cgpa(&regulation.weight_table(), &slots)
}

const INITIAL_SLOTS: usize = 2;

/// An editable set of semester GPA inputs, as typed by a student.
///
/// Holds between one and eight slots of raw text. The sheet never
/// rejects input; invalid text simply does not count toward the CGPA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpaSheet {
    slots: Vec<String>,
}

impl Default for GpaSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl GpaSheet {
    pub fn new() -> Self {
        Self {
            slots: vec![String::new(); INITIAL_SLOTS],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.trim().is_empty())
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Set the text at a 1-based position, growing the sheet if needed.
    /// Positions outside `1..=8` are ignored.
    pub fn set(&mut self, position: usize, text: impl Into<String>) {
        if !(1..=SEMESTER_COUNT).contains(&position) {
            return;
        }
        if self.slots.len() < position {
            self.slots.resize(position, String::new());
        }
        self.slots[position - 1] = text.into();
    }

    pub fn add_semester(&mut self) -> bool {
        if self.slots.len() >= SEMESTER_COUNT {
            return false;
        }
        self.slots.push(String::new());
        true
    }

    /// Remove the slot at a 1-based position. The last slot is never removed.
    pub fn remove_semester(&mut self, position: usize) -> bool {
        if self.slots.len() <= 1 || position == 0 || position > self.slots.len() {
            return false;
        }
        self.slots.remove(position - 1);
        true
    }

    pub fn clear_all(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Replace the sheet with fetched GPAs, keeping at least two slots.
    pub fn fill_from(&mut self, gpas: &[Option<f64>]) {
        let gpas = &gpas[..gpas.len().min(SEMESTER_COUNT)];
        let len = gpas.len().max(INITIAL_SLOTS);
        self.slots = (0..len)
            .map(|i| {
                gpas.get(i)
                    .copied()
                    .flatten()
                    .map(|g| g.to_string())
                    .unwrap_or_default()
            })
            .collect();
    }

    /// 1-based positions holding text that is not a valid GPA.
    pub fn invalid_positions(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.trim().is_empty() && parse_gpa(s).is_none())
            .map(|(i, _)| i + 1)
            .collect()
    }

    pub fn compute(&self, regulation: Regulation) -> CgpaResult {
        let gpas: Vec<Option<f64>> = self.slots.iter().map(|s| parse_gpa(s)).collect();
        weighted_cgpa(&regulation.weight_table(), &gpas)
    }
}
