use super::types::StudentResult;
use crate::cgpa::{weighted_cgpa, CgpaResult};
use crate::regulation::{Regulation, SEMESTER_COUNT};

/// GPA slots for the CGPA calculator, indexed by semester number.
///
/// Each semester contributes its first exam attempt's GPA. Semesters
/// outside `1..=8`, semesters without attempts and referred attempts stay
/// unset.
pub fn semester_gpas(result: &StudentResult) -> [Option<f64>; SEMESTER_COUNT] {
    let mut slots = [None; SEMESTER_COUNT];
    for semester in &result.semester_results {
        let index = semester.semester as usize;
        if (1..=SEMESTER_COUNT).contains(&index) {
            slots[index - 1] = semester.authoritative_gpa();
        }
    }
    slots
}

/// Slots for a calculator sheet: [`semester_gpas`] cut after the highest
/// semester the result reports, so a student in semester 3 gets three slots.
pub fn sheet_gpas(result: &StudentResult) -> Vec<Option<f64>> {
    let reported = result
        .semester_results
        .iter()
        .map(|s| s.semester as usize)
        .filter(|n| (1..=SEMESTER_COUNT).contains(n))
        .max()
        .unwrap_or(0);
    semester_gpas(result)[..reported].to_vec()
}

/// CGPA of a fetched result under the given regulation's weights.
pub fn cgpa_for(result: &StudentResult, regulation: Regulation) -> CgpaResult {
    weighted_cgpa(&regulation.weight_table(), &semester_gpas(result))
}

/// Semesters in display order, newest first.
pub fn semesters_newest_first(result: &StudentResult) -> Vec<&super::types::SemesterResult> {
    let mut semesters: Vec<_> = result.semester_results.iter().collect();
    semesters.sort_by(|a, b| b.semester.cmp(&a.semester));
    semesters
}
