//! Student result lookup against the external result service.

pub mod autofill;
pub mod cached;
pub mod provider;
pub mod types;

pub use autofill::{cgpa_for, semester_gpas, semesters_newest_first, sheet_gpas};
pub use cached::CachedResultProvider;
pub use provider::{interpret_response, HttpResultProvider, ResultProvider, ResultQuery};
pub use types::{ExamResult, Institute, ReferredSubject, SemesterResult, StudentResult};
