//! BTEB diploma results: regulation-weighted CGPA computation, student
//! result lookup against the public result service, and the semester-wise
//! booklist catalog.

pub mod booklist;
pub mod cache;
pub mod cgpa;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod regulation;
pub mod render;
pub mod result;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod utils;
pub mod validation;

pub use cgpa::{compute_cgpa, parse_gpa, weighted_cgpa, CgpaResult, GpaSheet, SemesterEntry};
pub use error::{BtebError, Result};
pub use regulation::{Regulation, WeightTable, SEMESTER_COUNT};
