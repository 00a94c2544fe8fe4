//! Semester-wise subject lists per technology.

pub mod catalog;
pub mod category;

pub use catalog::{
    load_catalog, BooklistItem, Catalog, SemesterSubjects, Subject, TechnologyBooklist,
};
pub use category::Category;
