pub mod json_validator;
pub mod secure_file;
