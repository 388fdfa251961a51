pub mod admissions;
pub mod catalog;
pub mod portal;
