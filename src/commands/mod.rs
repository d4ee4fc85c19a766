pub mod analyze;
pub mod history;
