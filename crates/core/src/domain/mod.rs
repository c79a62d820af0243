pub mod outcome;
pub mod preferences;
pub mod suggestion;
