pub mod dashboard;
pub mod rating;
pub mod script;
