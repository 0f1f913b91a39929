pub mod auth;
pub mod mobile;
pub mod leads;
pub mod indications;
pub mod pages;
pub mod quizzes;
pub mod outbound;
pub mod interests;
pub mod cycles;
pub mod dre;
pub mod events;
pub mod public;
