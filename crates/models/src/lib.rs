pub mod appointment;
pub mod document;
pub mod errors;
pub mod message;
pub mod user;
