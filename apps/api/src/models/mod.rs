pub mod application;
pub mod catalog;
pub mod job;
pub mod profile;
pub mod user;
