//! Accounts, tokens and the request principal.

pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;
