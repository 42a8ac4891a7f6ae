//! Fake external services for local development and integration tests.

pub mod llm;
pub mod smtp;
