//! # IO Module
//!
//! The edges of the backend: the REST API consumed by the frontend, and the
//! outbound client for the text generation provider.

pub mod gemini;
pub mod rest;

pub use gemini::GeminiClient;
