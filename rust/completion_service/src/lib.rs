// src/lib.rs

pub mod client;
pub mod error;
pub mod models;

pub use client::{CompletionClient, CompletionConfig, CompletionProvider};
pub use error::CompletionError;
