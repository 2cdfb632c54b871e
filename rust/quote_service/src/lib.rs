// src/lib.rs

pub mod client;
pub mod models;

pub use client::{QuoteClient, QuoteError, QuoteProvider};
pub use models::TickerRecord;
