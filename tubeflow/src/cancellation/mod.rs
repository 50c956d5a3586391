//! Cooperative cancellation for summarization runs.

mod token;

pub use token::CancellationToken;
