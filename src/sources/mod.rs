pub mod alphavantage;

pub use alphavantage::{AlphaVantageClient, FetchOutcome};
