//! Concrete [`MarketDataProvider`](crate::MarketDataProvider) implementations.

mod fixture;

pub use fixture::FixtureProvider;
