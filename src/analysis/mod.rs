pub mod aggregator;
pub mod profile;
pub mod role;
