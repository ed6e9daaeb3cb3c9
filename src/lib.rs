//! Ranked match history -> player profile -> analysis prompt.
//!
//! [`api::fetcher::MatchFetcher`] pulls a player's recent ranked games,
//! [`analysis::aggregator::StatAggregator`] folds them into a
//! [`analysis::profile::PlayerProfile`], and
//! [`display::prompt::PromptFormatter`] renders the profile as the request
//! sent to the text generation endpoint.

pub mod analysis;
pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod snapshot;

#[cfg(test)]
mod test_support;
