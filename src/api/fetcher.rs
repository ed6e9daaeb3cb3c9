use crate::config::FetchPolicy;
use crate::error::AppError;
use indicatif::ProgressBar;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::models::MatchDto;

/// The two match-v5 lookups the fetcher needs. Implemented by
/// [`RiotApiClient`](super::client::RiotApiClient).
pub trait MatchApi {
    /// Ranked match ids, most recent first. Upstream may return fewer than `count`.
    fn get_match_ids(&self, puuid: &str, count: usize) -> Result<Vec<String>, AppError>;

    fn get_match(&self, match_id: &str) -> Result<MatchDto, AppError>;

    /// Like [`get_match`](MatchApi::get_match), but the request must give up
    /// once `budget` has passed.
    fn get_match_within(&self, match_id: &str, _budget: Duration) -> Result<MatchDto, AppError> {
        self.get_match(match_id)
    }
}

/// A match id that could not be resolved. The batch carries on without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub match_id: String,
    pub rate_limited: bool,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct FetchedMatches {
    /// Resolved records in the order upstream listed their ids.
    pub matches: Vec<MatchDto>,
    pub failures: Vec<FetchFailure>,
}

impl FetchedMatches {
    pub fn attempted(&self) -> usize {
        self.matches.len() + self.failures.len()
    }
}

pub struct MatchFetcher<'a, A: MatchApi> {
    api: &'a A,
    policy: FetchPolicy,
    progress: ProgressBar,
}

impl<'a, A: MatchApi> MatchFetcher<'a, A> {
    pub fn new(api: &'a A, policy: FetchPolicy) -> Self {
        MatchFetcher {
            api,
            policy,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Look up to `count` ranked match ids for `puuid` and resolve each one,
    /// sequentially and in upstream order.
    pub fn fetch(&self, puuid: &str, count: usize) -> Result<FetchedMatches, AppError> {
        if count == 0 {
            return Err(AppError::InvalidMatchCount);
        }

        let match_ids = match self.api.get_match_ids(puuid, count) {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "match id lookup failed");
                return Err(AppError::NoRankedGames);
            }
        };
        if match_ids.is_empty() {
            return Err(AppError::NoRankedGames);
        }
        info!(found = match_ids.len(), requested = count, "match ids fetched");

        let started = Instant::now();
        let mut fetched = FetchedMatches::default();
        self.progress.set_length(match_ids.len().min(count) as u64);

        for match_id in match_ids.iter().take(count) {
            let result = match self.remaining(started)? {
                Some(budget) => self.api.get_match_within(match_id, budget),
                None => self.api.get_match(match_id),
            };

            match result {
                Ok(match_data) => {
                    debug!(match_id = %match_id, "match fetched");
                    fetched.matches.push(match_data);
                }
                Err(AppError::RateLimited) => {
                    warn!(match_id = %match_id, pause = ?self.policy.rate_limit_pause, "rate limited, skipping match");
                    self.pause(self.policy.rate_limit_pause, started);
                    fetched.failures.push(FetchFailure {
                        match_id: match_id.clone(),
                        rate_limited: true,
                        reason: AppError::RateLimited.to_string(),
                    });
                }
                Err(e) => {
                    warn!(match_id = %match_id, error = %e, "match fetch failed");
                    fetched.failures.push(FetchFailure {
                        match_id: match_id.clone(),
                        rate_limited: false,
                        reason: e.to_string(),
                    });
                }
            }

            self.progress.inc(1);
            self.pause(self.policy.cooldown, started);
        }

        self.remaining(started)?;
        self.progress.finish_and_clear();
        Ok(fetched)
    }

    /// Time left before the deadline, `None` without one. Running out of
    /// time ends the fetch.
    fn remaining(&self, started: Instant) -> Result<Option<Duration>, AppError> {
        let Some(deadline) = self.policy.deadline else {
            return Ok(None);
        };
        match deadline.checked_sub(started.elapsed()) {
            Some(left) if !left.is_zero() => Ok(Some(left)),
            _ => {
                self.progress.abandon();
                warn!(deadline = ?deadline, "fetch deadline exceeded");
                Err(AppError::FetchDeadlineExceeded(deadline))
            }
        }
    }

    /// Sleep for `duration`, cut short at the deadline.
    fn pause(&self, duration: Duration, started: Instant) {
        let duration = match self.policy.deadline {
            Some(deadline) => duration.min(deadline.saturating_sub(started.elapsed())),
            None => duration,
        };
        thread::sleep(duration);
    }
}
