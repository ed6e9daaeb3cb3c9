use crate::api::endpoints::{self, Region};
use crate::api::fetcher::MatchApi;
use crate::config::Config;
use crate::error::AppError;
use governor::{
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use super::models::*;

// Riot development keys allow 20 requests per second.
const REQUESTS_PER_SECOND: NonZeroU32 = match NonZeroU32::new(20) {
    Some(n) => n,
    None => unreachable!(),
};

const USER_AGENT: &str = concat!("league_report/", env!("CARGO_PKG_VERSION"));

pub struct RiotApiClient {
    api_key: String,
    region: Region,
    http_timeout: Duration,
    agent: ureq::Agent,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl RiotApiClient {
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.http_timeout)
            .user_agent(USER_AGENT)
            .build();
        let rate_limiter = RateLimiter::direct(Quota::per_second(REQUESTS_PER_SECOND));
        RiotApiClient {
            api_key: config.api_key.clone(),
            region: config.region,
            http_timeout: config.http_timeout,
            agent,
            rate_limiter,
        }
    }

    fn wait_for_permit(&self) {
        while let Err(not_until) = self.rate_limiter.check() {
            thread::sleep(not_until.wait_time_from(DefaultClock::default().now()));
        }
    }

    /// Single GET with no retry. A 429 surfaces as [`AppError::RateLimited`]
    /// so the caller decides how long to back off. `budget` shortens the
    /// agent's timeout for this request only.
    fn execute_request(&self, url: &str, budget: Option<Duration>) -> Result<String, AppError> {
        self.wait_for_permit();

        let mut request = self.agent.get(url).set("X-Riot-Token", &self.api_key);
        if let Some(budget) = budget {
            request = request.timeout(budget.min(self.http_timeout));
        }
        let response = request.call();

        match response {
            Ok(resp) => {
                debug!(status = resp.status(), url, "riot api response");
                resp.into_string()
                    .map_err(|e| AppError::HttpError(e.to_string()))
            }
            Err(ureq::Error::Status(429, _)) => {
                warn!(url, "riot api rate limited");
                Err(AppError::RateLimited)
            }
            Err(ureq::Error::Status(code, _)) => {
                debug!(status = code, url, "riot api error status");
                Err(AppError::ApiError(format!("HTTP {} from {}", code, url)))
            }
            Err(e) => Err(AppError::HttpError(e.to_string())),
        }
    }

    pub fn get_account(&self, game_name: &str, tag_line: &str) -> Result<AccountDto, AppError> {
        let url = endpoints::account_url(self.region, game_name, tag_line);
        let not_found = || AppError::PlayerNotFound(format!("{}#{}", game_name, tag_line));

        let body = match self.execute_request(&url, None) {
            Ok(body) => body,
            Err(AppError::ApiError(_)) => return Err(not_found()),
            Err(e) => return Err(e),
        };
        serde_json::from_str(&body).map_err(|_| not_found())
    }
}

impl MatchApi for RiotApiClient {
    fn get_match_ids(&self, puuid: &str, count: usize) -> Result<Vec<String>, AppError> {
        let url = endpoints::match_ids_url(self.region, puuid, count);

        let body = self.execute_request(&url, None)?;
        serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))
    }

    fn get_match(&self, match_id: &str) -> Result<MatchDto, AppError> {
        let url = endpoints::match_url(self.region, match_id);

        let body = self.execute_request(&url, None)?;
        serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))
    }

    fn get_match_within(&self, match_id: &str, budget: Duration) -> Result<MatchDto, AppError> {
        let url = endpoints::match_url(self.region, match_id);

        let body = self.execute_request(&url, Some(budget))?;
        serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))
    }
}
