use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded, please try again later")]
    RateLimited,

    #[error("Invalid Riot ID format. Use format: Name#TAG")]
    InvalidRiotId,

    #[error("Match count must be greater than zero")]
    InvalidMatchCount,

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("No ranked games found for this player")]
    NoRankedGames,

    #[error("None of the fetched games contained this player")]
    NoValidGames,

    #[error("Fetching match data took longer than {0:?}")]
    FetchDeadlineExceeded(Duration),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("Analysis generation failed: {0}")]
    GenerationError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
