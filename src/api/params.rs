use crate::error::{AppError, AppResult};

pub const INVALID_ID_MESSAGE: &str = "A valid numeric ID is required";
pub const INVALID_SEASON_MESSAGE: &str = "Valid Series ID and Season Number are required";
pub const INVALID_EPISODE_MESSAGE: &str =
    "Valid Series ID, Season Number and Episode Number are required";

fn parse_numeric(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// A path id made only of digits
pub fn numeric_id(raw: &str) -> AppResult<u64> {
    parse_numeric(raw).ok_or_else(|| AppError::InvalidInput(INVALID_ID_MESSAGE.to_string()))
}

pub fn season_params(series_id: &str, season_num: &str) -> AppResult<(u64, u64)> {
    match (parse_numeric(series_id), parse_numeric(season_num)) {
        (Some(series), Some(season)) => Ok((series, season)),
        _ => Err(AppError::InvalidInput(INVALID_SEASON_MESSAGE.to_string())),
    }
}

pub fn episode_params(
    series_id: &str,
    season_num: &str,
    episode_num: &str,
) -> AppResult<(u64, u64, u64)> {
    match (
        parse_numeric(series_id),
        parse_numeric(season_num),
        parse_numeric(episode_num),
    ) {
        (Some(series), Some(season), Some(episode)) => Ok((series, season, episode)),
        _ => Err(AppError::InvalidInput(INVALID_EPISODE_MESSAGE.to_string())),
    }
}

/// Page number, at least 1. Missing or malformed values fall back to 1.
pub fn page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1)
}
