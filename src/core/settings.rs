//! User preferences for the coaching client

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{CoreError, CoreResult};
use crate::game::types::{CoachingIntensity, CoachingParams, PlayerColor, SessionMode};
use crate::networking::DEFAULT_GATEWAY_URL;

/// Persisted settings, also the target of CLI and environment overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachSettings {
    /// Base URL of the coaching backend
    pub gateway_url: String,
    /// Bound on a single gateway round trip, in seconds
    pub request_timeout_secs: u64,
    pub player_rating: u32,
    pub coaching_intensity: CoachingIntensity,
    pub player_color: PlayerColor,
    /// Start in batched mode instead of immediate
    pub start_batched: bool,
}

impl Default for CoachSettings {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            request_timeout_secs: 30,
            player_rating: 800,
            coaching_intensity: CoachingIntensity::Medium,
            player_color: PlayerColor::White,
            start_batched: false,
        }
    }
}

impl CoachSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn coaching_params(&self) -> CoachingParams {
        CoachingParams {
            player_rating: self.player_rating,
            intensity: self.coaching_intensity,
            player_color: self.player_color,
        }
    }

    pub fn initial_mode(&self) -> SessionMode {
        if self.start_batched {
            SessionMode::Batched
        } else {
            SessionMode::Immediate
        }
    }

    /// Reject values the client cannot work with
    pub fn validate(&self) -> CoreResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(CoreError::InvalidConfig {
                message: "request timeout must be at least one second".to_string(),
            });
        }
        if !(self.gateway_url.starts_with("http://") || self.gateway_url.starts_with("https://")) {
            return Err(CoreError::InvalidConfig {
                message: format!("gateway URL must be http(s): {}", self.gateway_url),
            });
        }
        Ok(())
    }
}

/// Parse an intensity name as typed on the command line
pub fn parse_intensity(text: &str) -> Option<CoachingIntensity> {
    match text.trim().to_ascii_lowercase().as_str() {
        "low" => Some(CoachingIntensity::Low),
        "medium" => Some(CoachingIntensity::Medium),
        "high" => Some(CoachingIntensity::High),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = CoachSettings::default();

        assert_eq!(settings.gateway_url, DEFAULT_GATEWAY_URL);
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
        assert_eq!(settings.coaching_params(), CoachingParams::default());
        assert_eq!(settings.initial_mode(), SessionMode::Immediate);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: CoachSettings =
            serde_json::from_str(r#"{"player_rating": 1400, "coaching_intensity": "low"}"#)
                .expect("Partial settings should parse");

        assert_eq!(settings.player_rating, 1400);
        assert_eq!(settings.coaching_intensity, CoachingIntensity::Low);
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero = CoachSettings {
            request_timeout_secs: 0,
            ..CoachSettings::default()
        };
        assert!(matches!(zero.validate(), Err(CoreError::InvalidConfig { .. })));

        let url = CoachSettings {
            gateway_url: "localhost:5001".to_string(),
            ..CoachSettings::default()
        };
        assert!(url.validate().is_err());
    }

    #[test]
    fn test_parse_intensity() {
        assert_eq!(parse_intensity("HIGH"), Some(CoachingIntensity::High));
        assert_eq!(parse_intensity(" low "), Some(CoachingIntensity::Low));
        assert_eq!(parse_intensity("extreme"), None);
    }
}
