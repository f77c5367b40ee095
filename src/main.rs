use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use coachboard::core::logging::init_logging;
use coachboard::core::settings_persistence::{load_settings, save_settings};
use coachboard::core::{parse_intensity, CoachSettings};
use coachboard::game::{GameSession, InputEvent, PlayerColor};
use coachboard::input::run_console;
use coachboard::networking::{CoachingGateway, HttpGateway, OfflineGateway, SessionDriver};

/// Environment variable overriding the gateway URL
const GATEWAY_URL_VAR: &str = "COACHBOARD_GATEWAY_URL";

/// Console chess board with move-by-move coaching
#[derive(Parser, Debug)]
#[command(name = "coachboard", version, about)]
struct Cli {
    /// Base URL of the coaching backend
    #[arg(long)]
    gateway: Option<String>,

    /// Give up on a coaching request after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Your playing strength, sent with every request
    #[arg(long)]
    rating: Option<u32>,

    /// Coaching detail: low, medium or high
    #[arg(long, value_parser = parse_intensity_arg)]
    intensity: Option<coachboard::game::CoachingIntensity>,

    /// Play as black
    #[arg(long)]
    black: bool,

    /// Start in multi-move mode
    #[arg(long)]
    batched: bool,

    /// Use the built-in offline coach instead of the backend
    #[arg(long)]
    offline: bool,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_settings: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_intensity_arg(text: &str) -> Result<coachboard::game::CoachingIntensity, String> {
    parse_intensity(text).ok_or_else(|| format!("unknown intensity '{text}'"))
}

impl Cli {
    /// Layer environment and flags over the persisted settings
    fn apply(&self, mut settings: CoachSettings) -> CoachSettings {
        if let Ok(url) = std::env::var(GATEWAY_URL_VAR) {
            settings.gateway_url = url;
        }
        if let Some(url) = &self.gateway {
            settings.gateway_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            settings.request_timeout_secs = secs;
        }
        if let Some(rating) = self.rating {
            settings.player_rating = rating;
        }
        if let Some(intensity) = self.intensity {
            settings.coaching_intensity = intensity;
        }
        if self.black {
            settings.player_color = PlayerColor::Black;
        }
        if self.batched {
            settings.start_batched = true;
        }
        settings
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    init_logging(cli.verbose);

    let settings = cli.apply(load_settings());
    settings.validate().context("invalid settings")?;

    if cli.save_settings {
        save_settings(&settings).context("failed to save settings")?;
    }

    let gateway: Arc<dyn CoachingGateway> = if cli.offline {
        info!("[MAIN] Using the offline coach");
        Arc::new(OfflineGateway::new())
    } else {
        Arc::new(
            HttpGateway::new(&settings.gateway_url, Duration::from_secs(5))
                .context("failed to build HTTP client")?,
        )
    };

    let session = GameSession::new(settings.coaching_params(), settings.initial_mode());
    let mut driver = SessionDriver::new(session, gateway, settings.request_timeout());

    // Sync the backend's board with ours before the first move
    if let Err(err) = driver.dispatch(InputEvent::NewGameRequested).await {
        warn!("[MAIN] Could not start a game on the coach: {}", err);
        println!("{}", err.user_message());
    }

    run_console(driver).await.context("console failed")?;
    Ok(())
}
