#![warn(clippy::all)]

pub mod constants;
pub mod creep;
pub mod features;
pub mod findnearest;
pub mod game_loop;
pub mod logging;
pub mod military;
pub mod prototypes;
pub mod relay;
pub mod roster;
pub mod serialize;
#[cfg(feature = "sim")]
pub mod sim;
pub mod spawnsystem;
pub mod world;

use log::*;

pub use game_loop::{Controller, TickSummary};

/// One-time host setup. A logger that is already installed is left alone.
pub fn setup() {
    if let Err(e) = logging::setup_logging(logging::Info) {
        warn!("Logging already configured: {}", e);
    }
}

/// Build a controller from an optional JSON features document, falling back
/// to the defaults when it does not parse.
pub fn controller_from_json(data: Option<&str>) -> Controller {
    let features = match data.map(features::Features::from_json) {
        Some(Ok(features)) => features,
        Some(Err(e)) => {
            warn!("Failed to parse features, using defaults: {}", e);
            features::Features::default()
        }
        None => features::Features::default(),
    };

    Controller::new(features)
}
