//! Map link command.
//!
//! Prints a shareable map URL for a coordinate, using the configured base
//! URL. Without an explicit coordinate there is no fix to link, matching
//! the compass display before the first location update.

use clap::Args;
use wayfinder::config::ConfigFile;
use wayfinder::location::Coordinate;

use crate::error::CliError;

/// Text shown when no coordinate is available to link.
pub const NO_FIX_MESSAGE: &str = "Location not yet available. Please wait.";

/// Arguments for the map-link command.
#[derive(Debug, Args)]
pub struct MapLinkArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

/// Run the map-link command.
pub fn run(args: MapLinkArgs) -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();
    let builder = config.map_link_builder()?;

    match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => {
            println!("{}", builder.url_for(Coordinate::new(lat, lon)));
            Ok(())
        }
        (None, None) => {
            println!("{}", NO_FIX_MESSAGE);
            Ok(())
        }
        _ => Err(CliError::Config(
            "Both --lat and --lon are required to build a map link.".to_string(),
        )),
    }
}
