use clap::Parser;
use route_segment_lib::Config;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Route Segmentation - Split every polyline of a GPX file into its two-point segments
pub struct Settings {
    /// GPX file with the polylines to segment (tracks, and routes unless --tracks-only)
    #[clap(value_name = "SOURCE")]
    pub source: PathBuf,

    /// GPX file receiving one track per segment
    #[clap(value_name = "DESTINATION")]
    pub destination: PathBuf,

    /// Fail on features without vertices instead of skipping them
    #[clap(long, default_value = "false")]
    pub reject_empty: bool,

    /// Refuse to replace an existing destination
    #[clap(long, default_value = "false")]
    pub no_overwrite: bool,

    /// Ignore GPX routes, only segment tracks
    #[clap(long, default_value = "false")]
    pub tracks_only: bool,
}

impl Settings {
    /// Parse the command line, exiting with clap's message on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// Library configuration for these settings
    pub fn to_config(&self) -> Config {
        Config {
            reject_empty: self.reject_empty,
            include_routes: !self.tracks_only,
            overwrite: !self.no_overwrite,
        }
    }
}
