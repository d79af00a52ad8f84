//! Route Segmentation - command line entry point
//!
//! Usage: `route-segmentation [OPTIONS] <SOURCE> <DESTINATION>`

mod logging;
mod settings;

use settings::Settings;
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::setup_logging();
    logging::log_version_info();

    let settings = Settings::from_cli();
    tracing::debug!("{:?}", settings);

    match route_segment_lib::segment_file(
        &settings.source,
        &settings.destination,
        &settings.to_config(),
    ) {
        Ok(summary) => {
            if summary.empty_polylines > 0 {
                tracing::warn!(
                    "{} of {} polylines had no vertices",
                    summary.empty_polylines,
                    summary.polyline_count
                );
            }
            tracing::info!(
                "Total length: {:.3} units ({:.1} m)",
                summary.total_length,
                summary.total_distance_meters
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(
                "Failed to segment {} into {}: {}",
                settings.source.display(),
                settings.destination.display(),
                e
            );
            ExitCode::FAILURE
        }
    }
}
