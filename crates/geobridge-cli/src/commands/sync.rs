use super::{json_pretty, EXIT_DEPENDENCY_MISSING, EXIT_SUCCESS};
use geobridge_client::{GeoClient, InstanceConfig};
use geobridge_sync::{SyncJob, SyncOptions};

pub fn run(
    src: &InstanceConfig,
    dst: &InstanceConfig,
    workspace: &str,
    opts: SyncOptions,
    json: bool,
) -> Result<u8, String> {
    let job = SyncJob::new(GeoClient::new(src), GeoClient::new(dst));

    let report = match job.copy_workspace(workspace, opts) {
        Ok(report) => report,
        Err(e) if e.is_dependency_missing() => {
            eprintln!("error: {e}");
            return Ok(EXIT_DEPENDENCY_MISSING);
        }
        Err(e) => return Err(e.to_string()),
    };

    if json {
        println!("{}", json_pretty(&report)?);
    } else {
        println!("synced workspace '{workspace}'");
        println!(
            "  styles:        {} copied, {} skipped",
            report.styles_copied, report.styles_skipped
        );
        println!(
            "  datastores:    {} copied, {} skipped",
            report.datastores_copied, report.datastores_skipped
        );
        println!(
            "  feature types: {} copied, {} skipped",
            report.feature_types_copied, report.feature_types_skipped
        );
        println!(
            "  layer groups:  {} copied, {} skipped",
            report.layer_groups_copied, report.layer_groups_skipped
        );
    }
    Ok(EXIT_SUCCESS)
}
