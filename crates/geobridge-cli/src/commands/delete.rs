use super::{EXIT_FAILURE, EXIT_SUCCESS};
use geobridge_client::{GeoClient, InstanceConfig, Outcome};

pub fn workspace(
    config: &InstanceConfig,
    name: &str,
    recurse: bool,
) -> Result<u8, String> {
    let client = GeoClient::new(config);
    match client
        .delete_workspace(name, recurse)
        .map_err(|e| e.to_string())?
    {
        Outcome::Success { .. } => {
            println!("deleted workspace '{name}'");
            Ok(EXIT_SUCCESS)
        }
        Outcome::NotFound => {
            eprintln!("workspace '{name}' not found");
            Ok(EXIT_FAILURE)
        }
        Outcome::Conflict => {
            eprintln!("workspace '{name}' could not be deleted");
            Ok(EXIT_FAILURE)
        }
    }
}
