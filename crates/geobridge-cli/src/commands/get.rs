use super::{json_pretty, EXIT_FAILURE, EXIT_SUCCESS};
use geobridge_client::{GeoClient, InstanceConfig, Outcome};

pub fn workspace(config: &InstanceConfig, name: &str, json: bool) -> Result<u8, String> {
    let client = GeoClient::new(config);
    match client.get_workspace(name).map_err(|e| e.to_string())? {
        Outcome::Success { body, .. } => {
            if json {
                println!("{}", json_pretty(&body.post_payload())?);
            } else {
                println!("workspace '{}'", body.name);
                let datastores = client.list_datastores(name).map_err(|e| e.to_string())?;
                let styles = client.list_styles(Some(name)).map_err(|e| e.to_string())?;
                let groups = client.list_layergroups(name).map_err(|e| e.to_string())?;
                println!("  datastores:   {}", datastores.join(", "));
                println!("  styles:       {}", styles.join(", "));
                println!("  layer groups: {}", groups.join(", "));
            }
            Ok(EXIT_SUCCESS)
        }
        Outcome::NotFound | Outcome::Conflict => {
            eprintln!("workspace '{name}' not found");
            Ok(EXIT_FAILURE)
        }
    }
}
