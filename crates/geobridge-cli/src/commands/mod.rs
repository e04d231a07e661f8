pub mod delete;
pub mod get;
pub mod sync;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
/// A typed sync dependency (workspace or datastore) was absent.
pub const EXIT_DEPENDENCY_MISSING: u8 = 2;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}
