//! Style metadata and style body operations.

use crate::{endpoints, ClientError, GeoClient, Outcome};
use geobridge_model::{shapes, Style};

impl GeoClient {
    pub fn get_style(
        &self,
        workspace: Option<&str>,
        name: &str,
    ) -> Result<Outcome<Style>, ClientError> {
        let outcome = self.get_json(&endpoints::style(workspace, name))?;
        outcome.try_map(|payload| match payload.as_json() {
            Some(doc) => Style::from_get_response(doc).map_err(ClientError::from),
            None => Err(ClientError::Transport(format!(
                "non-JSON style document for '{name}'"
            ))),
        })
    }

    pub fn create_style(&self, style: &Style) -> Result<Outcome<()>, ClientError> {
        self.create_or_update(
            &endpoints::style(style.workspace.as_deref(), &style.name),
            &endpoints::styles(style.workspace.as_deref()),
            &style.put_payload(),
            &style.post_payload(),
        )
    }

    pub fn delete_style(
        &self,
        workspace: Option<&str>,
        name: &str,
        purge: bool,
    ) -> Result<Outcome<()>, ClientError> {
        let purge = if purge { "true" } else { "false" };
        self.delete_resource(&endpoints::style(workspace, name), &[("purge", purge)])
    }

    pub fn list_styles(&self, workspace: Option<&str>) -> Result<Vec<String>, ClientError> {
        let outcome = self.get_json(&endpoints::styles(workspace))?;
        Ok(match outcome {
            Outcome::Success { body, .. } => body
                .as_json()
                .and_then(|doc| doc.get("styles"))
                .map(|col| shapes::named_members(Some(col), "style"))
                .unwrap_or_default(),
            Outcome::NotFound | Outcome::Conflict => Vec::new(),
        })
    }

    /// Download the raw style definition (SLD XML, MBStyle JSON or ZIP).
    pub fn get_style_body(
        &self,
        workspace: Option<&str>,
        name: &str,
    ) -> Result<Outcome<Vec<u8>>, ClientError> {
        let resp = self.get_raw(&endpoints::style_body(workspace, name), &[])?;
        if resp.status == 404 {
            return Ok(Outcome::NotFound);
        }
        Ok(Outcome::Success {
            status: resp.status,
            body: resp.body,
        })
    }

    /// Upload the raw style definition for an existing metadata record.
    pub fn put_style_body(
        &self,
        workspace: Option<&str>,
        name: &str,
        content_type: &str,
        body: &[u8],
    ) -> Result<Outcome<()>, ClientError> {
        let resp = self.put_raw(&endpoints::style_body(workspace, name), content_type, body)?;
        Ok(Outcome::Success {
            status: resp.status,
            body: (),
        })
    }
}
