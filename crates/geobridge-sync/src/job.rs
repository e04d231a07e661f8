//! The copy pipeline.

use crate::SyncError;
use geobridge_client::{GeoClient, Outcome};
use serde::Serialize;
use tracing::{debug, info};

/// Which parts of the workspace to replicate. All on by default.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    pub styles: bool,
    pub datastores: bool,
    pub layer_groups: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            styles: true,
            datastores: true,
            layer_groups: true,
        }
    }
}

/// Per-kind copy counters. Skipped means the destination already had the
/// name (the write took the update path) or the item was filtered out.
#[derive(Debug, Default, Serialize)]
pub struct SyncReport {
    pub styles_copied: usize,
    pub styles_skipped: usize,
    pub datastores_copied: usize,
    pub datastores_skipped: usize,
    pub feature_types_copied: usize,
    pub feature_types_skipped: usize,
    pub layer_groups_copied: usize,
    pub layer_groups_skipped: usize,
}

pub struct SyncJob {
    pub src: GeoClient,
    pub dst: GeoClient,
}

impl SyncJob {
    pub fn new(src: GeoClient, dst: GeoClient) -> Self {
        Self { src, dst }
    }

    /// Replicate one workspace from source to destination.
    ///
    /// The destination workspace is created (or updated) first; the selected
    /// branches then run in dependency order: styles, datastores with their
    /// feature types and layers, layer groups.
    pub fn copy_workspace(&self, name: &str, opts: SyncOptions) -> Result<SyncReport, SyncError> {
        let workspace = match self.src.get_workspace(name)? {
            Outcome::Success { body, .. } => body,
            Outcome::NotFound | Outcome::Conflict => {
                return Err(SyncError::WorkspaceMissing {
                    side: "source",
                    workspace: name.to_owned(),
                })
            }
        };
        self.dst.create_workspace(&workspace)?;
        info!("workspace '{name}' ensured on destination");

        let mut report = SyncReport::default();
        if opts.styles {
            self.copy_styles(name, &mut report)?;
        }
        if opts.datastores {
            self.copy_pg_datastores(name, &mut report)?;
        }
        if opts.layer_groups {
            self.copy_layer_groups(name, &mut report)?;
        }
        Ok(report)
    }

    /// Copy the workspace's styles, metadata first and body after, so the
    /// destination record exists before its definition is uploaded.
    pub fn copy_styles(&self, workspace: &str, report: &mut SyncReport) -> Result<(), SyncError> {
        self.require_dst_workspace(workspace)?;
        for name in self.src.list_styles(Some(workspace))? {
            let style = match self.src.get_style(Some(workspace), &name)? {
                Outcome::Success { body, .. } => body,
                Outcome::NotFound | Outcome::Conflict => {
                    debug!("style '{name}' vanished between list and get, skipping");
                    report.styles_skipped += 1;
                    continue;
                }
            };
            match self.dst.create_style(&style)? {
                Outcome::Conflict => {
                    report.styles_skipped += 1;
                    continue;
                }
                Outcome::Success { .. } | Outcome::NotFound => {}
            }
            if let Outcome::Success { body, .. } =
                self.src.get_style_body(Some(workspace), &name)?
            {
                self.dst.put_style_body(
                    Some(workspace),
                    &name,
                    style.format.content_type(),
                    &body,
                )?;
            }
            debug!("style '{workspace}:{name}' copied");
            report.styles_copied += 1;
        }
        Ok(())
    }

    /// Copy PostGIS datastores and, for each, its feature types and their
    /// layer publishing records. Non-PostGIS stores are counted as skipped;
    /// their connection parameters are machine-local and do not transfer.
    pub fn copy_pg_datastores(
        &self,
        workspace: &str,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        self.require_dst_workspace(workspace)?;
        for name in self.src.list_datastores(workspace)? {
            let store = match self.src.get_datastore(workspace, &name)? {
                Outcome::Success { body, .. } => body,
                Outcome::NotFound | Outcome::Conflict => {
                    debug!("datastore '{name}' vanished between list and get, skipping");
                    report.datastores_skipped += 1;
                    continue;
                }
            };
            if store.connection_parameters.get("dbtype") != Some("postgis") {
                debug!("datastore '{workspace}:{name}' is not PostGIS, skipping");
                report.datastores_skipped += 1;
                continue;
            }
            match self.dst.create_datastore(&store)? {
                Outcome::Conflict => report.datastores_skipped += 1,
                Outcome::Success { .. } | Outcome::NotFound => {
                    debug!("datastore '{workspace}:{name}' copied");
                    report.datastores_copied += 1;
                }
            }
            self.copy_feature_types(workspace, &name, report)?;
        }
        Ok(())
    }

    /// Copy every feature type of one datastore, then mirror each one's
    /// layer record (default style, flags) onto the destination.
    pub fn copy_feature_types(
        &self,
        workspace: &str,
        datastore: &str,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        if !self.dst.get_datastore(workspace, datastore)?.is_success() {
            return Err(SyncError::DatastoreMissing {
                workspace: workspace.to_owned(),
                datastore: datastore.to_owned(),
            });
        }
        for name in self.src.list_featuretypes(workspace, datastore)? {
            let featuretype = match self.src.get_featuretype(workspace, datastore, &name)? {
                Outcome::Success { body, .. } => body,
                Outcome::NotFound | Outcome::Conflict => {
                    debug!("feature type '{name}' vanished between list and get, skipping");
                    report.feature_types_skipped += 1;
                    continue;
                }
            };
            match self.dst.create_featuretype(&featuretype)? {
                Outcome::Conflict => {
                    report.feature_types_skipped += 1;
                    continue;
                }
                Outcome::Success { .. } | Outcome::NotFound => {}
            }
            self.copy_layer(workspace, &name)?;
            debug!("feature type '{workspace}:{name}' copied");
            report.feature_types_copied += 1;
        }
        Ok(())
    }

    /// Mirror the layer publishing record; the destination layer exists
    /// implicitly once the feature type is published there.
    fn copy_layer(&self, workspace: &str, name: &str) -> Result<(), SyncError> {
        if let Outcome::Success { body: layer, .. } = self.src.get_layer(workspace, name)? {
            self.dst.update_layer(workspace, &layer)?;
        }
        Ok(())
    }

    /// Copy layer groups last; they reference layers and styles copied by the
    /// earlier branches.
    pub fn copy_layer_groups(
        &self,
        workspace: &str,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        self.require_dst_workspace(workspace)?;
        for name in self.src.list_layergroups(workspace)? {
            let group = match self.src.get_layergroup(workspace, &name)? {
                Outcome::Success { body, .. } => body,
                Outcome::NotFound | Outcome::Conflict => {
                    debug!("layer group '{name}' vanished between list and get, skipping");
                    report.layer_groups_skipped += 1;
                    continue;
                }
            };
            match self.dst.create_layergroup(&group)? {
                Outcome::Conflict => report.layer_groups_skipped += 1,
                Outcome::Success { .. } | Outcome::NotFound => {
                    debug!("layer group '{workspace}:{name}' copied");
                    report.layer_groups_copied += 1;
                }
            }
        }
        Ok(())
    }

    fn require_dst_workspace(&self, workspace: &str) -> Result<(), SyncError> {
        if self.dst.get_workspace(workspace)?.is_success() {
            Ok(())
        } else {
            Err(SyncError::WorkspaceMissing {
                side: "destination",
                workspace: workspace.to_owned(),
            })
        }
    }
}
