//! WMTS tile fetching (KVP binding).

use crate::OgcError;
use geobridge_client::{endpoints, GeoClient};

#[derive(Debug, Clone)]
pub struct GetTileRequest {
    /// Qualified layer name (`workspace:layer`).
    pub layer: String,
    pub format: String,
    pub tile_matrix_set: String,
    /// Matrix identifier within the set, usually `<set>:<zoom>`.
    pub tile_matrix: String,
    pub row: u32,
    pub col: u32,
    pub style: String,
}

impl GetTileRequest {
    pub fn new(
        layer: impl Into<String>,
        tile_matrix_set: impl Into<String>,
        zoom: u32,
        row: u32,
        col: u32,
    ) -> Self {
        let tile_matrix_set = tile_matrix_set.into();
        Self {
            layer: layer.into(),
            format: "image/png".to_owned(),
            tile_matrix: format!("{tile_matrix_set}:{zoom}"),
            tile_matrix_set,
            row,
            col,
            style: String::new(),
        }
    }
}

#[derive(Debug)]
pub struct TileResponse {
    pub status: u16,
    /// The cache's verdict for this tile: `MISS` on first fetch, `HIT` once
    /// the tile is cached.
    pub cache_result: Option<String>,
    pub body: Vec<u8>,
}

pub fn get_tile(client: &GeoClient, request: &GetTileRequest) -> Result<TileResponse, OgcError> {
    let row = request.row.to_string();
    let col = request.col.to_string();
    let query: Vec<(&str, &str)> = vec![
        ("SERVICE", "WMTS"),
        ("VERSION", "1.0.0"),
        ("REQUEST", "GetTile"),
        ("LAYER", &request.layer),
        ("STYLE", &request.style),
        ("FORMAT", &request.format),
        ("TILEMATRIXSET", &request.tile_matrix_set),
        ("TILEMATRIX", &request.tile_matrix),
        ("TILEROW", &row),
        ("TILECOL", &col),
    ];
    let resp = client.service_get(&endpoints::wmts_service(), &query)?;
    if resp.status >= 400 {
        return Err(OgcError::Service {
            status: resp.status,
            body: resp.body_text(),
        });
    }
    Ok(TileResponse {
        status: resp.status,
        cache_result: resp
            .header("geowebcache-cache-result")
            .map(str::to_owned),
        body: resp.body,
    })
}
