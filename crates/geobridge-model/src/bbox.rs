//! Bounding boxes and CRS references.

use serde_json::{json, Map, Value};

/// A CRS reference, serialized either as a plain code string (`"EPSG:4326"`)
/// or as a classed object (`{"@class": "projected", "$": "EPSG:2056"}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrsRef {
    Plain(String),
    Classed { class: String, code: String },
}

impl CrsRef {
    pub fn epsg(code: u32) -> Self {
        Self::Plain(format!("EPSG:{code}"))
    }

    pub fn projected(code: impl Into<String>) -> Self {
        Self::Classed {
            class: "projected".to_owned(),
            code: code.into(),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Plain(code) | Self::Classed { code, .. } => code,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Plain(code) => Value::String(code.clone()),
            Self::Classed { class, code } => json!({"@class": class, "$": code}),
        }
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(code) => Some(Self::Plain(code.clone())),
            Value::Object(obj) => {
                let code = obj.get("$")?.as_str()?.to_owned();
                let class = obj
                    .get("@class")
                    .and_then(Value::as_str)
                    .unwrap_or("projected")
                    .to_owned();
                Some(Self::Classed { class, code })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub minx: f64,
    pub maxx: f64,
    pub miny: f64,
    pub maxy: f64,
    pub crs: Option<CrsRef>,
}

impl BoundingBox {
    pub fn new(minx: f64, miny: f64, maxx: f64, maxy: f64, crs: Option<CrsRef>) -> Self {
        Self {
            minx,
            maxx,
            miny,
            maxy,
            crs,
        }
    }

    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("minx".to_owned(), json!(self.minx));
        obj.insert("maxx".to_owned(), json!(self.maxx));
        obj.insert("miny".to_owned(), json!(self.miny));
        obj.insert("maxy".to_owned(), json!(self.maxy));
        if let Some(crs) = &self.crs {
            obj.insert("crs".to_owned(), crs.to_value());
        }
        Value::Object(obj)
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        let coord = |field: &str| value.get(field).and_then(Value::as_f64);
        Some(Self {
            minx: coord("minx")?,
            maxx: coord("maxx")?,
            miny: coord("miny")?,
            maxy: coord("maxy")?,
            crs: value.get("crs").and_then(CrsRef::from_value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_crs_roundtrip() {
        let bbox = BoundingBox::new(5.9, 45.8, 10.5, 47.8, Some(CrsRef::epsg(4326)));
        let wire = bbox.to_value();
        assert_eq!(wire["crs"], "EPSG:4326");
        assert_eq!(BoundingBox::from_value(&wire).unwrap(), bbox);
    }

    #[test]
    fn classed_crs_roundtrip() {
        let bbox = BoundingBox::new(
            2_480_000.0,
            1_070_000.0,
            2_840_000.0,
            1_300_000.0,
            Some(CrsRef::projected("EPSG:2056")),
        );
        let wire = bbox.to_value();
        assert_eq!(wire["crs"]["@class"], "projected");
        assert_eq!(wire["crs"]["$"], "EPSG:2056");
        let back = BoundingBox::from_value(&wire).unwrap();
        assert_eq!(back.crs.as_ref().unwrap().code(), "EPSG:2056");
        assert_eq!(back, bbox);
    }

    #[test]
    fn missing_coordinate_is_rejected() {
        let wire = serde_json::json!({"minx": 0.0, "maxx": 1.0, "miny": 0.0});
        assert!(BoundingBox::from_value(&wire).is_none());
    }

    #[test]
    fn crs_is_optional() {
        let wire = serde_json::json!({"minx": 0.0, "maxx": 1.0, "miny": 0.0, "maxy": 1.0});
        let bbox = BoundingBox::from_value(&wire).unwrap();
        assert!(bbox.crs.is_none());
    }
}
