//! Cell types for the table model
//!
//! Supported cells:
//! - null
//! - bool, int (64-bit signed), float (64-bit)
//! - text: UTF-8 string
//! - timestamp: timezone-aware instant
//! - naive_timestamp: wall-clock time without an offset
//! - geometry: any `geo::Geometry<f64>`

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use geo::Geometry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row identifier. Reference columns hold values of this type.
pub type RowId = i64;

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Unambiguous instant carrying its UTC offset
    Timestamp(DateTime<FixedOffset>),
    /// Local wall-clock time; never accepted where an instant is required
    NaiveTimestamp(NaiveDateTime),
    Geometry(Geometry<f64>),
}

impl Value {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Timestamp(_) => "timestamp",
            Value::NaiveTimestamp(_) => "naive timestamp",
            Value::Geometry(_) => "geometry",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the integer payload, used for row-identifier references
    pub fn as_row_id(&self) -> Option<RowId> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::NaiveTimestamp(v)
    }
}

impl From<Geometry<f64>> for Value {
    fn from(v: Geometry<f64>) -> Self {
        Value::Geometry(v)
    }
}

impl From<geo::Point<f64>> for Value {
    fn from(v: geo::Point<f64>) -> Self {
        Value::Geometry(v.into())
    }
}

impl From<geo::LineString<f64>> for Value {
    fn from(v: geo::LineString<f64>) -> Self {
        Value::Geometry(v.into())
    }
}

impl From<geo::Polygon<f64>> for Value {
    fn from(v: geo::Polygon<f64>) -> Self {
        Value::Geometry(v.into())
    }
}

/// Category of spatial shape held by a geometry cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Point,
    MultiPoint,
    /// Line segments and line strings
    Line,
    MultiLine,
    /// Polygons, rectangles and triangles
    Polygon,
    MultiPolygon,
    Collection,
}

impl GeometryKind {
    /// Classifies a geometry
    pub fn of(geometry: &Geometry<f64>) -> Self {
        match geometry {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::Line(_) | Geometry::LineString(_) => GeometryKind::Line,
            Geometry::MultiLineString(_) => GeometryKind::MultiLine,
            Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => {
                GeometryKind::Polygon
            }
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryKind::Collection,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "point",
            GeometryKind::MultiPoint => "multi_point",
            GeometryKind::Line => "line",
            GeometryKind::MultiLine => "multi_line",
            GeometryKind::Polygon => "polygon",
            GeometryKind::MultiPolygon => "multi_polygon",
            GeometryKind::Collection => "collection",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
