use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Attributes, Resource};

/// A geographic area drawn as a polygon of `[lat, lon]` points.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Region {
    #[serde(deserialize_with = "super::de::lenient_i64")]
    pub id: Option<i64>,
    pub uri: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    #[serde(deserialize_with = "super::de::lenient_points")]
    pub points: Option<Vec<[f64; 2]>>,
    pub offices: Option<Vec<Value>>,

    #[serde(skip)]
    attributes: Attributes,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Resource for Region {
    const OBJECT_NAME: &'static str = "region";
    const LIST_KEY: &'static str = "regions";

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }
}

impl Region {
    fn polygon(&self) -> Option<&[[f64; 2]]> {
        self.points.as_deref().filter(|p| !p.is_empty())
    }

    /// Ray-casting point-in-polygon test. Points on an edge may land either way.
    pub fn contains_point(&self, lat: f64, lon: f64) -> bool {
        let Some(points) = self.polygon() else {
            return false;
        };

        let (x, y) = (lon, lat);
        let mut inside = false;
        let mut j = points.len() - 1;
        for i in 0..points.len() {
            let (xi, yi) = (points[i][1], points[i][0]);
            let (xj, yj) = (points[j][1], points[j][0]);
            if ((yi <= y && y < yj) || (yj <= y && y < yi))
                && x < (xj - xi) * (y - yi) / (yj - yi) + xi
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let points = self.polygon()?;
        let init = BoundingBox {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
        };
        Some(points.iter().fold(init, |bb, [lat, lon]| BoundingBox {
            min_lat: bb.min_lat.min(*lat),
            max_lat: bb.max_lat.max(*lat),
            min_lon: bb.min_lon.min(*lon),
            max_lon: bb.max_lon.max(*lon),
        }))
    }

    /// Average of the polygon's points as `(lat, lon)`.
    pub fn center_point(&self) -> Option<(f64, f64)> {
        let points = self.polygon()?;
        let count = points.len() as f64;
        let (lat_sum, lon_sum) = points
            .iter()
            .fold((0.0, 0.0), |(lat, lon), p| (lat + p[0], lon + p[1]));
        Some((lat_sum / count, lon_sum / count))
    }

    pub fn has_color(&self) -> bool {
        self.color.as_deref().map(|c| !c.is_empty()).unwrap_or(false)
    }

    pub fn has_offices(&self) -> bool {
        self.offices.as_ref().map(|o| !o.is_empty()).unwrap_or(false)
    }
}
