//! Geographic classification of stations into university areas.
//!
//! A station resolves to exactly one area: name-keyword overrides win over
//! geometry, geometry is tested in a fixed region order, and `none` is the
//! fallback. Regions are rectangular lat/lng boxes or haversine circles and
//! can be loaded from a JSON config file in place of the built-in defaults.

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Campus classification of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UniversityArea {
    Mit,
    Harvard,
    Bu,
    #[serde(rename = "neu", alias = "northeastern")]
    Northeastern,
    None,
}

impl UniversityArea {
    pub fn label(self) -> &'static str {
        match self {
            UniversityArea::Mit => "mit",
            UniversityArea::Harvard => "harvard",
            UniversityArea::Bu => "bu",
            UniversityArea::Northeastern => "neu",
            UniversityArea::None => "none",
        }
    }
}

/// Rectangular lat/lng region, degrees, inclusive on both edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat: [f64; 2],
    pub lng: [f64; 2],
}

impl BoundingBox {
    fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.lat[0] && lat <= self.lat[1] && lng >= self.lng[0] && lng <= self.lng[1]
    }
}

/// Circular region: center point plus radius in kilometers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleRegion {
    pub center: [f64; 2],
    pub radius_km: f64,
}

impl CircleRegion {
    fn contains(&self, lat: f64, lng: f64) -> bool {
        haversine_km(self.center[0], self.center[1], lat, lng) <= self.radius_km
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionShape {
    Bounds(BoundingBox),
    Circle(CircleRegion),
}

/// One configured region: the area it assigns plus its geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub area: UniversityArea,
    #[serde(flatten)]
    pub shape: RegionShape,
}

impl Region {
    fn contains(&self, lat: f64, lng: f64) -> bool {
        match &self.shape {
            RegionShape::Bounds(b) => b.contains(lat, lng),
            RegionShape::Circle(c) => c.contains(lat, lng),
        }
    }
}

/// A name keyword that forces an area regardless of coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordOverride {
    pub contains: String,
    pub area: UniversityArea,
}

/// The full classification config: ordered overrides, then ordered regions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaConfig {
    pub overrides: Vec<KeywordOverride>,
    pub regions: Vec<Region>,
}

impl Default for AreaConfig {
    fn default() -> Self {
        AreaConfig {
            overrides: vec![
                KeywordOverride {
                    contains: "vassar".to_string(),
                    area: UniversityArea::Mit,
                },
                KeywordOverride {
                    contains: "christian science".to_string(),
                    area: UniversityArea::Northeastern,
                },
            ],
            regions: vec![
                Region {
                    area: UniversityArea::Mit,
                    shape: RegionShape::Bounds(BoundingBox {
                        lat: [42.3530, 42.3650],
                        lng: [-71.1060, -71.0880],
                    }),
                },
                Region {
                    area: UniversityArea::Harvard,
                    shape: RegionShape::Bounds(BoundingBox {
                        lat: [42.3680, 42.3820],
                        lng: [-71.1240, -71.1100],
                    }),
                },
                Region {
                    area: UniversityArea::Bu,
                    shape: RegionShape::Bounds(BoundingBox {
                        lat: [42.3480, 42.3560],
                        lng: [-71.1190, -71.0950],
                    }),
                },
                Region {
                    area: UniversityArea::Northeastern,
                    shape: RegionShape::Bounds(BoundingBox {
                        lat: [42.3330, 42.3420],
                        lng: [-71.0950, -71.0830],
                    }),
                },
            ],
        }
    }
}

impl AreaConfig {
    /// Loads a region set from a JSON file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AreaConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Resolves a station to its university area.
    ///
    /// Keyword overrides are checked first against the lowercased name, then
    /// each region in config order; the first containing region wins.
    pub fn classify(&self, name: &str, lat: f64, lng: f64) -> UniversityArea {
        let lowered = name.to_lowercase();
        for over in &self.overrides {
            if lowered.contains(&over.contains) {
                return over.area;
            }
        }

        for region in &self.regions {
            if region.contains(lat, lng) {
                return region.area;
            }
        }

        UniversityArea::None
    }
}

/// Great-circle distance in kilometers between two lat/lng points in degrees.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let (lat1, lng1) = (lat1.to_radians(), lng1.to_radians());
    let (lat2, lng2) = (lat2.to_radians(), lng2.to_radians());

    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle_config() -> AreaConfig {
        AreaConfig {
            overrides: AreaConfig::default().overrides,
            regions: vec![
                Region {
                    area: UniversityArea::Mit,
                    shape: RegionShape::Circle(CircleRegion {
                        center: [42.3601, -71.0912],
                        radius_km: 0.8,
                    }),
                },
                Region {
                    area: UniversityArea::Harvard,
                    shape: RegionShape::Circle(CircleRegion {
                        center: [42.3744, -71.1169],
                        radius_km: 0.8,
                    }),
                },
            ],
        }
    }

    #[test]
    fn test_haversine_one_degree_longitude_at_equator() {
        let d = haversine_km(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111.19).abs() < 0.1, "got {d}");
    }

    #[test]
    fn test_haversine_zero_distance() {
        assert_eq!(haversine_km(42.36, -71.09, 42.36, -71.09), 0.0);
    }

    #[test]
    fn test_station_at_circle_center_is_inside() {
        let config = circle_config();
        assert_eq!(
            config.classify("Kendall Sq", 42.3601, -71.0912),
            UniversityArea::Mit
        );
    }

    #[test]
    fn test_station_outside_everything_is_none() {
        let config = AreaConfig::default();
        // downtown Boston waterfront, outside every campus box
        assert_eq!(
            config.classify("Aquarium", 42.3590, -71.0500),
            UniversityArea::None
        );
        let circles = circle_config();
        assert_eq!(
            circles.classify("Aquarium", 42.3590, -71.0500),
            UniversityArea::None
        );
    }

    #[test]
    fn test_bounds_classification() {
        let config = AreaConfig::default();
        assert_eq!(
            config.classify("Harvard Square", 42.3736, -71.1190),
            UniversityArea::Harvard
        );
        assert_eq!(
            config.classify("Ruggles", 42.3370, -71.0890),
            UniversityArea::Northeastern
        );
    }

    #[test]
    fn test_keyword_override_beats_geometry() {
        let config = AreaConfig::default();
        // Harvard-box coordinates, but the name forces MIT
        assert_eq!(
            config.classify("MIT Stata Center at Vassar St", 42.3736, -71.1190),
            UniversityArea::Mit
        );
        assert_eq!(
            config.classify("Christian Science Plaza", 42.3736, -71.1190),
            UniversityArea::Northeastern
        );
    }

    #[test]
    fn test_region_order_first_match_wins() {
        let mut config = AreaConfig::default();
        // overlap every region with one big harvard box appended last:
        // earlier regions must still win
        config.regions.push(Region {
            area: UniversityArea::Harvard,
            shape: RegionShape::Bounds(BoundingBox {
                lat: [42.0, 43.0],
                lng: [-72.0, -70.0],
            }),
        });
        assert_eq!(
            config.classify("Kendall Sq", 42.3601, -71.0912),
            UniversityArea::Mit
        );
    }

    #[test]
    fn test_config_round_trip() {
        let json = serde_json::to_string(&circle_config()).unwrap();
        let parsed: AreaConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.regions.len(), 2);
        assert_eq!(
            parsed.classify("Kendall Sq", 42.3601, -71.0912),
            UniversityArea::Mit
        );
    }
}
