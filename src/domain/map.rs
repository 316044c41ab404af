// Map geometry: coordinates, bounds, polylines and the point marker
use serde::{Deserialize, Serialize};

/// Travels as `[lat, lon]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(point: LatLng) -> Self {
        [point.lat, point.lon]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn from_points(points: &[LatLng]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self {
            south_west: *first,
            north_east: *first,
        };
        for point in rest {
            bounds.include(*point);
        }
        Some(bounds)
    }

    pub fn include(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lon = self.south_west.lon.min(point.lon);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lon = self.north_east.lon.max(point.lon);
    }

    pub fn union(mut self, other: &LatLngBounds) -> Self {
        self.include(other.south_west);
        self.include(other.north_east);
        self
    }

    /// Grows the box by `ratio` of its height and width on every side.
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_buffer = (self.north_east.lat - self.south_west.lat).abs() * ratio;
        let lon_buffer = (self.north_east.lon - self.south_west.lon).abs() * ratio;
        Self {
            south_west: LatLng::new(
                self.south_west.lat - lat_buffer,
                self.south_west.lon - lon_buffer,
            ),
            north_east: LatLng::new(
                self.north_east.lat + lat_buffer,
                self.north_east.lon + lon_buffer,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Viewport {
    Centered { center: LatLng, zoom: u8 },
    Fitted { bounds: LatLngBounds },
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::Centered {
            center: LatLng::new(-15.78, -47.92),
            zoom: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    pub route_name: String,
    pub color: String,
    pub weight: u32,
    pub points: Vec<LatLng>,
    pub popup: String,
}

impl Polyline {
    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(&self.points)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Popup {
    Pending,
    Address(String),
    Failed,
}

impl Popup {
    pub fn content(&self) -> &str {
        match self {
            Popup::Pending => "Buscando endereço...",
            Popup::Address(address) => address,
            Popup::Failed => "Erro ao buscar endereço.",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: u64,
    pub position: LatLng,
    pub popup: Popup,
}
