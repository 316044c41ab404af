// Map renderer - route polylines, viewport fitting and the point marker
use crate::domain::error::DashboardError;
use crate::domain::map::{LatLng, LatLngBounds, Marker, Polyline, Popup, Viewport};
use crate::domain::palette::Palette;

const POLYLINE_WEIGHT: u32 = 5;
const ADDRESS_NOT_FOUND: &str = "Endereço não encontrado";

/// Issued when a marker is placed; the address lookup must echo `marker` back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerTicket {
    pub marker: u64,
    pub position: LatLng,
}

#[derive(Debug, Clone)]
pub struct MapRenderer {
    palette: Palette,
    padding: f64,
    viewport: Viewport,
    polylines: Vec<Polyline>,
    /// Source sequences by display index, including empty ones
    sequences: Vec<Vec<LatLng>>,
    marker: Option<Marker>,
    next_marker: u64,
}

impl MapRenderer {
    pub fn new(palette: Palette, padding: f64) -> Self {
        Self {
            palette,
            padding,
            viewport: Viewport::default(),
            polylines: Vec::new(),
            sequences: Vec::new(),
            marker: None,
            next_marker: 0,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn polylines(&self) -> &[Polyline] {
        &self.polylines
    }

    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    /// Draws one polyline per non-empty sequence and fits the viewport to all of them.
    pub fn draw_routes(&mut self, routes: &[(&str, &[LatLng])]) {
        self.clear();

        let mut bounds: Option<LatLngBounds> = None;
        for (index, (name, points)) in routes.iter().enumerate() {
            self.sequences.push(points.to_vec());
            if points.is_empty() {
                continue;
            }
            let polyline = Polyline {
                route_name: name.to_string(),
                color: self.palette.color(index).to_string(),
                weight: POLYLINE_WEIGHT,
                points: points.to_vec(),
                popup: format!("<b>Ensaio:</b> {}", name),
            };
            if let Some(line_bounds) = polyline.bounds() {
                bounds = Some(match bounds {
                    Some(all) => all.union(&line_bounds),
                    None => line_bounds,
                });
            }
            self.polylines.push(polyline);
        }

        if let Some(bounds) = bounds {
            self.viewport = Viewport::Fitted {
                bounds: bounds.pad(self.padding),
            };
        }
    }

    /// Replaces the point marker with one at `sample` of route `sequence`.
    pub fn place_marker(&mut self, sequence: usize, sample: usize) -> Option<MarkerTicket> {
        let position = *self.sequences.get(sequence)?.get(sample)?;
        self.next_marker += 1;
        self.marker = Some(Marker {
            id: self.next_marker,
            position,
            popup: Popup::Pending,
        });
        Some(MarkerTicket {
            marker: self.next_marker,
            position,
        })
    }

    /// Fills the popup of marker `id`. Returns false when that marker is gone.
    pub fn resolve_marker(
        &mut self,
        id: u64,
        result: Result<Option<String>, DashboardError>,
    ) -> bool {
        let Some(marker) = self.marker.as_mut().filter(|m| m.id == id) else {
            return false;
        };
        marker.popup = match result {
            Ok(Some(address)) if !address.is_empty() => Popup::Address(address),
            Ok(_) => Popup::Address(ADDRESS_NOT_FOUND.to_string()),
            Err(err) => {
                tracing::warn!("Reverse geocoding failed: {}", err);
                Popup::Failed
            }
        };
        true
    }

    /// Removes polylines and the marker; the viewport stays where it is.
    pub fn clear(&mut self) {
        self.polylines.clear();
        self.sequences.clear();
        self.marker = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> MapRenderer {
        MapRenderer::new(Palette::default(), 0.1)
    }

    fn route(offset: f64) -> Vec<LatLng> {
        vec![
            LatLng::new(-23.0 + offset, -46.0),
            LatLng::new(-22.0 + offset, -45.0),
        ]
    }

    #[test]
    fn test_draw_routes_colours_and_fits() {
        let mut map = renderer();
        let a = route(0.0);
        let b = route(1.0);
        map.draw_routes(&[("A", a.as_slice()), ("B", b.as_slice())]);

        assert_eq!(map.polylines().len(), 2);
        assert_eq!(map.polylines()[0].color, "#0f0b60");
        assert_eq!(map.polylines()[1].color, "#d90429");
        assert_eq!(map.polylines()[1].popup, "<b>Ensaio:</b> B");

        match map.viewport() {
            Viewport::Fitted { bounds } => {
                assert!((bounds.south_west.lat - -23.2).abs() < 1e-9);
                assert!((bounds.north_east.lat - -20.8).abs() < 1e-9);
                assert!((bounds.south_west.lon - -46.1).abs() < 1e-9);
            }
            other => panic!("unexpected viewport {:?}", other),
        }
    }

    #[test]
    fn test_empty_sequences_keep_colour_slot() {
        let mut map = renderer();
        let b = route(0.0);
        let empty: Vec<LatLng> = Vec::new();
        map.draw_routes(&[("A", empty.as_slice()), ("B", b.as_slice())]);
        assert_eq!(map.polylines().len(), 1);
        assert_eq!(map.polylines()[0].color, "#d90429");
    }

    #[test]
    fn test_no_routes_keeps_viewport() {
        let mut map = renderer();
        map.draw_routes(&[]);
        assert_eq!(map.viewport(), &Viewport::default());
    }

    #[test]
    fn test_single_marker_and_stale_geocode() {
        let mut map = renderer();
        let a = route(0.0);
        map.draw_routes(&[("A", a.as_slice())]);

        let first = map.place_marker(0, 0).unwrap();
        assert_eq!(map.marker().unwrap().popup.content(), "Buscando endereço...");

        let second = map.place_marker(0, 1).unwrap();
        assert_eq!(second.position, LatLng::new(-22.0, -45.0));
        assert_ne!(first.marker, second.marker);

        assert!(!map.resolve_marker(first.marker, Ok(Some("Rua Velha".to_string()))));
        assert_eq!(map.marker().unwrap().popup, Popup::Pending);

        assert!(map.resolve_marker(second.marker, Ok(Some("Av. Paulista".to_string()))));
        assert_eq!(map.marker().unwrap().popup.content(), "Av. Paulista");
    }

    #[test]
    fn test_geocode_fallbacks() {
        let mut map = renderer();
        let a = route(0.0);
        map.draw_routes(&[("A", a.as_slice())]);

        let ticket = map.place_marker(0, 0).unwrap();
        map.resolve_marker(ticket.marker, Ok(None));
        assert_eq!(map.marker().unwrap().popup.content(), "Endereço não encontrado");

        let ticket = map.place_marker(0, 0).unwrap();
        map.resolve_marker(ticket.marker, Err(DashboardError::Transport("offline".to_string())));
        assert_eq!(map.marker().unwrap().popup.content(), "Erro ao buscar endereço.");
    }

    #[test]
    fn test_marker_out_of_range_and_redraw_clears_it() {
        let mut map = renderer();
        let a = route(0.0);
        map.draw_routes(&[("A", a.as_slice())]);
        assert!(map.place_marker(0, 9).is_none());
        assert!(map.place_marker(1, 0).is_none());

        map.place_marker(0, 0).unwrap();
        map.draw_routes(&[("A", a.as_slice())]);
        assert!(map.marker().is_none());
    }
}
