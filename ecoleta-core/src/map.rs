//! Map viewport math: which part of the world a map area shows, and which
//! coordinate sits under a given cell.
//!
//! The projection is equirectangular. At zoom `z` the viewport spans
//! [`TILES_ACROSS`] slippy-map tiles horizontally; the vertical span follows
//! the area's aspect ratio, counting a terminal cell as twice as tall as wide.

use crate::model::Coordinate;

/// Horizontal extent of the viewport, in tiles.
pub const TILES_ACROSS: f64 = 4.0;
/// Highest zoom level the tile source serves.
pub const MAX_ZOOM: u8 = 19;

const CELL_ASPECT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
/// Geographic rectangle covered by a map area.
pub struct Bounds {
    /// Western edge.
    pub west: f64,
    /// Eastern edge.
    pub east: f64,
    /// Southern edge.
    pub south: f64,
    /// Northern edge.
    pub north: f64,
}

impl Bounds {
    /// Whether the coordinate lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, position: Coordinate) -> bool {
        (self.west..=self.east).contains(&position.longitude)
            && (self.south..=self.north).contains(&position.latitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Center and zoom of the map widget.
pub struct Viewport {
    /// Center of the visible area.
    pub center: Coordinate,
    /// Slippy-map zoom level.
    pub zoom: u8,
}

impl Viewport {
    /// Viewport centered on `center`; zoom is capped at [`MAX_ZOOM`].
    #[must_use]
    pub fn new(center: Coordinate, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.min(MAX_ZOOM),
        }
    }

    /// Longitude/latitude spans in degrees for an area of `width` x `height` cells.
    #[must_use]
    pub fn spans(&self, width: u16, height: u16) -> (f64, f64) {
        let lon_span = (360.0 / f64::powi(2.0, i32::from(self.zoom)) * TILES_ACROSS).min(360.0);
        let width = f64::from(width.max(1));
        let height = f64::from(height.max(1));
        let lat_span = (lon_span * height * CELL_ASPECT / width).min(180.0);
        (lon_span, lat_span)
    }

    /// Rectangle shown by an area of `width` x `height` cells.
    #[must_use]
    pub fn bounds(&self, width: u16, height: u16) -> Bounds {
        let (lon_span, lat_span) = self.spans(width, height);
        let (west, east) = clamp_span(self.center.longitude, lon_span, 180.0);
        let (south, north) = clamp_span(self.center.latitude, lat_span, 90.0);
        Bounds {
            west,
            east,
            south,
            north,
        }
    }

    /// Coordinate at the middle of cell (`column`, `row`), relative to the
    /// top-left corner of the area. Row 0 is the northern edge.
    #[must_use]
    pub fn coordinate_at(&self, column: u16, row: u16, width: u16, height: u16) -> Coordinate {
        let bounds = self.bounds(width, height);
        let x_ratio = (f64::from(column) + 0.5) / f64::from(width.max(1));
        let y_ratio = (f64::from(row) + 0.5) / f64::from(height.max(1));
        Coordinate {
            latitude: bounds.north - y_ratio * (bounds.north - bounds.south),
            longitude: bounds.west + x_ratio * (bounds.east - bounds.west),
        }
    }

    /// Size of one cell in degrees, as (latitude, longitude).
    #[must_use]
    pub fn cell_size(&self, width: u16, height: u16) -> (f64, f64) {
        let (lon_span, lat_span) = self.spans(width, height);
        (
            lat_span / f64::from(height.max(1)),
            lon_span / f64::from(width.max(1)),
        )
    }
}

/// Move `position` by whole cells, keeping it on the globe.
#[must_use]
pub fn nudge(position: Coordinate, cell: (f64, f64), rows: i32, columns: i32) -> Coordinate {
    let (lat_step, lon_step) = cell;
    Coordinate {
        latitude: (position.latitude + lat_step * f64::from(rows)).clamp(-90.0, 90.0),
        longitude: (position.longitude + lon_step * f64::from(columns)).clamp(-180.0, 180.0),
    }
}

fn clamp_span(center: f64, span: f64, limit: f64) -> (f64, f64) {
    let half = span / 2.0;
    let low = (center - half).max(-limit);
    let high = (center + half).min(limit);
    (low, high)
}
