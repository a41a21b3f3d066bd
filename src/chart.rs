//! Renderer-agnostic chart binding.
//!
//! Maps a pipeline's result table to the column roles a chart needs
//! (category, value, series; latitude/longitude for maps) without assuming
//! any renderer API beyond "consumes rows plus column roles". Zero input
//! rows produce an empty frame, never an error: the renderer shows an empty
//! state.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAP_CENTER;
use crate::data::error::DataResult;
use crate::types::Table;

/// Chart color palette - highly distinct colors for data visualization
pub const CHART_COLORS: [&str; 8] = [
    "#2f6fe0", // Bright Blue
    "#1fa055", // Green
    "#f58a1f", // Orange
    "#8a4fd3", // Violet/Purple
    "#dd3c3c", // Red
    "#1da8a0", // Cyan/Teal
    "#e8c51a", // Yellow
    "#dd4fb0", // Pink/Magenta
];

/// Types of charts the dashboard renders
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Scatter,
    Histogram,
    Map,
}

impl ChartKind {
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar",
            ChartKind::Line => "Line",
            ChartKind::Scatter => "Scatter",
            ChartKind::Histogram => "Histogram",
            ChartKind::Map => "Map",
        }
    }

    pub fn all() -> &'static [ChartKind] {
        &[
            ChartKind::Bar,
            ChartKind::Line,
            ChartKind::Scatter,
            ChartKind::Histogram,
            ChartKind::Map,
        ]
    }
}

/// Column roles for a category/value chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartBinding {
    /// Category (X axis) column.
    pub x: String,
    /// Value (Y axis) column.
    pub y: String,
    /// Optional series/color column (the `hue` of the evolution charts).
    pub series: Option<String>,
}

impl ChartBinding {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            series: None,
        }
    }

    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.series = Some(series.into());
        self
    }
}

/// A single data point ready for rendering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Category label (X axis).
    pub label: String,
    /// Numeric value; `None` renders as a gap, not zero.
    pub value: Option<f64>,
    /// Series label when the binding has a series column.
    pub series: Option<String>,
    /// Palette color assigned from the series (or point) index.
    pub color: String,
}

/// Chart-ready data extracted from a result table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartFrame {
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ChartPoint>,
    /// Maximum value for scaling; `None` for an empty frame.
    pub max_value: Option<f64>,
    /// Minimum value for scaling; `None` for an empty frame.
    pub min_value: Option<f64>,
}

impl ChartFrame {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Extract chart points from a table under a binding.
///
/// Colors cycle through the palette per distinct series (or per point when
/// there is no series column), in row order.
pub fn bind_chart(table: &Table, binding: &ChartBinding) -> DataResult<ChartFrame> {
    let x = table.column_index(&binding.x)?;
    let y = table.column_index(&binding.y)?;
    let series = binding
        .series
        .as_deref()
        .map(|name| table.column_index(name))
        .transpose()?;

    let mut series_order: Vec<String> = Vec::new();
    let mut points = Vec::with_capacity(table.row_count());
    let mut max_value: Option<f64> = None;
    let mut min_value: Option<f64> = None;

    for row in table.rows() {
        let series_label = series.map(|i| row.value(i).display());
        let color_slot = match &series_label {
            Some(label) => {
                match series_order.iter().position(|s| s == label) {
                    Some(slot) => slot,
                    None => {
                        series_order.push(label.clone());
                        series_order.len() - 1
                    }
                }
            }
            None => points.len(),
        };

        let value = row.value(y).as_f64();
        if let Some(n) = value {
            max_value = Some(max_value.map_or(n, |m: f64| m.max(n)));
            min_value = Some(min_value.map_or(n, |m: f64| m.min(n)));
        }

        points.push(ChartPoint {
            label: row.value(x).display(),
            value,
            series: series_label,
            color: CHART_COLORS[color_slot % CHART_COLORS.len()].to_string(),
        });
    }

    Ok(ChartFrame {
        x_label: binding.x.clone(),
        y_label: binding.y.clone(),
        points,
        max_value,
        min_value,
    })
}

/// Column roles for a scatter map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapBinding {
    pub latitude: String,
    pub longitude: String,
    /// Column shown on marker hover (facility name).
    pub hover: Option<String>,
    /// Column driving marker color (facility type, distance).
    pub color: Option<String>,
}

impl MapBinding {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
            hover: None,
            color: None,
        }
    }

    pub fn with_hover(mut self, hover: impl Into<String>) -> Self {
        self.hover = Some(hover.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// One map marker. Rows with a null coordinate are skipped at binding time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub hover: Option<String>,
    pub color_value: Option<String>,
}

/// Map-ready markers plus a view center.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapFrame {
    pub markers: Vec<MapMarker>,
    /// Mean of marker coordinates; the France default when no row has
    /// usable coordinates.
    pub center: (f64, f64),
}

/// Extract map markers from a table under a binding.
pub fn bind_map(table: &Table, binding: &MapBinding) -> DataResult<MapFrame> {
    let lat = table.column_index(&binding.latitude)?;
    let lon = table.column_index(&binding.longitude)?;
    let hover = binding
        .hover
        .as_deref()
        .map(|name| table.column_index(name))
        .transpose()?;
    let color = binding
        .color
        .as_deref()
        .map(|name| table.column_index(name))
        .transpose()?;

    let mut markers = Vec::new();
    let (mut lat_sum, mut lon_sum) = (0.0, 0.0);

    for row in table.rows() {
        let (Some(latitude), Some(longitude)) =
            (row.value(lat).as_f64(), row.value(lon).as_f64())
        else {
            continue;
        };
        lat_sum += latitude;
        lon_sum += longitude;
        markers.push(MapMarker {
            latitude,
            longitude,
            hover: hover.map(|i| row.value(i).display()),
            color_value: color.map(|i| row.value(i).display()),
        });
    }

    let center = if markers.is_empty() {
        tracing::warn!("map binding matched no located rows, using default center");
        DEFAULT_MAP_CENTER
    } else {
        let n = markers.len() as f64;
        (lat_sum / n, lon_sum / n)
    };

    Ok(MapFrame { markers, center })
}
