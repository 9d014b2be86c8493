//! Temperature-over-time line charts for Terrarium.
//!
//! Turns a subject's reading history into a PNG. Pure synchronous; no HTTP
//! or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! let png: Vec<u8> = terrarium_chart::render(&[]).unwrap();
//! assert!(png.starts_with(b"\x89PNG"));
//! ```

pub mod error;
mod raster;

pub use error::{Error, Result};
use image::Rgb;
use terrarium_core::reading::Reading;

use raster::Canvas;

// ─── Style ───────────────────────────────────────────────────────────────────

/// The terrarium brand orange used for the figure and plot backgrounds.
pub const BRAND: Rgb<u8> = Rgb([0xf5, 0x70, 0x0c]);

/// Visual parameters for a chart. Purely presentational.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
  pub width:      u32,
  pub height:     u32,
  /// Blank border between the image edge and the axes, in pixels.
  pub margin:     u32,
  pub background: Rgb<u8>,
  pub axis:       Rgb<u8>,
  pub line:       Rgb<u8>,
}

impl Default for ChartStyle {
  /// 7×3 units at 100 px per unit, on the brand colour.
  fn default() -> Self {
    Self {
      width:      700,
      height:     300,
      margin:     30,
      background: BRAND,
      axis:       Rgb([0x3b, 0x1d, 0x05]),
      line:       Rgb([0x1f, 0x77, 0xb4]),
    }
  }
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Render `history` with the default [`ChartStyle`].
pub fn render(history: &[Reading]) -> Result<Vec<u8>> {
  render_with(&ChartStyle::default(), history)
}

/// Render `history` as a PNG line chart.
///
/// The x axis is categorical: readings are spaced evenly in the order given,
/// one slot per timestamp label. The y axis spans the minimum to maximum
/// temperature. An empty history yields bare axes.
pub fn render_with(style: &ChartStyle, history: &[Reading]) -> Result<Vec<u8>> {
  let plot = PlotArea::new(style)?;
  let mut canvas = Canvas::new(style.width, style.height, style.background);

  // Axes: y on the left, x along the bottom.
  canvas.line(plot.left, plot.top, plot.left, plot.bottom, style.axis);
  canvas.line(plot.left, plot.bottom, plot.right, plot.bottom, style.axis);

  let points: Vec<(i64, i64)> = project(&plot, history);

  for &(x, _) in &points {
    canvas.line(x, plot.bottom, x, plot.bottom + 4, style.axis);
  }
  for pair in points.windows(2) {
    let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
    canvas.thick_line(x0, y0, x1, y1, style.line);
  }
  for &(x, y) in &points {
    canvas.square(x, y, 2, style.line);
  }

  canvas.encode_png()
}

// ─── Layout ──────────────────────────────────────────────────────────────────

/// Pixel bounds of the region inside the axes.
struct PlotArea {
  left:   i64,
  right:  i64,
  top:    i64,
  bottom: i64,
}

impl PlotArea {
  fn new(style: &ChartStyle) -> Result<Self> {
    let m = style.margin as i64;
    let area = Self {
      left:   m,
      right:  style.width as i64 - 1 - m,
      top:    m,
      bottom: style.height as i64 - 1 - m,
    };
    if area.right <= area.left || area.bottom <= area.top {
      return Err(Error::TooSmall { width: style.width, height: style.height });
    }
    Ok(area)
  }

  fn width(&self) -> i64 { self.right - self.left }

  fn height(&self) -> i64 { self.bottom - self.top }
}

/// Map readings to pixel coordinates inside `plot`.
fn project(plot: &PlotArea, history: &[Reading]) -> Vec<(i64, i64)> {
  if history.is_empty() {
    return Vec::new();
  }

  let (min, max) = history.iter().fold((f64::MAX, f64::MIN), |(lo, hi), r| {
    (lo.min(r.temperature), hi.max(r.temperature))
  });
  let span = max - min;

  // Keep points off the axes themselves.
  let inset = 8;
  let usable_w = (plot.width() - 2 * inset).max(0);
  let usable_h = (plot.height() - 2 * inset).max(0);

  let n = history.len();
  history
    .iter()
    .enumerate()
    .map(|(i, r)| {
      let x = if n == 1 {
        plot.left + plot.width() / 2
      } else {
        plot.left + inset + (i as i64 * usable_w) / (n as i64 - 1)
      };
      let y = if span <= f64::EPSILON {
        plot.top + plot.height() / 2
      } else {
        let frac = (r.temperature - min) / span;
        plot.bottom - inset - (frac * usable_h as f64).round() as i64
      };
      (x, y)
    })
    .collect()
}
