//! Minimal RGB drawing surface on top of [`image::RgbImage`].
//!
//! Coordinates are signed so callers can pass points that fall outside the
//! image; those pixels are clipped.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

use crate::Result;

pub(crate) struct Canvas {
  img: RgbImage,
}

impl Canvas {
  pub(crate) fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
    Self { img: RgbImage::from_pixel(width, height, background) }
  }

  fn plot(&mut self, x: i64, y: i64, colour: Rgb<u8>) {
    if x < 0 || y < 0 {
      return;
    }
    let (x, y) = (x as u32, y as u32);
    if x < self.img.width() && y < self.img.height() {
      self.img.put_pixel(x, y, colour);
    }
  }

  /// Bresenham line from `(x0, y0)` to `(x1, y1)`, both ends inclusive.
  pub(crate) fn line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, colour: Rgb<u8>) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
      self.plot(x, y, colour);
      if x == x1 && y == y1 {
        break;
      }
      let e2 = 2 * err;
      if e2 >= dy {
        err += dy;
        x += sx;
      }
      if e2 <= dx {
        err += dx;
        y += sy;
      }
    }
  }

  /// A two-pixel-wide line.
  pub(crate) fn thick_line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, colour: Rgb<u8>) {
    self.line(x0, y0, x1, y1, colour);
    if (x1 - x0).abs() >= (y1 - y0).abs() {
      self.line(x0, y0 + 1, x1, y1 + 1, colour);
    } else {
      self.line(x0 + 1, y0, x1 + 1, y1, colour);
    }
  }

  /// Filled square of side `2 * radius + 1` centred on `(cx, cy)`.
  pub(crate) fn square(&mut self, cx: i64, cy: i64, radius: i64, colour: Rgb<u8>) {
    for y in cy - radius..=cy + radius {
      for x in cx - radius..=cx + radius {
        self.plot(x, y, colour);
      }
    }
  }

  pub(crate) fn encode_png(self) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    self.img.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
  }
}
