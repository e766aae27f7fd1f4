//! Page content streams
//!
//! Builder for the graphics operators an image page uses:
//!
//! - `q`/`Q`: save/restore graphics state
//! - `cm`: concatenate transformation matrix
//! - `re`, `rg`, `f`: filled rectangles
//! - `Do`: paint an XObject

use crate::objects::format_real;
use std::io::Write;

/// Content stream builder
#[derive(Debug, Default)]
pub struct ContentStream {
    data: Vec<u8>,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Save the graphics state (q)
    pub fn save_state(&mut self) -> &mut Self {
        self.write_line("q");
        self
    }

    /// Restore the graphics state (Q)
    pub fn restore_state(&mut self) -> &mut Self {
        self.write_line("Q");
        self
    }

    /// Concatenate a transformation matrix (cm)
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        self.write_fmt(format_args!(
            "{} {} {} {} {} {} cm\n",
            format_real(a),
            format_real(b),
            format_real(c),
            format_real(d),
            format_real(e),
            format_real(f)
        ));
        self
    }

    /// Append a rectangle to the path (re)
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.write_fmt(format_args!(
            "{} {} {} {} re\n",
            format_real(x),
            format_real(y),
            format_real(width),
            format_real(height)
        ));
        self
    }

    /// Set the RGB fill color, components in 0..=1 (rg)
    pub fn set_fill_rgb(&mut self, r: f64, g: f64, b: f64) -> &mut Self {
        self.write_fmt(format_args!(
            "{} {} {} rg\n",
            format_real(r),
            format_real(g),
            format_real(b)
        ));
        self
    }

    /// Fill the current path (f)
    pub fn fill(&mut self) -> &mut Self {
        self.write_line("f");
        self
    }

    /// Paint a named XObject (Do)
    pub fn draw_xobject(&mut self, name: &str) -> &mut Self {
        self.write_fmt(format_args!("/{} Do\n", name));
        self
    }

    /// Paint an image XObject into the box whose lower-left corner is
    /// `(x, y)`, in points.
    ///
    /// Image space is the unit square, so the matrix scales it to the
    /// target size and translates it into place.
    pub fn place_image(&mut self, name: &str, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.save_state()
            .transform(width, 0.0, 0.0, height, x, y)
            .draw_xobject(name)
            .restore_state()
    }

    fn write_line(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
        self.data.push(b'\n');
    }

    fn write_fmt(&mut self, args: std::fmt::Arguments<'_>) {
        // Writing into a Vec cannot fail.
        let _ = self.data.write_fmt(args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_image() {
        let mut cs = ContentStream::new();
        cs.place_image("Im0", 28.5, -100.25, 538.5, 1795.0);

        let content = String::from_utf8(cs.into_bytes()).unwrap();
        assert_eq!(content, "q\n538.5 0 0 1795 28.5 -100.25 cm\n/Im0 Do\nQ\n");
    }

    #[test]
    fn test_fill_white() {
        let mut cs = ContentStream::new();
        cs.set_fill_rgb(1.0, 1.0, 1.0).rect(0.0, 0.0, 595.0, 842.0).fill();

        let content = String::from_utf8(cs.into_bytes()).unwrap();
        assert!(content.starts_with("1 1 1 rg\n0 0 595 842 re\nf\n"));
    }
}
