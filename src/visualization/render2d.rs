//! Static PNG of a finished run
//!
//! Draws the first snapshot in blue and the last in red on a square frame
//! centred on the galaxy, with light grid lines every 2 kpc and optional
//! faint trails joining each tracer's recorded positions.

use std::path::Path;

use image::{ImageResult, Rgb, RgbImage};
use log::info;

use crate::configuration::config::OutputConfig;
use crate::simulation::history::TrajectoryHistory;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([200, 200, 200]);
const AXIS: Rgb<u8> = Rgb([120, 120, 120]);
const TRAIL: Rgb<u8> = Rgb([0, 0, 0]);
const INITIAL: Rgb<u8> = Rgb([31, 119, 180]);
const FINAL: Rgb<u8> = Rgb([214, 39, 40]);

const GRID_SPACING: f64 = 2.0; // kpc
const TRAIL_ALPHA: f32 = 0.05;
const MARKER_ALPHA: f32 = 0.8;

/// Maps kpc coordinates onto the pixel grid
#[derive(Debug, Clone, Copy)]
struct Frame {
    extent: f64,
    size: u32,
}

impl Frame {
    fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let scale = (self.size - 1) as f64 / (2.0 * self.extent);
        // image rows grow downwards
        ((x + self.extent) * scale, (self.extent - y) * scale)
    }
}

/// Render the history into an in-memory image
pub fn render_image(history: &TrajectoryHistory, output: &OutputConfig) -> RgbImage {
    let size = output.size.max(2);
    let frame = Frame { extent: output.extent, size };
    let mut img = RgbImage::from_pixel(size, size, BACKGROUND);

    draw_grid(&mut img, frame);

    if output.trails && history.len() > 1 {
        for i in 0..history.n_tracers() {
            let points: Vec<(f64, f64)> = history.track(i).map(|(x, y)| frame.to_pixel(x, y)).collect();
            for pair in points.windows(2) {
                draw_line(&mut img, pair[0], pair[1], TRAIL, TRAIL_ALPHA);
            }
        }
    }

    let radius = (size as f64 / 250.0).max(1.0);
    if let Some(first) = history.first() {
        for b in &first.tracers {
            draw_disc(&mut img, frame.to_pixel(b.x.x, b.x.y), radius, INITIAL, MARKER_ALPHA);
        }
    }
    if let Some(last) = history.last().filter(|_| history.len() > 1) {
        for b in &last.tracers {
            draw_disc(&mut img, frame.to_pixel(b.x.x, b.x.y), radius, FINAL, MARKER_ALPHA);
        }
    }

    img
}

/// Render the history and write it as a PNG
pub fn render_png(history: &TrajectoryHistory, output: &OutputConfig) -> ImageResult<()> {
    let img = render_image(history, output);
    img.save(Path::new(&output.path))?;
    info!(
        "wrote {} ({} snapshots, t = {:.3} Gyr to {:.3} Gyr)",
        output.path,
        history.len(),
        history.first().map_or(0.0, |s| s.t),
        history.last().map_or(0.0, |s| s.t)
    );
    Ok(())
}

// helpers ===========================================================================

fn draw_grid(img: &mut RgbImage, frame: Frame) {
    let n = (frame.extent / GRID_SPACING).floor() as i64;
    for k in -n..=n {
        let at = k as f64 * GRID_SPACING;
        let color = if k == 0 { AXIS } else { GRID };
        let (x0, y0) = frame.to_pixel(at, -frame.extent);
        let (x1, y1) = frame.to_pixel(at, frame.extent);
        draw_line(img, (x0, y0), (x1, y1), color, 1.0);
        let (x0, y0) = frame.to_pixel(-frame.extent, at);
        let (x1, y1) = frame.to_pixel(frame.extent, at);
        draw_line(img, (x0, y0), (x1, y1), color, 1.0);
    }
}

fn blend(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>, alpha: f32) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let px = img.get_pixel_mut(x as u32, y as u32);
    for c in 0..3 {
        let mixed = alpha * color.0[c] as f32 + (1.0 - alpha) * px.0[c] as f32;
        px.0[c] = mixed.round().clamp(0.0, 255.0) as u8;
    }
}

/// DDA line, one blended pixel per step along the longer axis
fn draw_line(img: &mut RgbImage, from: (f64, f64), to: (f64, f64), color: Rgb<u8>, alpha: f32) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i64;
    for s in 0..=steps {
        let f = s as f64 / steps as f64;
        let x = (from.0 + f * dx).round() as i64;
        let y = (from.1 + f * dy).round() as i64;
        blend(img, x, y, color, alpha);
    }
}

fn draw_disc(img: &mut RgbImage, centre: (f64, f64), radius: f64, color: Rgb<u8>, alpha: f32) {
    let r = radius.ceil() as i64;
    let (cx, cy) = (centre.0.round() as i64, centre.1.round() as i64);
    for dy in -r..=r {
        for dx in -r..=r {
            if ((dx * dx + dy * dy) as f64) <= radius * radius {
                blend(img, cx + dx, cy + dy, color, alpha);
            }
        }
    }
}
