//! RGBA raster drawn with braille dots or an ASCII ramp.
//!
//! Used for button and tooltip icons and for the remote frame itself. The
//! cell cache is rebuilt only when the pixels, the target area or the render
//! mode change; desaturation is applied while painting so the connection
//! pulse can animate it every tick without a rebuild.

use ratatui::layout::Rect;
use ratatui::style::Style;
use resvg::{tiny_skia, usvg};

use crate::colors::Rgb;
use crate::error::{Result, ViewerError};
use crate::ui::UiFrame;

const ASCII_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

#[derive(Debug, Clone, Copy)]
struct CachedCell {
    ch: char,
    fg: Option<Rgb>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Ascii,
    Braille,
}

#[derive(Debug, Clone)]
pub struct RasterImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    luma: Vec<u8>,
    cached: Vec<Vec<Option<CachedCell>>>,
    cached_area: Rect,
    dirty: bool,
    keep_aspect: bool,
    render_mode: RenderMode,
    desaturation: u8,
}

impl RasterImage {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            rgba: Vec::new(),
            luma: Vec::new(),
            cached: Vec::new(),
            cached_area: Rect::default(),
            dirty: true,
            keep_aspect: true,
            render_mode: RenderMode::Braille,
            desaturation: 0,
        }
    }

    /// Rasterize SVG data to exactly `size`x`size` pixels.
    pub fn from_svg(name: &'static str, bytes: &[u8], size: u32) -> Result<Self> {
        let icon_err = |reason: String| ViewerError::Icon { name, reason };
        let options = usvg::Options::default();
        let tree = usvg::Tree::from_data(bytes, &options).map_err(|e| icon_err(e.to_string()))?;
        let source = tree.size();
        if source.width() <= 0.0 || source.height() <= 0.0 || size == 0 {
            return Err(icon_err("empty canvas".to_string()));
        }
        let mut pixmap = tiny_skia::Pixmap::new(size, size)
            .ok_or_else(|| icon_err("pixmap allocation failed".to_string()))?;
        let transform = tiny_skia::Transform::from_scale(
            size as f32 / source.width(),
            size as f32 / source.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());
        let mut image = Self::new();
        image.try_set_rgba8(size, size, unpremultiply(pixmap.data()))?;
        Ok(image)
    }

    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.rgba.clear();
        self.luma.clear();
        self.cached.clear();
        self.dirty = true;
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn set_keep_aspect(&mut self, keep: bool) {
        self.keep_aspect = keep;
        self.dirty = true;
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
        self.dirty = true;
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    /// Blend painted colors toward gray; 0 leaves them untouched.
    pub fn set_desaturation(&mut self, amount: u8) {
        self.desaturation = amount;
    }

    pub fn desaturation(&self) -> u8 {
        self.desaturation
    }

    /// Replace the pixels, rejecting buffers whose length does not match.
    pub fn try_set_rgba8(&mut self, width: u32, height: u32, rgba: Vec<u8>) -> Result<()> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4));
        match expected {
            Some(expected) if width > 0 && height > 0 && rgba.len() == expected => {}
            _ => {
                return Err(ViewerError::Frame {
                    width,
                    height,
                    expected: expected.unwrap_or(usize::MAX),
                    actual: rgba.len(),
                });
            }
        }
        self.luma = rgba
            .chunks_exact(4)
            .map(|px| {
                let a = px[3] as u32;
                let lum = Rgb::new(px[0], px[1], px[2]).luma() as u32;
                (lum * a / 255) as u8
            })
            .collect();
        self.width = width;
        self.height = height;
        self.rgba = rgba;
        self.dirty = true;
        Ok(())
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        if self.dirty || self.cached_area != area {
            self.rebuild_cache(area);
        }
        let desaturation = self.desaturation;
        let visible = area.intersection(frame.area());
        let buffer = frame.buffer_mut();
        for (row, line) in self.cached.iter().enumerate() {
            let y = area.y.saturating_add(row as u16);
            for (col, cell) in line.iter().enumerate() {
                let x = area.x.saturating_add(col as u16);
                let Some(cell) = cell else {
                    continue;
                };
                if !visible.contains((x, y).into()) {
                    continue;
                }
                if let Some(buf_cell) = buffer.cell_mut((x, y)) {
                    let mut style = Style::default();
                    if let Some(fg) = cell.fg {
                        style = style.fg(fg.desaturate(desaturation).to_color());
                    }
                    let mut utf8 = [0u8; 4];
                    buf_cell
                        .set_symbol(cell.ch.encode_utf8(&mut utf8))
                        .set_style(style);
                }
            }
        }
    }

    fn rebuild_cache(&mut self, area: Rect) {
        self.cached.clear();
        self.cached_area = area;
        self.dirty = false;
        if self.is_empty() || area.width == 0 || area.height == 0 {
            return;
        }

        let (dots_x, dots_y) = match self.render_mode {
            RenderMode::Braille => (2u32, 4u32),
            RenderMode::Ascii => (1, 2),
        };
        let avail_w = area.width as u32 * dots_x;
        let avail_h = area.height as u32 * dots_y;
        let (target_w, target_h, offset_x, offset_y) = if self.keep_aspect {
            let scale =
                (avail_w as f32 / self.width as f32).min(avail_h as f32 / self.height as f32);
            let tw = ((self.width as f32 * scale).round() as u32).clamp(1, avail_w);
            let th = ((self.height as f32 * scale).round() as u32).clamp(1, avail_h);
            (tw, th, (avail_w - tw) / 2, (avail_h - th) / 2)
        } else {
            (avail_w, avail_h, 0, 0)
        };

        let sample = Sampler {
            image: self,
            target_w,
            target_h,
            offset_x,
            offset_y,
        };
        let mut cached = vec![vec![None; area.width as usize]; area.height as usize];
        for (row, line) in cached.iter_mut().enumerate() {
            for (col, slot) in line.iter_mut().enumerate() {
                let px0 = col as u32 * dots_x;
                let py0 = row as u32 * dots_y;
                *slot = match self.render_mode {
                    RenderMode::Braille => sample.braille_cell(px0, py0),
                    RenderMode::Ascii => sample.ascii_cell(px0, py0),
                };
            }
        }
        self.cached = cached;
    }

    fn pixel(&self, x: u32, y: u32) -> Option<(Rgb, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) as usize;
        let px = self.rgba.get(idx * 4..idx * 4 + 4)?;
        if px[3] == 0 {
            return None;
        }
        let luma = self.luma.get(idx).copied().unwrap_or(0);
        Some((Rgb::new(px[0], px[1], px[2]), px[3], luma))
    }
}

impl Default for RasterImage {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps target dot coordinates back onto source pixels.
struct Sampler<'a> {
    image: &'a RasterImage,
    target_w: u32,
    target_h: u32,
    offset_x: u32,
    offset_y: u32,
}

impl Sampler<'_> {
    fn at(&self, px: u32, py: u32) -> Option<(Rgb, u8, u8)> {
        if px < self.offset_x
            || py < self.offset_y
            || px >= self.offset_x + self.target_w
            || py >= self.offset_y + self.target_h
        {
            return None;
        }
        let sx = (px - self.offset_x) * self.image.width / self.target_w;
        let sy = (py - self.offset_y) * self.image.height / self.target_h;
        self.image.pixel(sx, sy)
    }

    fn ascii_cell(&self, px: u32, py: u32) -> Option<CachedCell> {
        let top = self.at(px, py);
        let bottom = self.at(px, py + 1);
        let samples: Vec<_> = [top, bottom].into_iter().flatten().collect();
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as u32;
        let lum = samples.iter().map(|s| s.2 as u32).sum::<u32>() / n;
        let idx = (lum as usize * (ASCII_RAMP.len() - 1)) / 255;
        let fg = average(samples.iter().map(|s| s.0));
        Some(CachedCell {
            ch: ASCII_RAMP[idx.max(1)],
            fg,
        })
    }

    fn braille_cell(&self, px0: u32, py0: u32) -> Option<CachedCell> {
        let mut dots = [None; 8];
        for dy in 0..4u32 {
            for dx in 0..2u32 {
                dots[(dy * 2 + dx) as usize] = self.at(px0 + dx, py0 + dy);
            }
        }
        let present: Vec<_> = dots.iter().flatten().collect();
        if present.is_empty() {
            return None;
        }
        let min = present.iter().map(|d| d.2).min().unwrap_or(0);
        let max = present.iter().map(|d| d.2).max().unwrap_or(0);
        // Opaque but flat areas light every covered dot; textured ones keep
        // only the brighter half.
        let threshold = if max - min < 24 {
            0
        } else {
            ((min as u16 + max as u16) / 2) as u8
        };
        let mut bits = 0u32;
        let mut lit = Vec::with_capacity(8);
        for dy in 0..4u32 {
            for dx in 0..2u32 {
                if let Some((rgb, _, lum)) = dots[(dy * 2 + dx) as usize]
                    && lum >= threshold.saturating_sub(6)
                {
                    bits |= braille_bit(dx, dy);
                    lit.push(rgb);
                }
            }
        }
        if bits == 0 {
            return None;
        }
        Some(CachedCell {
            ch: char::from_u32(0x2800 + bits).unwrap_or(' '),
            fg: average(lit.into_iter()),
        })
    }
}

fn average(colors: impl Iterator<Item = Rgb>) -> Option<Rgb> {
    let (mut r, mut g, mut b, mut n) = (0u32, 0u32, 0u32, 0u32);
    for c in colors {
        r += c.r as u32;
        g += c.g as u32;
        b += c.b as u32;
        n += 1;
    }
    (n > 0).then(|| Rgb::new((r / n) as u8, (g / n) as u8, (b / n) as u8))
}

fn unpremultiply(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for px in data.chunks_exact(4) {
        let a = px[3] as u32;
        if a == 0 {
            out.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        let un = |c: u8| ((c as u32 * 255 + a / 2) / a).min(255) as u8;
        out.extend_from_slice(&[un(px[0]), un(px[1]), un(px[2]), px[3]]);
    }
    out
}

fn braille_bit(dx: u32, dy: u32) -> u32 {
    match (dx, dy) {
        (0, 0) => 1,
        (0, 1) => 2,
        (0, 2) => 4,
        (0, 3) => 64,
        (1, 0) => 8,
        (1, 1) => 16,
        (1, 2) => 32,
        (1, 3) => 128,
        _ => 0,
    }
}
