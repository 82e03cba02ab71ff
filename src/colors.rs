//! RGB math for the overlay paint code and its mapping to terminal colors.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Paint `top` over `self` with coverage `alpha` (0 keeps `self`).
    pub fn blend(self, top: Rgb, alpha: u8) -> Rgb {
        let mix = |base: u8, over: u8| -> u8 {
            let a = alpha as u32;
            ((base as u32 * (255 - a) + over as u32 * a + 127) / 255) as u8
        };
        Rgb::new(mix(self.r, top.r), mix(self.g, top.g), mix(self.b, top.b))
    }

    /// Scale brightness by `percent`; 120 is a fifth lighter, 80 a fifth
    /// darker. Channels saturate at 255.
    pub fn scaled(self, percent: u32) -> Rgb {
        let scale = |c: u8| ((c as u32 * percent + 50) / 100).min(255) as u8;
        Rgb::new(scale(self.r), scale(self.g), scale(self.b))
    }

    pub fn luma(self) -> u8 {
        ((self.r as u32 * 299 + self.g as u32 * 587 + self.b as u32 * 114) / 1000) as u8
    }

    /// Pull toward the pixel's own gray by `amount` (255 is fully gray).
    pub fn desaturate(self, amount: u8) -> Rgb {
        let l = self.luma();
        self.blend(Rgb::new(l, l, l), amount)
    }

    pub fn to_color(self) -> Color {
        map_rgb_to_color(self)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb::new(r, g, b)
    }
}

/// Piecewise-linear vertical gradient. Stops are `(position, color)` with
/// positions ascending in `0.0..=1.0`.
#[derive(Debug, Clone, Copy)]
pub struct Ramp<const N: usize> {
    stops: [(f32, Rgb); N],
}

impl<const N: usize> Ramp<N> {
    pub const fn new(stops: [(f32, Rgb); N]) -> Self {
        Self { stops }
    }

    pub fn at(&self, t: f32) -> Rgb {
        let Some(first) = self.stops.first() else {
            return Rgb::BLACK;
        };
        let t = t.clamp(0.0, 1.0);
        if t <= first.0 {
            return first.1;
        }
        for pair in self.stops.windows(2) {
            let (p0, c0) = pair[0];
            let (p1, c1) = pair[1];
            if t <= p1 {
                let span = (p1 - p0).max(f32::EPSILON);
                let alpha = (((t - p0) / span) * 255.0).round() as u8;
                return c0.blend(c1, alpha);
            }
        }
        self.stops.last().map_or(first.1, |stop| stop.1)
    }
}

/// Truecolor when `COLORTERM` advertises it, otherwise the closest entry of
/// the xterm-256 palette.
pub fn map_rgb_to_color(rgb: Rgb) -> Color {
    if let Ok(var) = std::env::var("COLORTERM") {
        let var = var.to_ascii_lowercase();
        if var.contains("truecolor") || var.contains("24bit") {
            return Color::Rgb(rgb.r, rgb.g, rgb.b);
        }
    }
    Color::Indexed(xterm_index(rgb))
}

const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

fn xterm_index(rgb: Rgb) -> u8 {
    let level = |c: u8| ((c as u16 * 5 + 127) / 255) as u8;
    let (r6, g6, b6) = (level(rgb.r), level(rgb.g), level(rgb.b));
    let cube = Rgb::new(
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let cube_index = 16 + 36 * r6 + 6 * g6 + b6;

    let avg = ((rgb.r as u16 + rgb.g as u16 + rgb.b as u16) / 3) as u8;
    let gray_step = ((avg as u16 * 23 + 127) / 255) as u8;
    let gray_value = (8 + gray_step as u16 * 10).min(255) as u8;
    let gray = Rgb::new(gray_value, gray_value, gray_value);

    if distance_sq(rgb, gray) < distance_sq(rgb, cube) {
        232 + gray_step
    } else {
        cube_index
    }
}

fn distance_sq(a: Rgb, b: Rgb) -> u32 {
    let d = |x: u8, y: u8| {
        let v = x as i32 - y as i32;
        (v * v) as u32
    };
    d(a.r, b.r) + d(a.g, b.g) + d(a.b, b.b)
}
