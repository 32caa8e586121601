use std::collections::HashMap;

use crate::color::{Color, clamp_channel};

/// Finalized straight-alpha RGBA8 pixels, row-major.
///
/// This is the hand-off shape for the PNG encoder; the canvas resolves every
/// coordinate (compositing its layer stack) before export.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes of RGBA8.
    pub data: Vec<u8>,
}

impl FrameRgba {
    /// Channels of the pixel at `(x, y)`, or `None` when out of range.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Sparse 2-D pixel store keyed by integer coordinates (negative allowed).
///
/// Each coordinate holds an ordered stack of color layers, composited
/// bottom-to-top over the background on read. An absent coordinate reads as
/// "no pixel", which is distinct from a present fully-transparent one.
#[derive(Clone, Debug)]
pub struct Canvas {
    background: Color,
    grid: HashMap<(i32, i32), Vec<Color>>,
}

/// Round a fractional coordinate half-up, matching pixel placement
/// everywhere in the canvas.
fn round_coord(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

impl Canvas {
    /// Create an empty canvas over the given background color.
    ///
    /// The background is the blend base for every read and the fallback for
    /// out-of-range pixels during blur and export.
    pub fn new(background: Color) -> Self {
        Self {
            background,
            grid: HashMap::new(),
        }
    }

    /// The canvas background color.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Append a layer at the rounded coordinate.
    pub fn set_pixel(&mut self, color: Color, x: f64, y: f64) {
        let key = (round_coord(x), round_coord(y));
        self.grid.entry(key).or_default().push(color);
    }

    /// Resolve the composited color at the rounded coordinate, or `None`
    /// when nothing was drawn there.
    pub fn get_pixel(&self, x: f64, y: f64) -> Option<Color> {
        let key = (round_coord(x), round_coord(y));
        self.grid.get(&key).and_then(|stack| {
            Color::blend(std::iter::once(self.background).chain(stack.iter().copied()))
        })
    }

    /// Whether anything was drawn at the rounded coordinate.
    pub fn is_pixel_set(&self, x: f64, y: f64) -> bool {
        self.grid
            .contains_key(&(round_coord(x), round_coord(y)))
    }

    /// Write only when the coordinate is still unset, so outer passes never
    /// clobber detail already drawn.
    pub fn set_pixel_if_missing(&mut self, color: Color, x: f64, y: f64) {
        if !self.is_pixel_set(x, y) {
            self.set_pixel(color, x, y);
        }
    }

    /// `set_pixel_if_missing` over a point sequence.
    pub fn set_if_missing_many<I>(&mut self, color: Color, points: I)
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        for (x, y) in points {
            self.set_pixel_if_missing(color, x, y);
        }
    }

    /// Additively merge into the resolved color at the coordinate
    /// (background when unset) and replace the stack with the result.
    pub fn merge_pixel(&mut self, color: Color, x: f64, y: f64) {
        let merged = self
            .get_pixel(x, y)
            .unwrap_or(self.background)
            .merge(color);
        let key = (round_coord(x), round_coord(y));
        self.grid.insert(key, vec![merged]);
    }

    /// Remove the coordinate entirely; it reads as unset afterwards.
    pub fn delete_pixel(&mut self, x: f64, y: f64) {
        self.grid.remove(&(round_coord(x), round_coord(y)));
    }

    /// Plot a (possibly fractional) point, distributing its coverage over
    /// the 1x1 neighborhood with bilinear weights.
    ///
    /// Each touched cell receives the base color carrying the cell's current
    /// alpha plus `255 * weight`; an integral point lands on exactly one
    /// cell at full weight.
    pub fn set_anti_aliased(&mut self, color: Color, x: f64, y: f64) {
        let base = color.with_alpha(0.0);
        let x0 = x.floor() as i32;
        let y0 = y.floor() as i32;

        for cx in [x0, x0 + 1] {
            let wx = 1.0 - (x - f64::from(cx)).abs();
            if wx <= 0.0 {
                continue;
            }
            for cy in [y0, y0 + 1] {
                let wy = 1.0 - (y - f64::from(cy)).abs();
                if wy <= 0.0 {
                    continue;
                }
                let current = self
                    .get_pixel(f64::from(cx), f64::from(cy))
                    .map_or(0.0, |c| f64::from(c.a));
                let layer = base.with_alpha(current + 255.0 * wx * wy);
                self.set_pixel(layer, f64::from(cx), f64::from(cy));
            }
        }
    }

    /// Replace the grid with a 3x3 box blur of itself.
    ///
    /// Every non-border pixel becomes the channel-wise mean of its
    /// neighborhood (absent neighbors substituted with `default`), with the
    /// alpha additionally scaled by `opacity`. Border pixels, those hitting
    /// `x < 1 || y < 1 || x + 1 == width || y + 1 == height`, are left
    /// unset, so the output keeps an unblurred rim.
    pub fn box_blur(&mut self, default: Color, opacity: f64) {
        let Some((min_x, min_y, max_x, max_y)) = self.bounds() else {
            return;
        };
        let width = max_x - min_x;
        let height = max_y - min_y;

        let mut result: HashMap<(i32, i32), Vec<Color>> = HashMap::new();
        for y in min_y..max_y {
            for x in min_x..max_x {
                if x < 1 || y < 1 || x + 1 == width || y + 1 == height {
                    continue;
                }
                let mut sums = [0.0f64; 4];
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        let c = self
                            .get_pixel(f64::from(x + dx), f64::from(y + dy))
                            .unwrap_or(default);
                        for (sum, ch) in sums.iter_mut().zip(c.channels()) {
                            *sum += f64::from(ch);
                        }
                    }
                }
                let mean = Color::new(
                    clamp_channel(sums[0] / 9.0),
                    clamp_channel(sums[1] / 9.0),
                    clamp_channel(sums[2] / 9.0),
                    clamp_channel(sums[3] / 9.0),
                );
                let blurred = mean.with_alpha(f64::from(mean.a) * opacity);
                result.insert((x, y), vec![blurred]);
            }
        }
        self.grid = result;
    }

    /// Rebuild the grid with every coordinate shifted by `(dx, dy)`,
    /// preserving layer stacks.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        let grid = std::mem::take(&mut self.grid);
        for ((x, y), stack) in grid {
            let key = (
                round_coord(f64::from(x) + dx),
                round_coord(f64::from(y) + dy),
            );
            self.grid.entry(key).or_default().extend(stack);
        }
    }

    /// Derived bounding box `(min_x, min_y, max_x, max_y)` of the set
    /// coordinates; `None` on an empty canvas.
    pub fn bounds(&self) -> Option<(i32, i32, i32, i32)> {
        let mut keys = self.grid.keys();
        let &(x, y) = keys.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (x, y, x, y);
        for &(x, y) in keys {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        Some((min_x, min_y, max_x, max_y))
    }

    /// Bounding-box width; `None` on an empty canvas.
    pub fn width(&self) -> Option<i32> {
        self.bounds().map(|(min_x, _, max_x, _)| max_x - min_x)
    }

    /// Bounding-box height; `None` on an empty canvas.
    pub fn height(&self) -> Option<i32> {
        self.bounds().map(|(_, min_y, _, max_y)| max_y - min_y)
    }

    /// Export the inclusive rectangle as a dense RGBA8 buffer.
    ///
    /// Every coordinate resolves through `get_pixel`, falling back to the
    /// background color where nothing was drawn.
    pub fn to_frame(&self, min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> FrameRgba {
        let width = (max_x - min_x + 1).max(0) as u32;
        let height = (max_y - min_y + 1).max(0) as u32;

        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for row in 0..height {
            for col in 0..width {
                let x = min_x + col as i32;
                let y = min_y + row as i32;
                let color = self
                    .get_pixel(f64::from(x), f64::from(y))
                    .unwrap_or(self.background);
                data.extend_from_slice(&color.channels());
            }
        }

        FrameRgba {
            width,
            height,
            data,
        }
    }
}
