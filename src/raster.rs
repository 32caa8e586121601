//! Pure rasterization routines: parametric circle sampling, the Wu-style
//! anti-aliased circle field, and Wu's line algorithm.
//!
//! Nothing here touches a canvas; every function maps numeric input to
//! coordinates and coverage values, and the caller decides how to plot them.

/// Integer part (floor).
fn ipart(x: f64) -> f64 {
    x.floor()
}

/// Round half-up.
fn round_half(x: f64) -> f64 {
    ipart(x + 0.5)
}

/// Fractional part of `x`.
fn fpart(x: f64) -> f64 {
    x - x.floor()
}

/// One minus the fractional part of `x`.
fn rfpart(x: f64) -> f64 {
    1.0 - fpart(x)
}

/// Dense per-pixel coverage field produced by [`wu_circle`].
///
/// The field is square with side `2*ceil(radius) + 3`; the circle center
/// sits at offset `(ceil(radius) + 1) * (width + 1)` into the backing
/// buffer, so coordinates here are center-relative.
#[derive(Clone, Debug)]
pub struct CircleField {
    width: i32,
    half: i32,
    data: Vec<u8>,
}

impl CircleField {
    fn empty(ceil_radius: i32) -> Self {
        let width = 2 * ceil_radius + 3;
        Self {
            width,
            half: ceil_radius + 1,
            data: vec![0; (width * width) as usize],
        }
    }

    /// Side length of the square field.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Coverage at the center-relative cell `(dx, dy)`; 0 outside the field.
    pub fn at(&self, dx: i32, dy: i32) -> u8 {
        let x = self.half + dx;
        let y = self.half + dy;
        if x < 0 || y < 0 || x >= self.width || y >= self.width {
            return 0;
        }
        self.data[(y * self.width + x) as usize]
    }

    /// Iterate the nonzero cells as center-relative `(dx, dy, coverage)`.
    pub fn points(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        let width = self.width;
        let half = self.half;
        self.data.iter().enumerate().filter_map(move |(idx, &opac)| {
            if opac == 0 {
                return None;
            }
            let idx = idx as i32;
            Some((idx % width - half, idx / width - half, opac))
        })
    }

    /// Keep the most intense coverage seen for a cell; a weaker write never
    /// overwrites a stronger one, which keeps the field rotation-symmetric
    /// where the two octant passes overlap.
    fn bump(&mut self, dx: i32, dy: i32, opac: u8) {
        let x = self.half + dx;
        let y = self.half + dy;
        if x < 0 || y < 0 || x >= self.width || y >= self.width {
            return;
        }
        let cell = &mut self.data[(y * self.width + x) as usize];
        *cell = (*cell).max(opac);
    }

    fn plot_quadrants(&mut self, x: i32, y: i32, f: f64) {
        let opac = round_half(255.0 * f) as u8;
        if opac == 0 {
            return;
        }
        self.bump(x, y, opac);
        self.bump(x, -y, opac);
        self.bump(-x, y, opac);
        self.bump(-x, -y, opac);
    }
}

/// Anti-aliased circle circumference coverage (Wu's algorithm variant).
///
/// For each column up to the 45-degree point the fractional part of
/// `y = sqrt(r^2 - x^2)` is split across two adjacent rows and mirrored
/// into all four quadrants; a second pass with the axes swapped covers the
/// remaining octants, deliberately re-walking the overlap near 45 degrees
/// so the stepping never undersamples near the axes.
///
/// A non-positive or non-finite radius yields the minimum-size all-empty
/// field: "no circle" is a defined result, not an error.
pub fn wu_circle(radius: f64) -> CircleField {
    if !radius.is_finite() || radius <= 0.0 {
        return CircleField::empty(0);
    }

    let mut field = CircleField::empty(radius.ceil() as i32);
    let forty_five = round_half(radius / std::f64::consts::SQRT_2) as i32;

    for x in 0..=forty_five {
        let d = radius * radius - f64::from(x * x);
        if d < 0.0 {
            continue;
        }
        let yj = d.sqrt();
        let frc = fpart(yj);
        let yi = yj.floor() as i32;
        field.plot_quadrants(x, yi, 1.0 - frc);
        field.plot_quadrants(x, yi + 1, frc);
    }

    for y in 0..=forty_five {
        let d = radius * radius - f64::from(y * y);
        if d < 0.0 {
            continue;
        }
        let xj = d.sqrt();
        let frc = fpart(xj);
        let xi = xj.floor() as i32;
        field.plot_quadrants(xi, y, 1.0 - frc);
        field.plot_quadrants(xi + 1, y, frc);
    }

    field
}

/// Sample a ring of raw circumference points.
///
/// The ring sits at `radius - stroke_width / 2` around `(x_offset,
/// y_offset)` and is walked in fixed 1e-3 rad steps (~6283 samples per
/// revolution), oversampled enough that rounded points leave no gaps at
/// any supported radius. Points may repeat after rounding; the caller owns
/// fill-vs-skip semantics. A non-positive ring radius yields no points.
pub fn circle_perimeter_points(
    radius: f64,
    stroke_width: f64,
    x_offset: f64,
    y_offset: f64,
) -> Vec<(f64, f64)> {
    const THETA_STEP: f64 = 1e-3;

    let ring = radius - stroke_width / 2.0;
    if !ring.is_finite() || ring <= 0.0 {
        return Vec::new();
    }

    let samples = (std::f64::consts::TAU / THETA_STEP).floor() as usize + 1;
    let mut points = Vec::with_capacity(samples);
    let mut theta = 0.0;
    for _ in 0..samples {
        theta += THETA_STEP;
        points.push((
            ring * theta.cos() + x_offset,
            ring * theta.sin() + y_offset,
        ));
    }
    points
}

/// Wu's anti-aliased line: emits `(x, y, coverage)` with coverage in [0,1],
/// two sub-pixel-weighted points per column (per row when steep) plus the
/// endpoint caps. Coverage is meant to scale the target color's alpha
/// (`255 * coverage`) before plotting.
pub fn wu_line(mut x0: f64, mut y0: f64, mut x1: f64, mut y1: f64) -> Vec<(i32, i32, f64)> {
    let mut points = Vec::new();

    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let dx = x1 - x0;
    let dy = y1 - y0;
    let gradient = if dx == 0.0 { 1.0 } else { dy / dx };

    let mut plot = |px: f64, py: f64, c: f64| {
        points.push((px as i32, py as i32, c));
    };

    // first endpoint
    let xend = round_half(x0);
    let yend = y0 + gradient * (xend - x0);
    let xgap = rfpart(x0 + 0.5);
    let xpxl1 = xend;
    let ypxl1 = ipart(yend);
    if steep {
        plot(ypxl1, xpxl1, rfpart(yend) * xgap);
        plot(ypxl1 + 1.0, xpxl1, fpart(yend) * xgap);
    } else {
        plot(xpxl1, ypxl1, rfpart(yend) * xgap);
        plot(xpxl1, ypxl1 + 1.0, fpart(yend) * xgap);
    }
    let mut intery = yend + gradient;

    // second endpoint
    let xend = round_half(x1);
    let yend = y1 + gradient * (xend - x1);
    let xgap = fpart(x1 + 0.5);
    let xpxl2 = xend;
    let ypxl2 = ipart(yend);
    if steep {
        plot(ypxl2, xpxl2, rfpart(yend) * xgap);
        plot(ypxl2 + 1.0, xpxl2, fpart(yend) * xgap);
    } else {
        plot(xpxl2, ypxl2, rfpart(yend) * xgap);
        plot(xpxl2, ypxl2 + 1.0, fpart(yend) * xgap);
    }

    // main loop
    for x in (xpxl1 as i32 + 1)..(xpxl2 as i32) {
        if steep {
            plot(ipart(intery), f64::from(x), rfpart(intery));
            plot(ipart(intery) + 1.0, f64::from(x), fpart(intery));
        } else {
            plot(f64::from(x), ipart(intery), rfpart(intery));
            plot(f64::from(x), ipart(intery) + 1.0, fpart(intery));
        }
        intery += gradient;
    }

    points
}
