use std::path::PathBuf;

use crate::canvas::{Canvas, FrameRgba};
use crate::color::Color;
use crate::encode_png::write_png;
use crate::error::{NinePatchError, NinePatchResult};
use crate::model::{GeneratorConfig, ImageConfig};
use crate::raster::{circle_perimeter_points, wu_circle};

const DEFAULT_BORDER_RADIUS: f64 = 5.0;
const DEFAULT_BORDER_WIDTH: f64 = 1.0;

/// Paths written by a successful [`generate`] run.
#[derive(Clone, Debug, Default)]
pub struct GenerateSummary {
    /// Output files, in config order.
    pub written: Vec<PathBuf>,
}

struct ResolvedImage {
    background: Color,
    fill: Color,
    border: Color,
    radius: f64,
    border_width: f64,
}

/// Apply the border -> fill -> background -> transparent fallback chain and
/// the radius/width defaults.
fn resolve(config: &ImageConfig) -> NinePatchResult<ResolvedImage> {
    let background = match &config.background_color {
        Some(value) => Color::parse(value)?,
        None => Color::transparent(),
    };
    let fill = match &config.fill_color {
        Some(value) => Color::parse(value)?,
        None => background,
    };
    let border = match &config.border_color {
        Some(value) => Color::parse(value)?,
        None => fill,
    };
    // a negative or non-finite radius degenerates to "no visible border"
    let radius = config.border_radius.unwrap_or(DEFAULT_BORDER_RADIUS);
    let radius = if radius.is_finite() && radius > 0.0 {
        radius
    } else {
        0.0
    };
    let border_width = config.border_width.unwrap_or(DEFAULT_BORDER_WIDTH);
    let border_width = if border_width.is_finite() && border_width > 0.0 {
        border_width
    } else {
        0.0
    };
    Ok(ResolvedImage {
        background,
        fill,
        border,
        radius,
        border_width,
    })
}

/// Draw the anti-aliased border ring(s) and the interior fill around the
/// disc center `(radius, radius)`.
fn draw_rounded_patch(canvas: &mut Canvas, resolved: &ResolvedImage) {
    let ResolvedImage {
        fill,
        border,
        radius,
        border_width,
        ..
    } = *resolved;
    let center = radius;

    // outer border ring, tinted from the coverage field
    for (dx, dy, opac) in wu_circle(radius).points() {
        canvas.set_pixel(
            border.with_alpha(f64::from(opac)),
            center + f64::from(dx),
            center + f64::from(dy),
        );
    }

    // wider borders inset one whole pixel at a time, never touching the
    // anti-aliased outer edge
    let mut inset = 1.0;
    while inset < border_width {
        for (dx, dy, opac) in wu_circle(radius - inset).points() {
            canvas.set_pixel_if_missing(
                border.with_alpha(f64::from(opac)),
                center + f64::from(dx),
                center + f64::from(dy),
            );
        }
        inset += 1.0;
    }

    // concentric fill rings down to the center; if-missing keeps the
    // border's edge pixels intact
    let mut ring = radius - border_width;
    while ring > 0.0 {
        canvas.set_if_missing_many(fill, circle_perimeter_points(ring, 0.0, center, center));
        ring -= 0.5;
    }
    canvas.set_pixel_if_missing(fill, center, center);
}

/// Assemble one 9-patch image into a finalized RGBA buffer.
///
/// The drawing happens around `(radius, radius)`, is shifted by `(1, 1)` to
/// reserve row/column 0 for the stretch guides, and a transparent pixel at
/// the far corner pins the exported dimensions.
#[tracing::instrument(skip_all, fields(out_file = %config.out_file.display()))]
pub fn render_patch(config: &ImageConfig) -> NinePatchResult<FrameRgba> {
    let resolved = resolve(config)?;
    let size = 2.0 * resolved.radius + 2.0;

    let mut canvas = Canvas::new(resolved.background);
    draw_rounded_patch(&mut canvas, &resolved);
    canvas.translate(1.0, 1.0);

    let center = (resolved.radius + 1.0).floor();
    let black = Color::new(0, 0, 0, 255);
    canvas.set_pixel(black, 0.0, center);
    canvas.set_pixel(black, center, 0.0);

    canvas.set_pixel(Color::transparent(), size + 1.0, size + 1.0);

    let corner = (size + 1.5).floor() as i32;
    tracing::debug!(corner, "assembled patch canvas");
    Ok(canvas.to_frame(0, 0, corner, corner))
}

/// Generate every configured image.
///
/// Validation failures abort before any rasterization. A failure while
/// rendering or encoding one image is logged, the remaining images still
/// run, and the first failure is returned after the batch; an earlier
/// output is never invalidated by a later error.
pub fn generate(config: &GeneratorConfig) -> NinePatchResult<GenerateSummary> {
    config.validate()?;

    let out_dir = config.out_dir();
    let mut summary = GenerateSummary::default();
    let mut first_failure: Option<NinePatchError> = None;

    for image in &config.images {
        let out_path = if image.out_file.is_absolute() {
            image.out_file.clone()
        } else {
            out_dir.join(&image.out_file)
        };
        let result = render_patch(image).and_then(|frame| write_png(&out_path, &frame));
        match result {
            Ok(()) => {
                tracing::debug!(path = %out_path.display(), "wrote image");
                summary.written.push(out_path);
            }
            Err(err) => {
                tracing::error!(path = %out_path.display(), error = %err, "image generation failed");
                first_failure.get_or_insert(err);
            }
        }
    }

    match first_failure {
        Some(err) => Err(err),
        None => Ok(summary),
    }
}
