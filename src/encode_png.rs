use std::path::Path;

use crate::canvas::FrameRgba;
use crate::error::{NinePatchError, NinePatchResult};

/// Write a finalized RGBA8 buffer to `path` as a PNG.
///
/// This is the encoder boundary: pixels are taken as-is, failures from the
/// encoder are propagated opaquely as encoding errors.
pub fn write_png(path: &Path, frame: &FrameRgba) -> NinePatchResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| {
            NinePatchError::encoding(format!(
                "create output dir '{}': {err}",
                parent.display()
            ))
        })?;
    }

    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|err| NinePatchError::encoding(format!("write png '{}': {err}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn writes_a_readable_png() {
        let frame = FrameRgba {
            width: 2,
            height: 2,
            data: vec![
                255, 0, 0, 255, //
                0, 255, 0, 255, //
                0, 0, 255, 255, //
                0, 0, 0, 0,
            ],
        };

        let path = PathBuf::from("target")
            .join("encode_png_test")
            .join("pixels.png");
        let _ = std::fs::remove_file(&path);
        write_png(&path, &frame).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(1, 1).0, [0, 0, 0, 0]);
    }

    #[test]
    fn zero_sized_frame_is_an_encoding_error() {
        let frame = FrameRgba {
            width: 0,
            height: 0,
            data: Vec::new(),
        };
        let path = PathBuf::from("target")
            .join("encode_png_test")
            .join("empty.png");
        let err = write_png(&path, &frame).unwrap_err();
        assert!(matches!(err, NinePatchError::Encoding(_)));
    }
}
