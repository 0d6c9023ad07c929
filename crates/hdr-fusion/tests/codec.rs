use exposure_fusion::{ChannelModel, DisplayImage, Rgb, assemble};
use hdr_fusion::{CodecError, load_exposure, save_display_image};
use tempfile::TempDir;

fn gradient() -> DisplayImage {
    let pixels: Vec<Rgb> = (0..6 * 4)
        .map(|index| Rgb::new(index as f32 / 24.0, 0.5, 1.0 - index as f32 / 24.0))
        .collect();

    assemble(6, 4, &pixels)
}

#[test]
fn png_round_trip() {
    let directory = TempDir::new().unwrap();
    let path = directory.path().join("output.png");
    let image = gradient();

    save_display_image(&image, &path).unwrap();
    let exposure = load_exposure(&path).unwrap();

    assert_eq!(exposure.size(), [6, 4]);
    assert_eq!(exposure.model(), ChannelModel::RGBA8);
    for y in 0..4 {
        for x in 0..6 {
            let [r, g, b, _] = image.pixel(x, y);
            assert_eq!(exposure.pixel(x, y), [r, g, b].map(u16::from));
        }
    }
}

#[test]
fn jpeg_keeps_bounds() {
    let directory = TempDir::new().unwrap();
    let path = directory.path().join("output.JPG");

    save_display_image(&gradient(), &path).unwrap();
    let exposure = load_exposure(&path).unwrap();

    assert_eq!(exposure.size(), [6, 4]);
    assert_eq!(exposure.model(), ChannelModel::RGB8);
}

#[test]
fn unsupported_extension_is_rejected() {
    let directory = TempDir::new().unwrap();
    let path = directory.path().join("output.bmp");

    assert!(matches!(
        save_display_image(&gradient(), &path),
        Err(CodecError::UnsupportedFormat(_))
    ));
    assert!(matches!(load_exposure(&path), Err(CodecError::UnsupportedFormat(_))));
    assert!(!path.exists());
}

#[test]
fn missing_file_fails_to_decode() {
    let directory = TempDir::new().unwrap();
    let path = directory.path().join("missing.png");

    assert!(matches!(load_exposure(&path), Err(CodecError::Decode { .. })));
}
