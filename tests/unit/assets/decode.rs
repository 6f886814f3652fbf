use std::io::Cursor;

use super::*;

fn png_bytes(img: image::DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_drops_alpha_to_rgb8() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8, 1, 2, 3, 255];
    let img = image::RgbaImage::from_raw(2, 1, src_rgba).unwrap();
    let bytes = png_bytes(image::DynamicImage::ImageRgba8(img));

    let decoded = decode_image("mem.png", &bytes).unwrap();
    assert_eq!((decoded.width, decoded.height), (2, 1));
    assert_eq!(decoded.rgb8, vec![100, 50, 200, 1, 2, 3]);
    assert_eq!(decoded.path, PathBuf::from("mem.png"));
}

#[test]
fn decode_garbage_reports_path() {
    let err = decode_image("photos/not-an-image.jpg", b"definitely not a jpeg").unwrap_err();
    match err {
        StillreelError::ImageDecode { path, .. } => {
            assert_eq!(path, PathBuf::from("photos/not-an-image.jpg"));
        }
        other => panic!("expected ImageDecode, got {other:?}"),
    }
}

#[test]
fn decode_missing_file_is_decode_error() {
    let err = decode_image_file(Path::new("target/does/not/exist.png")).unwrap_err();
    assert!(err.is_recoverable());
}

#[test]
fn from_rgb8_validates_length() {
    assert!(SourceImage::from_rgb8("x", 2, 2, vec![0; 12]).is_ok());
    assert!(SourceImage::from_rgb8("x", 2, 2, vec![0; 11]).is_err());
    assert!(SourceImage::from_rgb8("x", 0, 2, vec![]).is_err());
}
