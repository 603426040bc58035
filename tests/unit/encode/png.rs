use super::*;

#[test]
fn png_round_trips_through_image() {
    let frame = FrameRGBA::filled(3, 2, [10, 20, 30, 255]);
    let bytes = encode_png(&frame).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (3, 2));
    assert_eq!(decoded.get_pixel(2, 1).0, [10, 20, 30, 255]);
}

#[test]
fn short_buffers_are_rejected() {
    let frame = FrameRGBA {
        width: 4,
        height: 4,
        data: vec![0; 8],
    };
    assert!(matches!(encode_png(&frame), Err(TickdownError::Validation(_))));
}
