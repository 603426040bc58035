use super::*;

fn cfg(format: ExportFormat, width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: 30,
        format,
        bitrate_bps: 10_000_000,
        file_name: "out.bin".to_string(),
        audio: None,
    }
}

#[test]
fn flatten_alpha_0_returns_bg() {
    let src = vec![200u8, 100, 50, 0];
    let mut dst = vec![0u8; 4];
    flatten_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_over_bg_to_opaque_rgba8(&mut dst, &[0u8; 4], [0, 0, 0, 255]).is_err());
}

#[test]
fn codec_args_follow_format() {
    let mp4 = video_codec_args(ExportFormat::Mp4, 20_000_000).unwrap();
    assert!(mp4.contains(&"libx264".to_string()));
    assert_eq!(mp4.last().map(String::as_str), Some("20000000"));

    let webm = video_codec_args(ExportFormat::Webm, 1).unwrap();
    assert!(webm.contains(&"libvpx-vp9".to_string()));

    let gif = video_codec_args(ExportFormat::Gif, 1).unwrap();
    assert!(!gif.contains(&"-b:v".to_string()));

    let err = video_codec_args(ExportFormat::Png, 1).unwrap_err();
    assert!(matches!(err, TickdownError::CaptureUnavailable(_)));
}

#[test]
fn audio_is_muxed_only_into_video_containers() {
    let sink = FfmpegSink::new(FfmpegSinkOpts::new(OutputPath::Dir("target".into())));
    assert!(sink.accepts_audio(ExportFormat::Mp4));
    assert!(sink.accepts_audio(ExportFormat::Webm));
    assert!(!sink.accepts_audio(ExportFormat::Gif));
    assert!(!sink.accepts_audio(ExportFormat::Png));
}

#[test]
fn output_path_resolution() {
    let dir = OutputPath::Dir(PathBuf::from("renders"));
    assert_eq!(dir.resolve("a.webm"), PathBuf::from("renders/a.webm"));
    let file = OutputPath::File(PathBuf::from("x/out.mp4"));
    assert_eq!(file.resolve("ignored.webm"), PathBuf::from("x/out.mp4"));
}

#[test]
fn begin_rejects_odd_dimensions_for_yuv420p() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(OutputPath::Dir("target".into())));
    let err = sink.begin(cfg(ExportFormat::Mp4, 101, 100)).unwrap_err();
    assert!(matches!(err, TickdownError::Validation(_)));
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(OutputPath::Dir("target".into())));
    let frame = FrameRGBA::filled(2, 2, [0, 0, 0, 255]);
    assert!(sink.push_frame(0, &frame).is_err());
    assert!(sink.finish().is_err());
}
