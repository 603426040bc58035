use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{Artifact, FrameSink, SinkConfig};
use crate::foundation::error::{TickdownError, TickdownResult};
use crate::render::backend::FrameRGBA;
use crate::state::model::ExportFormat;

/// Where the sink writes its output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputPath {
    /// Write into this directory using the suggested artifact file name.
    Dir(PathBuf),
    /// Write exactly this file.
    File(PathBuf),
}

impl OutputPath {
    pub fn resolve(&self, file_name: &str) -> PathBuf {
        match self {
            Self::Dir(dir) => dir.join(file_name),
            Self::File(path) => path.clone(),
        }
    }
}

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub output: OutputPath,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
    /// Background used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
}

impl FfmpegSinkOpts {
    pub fn new(output: OutputPath) -> Self {
        Self {
            output,
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGBA frames to its stdin.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    out_path: Option<PathBuf>,
    audio_path: Option<PathBuf>,
    last_idx: Option<u64>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            out_path: None,
            audio_path: None,
            last_idx: None,
        }
    }

    fn remove_audio_temp(&mut self) {
        if let Some(path) = self.audio_path.take()
            && let Err(e) = std::fs::remove_file(&path)
        {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove tick track");
        }
    }
}

/// Output codec arguments for one container.
fn video_codec_args(format: ExportFormat, bitrate_bps: u64) -> TickdownResult<Vec<String>> {
    let bitrate = bitrate_bps.to_string();
    let args: &[&str] = match format {
        ExportFormat::Mp4 => &[
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
            "-b:v",
        ],
        ExportFormat::Webm => &["-c:v", "libvpx-vp9", "-pix_fmt", "yuv420p", "-b:v"],
        ExportFormat::Gif => {
            return Ok(vec![
                "-vf".into(),
                "split[a][b];[a]palettegen[p];[b][p]paletteuse".into(),
                "-loop".into(),
                "0".into(),
            ]);
        }
        ExportFormat::Png => {
            return Err(TickdownError::capture_unavailable(
                "png is a still format and cannot be recorded",
            ));
        }
    };
    let mut out: Vec<String> = args.iter().map(|s| (*s).to_string()).collect();
    out.push(bitrate);
    Ok(out)
}

fn audio_codec(format: ExportFormat) -> Option<&'static str> {
    match format {
        ExportFormat::Mp4 => Some("aac"),
        ExportFormat::Webm => Some("libopus"),
        ExportFormat::Gif | ExportFormat::Png => None,
    }
}

fn needs_even_dimensions(format: ExportFormat) -> bool {
    matches!(format, ExportFormat::Mp4 | ExportFormat::Webm)
}

impl FrameSink for FfmpegSink {
    fn accepts_audio(&self, format: ExportFormat) -> bool {
        audio_codec(format).is_some()
    }

    fn begin(&mut self, cfg: SinkConfig) -> TickdownResult<()> {
        if cfg.fps == 0 {
            return Err(TickdownError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(TickdownError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if needs_even_dimensions(cfg.format)
            && (!cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2))
        {
            return Err(TickdownError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p output)",
            ));
        }
        let codec_args = video_codec_args(cfg.format, cfg.bitrate_bps)?;

        let out_path = self.opts.output.resolve(&cfg.file_name);
        ensure_parent_dir(&out_path)?;
        if !self.opts.overwrite && out_path.exists() {
            return Err(TickdownError::validation(format!(
                "output file '{}' already exists",
                out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(TickdownError::capture_unavailable(
                "ffmpeg is required for video export, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });

        // Frames arrive as straight-alpha RGBA8 and are flattened before writing.
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
        ]);

        let audio = cfg
            .audio
            .as_ref()
            .and_then(|track| audio_codec(cfg.format).map(|codec| (track, codec)));
        if let Some((track, codec)) = audio {
            if track.sample_rate == 0 || track.channels == 0 {
                return Err(TickdownError::validation(
                    "audio sample_rate/channels must be non-zero when audio is enabled",
                ));
            }
            let audio_path = out_path.with_extension("ticks.f32le");
            std::fs::write(&audio_path, track.to_f32le_bytes()).map_err(|e| {
                TickdownError::encoding(format!(
                    "failed to write tick track '{}': {e}",
                    audio_path.display()
                ))
            })?;
            cmd.args([
                "-f",
                "f32le",
                "-ar",
                &track.sample_rate.to_string(),
                "-ac",
                &track.channels.to_string(),
                "-i",
            ])
            .arg(&audio_path)
            .args(&codec_args)
            .args(["-c:a", codec]);
            self.audio_path = Some(audio_path);
        } else {
            cmd.arg("-an").args(&codec_args);
        }
        cmd.arg(&out_path);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                self.remove_audio_temp();
                return Err(TickdownError::capture_unavailable(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                )));
            }
        };

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TickdownError::encoding("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| TickdownError::encoding("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            path = %out_path.display(),
            width = cfg.width,
            height = cfg.height,
            fps = cfg.fps,
            format = ?cfg.format,
            "ffmpeg recording started"
        );

        self.scratch = vec![0u8; cfg.width as usize * cfg.height as usize * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.out_path = Some(out_path);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> TickdownResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| TickdownError::encoding("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(TickdownError::encoding(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(TickdownError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        flatten_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, self.opts.bg_rgba)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(TickdownError::encoding("ffmpeg sink is already finalized"));
        };
        stdin.write_all(&self.scratch).map_err(|e| {
            TickdownError::encoding(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn finish(&mut self) -> TickdownResult<Artifact> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| TickdownError::encoding("ffmpeg sink not started"))?;

        let status = child.wait();
        self.remove_audio_temp();
        let status = status.map_err(|e| {
            TickdownError::encoding(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| TickdownError::encoding("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| TickdownError::encoding(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(TickdownError::encoding(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| TickdownError::encoding("ffmpeg sink not started"))?;
        Ok(Artifact {
            file_name: cfg.file_name,
            mime: cfg.format.mime().to_string(),
            path: self.out_path.take(),
            bytes: None,
        })
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.remove_audio_temp();
    }
}

fn flatten_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    bg_rgba: [u8; 4],
) -> TickdownResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(TickdownError::validation(
            "frame.data size mismatch with width*height*4",
        ));
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            let v = mul_div255(u16::from(s[c]), a) + mul_div255(u16::from(bg_rgba[c]), inv);
            d[c] = v.min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    ((u32::from(x) * u32::from(y) + 127) / 255) as u16
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> TickdownResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
