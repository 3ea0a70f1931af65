use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::config::EncodeConfig;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{HerodoError, HerodoResult};
use crate::render::frame::FrameRGBA;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    pub video_codec: String,
    pub pixel_format: String,
    pub audio_codec: String,
    /// Colour that transparent pixels are flattened onto.
    pub bg_rgb: [u8; 3],
}

impl FfmpegSinkOpts {
    /// H.264/AAC options for `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self::from_config(out_path, &EncodeConfig::default())
    }

    pub fn from_config(out_path: impl Into<PathBuf>, cfg: &EncodeConfig) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: cfg.overwrite,
            video_codec: cfg.video_codec.clone(),
            pixel_format: cfg.pixel_format.clone(),
            audio_codec: cfg.audio_codec.clone(),
            bg_rgb: [0, 0, 0],
        }
    }
}

/// Spawns the system `ffmpeg` and streams raw RGB frames to its stdin.
///
/// Audio is optional and provided through `SinkConfig.audio`. If the sink is aborted or dropped
/// before `end` succeeds, the child is killed and the partial output file removed.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
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
            last_idx: None,
        }
    }

    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }

    fn command(&self, cfg: &SinkConfig) -> HerodoResult<Command> {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if self.opts.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0"]);

        if let Some(audio) = cfg.audio.as_ref() {
            if audio.sample_rate == 0 || audio.channels == 0 {
                return Err(HerodoError::invalid_argument(
                    "audio sample_rate and channels must be non-zero when audio is enabled",
                ));
            }
            cmd.args([
                "-f",
                "f32le",
                "-ar",
                &audio.sample_rate.to_string(),
                "-ac",
                &audio.channels.to_string(),
                "-i",
            ])
            .arg(&audio.path)
            .args(["-map", "0:v:0", "-map", "1:a:0"])
            .args(["-c:v", &self.opts.video_codec])
            .args(["-pix_fmt", &self.opts.pixel_format])
            .args(["-c:a", &self.opts.audio_codec])
            .args(["-shortest", "-movflags", "+faststart"]);
        } else {
            cmd.arg("-an")
                .args(["-c:v", &self.opts.video_codec])
                .args(["-pix_fmt", &self.opts.pixel_format])
                .args(["-movflags", "+faststart"]);
        }
        cmd.arg(&self.opts.out_path);
        Ok(cmd)
    }

    fn kill_child(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
    }

    fn remove_partial_output(&self) {
        if self.opts.out_path.exists() {
            match std::fs::remove_file(&self.opts.out_path) {
                Ok(()) => tracing::debug!(
                    path = %self.opts.out_path.display(),
                    "removed partial output"
                ),
                Err(e) => tracing::warn!(
                    path = %self.opts.out_path.display(),
                    error = %e,
                    "failed to remove partial output"
                ),
            }
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> HerodoResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(HerodoError::invalid_argument("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(HerodoError::invalid_argument(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(HerodoError::invalid_argument(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(HerodoError::encode(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(HerodoError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut child = self.command(&cfg)?.spawn().map_err(|e| {
            HerodoError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| HerodoError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| HerodoError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.scratch = vec![0u8; cfg.width as usize * cfg.height as usize * 3];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> HerodoResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| HerodoError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(HerodoError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(HerodoError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        flatten_rgba_to_rgb24(&mut self.scratch, &frame.data, self.opts.bg_rgb)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(HerodoError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            HerodoError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> HerodoResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| HerodoError::encode("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            HerodoError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        });
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| HerodoError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| HerodoError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        let status = match status {
            Ok(s) => s,
            Err(e) => {
                self.remove_partial_output();
                return Err(e);
            }
        };
        if !status.success() {
            self.remove_partial_output();
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(HerodoError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        Ok(())
    }

    fn abort(&mut self) {
        if self.cfg.take().is_some() {
            self.kill_child();
            self.remove_partial_output();
        }
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        self.abort();
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // Rawvideo input takes its rate from `-r` before `-i`.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

/// Composite straight-alpha RGBA8 over `bg` into packed RGB8.
fn flatten_rgba_to_rgb24(dst: &mut [u8], src: &[u8], bg: [u8; 3]) -> HerodoResult<()> {
    if !src.len().is_multiple_of(4) || dst.len() / 3 != src.len() / 4 || !dst.len().is_multiple_of(3)
    {
        return Err(HerodoError::encode(
            "frame.data size mismatch with width*height*4",
        ));
    }

    for (d, s) in dst.chunks_exact_mut(3).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(&s[..3]);
            continue;
        }
        let inv = 255 - a;
        for ((d, &s), &b) in d.iter_mut().zip(&s[..3]).zip(&bg) {
            let v = u16::from(s) * a + u16::from(b) * inv;
            *d = ((v + 127) / 255) as u8;
        }
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> HerodoResult<()> {
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
    tool_on_path("ffmpeg")
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    tool_on_path("ffprobe")
}

fn tool_on_path(program: &str) -> bool {
    Command::new(program)
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
