// ============================================================================
// ffdrive-cli/src/cli.rs
// ============================================================================
//
// COMMAND LINE INTERFACE: Argument definitions
//
// clap derive structures for the `ffdrive` binary. Global flags (`--config`,
// `--verbose`, `--json`, `--log-dir`) apply to every subcommand.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use ffdrive_core::geometry::FrameSize;
use ffdrive_core::overlay::Anchor;
use ffdrive_core::{FrameFormat, TranscodeRequest, timecode};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ffdrive: drive the ffmpeg command-line tool",
    long_about = "Probes media, assembles ffmpeg command lines and runs transcode, \
                  frame, segment, watermark, overlay and audio operations."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML configuration file
    #[arg(short, long, global = true, value_name = "FILE", env = "FFDRIVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Also write logs to a timestamped file in this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify the configured ffmpeg executable runs
    Check,

    /// Print media metadata
    Probe(ProbeArgs),

    /// Print the assembled ffmpeg command line without running it
    Command(CommandArgs),

    /// Run a transcode with explicit encoder settings
    Transcode(TranscodeArgs),

    /// Extract a single frame as an image
    Frame(FrameArgs),

    /// Extract a time window into a new file
    Segment(SegmentArgs),

    /// Burn an image into the video
    Watermark(WatermarkArgs),

    /// Draw timed overlays read from a JSON file
    Overlay(OverlayArgs),

    /// Re-encode into an audio container
    Audio(AudioArgs),
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

/// Encoder settings shared by `command` and `transcode`.
#[derive(Args, Debug, Default, Clone)]
pub struct RequestArgs {
    /// Extra input files, added as further `-i` arguments
    #[arg(long = "extra-input", value_name = "FILE")]
    pub extra_inputs: Vec<PathBuf>,

    /// Overwrite the output without asking
    #[arg(short = 'y', long)]
    pub overwrite: bool,

    /// Fixed quality scale (-qscale)
    #[arg(long, value_name = "N")]
    pub qscale: Option<u32>,

    #[arg(long, value_name = "CODEC")]
    pub vcodec: Option<String>,

    #[arg(long, value_name = "CODEC")]
    pub acodec: Option<String>,

    /// Container format (-f)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Video bitrate in kb/s
    #[arg(long, value_name = "KBPS")]
    pub video_bitrate: Option<u32>,

    /// Audio bitrate in kb/s
    #[arg(long, value_name = "KBPS")]
    pub audio_bitrate: Option<u32>,

    #[arg(long, value_name = "KB")]
    pub bufsize: Option<u32>,

    #[arg(long, value_name = "KB")]
    pub maxrate: Option<u32>,

    #[arg(long, value_name = "KB")]
    pub minrate: Option<u32>,

    #[arg(long, value_name = "N")]
    pub audio_channels: Option<u32>,

    /// Audio sample rate in Hz
    #[arg(long, value_name = "HZ")]
    pub audio_rate: Option<u32>,

    #[arg(long, value_name = "N")]
    pub pass: Option<u32>,

    /// Output frame size, e.g. 1280x720
    #[arg(short, long, value_name = "WxH")]
    pub size: Option<FrameSize>,

    #[arg(long, value_name = "PROFILE")]
    pub profile: Option<String>,

    #[arg(long, value_name = "PRESET")]
    pub preset: Option<String>,

    /// Simple video filter (-vf)
    #[arg(long = "vf", value_name = "FILTER")]
    pub video_filter: Option<String>,

    /// Drop audio (-an)
    #[arg(long)]
    pub no_audio: bool,

    /// Raw options placed before everything else
    #[arg(long, value_name = "OPTS", allow_hyphen_values = true)]
    pub options: Option<String>,

    /// Raw options placed before the input
    #[arg(long, value_name = "OPTS", allow_hyphen_values = true)]
    pub input_options: Option<String>,

    /// Raw options placed after the structured output options
    #[arg(long, value_name = "OPTS", allow_hyphen_values = true)]
    pub output_options: Option<String>,
}

impl RequestArgs {
    /// Builds a request for `input` carrying these settings.
    pub fn to_request(&self, input: impl Into<PathBuf>) -> TranscodeRequest {
        let mut request = TranscodeRequest::new(input)
            .with_overwrite(self.overwrite)
            .with_disable_audio(self.no_audio);
        request.additional_inputs = self.extra_inputs.clone();
        request.quality_scale = self.qscale;
        request.video_codec = self.vcodec.clone();
        request.audio_codec = self.acodec.clone();
        request.format = self.format.clone();
        request.video_bitrate = self.video_bitrate;
        request.audio_bitrate = self.audio_bitrate;
        request.buffer_size = self.bufsize;
        request.max_rate = self.maxrate;
        request.min_rate = self.minrate;
        request.audio_channels = self.audio_channels;
        request.audio_rate = self.audio_rate;
        request.pass = self.pass;
        request.size = self.size;
        request.video_profile = self.profile.clone();
        request.preset = self.preset.clone();
        request.video_filter = self.video_filter.clone();
        request.options = self.options.clone();
        request.input_options = self.input_options.clone();
        request.output_options = self.output_options.clone();
        request
    }
}

#[derive(Args, Debug)]
pub struct CommandArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file; the null sink when omitted
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub request: RequestArgs,
}

#[derive(Args, Debug)]
pub struct TranscodeArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[arg(short, long, value_name = "OUTPUT")]
    pub output: PathBuf,

    #[command(flatten)]
    pub request: RequestArgs,
}

#[derive(Args, Debug)]
pub struct FrameArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Position as HH:MM:SS.mmm or seconds
    #[arg(short, long, value_name = "TIME", value_parser = parse_time)]
    pub at: Duration,

    /// Image format: png, jpeg or bmp
    #[arg(short, long, default_value = "png")]
    pub format: FrameFormat,

    #[arg(short, long, value_name = "WxH")]
    pub size: Option<FrameSize>,

    #[arg(short, long, value_name = "OUTPUT")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct SegmentArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Window start as HH:MM:SS.mmm or seconds
    #[arg(long, value_name = "TIME", value_parser = parse_time)]
    pub from: Duration,

    /// Window end as HH:MM:SS.mmm or seconds
    #[arg(long, value_name = "TIME", value_parser = parse_time)]
    pub to: Duration,

    /// Container extension; defaults to the input's
    #[arg(long, value_name = "EXT")]
    pub container: Option<String>,

    #[arg(short, long, value_name = "WxH")]
    pub size: Option<FrameSize>,

    /// Where to move the result; printed temp path otherwise
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

/// Placement shared by `watermark`.
#[derive(Args, Debug, Clone)]
pub struct PlacementArgs {
    /// Anchor point, e.g. top-left, bottom-right, center
    #[arg(short, long, default_value = "top-left")]
    pub position: Anchor,

    /// Horizontal offset from the anchor in pixels
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset_x: i32,

    /// Vertical offset from the anchor in pixels
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset_y: i32,
}

#[derive(Args, Debug)]
pub struct WatermarkArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Image to burn in
    #[arg(short, long, value_name = "IMAGE")]
    pub image: PathBuf,

    #[command(flatten)]
    pub placement: PlacementArgs,

    /// Replace the input file with the result
    #[arg(long, conflicts_with = "output")]
    pub replace: bool,

    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct OverlayArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// JSON file holding an array of overlays
    #[arg(long, value_name = "FILE")]
    pub overlays: PathBuf,

    /// Drop overlays with identical geometry and timing
    #[arg(long)]
    pub dedup: bool,

    /// Replace the input file with the result
    #[arg(long, conflicts_with = "output")]
    pub replace: bool,

    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AudioArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Audio container extension
    #[arg(long, default_value = "mp3", value_name = "EXT")]
    pub container: String,

    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

/// Accepts `HH:MM:SS.mmm` or a plain number of seconds.
pub fn parse_time(text: &str) -> Result<Duration, String> {
    if let Some(duration) = timecode::parse(text) {
        return Ok(duration);
    }
    let invalid = || format!("invalid time '{text}', expected HH:MM:SS.mmm or seconds");
    let secs = text.trim().parse::<f64>().map_err(|_| invalid())?;
    Duration::try_from_secs_f64(secs)
        .map(timecode::truncate_to_millis)
        .map_err(|_| invalid())
}
