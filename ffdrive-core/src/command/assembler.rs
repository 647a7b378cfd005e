// ============================================================================
// ffdrive-core/src/command/assembler.rs
// ============================================================================
//
// PARAMETER ASSEMBLER: Renders a TranscodeRequest into one ffmpeg command line
//
// ffmpeg is order-sensitive, so the emission order below is fixed:
//
//   1. general flags: -qscale, -y, raw general options
//   2. raw input options
//   3. -i "<input>"
//   4. -i "<additional input>" for each extra input, in order
//   5. structured output options, then raw output options
//   6. <complex inputs> -filter_complex "<graph>"
//   7. "<output>" or the null device
//
// The result is a single space-joined string. It is split back into arguments
// with shell word rules before spawning, which is why every quoted argument
// goes through `escape::quote`.

use log::debug;

use super::escape::{quote, quote_path, token};
use super::request::{TranscodeRequest, is_blank_path};

/// Output sentinel that makes ffmpeg discard what it produces.
#[cfg(windows)]
pub const NULL_OUTPUT: &str = "NUL";
#[cfg(not(windows))]
pub const NULL_OUTPUT: &str = "/dev/null";

/// Renders a request into its command line. Pure and deterministic.
///
/// ```
/// use ffdrive_core::command::{assemble, TranscodeRequest, NULL_OUTPUT};
/// use ffdrive_core::geometry::FrameSize;
///
/// let request = TranscodeRequest::new("in.mp4")
///     .with_overwrite(true)
///     .with_size(FrameSize::new(640, 480))
///     .with_output("out.mp4");
/// assert_eq!(assemble(&request), r#"-y -i "in.mp4" -s 640x480 "out.mp4""#);
///
/// let probe = TranscodeRequest::new("in.mp4");
/// assert_eq!(assemble(&probe), format!(r#"-i "in.mp4" {NULL_OUTPUT}"#));
/// ```
#[must_use]
pub fn assemble(request: &TranscodeRequest) -> String {
    let mut parts: Vec<String> = Vec::new();

    push_general_flags(&mut parts, request);
    push_inputs(&mut parts, request);
    push_output_options(&mut parts, request);
    push_complex_filter(&mut parts, request);

    parts.push(match &request.output_path {
        Some(path) => quote_path(path),
        None => NULL_OUTPUT.to_string(),
    });

    let command_line = parts.join(" ");
    debug!("Assembled ffmpeg arguments: {command_line}");
    command_line
}

fn push_general_flags(parts: &mut Vec<String>, request: &TranscodeRequest) {
    if let Some(scale) = request.quality_scale {
        parts.push(format!("-qscale {scale}"));
    }
    if request.overwrite {
        parts.push("-y".to_string());
    }
    push_raw(parts, request.options.as_deref());
}

fn push_inputs(parts: &mut Vec<String>, request: &TranscodeRequest) {
    push_raw(parts, request.input_options.as_deref());
    parts.push(format!("-i {}", quote_path(&request.input_path)));

    for extra in request
        .additional_inputs
        .iter()
        .filter(|path| !is_blank_path(path))
    {
        parts.push(format!("-i {}", quote_path(extra)));
    }
}

fn push_output_options(parts: &mut Vec<String>, request: &TranscodeRequest) {
    if let Some(codec) = &request.video_codec {
        parts.push(format!("-vcodec {}", token(codec)));
    }
    if let Some(codec) = &request.audio_codec {
        parts.push(format!("-acodec {}", token(codec)));
    }
    if let Some(format) = &request.format {
        parts.push(format!("-f {}", token(format)));
    }

    let rates = [
        ("-bufsize", request.buffer_size, "KB"),
        ("-maxrate", request.max_rate, "KB"),
        ("-minrate", request.min_rate, "KB"),
        ("-b:v", request.video_bitrate, "k"),
        ("-b:a", request.audio_bitrate, "k"),
        ("-ac", request.audio_channels, ""),
        ("-ar", request.audio_rate, ""),
        ("-pass", request.pass, ""),
    ];
    for (flag, value, suffix) in rates {
        if let Some(value) = value {
            parts.push(format!("{flag} {value}{suffix}"));
        }
    }

    if let Some(size) = request.size.filter(|s| !s.is_empty()) {
        parts.push(format!("-s {size}"));
    }
    if let Some(profile) = &request.video_profile {
        parts.push(format!("-vprofile {}", token(profile)));
    }
    if let Some(preset) = &request.preset {
        parts.push(format!("-preset {}", token(preset)));
    }
    if let Some(filter) = &request.video_filter {
        parts.push(format!("-vf {}", quote(filter)));
    }
    if request.disable_audio {
        parts.push("-an".to_string());
    }
    push_raw(parts, request.output_options.as_deref());
}

fn push_complex_filter(parts: &mut Vec<String>, request: &TranscodeRequest) {
    if let Some(filter) = request.complex_filter.as_ref().filter(|f| !f.is_empty()) {
        parts.push(format!(
            "{} -filter_complex {}",
            filter.inputs.trim(),
            quote(&filter.commands)
        ));
    }
}

fn push_raw(parts: &mut Vec<String>, raw: Option<&str>) {
    if let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        parts.push(raw.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ComplexFilter, escape};
    use crate::geometry::FrameSize;
    use proptest::prelude::*;

    #[test]
    fn test_input_only_goes_to_null_output() {
        let request = TranscodeRequest::new("in.mp4");
        assert_eq!(assemble(&request), format!("-i \"in.mp4\" {NULL_OUTPUT}"));
    }

    #[test]
    fn test_size_renders_width_x_height() {
        let request = TranscodeRequest::new("in.mp4")
            .with_size(FrameSize::new(640, 480))
            .with_output("out.mp4");
        assert_eq!(assemble(&request), "-i \"in.mp4\" -s 640x480 \"out.mp4\"");
    }

    #[test]
    fn test_zero_area_size_is_omitted() {
        for size in [FrameSize::default(), FrameSize::new(640, 0), FrameSize::new(0, 480)] {
            let request = TranscodeRequest::new("in.mp4").with_size(size).with_output("out.mp4");
            assert_eq!(assemble(&request), "-i \"in.mp4\" \"out.mp4\"");
        }
    }

    #[test]
    fn test_raw_output_options_precede_output() {
        let request = TranscodeRequest::new("in.mp4")
            .with_output_options("-vn")
            .with_output("out.mp3");
        assert_eq!(assemble(&request), "-i \"in.mp4\" -vn \"out.mp3\"");
    }

    #[test]
    fn test_full_emission_order() {
        let request = TranscodeRequest::new("in.mp4")
            .with_quality_scale(2)
            .with_overwrite(true)
            .with_options("-hide_banner")
            .with_input_options("-ss 00:00:05.000")
            .with_additional_input("logo.png")
            .with_additional_input("")
            .with_additional_input("intro.mp4")
            .with_video_codec("libx264")
            .with_audio_codec("aac")
            .with_format("mp4")
            .with_buffer_size(2000)
            .with_max_rate(1500)
            .with_min_rate(500)
            .with_video_bitrate(1200)
            .with_audio_bitrate(128)
            .with_audio_channels(2)
            .with_audio_rate(44100)
            .with_pass(1)
            .with_size(FrameSize::new(1280, 720))
            .with_video_profile("main")
            .with_preset("fast")
            .with_video_filter("scale=1280:-2")
            .with_disable_audio(true)
            .with_output_options("-movflags +faststart")
            .with_complex_filter(ComplexFilter::new("-i \"a.png\"", "[0:v][1:v]overlay=0:0"))
            .with_output("out.mp4");

        let expected = concat!(
            "-qscale 2 -y -hide_banner -ss 00:00:05.000 ",
            "-i \"in.mp4\" -i \"logo.png\" -i \"intro.mp4\" ",
            "-vcodec libx264 -acodec aac -f mp4 ",
            "-bufsize 2000KB -maxrate 1500KB -minrate 500KB ",
            "-b:v 1200k -b:a 128k -ac 2 -ar 44100 -pass 1 ",
            "-s 1280x720 -vprofile main -preset fast -vf \"scale=1280:-2\" -an ",
            "-movflags +faststart ",
            "-i \"a.png\" -filter_complex \"[0:v][1:v]overlay=0:0\" ",
            "\"out.mp4\"",
        );
        assert_eq!(assemble(&request), expected);
    }

    #[test]
    fn test_quote_characters_are_escaped() {
        let request = TranscodeRequest::new("my \"clip\".mp4")
            .with_video_filter("drawtext=text=\"hi\"")
            .with_output("out.mp4");
        let line = assemble(&request);
        assert_eq!(
            line,
            r#"-i "my \"clip\".mp4" -vf "drawtext=text=\"hi\"" "out.mp4""#
        );

        let args = escape::split(&line).unwrap();
        assert_eq!(args[1], "my \"clip\".mp4");
        assert_eq!(args[3], "drawtext=text=\"hi\"");
    }

    #[test]
    fn test_empty_complex_inputs_are_skipped() {
        let request = TranscodeRequest::new("in.mp4")
            .with_complex_filter(ComplexFilter::new("", "[0:v]null"))
            .with_output("out.mp4");
        assert_eq!(assemble(&request), "-i \"in.mp4\" \"out.mp4\"");
    }

    #[test]
    fn test_simple_and_complex_filters_both_emitted() {
        let request = TranscodeRequest::new("in.mp4")
            .with_video_filter("hflip")
            .with_output_options("-an")
            .with_complex_filter(ComplexFilter::new("-i \"b.png\"", "overlay"))
            .with_output("out.mp4");
        assert_eq!(
            assemble(&request),
            "-i \"in.mp4\" -vf \"hflip\" -an -i \"b.png\" -filter_complex \"overlay\" \"out.mp4\""
        );
    }

    proptest! {
        #[test]
        fn prop_inputs_precede_output_options(
            extras in proptest::collection::vec("[a-z]{1,8}\\.png", 0..5),
            codec in proptest::option::of("[a-z0-9]{2,8}"),
            bitrate in proptest::option::of(1u32..10_000),
        ) {
            let mut request = TranscodeRequest::new("source.mp4").with_output("target.mp4");
            for extra in &extras {
                request = request.with_additional_input(extra.as_str());
            }
            request.video_codec = codec;
            request.video_bitrate = bitrate;

            let args = escape::split(&assemble(&request)).unwrap();

            prop_assert_eq!(&args[0], "-i");
            prop_assert_eq!(&args[1], "source.mp4");
            for (i, extra) in extras.iter().enumerate() {
                prop_assert_eq!(&args[2 + 2 * i], "-i");
                prop_assert_eq!(&args[3 + 2 * i], extra);
            }
            let first_output_option = 2 + 2 * extras.len();
            let tail = &args[first_output_option..];
            prop_assert!(!tail.iter().any(|arg| arg == "-i"));
            prop_assert_eq!(tail.last().map(String::as_str), Some("target.mp4"));
        }
    }
}
