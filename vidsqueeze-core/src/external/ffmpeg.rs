//! ffmpeg command construction for a planned encode.
//!
//! Video is always encoded with libsvtav1 into an MP4 container. The filter
//! chain and the audio handling come from the [`EncodePlan`]; quality and
//! preset come from the profile of the pass making the attempt.

use ffmpeg_sidecar::command::FfmpegCommand;

use super::EncodeRequest;
use crate::config::EncodeProfile;
use crate::processing::planner::{AudioDecision, EncodePlan};

/// Video encoder used for every artifact.
pub const VIDEO_CODEC: &str = "libsvtav1";

/// Output pixel format.
pub const PIXEL_FORMAT: &str = "yuv420p";

/// Audio encoder used when the source bitrate exceeds the ceiling.
pub const AUDIO_CODEC: &str = "aac";

/// Output arguments (everything between the input and the output path).
pub fn build_encode_args(plan: &EncodePlan, profile: EncodeProfile) -> Vec<String> {
    let mut args: Vec<String> = vec!["-map".into(), "0:v:0".into()];

    match plan.audio {
        AudioDecision::Drop => {}
        AudioDecision::Copy | AudioDecision::Transcode(_) => {
            // Trailing '?' keeps ffmpeg from failing if the stream disappears
            args.extend(["-map".into(), "0:a:0?".into()]);
        }
    }

    args.extend([
        "-c:v".into(),
        VIDEO_CODEC.into(),
        "-pix_fmt".into(),
        PIXEL_FORMAT.into(),
        "-crf".into(),
        profile.quality.to_string(),
        "-preset".into(),
        profile.preset.to_string(),
        "-vf".into(),
        plan.filters.to_filter_chain(),
    ]);

    match plan.audio {
        AudioDecision::Drop => args.push("-an".into()),
        AudioDecision::Copy => args.extend(["-c:a".into(), "copy".into()]),
        AudioDecision::Transcode(bps) => {
            args.extend([
                "-c:a".into(),
                AUDIO_CODEC.into(),
                "-b:a".into(),
                format!("{}k", bps / 1000),
            ]);
        }
    }

    args.extend([
        "-sn".into(),
        "-dn".into(),
        "-movflags".into(),
        "+faststart".into(),
    ]);
    args
}

/// Builds the full ffmpeg command for one attempt.
pub fn build_encode_command(request: &EncodeRequest<'_>) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.arg("-hide_banner");
    cmd.arg("-y");
    cmd.input(request.input.to_string_lossy().as_ref());
    cmd.args(build_encode_args(request.plan, request.profile));
    cmd.output(request.output.to_string_lossy().as_ref());
    cmd
}
