//! Final output packaging for a finished job.

use std::fmt::Write;

use voxmill_spec::{NamingOptions, OutputMode};

use crate::artifact::AudioArtifact;
use crate::error::{BatchError, BatchResult};

/// Playlist file extension.
pub const PLAYLIST_EXTENSION: &str = "m3u";

/// Packages per-item outputs according to `mode`.
///
/// - `individual` returns them unchanged
/// - `concatenated` replaces them with one artifact joined in order
/// - `playlist` keeps them and appends one playlist artifact
pub fn package(
    outputs: &[AudioArtifact],
    mode: OutputMode,
    naming: &NamingOptions,
) -> BatchResult<Vec<AudioArtifact>> {
    match mode {
        OutputMode::Individual => Ok(outputs.to_vec()),
        OutputMode::Concatenated => {
            if outputs.is_empty() {
                return Ok(Vec::new());
            }
            Ok(vec![concatenate(outputs, naming)?])
        }
        OutputMode::Playlist => {
            let total: f64 = outputs.iter().map(|a| a.duration_seconds).sum();
            let playlist = AudioArtifact::playlist(
                naming.package_name(PLAYLIST_EXTENSION),
                source_text(outputs),
                playlist_text(outputs),
                total,
            );
            let mut packaged = outputs.to_vec();
            packaged.push(playlist);
            Ok(packaged)
        }
    }
}

/// Joins audio artifacts sample-accurately in order.
pub fn concatenate(outputs: &[AudioArtifact], naming: &NamingOptions) -> BatchResult<AudioArtifact> {
    let mut buffers = outputs.iter().map(|a| {
        a.buffer().ok_or_else(|| {
            BatchError::Orchestration(format!("'{}' is not audio", a.file_name))
        })
    });

    let first = buffers
        .next()
        .ok_or_else(|| BatchError::Orchestration("nothing to concatenate".to_string()))??;
    let mut joined = first.clone();
    for buffer in buffers {
        joined = joined
            .concat(buffer?)
            .map_err(|e| BatchError::Orchestration(format!("cannot concatenate outputs: {}", e)))?;
    }

    log::debug!(
        "concatenated {} outputs into {} samples",
        outputs.len(),
        joined.len()
    );
    Ok(AudioArtifact::audio(
        naming.package_name(&naming.extension),
        source_text(outputs),
        joined,
        outputs.iter().all(|a| a.watermarked),
    ))
}

/// Extended M3U text referencing each artifact by file name.
pub fn playlist_text(outputs: &[AudioArtifact]) -> String {
    let mut text = String::from("#EXTM3U\n");
    for artifact in outputs {
        let label = artifact.source_text.replace(['\r', '\n'], " ");
        // Writing to a String cannot fail
        let _ = writeln!(text, "#EXTINF:{:.3},{}", artifact.duration_seconds, label);
        let _ = writeln!(text, "{}", artifact.file_name);
    }
    text
}

fn source_text(outputs: &[AudioArtifact]) -> String {
    outputs
        .iter()
        .map(|a| a.source_text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
