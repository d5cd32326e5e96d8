//! One-shot metadata probe for the input resource.

use std::fs::File;
use std::path::Path;

use symphonia::core::codecs::CodecParameters;
use symphonia::core::errors::{Error, Result};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Stream metadata for a single audio resource, probed once before playback
/// so the duration is known before any audio is heard.
#[derive(Debug, Clone, Copy)]
pub struct Info {
    /// Resource length in seconds; 0.0 when the container does not say.
    pub duration: f64,
    pub sample_rate: u32,
    pub channels: u32,
}

impl Info {
    pub fn probe(path: &Path) -> Result<Self> {
        // Provide the file extension as a hint to the format registry.
        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            hint.with_extension(extension);
        }

        let file = File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let format_opts = FormatOptions::default();
        let metadata_opts = MetadataOptions::default();
        let probed =
            symphonia::default::get_probe().format(&hint, mss, &format_opts, &metadata_opts)?;

        let track = probed
            .format
            .default_track()
            .ok_or(Error::Unsupported("no default track"))?;
        let params = &track.codec_params;

        Ok(Self {
            duration: duration_seconds(params),
            sample_rate: params.sample_rate.unwrap_or(0),
            channels: params.channels.map(|c| c.count() as u32).unwrap_or(0),
        })
    }
}

fn duration_seconds(params: &CodecParameters) -> f64 {
    let (Some(tb), Some(frames)) = (params.time_base, params.n_frames) else {
        return 0.0;
    };
    let time = tb.calc_time(params.start_ts + frames);
    time.seconds as f64 + time.frac
}
