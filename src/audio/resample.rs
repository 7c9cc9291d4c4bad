use samplerate::{ConverterType, convert};

use crate::error::Error;

/// Converts mono `data` from `samplerate_in` to `samplerate_out`.
///
/// Returns the input untouched when both rates match.
pub fn audio_resample(
    data: &[f32],
    samplerate_in: u32,
    samplerate_out: u32,
) -> Result<Vec<f32>, Error> {
    if samplerate_in == samplerate_out || data.is_empty() {
        return Ok(data.to_vec());
    }
    convert(
        samplerate_in as _,
        samplerate_out as _,
        1,
        ConverterType::SincMediumQuality,
        data,
    )
    .map_err(|e| {
        Error::SampleDecode(format!(
            "Cannot resample {samplerate_in}Hz to {samplerate_out}Hz: {e}"
        ))
    })
}
