use rex_core::Preprocessor;

/// Scales 8-bit pixel intensities into `[0, 1]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameNormalizer;

impl Preprocessor for FrameNormalizer {
    type Raw = [u8];
    type Frame = Vec<f32>;

    fn process(&self, raw: &[u8]) -> Vec<f32> {
        raw.iter().map(|&p| p as f32 / 255.0).collect()
    }
}
