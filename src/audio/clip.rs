use std::sync::Arc;

/// Decoded clip: interleaved f32 samples at the output device's rate
#[derive(Debug, Clone)]
pub struct Clip {
    channels: usize,
    samples: Arc<[f32]>,
}

impl Clip {
    pub fn new(channels: usize, samples: Arc<[f32]>) -> Self {
        Self {
            channels: channels.max(1),
            samples,
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

/// One-shot playback voice for a single clip
/// Retriggering restarts from frame 0; gain is fixed for each playthrough
pub struct ClipVoice {
    clip: Clip,
    position: usize, // Next frame to play
    gain: f32,
    active: bool,
}

impl ClipVoice {
    pub fn new(clip: Clip) -> Self {
        Self {
            clip,
            position: 0,
            gain: 0.0,
            active: false,
        }
    }

    /// Restart the clip from the beginning at the given gain
    pub fn trigger(&mut self, gain: f32) {
        self.position = 0;
        self.gain = gain.clamp(0.0, 1.0);
        self.active = self.clip.frames() > 0;
    }

    /// Check if the clip is still playing
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[cfg(test)]
    pub fn position(&self) -> usize {
        self.position
    }

    #[cfg(test)]
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Mix the next frames into an interleaved output buffer
    /// Clip channels beyond the output's channel count are dropped
    pub fn mix_into(&mut self, output: &mut [f32], num_channels: usize) {
        if !self.active || num_channels == 0 {
            return;
        }

        let clip_channels = self.clip.channels();
        let channels = clip_channels.min(num_channels);
        let samples = self.clip.samples();
        let frames_left = self.clip.frames() - self.position;
        let frames = (output.len() / num_channels).min(frames_left);

        for frame in 0..frames {
            let src = (self.position + frame) * clip_channels;
            let dst = frame * num_channels;
            for ch in 0..channels {
                output[dst + ch] += samples[src + ch] * self.gain;
            }
        }

        self.position += frames;
        if self.position >= self.clip.frames() {
            self.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_clip(channels: usize, frames: usize, value: f32) -> Clip {
        Clip::new(channels, Arc::from(vec![value; channels * frames].into_boxed_slice()))
    }

    #[test]
    fn test_clip_voice_idle_until_triggered() {
        let mut voice = ClipVoice::new(constant_clip(1, 8, 1.0));
        assert!(!voice.is_active());

        let mut out = vec![0.0f32; 8];
        voice.mix_into(&mut out, 1);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_clip_voice_applies_gain() {
        let mut voice = ClipVoice::new(constant_clip(1, 8, 1.0));
        voice.trigger(0.5);

        let mut out = vec![0.0f32; 4];
        voice.mix_into(&mut out, 1);
        assert_eq!(out, vec![0.5; 4]);
        assert_eq!(voice.position(), 4);
        assert!(voice.is_active());
    }

    #[test]
    fn test_clip_voice_finishes() {
        let mut voice = ClipVoice::new(constant_clip(1, 3, 1.0));
        voice.trigger(1.0);

        let mut out = vec![0.0f32; 8];
        voice.mix_into(&mut out, 1);
        assert_eq!(&out[..3], &[1.0, 1.0, 1.0]);
        assert!(out[3..].iter().all(|&s| s == 0.0));
        assert!(!voice.is_active());
    }

    #[test]
    fn test_clip_voice_retrigger_restarts() {
        let mut voice = ClipVoice::new(constant_clip(1, 16, 1.0));
        voice.trigger(1.0);
        let mut out = vec![0.0f32; 10];
        voice.mix_into(&mut out, 1);
        assert_eq!(voice.position(), 10);

        voice.trigger(0.25);
        assert_eq!(voice.position(), 0);
        assert_eq!(voice.gain(), 0.25);
        assert!(voice.is_active());
    }

    #[test]
    fn test_stereo_clip_into_wider_output() {
        let mut voice = ClipVoice::new(constant_clip(2, 2, 1.0));
        voice.trigger(1.0);

        // 4 output channels: only the first two receive the clip
        let mut out = vec![0.0f32; 8];
        voice.mix_into(&mut out, 4);
        assert_eq!(out, vec![1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_empty_clip_never_activates() {
        let mut voice = ClipVoice::new(constant_clip(2, 0, 1.0));
        voice.trigger(1.0);
        assert!(!voice.is_active());
    }
}
