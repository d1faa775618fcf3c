/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    pub time: f32,
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Display refresh rate most headsets default to
pub const DEFAULT_REFRESH_HZ: f32 = 72.0;

/// Infinite iterator of evenly spaced frames, standing in for the headset's
/// animation loop when no compositor drives us.
/// Use this in a loop: `for frame in FixedFrames::new(72.0).take(n) { ... }`
#[derive(Debug, Clone)]
pub struct FixedFrames {
    frame_number: u64,
    delta: f32,
}

impl FixedFrames {
    /// Non-positive or non-finite rates fall back to [`DEFAULT_REFRESH_HZ`]
    pub fn new(hz: f32) -> Self {
        let hz = if hz.is_finite() && hz > 0.0 { hz } else { DEFAULT_REFRESH_HZ };
        Self {
            frame_number: 0,
            delta: 1.0 / hz,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }
}

impl Default for FixedFrames {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_HZ)
    }
}

impl Iterator for FixedFrames {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        let info = FrameInfo::new(self.frame_number, self.frame_number as f32 * self.delta, self.delta);
        self.frame_number += 1;
        Some(info)
    }
}
