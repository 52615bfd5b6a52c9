//! Touch data block decoding

use heapless::Vec;
use platform::MAX_TOUCH_POINTS;

use super::registers::{
    coordinate, FRAME_HEADER_LEN, SAMPLE_LEN, SAMPLE_PRESSURE, SAMPLE_VALID, SAMPLE_X_HIGH,
    SAMPLE_X_LOW, SAMPLE_Y_HIGH, SAMPLE_Y_LOW,
};

/// Frame claimed more fingers than the panel supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FingerOverflow {
    /// Finger count in the frame header
    pub reported: u8,
    /// Capacity it exceeded
    pub max: u8,
}

/// One finger sample as reported by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// Controller marks the sample as a live contact
    pub valid: bool,
    /// X in panel coordinates
    pub x: u16,
    /// Y in panel coordinates
    pub y: u16,
    /// Pressure / contact width
    pub pressure: u8,
}

impl RawSample {
    fn decode(raw: &[u8]) -> Self {
        let byte = |i: usize| raw.get(i).copied().unwrap_or(0);
        Self {
            valid: byte(SAMPLE_VALID) != 0,
            x: coordinate(byte(SAMPLE_X_HIGH), byte(SAMPLE_X_LOW)),
            y: coordinate(byte(SAMPLE_Y_HIGH), byte(SAMPLE_Y_LOW)),
            pressure: byte(SAMPLE_PRESSURE),
        }
    }

    fn encode(&self, out: &mut [u8]) {
        let [xh, xl] = self.x.to_be_bytes();
        let [yh, yl] = self.y.to_be_bytes();
        for (i, b) in [u8::from(self.valid), xh, xl, yh, yl, self.pressure]
            .into_iter()
            .enumerate()
        {
            if let Some(slot) = out.get_mut(i) {
                *slot = b;
            }
        }
    }
}

/// One decoded frame: the reported finger count and that many samples
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    samples: Vec<RawSample, MAX_TOUCH_POINTS>,
}

impl Snapshot {
    /// Frame with no fingers
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a frame from samples, e.g. for tests or a software panel.
    pub fn from_samples(samples: &[RawSample]) -> Result<Self, FingerOverflow> {
        let samples = Vec::from_slice(samples).map_err(|_| FingerOverflow {
            reported: u8::try_from(samples.len()).unwrap_or(u8::MAX),
            max: u8::try_from(MAX_TOUCH_POINTS).unwrap_or(u8::MAX),
        })?;
        Ok(Self { samples })
    }

    /// Decode a touch data block read from a panel with `max_touches`
    /// slots.
    ///
    /// A finger count above `max_touches` is a [`FingerOverflow`]. Samples past the end of `raw`
    /// decode as zero.
    pub fn parse(raw: &[u8], max_touches: u8) -> Result<Self, FingerOverflow> {
        let reported = raw.first().copied().unwrap_or(0);
        if reported > max_touches {
            return Err(FingerOverflow {
                reported,
                max: max_touches,
            });
        }

        let body = raw.get(FRAME_HEADER_LEN..).unwrap_or(&[]);
        let mut samples = Vec::new();
        for chunk in body.chunks(SAMPLE_LEN).take(usize::from(reported)) {
            if samples.push(RawSample::decode(chunk)).is_err() {
                break;
            }
        }
        // Short reads still report `reported` fingers.
        while samples.len() < usize::from(reported) {
            if samples.push(RawSample::default()).is_err() {
                break;
            }
        }
        Ok(Self { samples })
    }

    /// Encode into the controller's wire layout; returns bytes written.
    ///
    /// Used by the mock bus to serve frames.
    pub fn encode(&self, out: &mut [u8]) -> usize {
        let Some(count) = out.first_mut() else {
            return 0;
        };
        *count = self.finger_count();
        let mut written = FRAME_HEADER_LEN;
        let body = out.get_mut(FRAME_HEADER_LEN..).unwrap_or(&mut []);
        for (sample, chunk) in self.samples.iter().zip(body.chunks_mut(SAMPLE_LEN)) {
            sample.encode(chunk);
            written = written.saturating_add(chunk.len());
        }
        written
    }

    /// Finger count reported for this frame
    pub fn finger_count(&self) -> u8 {
        u8::try_from(self.samples.len()).unwrap_or(u8::MAX)
    }

    /// Samples in positional order
    pub fn samples(&self) -> impl Iterator<Item = &RawSample> {
        self.samples.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::st1663i::registers::frame_len;

    #[test]
    fn parse_single_finger() {
        let mut raw = [0u8; 31];
        raw[0] = 1;
        raw[1..7].copy_from_slice(&[1, 0x00, 0x64, 0x00, 0xC8, 10]);
        let snap = Snapshot::parse(&raw, 5).unwrap();
        assert_eq!(snap.finger_count(), 1);
        let s = snap.samples().next().unwrap();
        assert_eq!(
            *s,
            RawSample {
                valid: true,
                x: 100,
                y: 200,
                pressure: 10
            }
        );
    }

    #[test]
    fn parse_ignores_samples_past_count() {
        let mut raw = [0u8; 31];
        raw[0] = 1;
        raw[7..13].copy_from_slice(&[1, 0x01, 0x00, 0x01, 0x00, 5]);
        let snap = Snapshot::parse(&raw, 5).unwrap();
        assert_eq!(snap.samples().count(), 1);
    }

    #[test]
    fn parse_rejects_count_above_k() {
        let mut raw = [0u8; 31];
        raw[0] = 7;
        assert_eq!(
            Snapshot::parse(&raw, 5),
            Err(FingerOverflow {
                reported: 7,
                max: 5
            })
        );
    }

    #[test]
    fn parse_short_read_pads_with_zero_samples() {
        let raw = [2u8, 1, 0, 5, 0, 6, 1];
        let snap = Snapshot::parse(&raw, 5).unwrap();
        let samples: std::vec::Vec<_> = snap.samples().copied().collect();
        assert_eq!(samples.len(), 2);
        assert_eq!((samples[0].x, samples[0].y), (5, 6));
        assert!(!samples[1].valid);
    }

    #[test]
    fn invalid_flag_is_zero_byte() {
        let raw = [1u8, 0, 0, 5, 0, 6, 1];
        let snap = Snapshot::parse(&raw, 5).unwrap();
        assert!(!snap.samples().next().unwrap().valid);
    }

    #[test]
    fn encode_matches_parse_layout() {
        let snap = Snapshot::from_samples(&[RawSample {
            valid: true,
            x: 799,
            y: 479,
            pressure: 42,
        }])
        .unwrap();
        let mut raw = [0u8; 31];
        assert_eq!(snap.encode(&mut raw), 7);
        assert_eq!(&raw[..7], &[1, 1, 0x03, 0x1F, 0x01, 0xDF, 42][..]);
        assert_eq!(Snapshot::parse(&raw[..frame_len(5)], 5).unwrap(), snap);
    }

    #[test]
    fn from_samples_rejects_overflow() {
        let too_many = [RawSample::default(); MAX_TOUCH_POINTS + 1];
        assert!(Snapshot::from_samples(&too_many).is_err());
    }
}
