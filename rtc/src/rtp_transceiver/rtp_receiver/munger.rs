//! Rewrites sequence numbers and timestamps so that forwarding RTP from
//! multiple simulcast encodings onto one output track produces a
//! continuous stream, even as the active encoding switches mid-stream.

/// A codec-specific predicate telling the munger whether a payload starts a
/// new coded picture (H.264 IDR / VP8 keyframe / VP9 keyframe, ...).
pub(crate) trait KeyframeDetector {
    fn is_keyframe(&self, payload: &[u8]) -> bool;
}

struct InputPacket<'a> {
    seq: u16,
    timestamp: u32,
    payload: &'a [u8],
}

enum State {
    /// Forwarding a settled encoding with a known `(delta_seq, delta_ts)`.
    Steady { delta_seq: u16, delta_ts: u32 },
    /// `update()` was called; waiting for the next keyframe on a new
    /// encoding before resuming output.
    Switching,
}

pub(crate) struct Munger {
    state: State,
    last_output_seq: Option<u16>,
    last_output_ts: Option<u32>,
    clock_rate: u32,
    expected_fps: u32,
}

pub(crate) struct MungedPacket {
    pub(crate) seq: u16,
    pub(crate) timestamp: u32,
}

impl Munger {
    pub(crate) fn new(clock_rate: u32, expected_fps: u32) -> Self {
        Munger {
            state: State::Steady {
                delta_seq: 0,
                delta_ts: 0,
            },
            last_output_seq: None,
            last_output_ts: None,
            clock_rate,
            expected_fps,
        }
    }

    /// Mark the munger as switching encodings; the next packet recomputes
    /// `(delta_seq, delta_ts)` from a keyframe, dropping non-keyframes in
    /// between.
    pub(crate) fn update(&mut self) {
        self.state = State::Switching;
    }

    fn munge(&mut self, pkt: &InputPacket<'_>, is_keyframe: bool) -> Option<MungedPacket> {
        match self.state {
            State::Switching => {
                if !is_keyframe {
                    return None;
                }
                let (next_seq, next_ts) = match (self.last_output_seq, self.last_output_ts) {
                    (Some(seq), Some(ts)) => (
                        seq.wrapping_add(1),
                        ts.wrapping_add(self.clock_rate / self.expected_fps.max(1)),
                    ),
                    _ => (pkt.seq, pkt.timestamp),
                };
                let delta_seq = next_seq.wrapping_sub(pkt.seq);
                let delta_ts = next_ts.wrapping_sub(pkt.timestamp);
                self.state = State::Steady {
                    delta_seq,
                    delta_ts,
                };
                self.last_output_seq = Some(next_seq);
                self.last_output_ts = Some(next_ts);
                Some(MungedPacket {
                    seq: next_seq,
                    timestamp: next_ts,
                })
            }
            State::Steady {
                delta_seq,
                delta_ts,
            } => {
                let seq = pkt.seq.wrapping_add(delta_seq);
                let timestamp = pkt.timestamp.wrapping_add(delta_ts);
                self.last_output_seq = Some(seq);
                self.last_output_ts = Some(timestamp);
                Some(MungedPacket { seq, timestamp })
            }
        }
    }

    pub(crate) fn process(
        &mut self,
        seq: u16,
        timestamp: u32,
        payload: &[u8],
        detector: &dyn KeyframeDetector,
    ) -> Option<MungedPacket> {
        let is_keyframe = detector.is_keyframe(payload);
        self.munge(&InputPacket { seq, timestamp, payload }, is_keyframe)
    }
}
