//! Resolves an inbound RTP packet's simulcast rid within a single mid.
//!
//! Analogous to [`crate::peer_connection::mid_demuxer::Demuxer`]: learns
//! `ssrc -> rid` from the rid/repaired-rid header extensions and falls back
//! to the learned mapping once an ssrc has been seen once.

use std::collections::HashMap;

pub(crate) struct SimulcastDemuxInput<'a> {
    pub(crate) ssrc: u32,
    /// Decoded `a=extmap` rid extension value, if present.
    pub(crate) rid: Option<&'a str>,
    /// Decoded repaired-rid extension value, if present. A packet carrying
    /// this is an RTX packet for the primary identified by `rid`.
    pub(crate) repaired_rid: Option<&'a str>,
}

#[derive(Default)]
pub(crate) struct SimulcastDemuxer {
    ssrc_to_rid: HashMap<u32, String>,
}

impl SimulcastDemuxer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Resolve `pkt` to a rid, or `None` when this transceiver has no
    /// simulcast layers (single-encoding media never carries rid).
    pub(crate) fn demux_packet(&mut self, pkt: &SimulcastDemuxInput<'_>) -> Option<String> {
        if let Some(rid) = pkt.repaired_rid {
            self.ssrc_to_rid.insert(pkt.ssrc, rid.to_owned());
            return Some(rid.to_owned());
        }
        if let Some(rid) = pkt.rid {
            self.ssrc_to_rid.insert(pkt.ssrc, rid.to_owned());
            return Some(rid.to_owned());
        }
        self.ssrc_to_rid.get(&pkt.ssrc).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(
        ssrc: u32,
        rid: Option<&'a str>,
        repaired: Option<&'a str>,
    ) -> SimulcastDemuxInput<'a> {
        SimulcastDemuxInput {
            ssrc,
            rid,
            repaired_rid: repaired,
        }
    }

    #[test]
    fn test_learns_rid_and_inherits() {
        let mut d = SimulcastDemuxer::new();
        assert_eq!(
            d.demux_packet(&input(1, Some("hi"), None)),
            Some("hi".to_owned())
        );
        assert_eq!(d.demux_packet(&input(1, None, None)), Some("hi".to_owned()));
    }

    #[test]
    fn test_repaired_rid_maps_to_primary() {
        let mut d = SimulcastDemuxer::new();
        assert_eq!(
            d.demux_packet(&input(2, None, Some("hi"))),
            Some("hi".to_owned())
        );
        assert_eq!(d.demux_packet(&input(2, None, None)), Some("hi".to_owned()));
    }

    #[test]
    fn test_unknown_ssrc_with_no_hints_is_none() {
        let mut d = SimulcastDemuxer::new();
        assert_eq!(d.demux_packet(&input(3, None, None)), None);
    }
}
