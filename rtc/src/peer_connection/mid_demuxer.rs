//! Mid-based RTP demultiplexing (distinct from [`handler::demuxer`], which
//! separates STUN/DTLS/SRTP by RFC 7983 byte ranges before decryption). This
//! demuxer runs after decryption and decides which transceiver's `mid` an
//! RTP packet belongs to.

use shared::error::Error;
use std::collections::HashMap;

/// The fields of a decoded RTP packet relevant to mid resolution. Header
/// extensions are looked up by the ids negotiated for this media section.
pub(crate) struct DemuxInput<'a> {
    pub(crate) ssrc: u32,
    pub(crate) payload_type: u8,
    /// The decoded value of the negotiated sdes-mid header extension, if the
    /// packet carried one.
    pub(crate) mid_extension: Option<&'a str>,
}

/// Resolves RTP packets to a `mid` by learning and confirming `ssrc -> mid`
/// associations, falling back to payload-type when no association is known.
/// Rebuilt (via [`Demuxer::reset_payload_type_map`]) after every
/// `set_*_description`.
#[derive(Default)]
pub(crate) struct Demuxer {
    ssrc_to_mid: HashMap<u32, String>,
    payload_type_to_mid: HashMap<u8, String>,
}

impl Demuxer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Replace the payload-type fallback table; called after every
    /// `set_local_description`/`set_remote_description`.
    pub(crate) fn reset_payload_type_map(&mut self, payload_type_to_mid: HashMap<u8, String>) {
        self.payload_type_to_mid = payload_type_to_mid;
    }

    /// Resolve `pkt` to a mid, learning or confirming the `ssrc -> mid`
    /// mapping as a side effect. Returns `Ok(None)` when no mid can be
    /// determined (caller drops the packet); `Err` only on a genuine
    /// protocol violation (an ssrc remapped to a different mid).
    pub(crate) fn demux_packet(&mut self, pkt: &DemuxInput<'_>) -> Result<Option<String>, Error> {
        if let Some(mid) = pkt.mid_extension {
            match self.ssrc_to_mid.get(&pkt.ssrc) {
                Some(existing) if existing != mid => {
                    return Err(Error::ErrRtpSsrcMidConflict {
                        ssrc: pkt.ssrc,
                        existing: existing.clone(),
                        new: mid.to_owned(),
                    });
                }
                _ => {
                    self.ssrc_to_mid.insert(pkt.ssrc, mid.to_owned());
                }
            }
            return Ok(Some(mid.to_owned()));
        }

        if let Some(mid) = self.ssrc_to_mid.get(&pkt.ssrc) {
            return Ok(Some(mid.clone()));
        }

        if let Some(mid) = self.payload_type_to_mid.get(&pkt.payload_type) {
            self.ssrc_to_mid.insert(pkt.ssrc, mid.clone());
            return Ok(Some(mid.clone()));
        }

        Ok(None)
    }
}

/// RFC 5761 §4: RTCP packet types occupy the second byte range `192..=223`
/// of a decrypted SRTP/SRTCP packet; everything else is RTP.
pub(crate) fn is_rtcp(second_byte: u8) -> bool {
    (192..=223).contains(&second_byte)
}
