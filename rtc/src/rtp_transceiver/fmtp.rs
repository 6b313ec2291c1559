//! Format-specific parameter (`a=fmtp`) parsing and compatibility matching.
//!
//! Per-mime-type matching rules vary: H.264's `profile-level-id` must agree
//! on profile but not on level, while most other codecs require every
//! shared key to agree exactly. [`parse`] dispatches to the codec-specific
//! matcher by mime type and falls back to [`GenericFmtp`] otherwise.

use crate::peer_connection::configuration::media_engine::MIME_TYPE_H264;
use std::any::Any;
use std::collections::HashMap;
use unicase::UniCase;

/// A parsed `a=fmtp` line, matchable against another codec's fmtp line.
pub(crate) trait Fmtp {
    fn mime_type(&self) -> &str;
    fn parameter(&self, key: &str) -> Option<&String>;
    fn match_fmtp(&self, other: &dyn Fmtp) -> bool;
    fn as_any(&self) -> &dyn Any;
}

fn parse_params(line: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for p in line.split(';') {
        let p = p.trim();
        if p.is_empty() {
            continue;
        }
        let mut kv = p.splitn(2, '=');
        let key = kv.next().unwrap_or("").trim().to_lowercase();
        let value = kv.next().unwrap_or("").trim().to_owned();
        if !key.is_empty() {
            params.insert(key, value);
        }
    }
    params
}

/// Every key present in both maps must agree (case-insensitively); keys
/// present in only one map are ignored.
fn params_consistent(a: &HashMap<String, String>, b: &HashMap<String, String>) -> bool {
    for (k, v) in a {
        if let Some(vb) = b.get(k)
            && !v.eq_ignore_ascii_case(vb)
        {
            return false;
        }
    }
    true
}

#[derive(Debug, PartialEq)]
pub(crate) struct GenericFmtp {
    mime_type: String,
    parameters: HashMap<String, String>,
}

impl Fmtp for GenericFmtp {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn parameter(&self, key: &str) -> Option<&String> {
        self.parameters.get(key)
    }

    fn match_fmtp(&self, other: &dyn Fmtp) -> bool {
        match other.as_any().downcast_ref::<GenericFmtp>() {
            Some(o) => {
                UniCase::new(self.mime_type.as_str()) == UniCase::new(o.mime_type.as_str())
                    && params_consistent(&self.parameters, &o.parameters)
            }
            None => false,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// RFC 6184 §8.1: two H.264 payloads are compatible only if their
/// `profile-level-id`'s profile (and constraint flags) byte matches; the
/// level byte is negotiated separately and need not agree.
#[derive(Debug, PartialEq)]
pub(crate) struct H264Fmtp {
    parameters: HashMap<String, String>,
}

impl H264Fmtp {
    fn profile(&self) -> Option<&str> {
        self.parameters
            .get("profile-level-id")
            .filter(|id| id.len() >= 4)
            .map(|id| &id[..4])
    }

    fn packetization_mode(&self) -> &str {
        self.parameters
            .get("packetization-mode")
            .map(|s| s.as_str())
            .unwrap_or("0")
    }
}

impl Fmtp for H264Fmtp {
    fn mime_type(&self) -> &str {
        MIME_TYPE_H264
    }

    fn parameter(&self, key: &str) -> Option<&String> {
        self.parameters.get(key)
    }

    fn match_fmtp(&self, other: &dyn Fmtp) -> bool {
        match other.as_any().downcast_ref::<H264Fmtp>() {
            Some(o) => {
                self.packetization_mode() == o.packetization_mode()
                    && match (self.profile(), o.profile()) {
                        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                        _ => true,
                    }
            }
            None => false,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Parse an `a=fmtp` value for `mime_type`, dispatching to the codec-specific
/// matcher when one exists.
pub(crate) fn parse(mime_type: &str, line: &str) -> Box<dyn Fmtp> {
    let parameters = parse_params(line);
    if UniCase::new(mime_type) == UniCase::new(MIME_TYPE_H264) {
        Box::new(H264Fmtp { parameters })
    } else {
        Box::new(GenericFmtp {
            mime_type: mime_type.to_owned(),
            parameters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_match_exact() {
        let a = parse("audio/opus", "minptime=10;useinbandfec=1");
        let b = parse("audio/opus", "useinbandfec=1;minptime=10");
        assert!(a.match_fmtp(&*b));
    }

    #[test]
    fn test_generic_mismatch() {
        let a = parse("audio/opus", "useinbandfec=1");
        let b = parse("audio/opus", "useinbandfec=0");
        assert!(!a.match_fmtp(&*b));
    }

    #[test]
    fn test_generic_extra_params_ignored() {
        let a = parse("audio/opus", "minptime=10");
        let b = parse("audio/opus", "minptime=10;useinbandfec=1");
        assert!(a.match_fmtp(&*b));
    }

    #[test]
    fn test_h264_same_profile_different_level_matches() {
        let a = parse(
            "video/H264",
            "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42e01f",
        );
        let b = parse(
            "video/H264",
            "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42e034",
        );
        assert!(a.match_fmtp(&*b));
    }

    #[test]
    fn test_h264_different_profile_does_not_match() {
        let a = parse(
            "video/H264",
            "packetization-mode=1;profile-level-id=42e01f",
        );
        let b = parse(
            "video/H264",
            "packetization-mode=1;profile-level-id=640c1f",
        );
        assert!(!a.match_fmtp(&*b));
    }

    #[test]
    fn test_h264_different_packetization_mode_does_not_match() {
        let a = parse(
            "video/H264",
            "packetization-mode=1;profile-level-id=42e01f",
        );
        let b = parse(
            "video/H264",
            "packetization-mode=0;profile-level-id=42e01f",
        );
        assert!(!a.match_fmtp(&*b));
    }
}
