//! Modular sequence-number arithmetic shared by every component that compares
//! wrapping counters: RTP sequence numbers (16-bit), transport-wide congestion
//! control sequence numbers (16-bit), and RTP timestamps (32-bit).
//!
//! All of it reduces to one heuristic: for two values `a` and `b` in a space
//! of size `N`, the signed distance from `a` to `b` is
//! `((b - a + N/2) mod N) - N/2`. A positive distance means `b` is "ahead of"
//! `a`; this stays correct across exactly one wraparound, which is the only
//! case that occurs between consecutive observations of a monotonic counter.

/// Signed distance from `a` to `b` in a modulus-`m` space, in `(-m/2, m/2]`.
fn signed_distance(a: u64, b: u64, m: u64) -> i64 {
    let half = m / 2;
    let raw = (b.wrapping_sub(a).wrapping_add(half)) % m;
    raw as i64 - half as i64
}

/// Is `b` ahead of `a` in a 16-bit wrapping space (RTP/TWCC sequence numbers)?
pub fn is_ahead16(a: u16, b: u16) -> bool {
    signed_distance(a as u64, b as u64, 1 << 16) > 0
}

/// Signed distance from `a` to `b` in a 16-bit wrapping space.
pub fn distance16(a: u16, b: u16) -> i32 {
    signed_distance(a as u64, b as u64, 1 << 16) as i32
}

/// Is `b` ahead of `a` in a 32-bit wrapping space (RTP timestamps)?
pub fn is_ahead32(a: u32, b: u32) -> bool {
    signed_distance(a as u64, b as u64, 1u64 << 32) > 0
}

/// Signed distance from `a` to `b` in a 32-bit wrapping space.
pub fn distance32(a: u32, b: u32) -> i64 {
    signed_distance(a as u64, b as u64, 1u64 << 32)
}

/// Extend a 16-bit wire sequence number into a monotonically comparable
/// 64-bit value given the highest extended value seen so far (or `None` on
/// the first packet). `cycles` is the rollover count already observed.
pub fn extend_seq_no(wire: u16, highest_wire: Option<u16>, cycles: u64) -> (u64, u64) {
    match highest_wire {
        None => (cycles, cycles << 16 | wire as u64),
        Some(highest) => {
            if is_ahead16(highest, wire) {
                if wire < highest {
                    // Wrapped forward past 65535 -> 0.
                    let new_cycles = cycles + 1;
                    (new_cycles, new_cycles << 16 | wire as u64)
                } else {
                    (cycles, cycles << 16 | wire as u64)
                }
            } else {
                // Not ahead: either a duplicate/retransmit, or a late packet
                // from just before the last wrap.
                if wire > highest && cycles > 0 {
                    let old_cycles = cycles - 1;
                    (cycles, old_cycles << 16 | wire as u64)
                } else {
                    (cycles, cycles << 16 | wire as u64)
                }
            }
        }
    }
}
