//! NoOp Interceptor - A pass-through terminal for interceptor chains.

use crate::{Interceptor, Packet, StreamInfo, TaggedPacket};
use shared::error::Error;
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::time::Instant;

/// A no-operation interceptor that simply queues messages for pass-through.
///
/// `NoopInterceptor` serves as the innermost layer of an interceptor chain.
/// It accepts messages via `handle_read`/`handle_write`/etc and returns them
/// unchanged via `poll_read`/`poll_write`/etc. [`Registry::new`](crate::Registry::new)
/// builds one of these as the starting point of every chain.
pub struct NoopInterceptor<Rin, Win, Ein> {
    read_queue: VecDeque<Rin>,
    write_queue: VecDeque<Win>,
    _evt: PhantomData<Ein>,
}

impl<Rin, Win, Ein> NoopInterceptor<Rin, Win, Ein> {
    /// Create a new NoopInterceptor.
    pub fn new() -> Self {
        Self {
            read_queue: VecDeque::new(),
            write_queue: VecDeque::new(),
            _evt: PhantomData,
        }
    }
}

impl<Rin, Win, Ein> Default for NoopInterceptor<Rin, Win, Ein> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Rin, Win, Ein> sansio::Protocol<Rin, Win, Ein> for NoopInterceptor<Rin, Win, Ein> {
    type Rout = Rin;
    type Wout = Win;
    type Eout = Ein;
    type Error = Error;
    type Time = Instant;

    fn handle_read(&mut self, msg: Rin) -> Result<(), Self::Error> {
        self.read_queue.push_back(msg);
        Ok(())
    }

    fn poll_read(&mut self) -> Option<Self::Rout> {
        self.read_queue.pop_front()
    }

    fn handle_write(&mut self, msg: Win) -> Result<(), Self::Error> {
        self.write_queue.push_back(msg);
        Ok(())
    }

    fn poll_write(&mut self) -> Option<Self::Wout> {
        self.write_queue.pop_front()
    }

    fn handle_event(&mut self, _evt: Ein) -> Result<(), Self::Error> {
        Ok(())
    }

    fn poll_event(&mut self) -> Option<Self::Eout> {
        None
    }

    fn handle_timeout(&mut self, _now: Self::Time) -> Result<(), Self::Error> {
        Ok(())
    }

    fn poll_timeout(&mut self) -> Option<Self::Time> {
        None
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.read_queue.clear();
        self.write_queue.clear();
        Ok(())
    }
}

impl Interceptor for NoopInterceptor<TaggedPacket, TaggedPacket, ()> {
    fn bind_local_stream(&mut self, _info: &StreamInfo) {}
    fn unbind_local_stream(&mut self, _info: &StreamInfo) {}
    fn bind_remote_stream(&mut self, _info: &StreamInfo) {}
    fn unbind_remote_stream(&mut self, _info: &StreamInfo) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use sansio::Protocol;

    fn dummy_rtp_packet() -> Packet {
        Packet::Rtp(rtp::Packet::default())
    }

    fn dummy_tagged(message: Packet) -> TaggedPacket {
        TaggedPacket {
            now: Instant::now(),
            transport: Default::default(),
            message,
        }
    }

    #[test]
    fn test_noop_read_write() {
        let mut noop: NoopInterceptor<TaggedPacket, TaggedPacket, ()> = NoopInterceptor::new();

        let pkt1 = dummy_tagged(dummy_rtp_packet());
        let pkt2 = dummy_tagged(dummy_rtp_packet());
        noop.handle_read(pkt1).unwrap();
        noop.handle_read(pkt2).unwrap();
        assert!(matches!(noop.poll_read().unwrap().message, Packet::Rtp(_)));
        assert!(matches!(noop.poll_read().unwrap().message, Packet::Rtp(_)));
        assert!(noop.poll_read().is_none());

        let pkt3 = dummy_tagged(dummy_rtp_packet());
        noop.handle_write(pkt3).unwrap();
        assert!(matches!(
            noop.poll_write().unwrap().message,
            Packet::Rtp(_)
        ));
        assert!(noop.poll_write().is_none());
    }

    #[test]
    fn test_noop_close_clears_queues() {
        let mut noop: NoopInterceptor<TaggedPacket, TaggedPacket, ()> = NoopInterceptor::new();

        noop.handle_read(dummy_tagged(dummy_rtp_packet())).unwrap();
        noop.handle_write(dummy_tagged(dummy_rtp_packet())).unwrap();

        noop.close().unwrap();

        assert!(noop.poll_read().is_none());
        assert!(noop.poll_write().is_none());
    }

    #[test]
    fn test_noop_bind_unbind_are_noops() {
        let mut noop: NoopInterceptor<TaggedPacket, TaggedPacket, ()> = NoopInterceptor::new();
        let info = StreamInfo {
            ssrc: 42,
            ..Default::default()
        };
        noop.bind_local_stream(&info);
        noop.bind_remote_stream(&info);
        noop.unbind_local_stream(&info);
        noop.unbind_remote_stream(&info);
    }
}
