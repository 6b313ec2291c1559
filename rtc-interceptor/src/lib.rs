//! RTCP/RTP interceptor chain.
//!
//! An [`Interceptor`] is a [`sansio::Protocol`] stage sitting between a media
//! pipeline and the wire: packets flow in through `handle_read`/`poll_read`
//! and out through `handle_write`/`poll_write`, and each stage may inspect,
//! rewrite, drop, or synthesize packets on the way through. Stages are
//! composed with [`Registry`] into a single chain type, innermost stage
//! last:
//!
//! ```ignore
//! use rtc_interceptor::{Registry, SenderReportBuilder, NackGeneratorBuilder};
//!
//! let chain = Registry::new()
//!     .with(SenderReportBuilder::new().build())
//!     .with(NackGeneratorBuilder::new().build())
//!     .build();
//! ```

#![warn(rust_2018_idioms)]
#![allow(dead_code)]

mod noop;
pub(crate) mod nack;
pub(crate) mod report;
mod registry;
pub mod stream_info;
pub(crate) mod twcc;

pub use nack::generator::{NackGeneratorBuilder, NackGeneratorInterceptor};
pub use nack::responder::{NackResponderBuilder, NackResponderInterceptor};
pub use noop::NoopInterceptor;
pub use registry::Registry;
pub use report::receiver::{ReceiverReportBuilder, ReceiverReportInterceptor};
pub use report::sender::{SenderReportBuilder, SenderReportInterceptor};
pub use stream_info::StreamInfo;
pub use twcc::receiver::{TwccReceiverBuilder, TwccReceiverInterceptor};
pub use twcc::sender::{TwccSenderBuilder, TwccSenderInterceptor};

use std::time::Instant;

/// A single RTP or RTCP unit flowing through an interceptor chain.
#[derive(Debug, Clone)]
pub enum Packet {
    Rtp(rtp::Packet),
    Rtcp(Vec<Box<dyn rtcp::Packet>>),
}

/// A [`Packet`] together with the transport it arrived on or will be sent on,
/// and the time it was observed.
#[derive(Debug, Clone)]
pub struct TaggedPacket {
    pub now: Instant,
    pub transport: shared::TransportContext,
    pub message: Packet,
}

/// A stage in an interceptor chain.
///
/// Every interceptor is a [`sansio::Protocol<TaggedPacket, TaggedPacket, ()>`]
/// plus four lifecycle hooks invoked when a local (outgoing) or remote
/// (incoming) media stream is negotiated. Implementations that don't care
/// about a given hook delegate it to their inner stage unchanged.
pub trait Interceptor:
    sansio::Protocol<TaggedPacket, TaggedPacket, (), Error = shared::error::Error, Time = Instant>
{
    /// A local (outgoing) stream has been negotiated.
    fn bind_local_stream(&mut self, info: &StreamInfo);
    /// A local stream has been removed.
    fn unbind_local_stream(&mut self, info: &StreamInfo);
    /// A remote (incoming) stream has been negotiated.
    fn bind_remote_stream(&mut self, info: &StreamInfo);
    /// A remote stream has been removed.
    fn unbind_remote_stream(&mut self, info: &StreamInfo);
}
