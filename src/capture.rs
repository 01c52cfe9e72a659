//! Capture loop and its collaborators
//!
//! The loop pulls raw frames from a [`FrameSource`], decodes each one through
//! [`crate::decode_frame`], and hands the result to a [`FrameSink`] before
//! reading the next frame. It is single-threaded and synchronous: the only
//! blocking point is the source's read.

use tracing::{debug, warn};

use crate::decode::{decode_frame, DecodedFrame};
use crate::error::{DecodeError, LayerError};

/// Pull interface for raw link-layer frames
///
/// A source yields one opaque frame buffer per call, blocking until a frame
/// is available. How frames are physically acquired is the implementor's
/// concern: a promiscuous socket, a pcap file replay
/// ([`crate::PcapReplaySource`]) and an in-memory list ([`FrameList`]) are
/// equally valid backends.
///
/// Each call to `next` must be followed by a call to `consume` before the
/// next frame is requested; the returned slice is only valid until then.
/// Sources backed by a finite buffer signal `Incomplete` when they hold a
/// partial frame, and expect a `refill` call before the next attempt.
pub trait FrameSource {
    /// Get the next raw frame, if available
    ///
    /// Returns `Eof` when the source is exhausted. The returned slice is
    /// valid until `consume` or `refill` is called.
    fn next(&mut self) -> Result<&[u8], DecodeError>;
    /// Release the frame returned by the last call to `next`
    fn consume(&mut self);
    /// Make more data available after an `Incomplete` read
    ///
    /// Sources that always hold whole frames can make this a no-op.
    fn refill(&mut self) -> Result<(), DecodeError>;
}

/// Display/reporting collaborator receiving decoded frames
///
/// Formatting, line-wrapping and hex-escaping of payloads are entirely the
/// sink's responsibility; the capture loop hands it structured records only.
pub trait FrameSink {
    /// Called with each fully decoded frame
    fn frame(&mut self, frame: &DecodedFrame);
    /// Called when a frame failed to decode; the loop then continues
    fn decode_error(&mut self, error: &LayerError);
}

/// Counters accumulated over one capture run
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CaptureStats {
    /// Frames pulled from the source, decoded or not
    pub frames: usize,
    /// Frames that failed to decode
    pub decode_errors: usize,
}

/// Synchronous pull loop over a frame source
///
/// ## Example
///
/// ```rust
/// use frame_parser::*;
///
/// struct Counter(usize);
///
/// impl FrameSink for Counter {
///     fn frame(&mut self, _frame: &DecodedFrame) {
///         self.0 += 1;
///     }
///     fn decode_error(&mut self, error: &LayerError) {
///         eprintln!("{}", error);
///     }
/// }
///
/// # fn main() {
/// let frames = vec![
///     b"\x00\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0a\x0b\x08\x06rest".to_vec(),
/// ];
/// let mut sink = Counter(0);
/// let stats = CaptureLoop::new(FrameList::new(frames))
///     .run(&mut sink)
///     .expect("capture failed");
/// assert_eq!(stats.frames, 1);
/// assert_eq!(sink.0, 1);
/// # }
/// ```
pub struct CaptureLoop<S> {
    source: S,
    stats: CaptureStats,
}

impl<S: FrameSource> CaptureLoop<S> {
    pub fn new(source: S) -> CaptureLoop<S> {
        CaptureLoop {
            source,
            stats: CaptureStats::default(),
        }
    }

    /// Pull and decode frames until the source is exhausted
    ///
    /// A frame that fails to decode is reported to the sink and the loop
    /// continues with the next frame; only a source-level error stops the
    /// run. Returns the accumulated counters.
    pub fn run<K: FrameSink>(&mut self, sink: &mut K) -> Result<CaptureStats, DecodeError> {
        loop {
            match self.source.next() {
                Ok(frame) => {
                    self.stats.frames += 1;
                    match decode_frame(frame) {
                        Ok(decoded) => sink.frame(&decoded),
                        Err(e) => {
                            warn!("frame decode failed: {}", e);
                            self.stats.decode_errors += 1;
                            sink.decode_error(&e);
                        }
                    }
                    self.source.consume();
                }
                Err(DecodeError::Eof) => break,
                Err(DecodeError::Incomplete(_)) => self.source.refill()?,
                Err(e) => return Err(e),
            }
        }
        debug!(
            "capture done: {} frames, {} decode errors",
            self.stats.frames, self.stats.decode_errors
        );
        Ok(self.stats)
    }

    /// Counters accumulated so far
    pub fn stats(&self) -> CaptureStats {
        self.stats
    }
}

/// In-memory frame source over owned buffers
///
/// Yields each buffer once, in order, then `Eof`. Mainly useful for tests
/// and for replaying frames that were captured elsewhere.
pub struct FrameList {
    frames: Vec<Vec<u8>>,
    idx: usize,
}

impl FrameList {
    pub fn new(frames: Vec<Vec<u8>>) -> FrameList {
        FrameList { frames, idx: 0 }
    }
}

impl FrameSource for FrameList {
    fn next(&mut self) -> Result<&[u8], DecodeError> {
        match self.frames.get(self.idx) {
            Some(frame) => Ok(frame),
            None => Err(DecodeError::Eof),
        }
    }

    fn consume(&mut self) {
        self.idx += 1;
    }

    fn refill(&mut self) -> Result<(), DecodeError> {
        Ok(())
    }
}
