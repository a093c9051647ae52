//! Stream reassembler.
//!
//! A transport delivers bytes in whatever chunks it likes. The [`Reassembler`]
//! issues exact-size requests (one byte of fixed header, one byte at a time of
//! remaining length, then the whole body) and accumulates deliveries until a
//! complete packet sits in its buffer.
//!
//! ```text
//!   Header ──1 byte──▶ Length ──cont. bit clear──▶ Body(n) ──n bytes──▶ Complete
//!                        │  ▲                          │
//!                        └──┘ cont. bit set            └─ remaining 0 skips Body
//! ```
//!
//! The buffer is a fixed-capacity `heapless::Vec<u8, N>`. A packet whose
//! declared size exceeds `N` is rejected as soon as its length is known; none of
//! its body is read.
//!
//! ```rust
//! use libmqtt::mqtt::Reassembler;
//!
//! let mut framer: Reassembler = Reassembler::new();
//! assert_eq!(framer.push(&[0xC0, 0x00, 0xD0]).unwrap(), 2);
//! assert_eq!(framer.take_frame().unwrap(), vec![0xC0, 0x00]);
//! assert_eq!(framer.wanted(), 1);
//! ```

use super::error::FrameError;
use super::varint::{self, CONTINUATION, MAX_LENGTH_BYTES};
use crate::network::Read;

/// Default capacity, in bytes, of a reassembly buffer.
pub const DEFAULT_MAX_PACKET_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Header,
    Length,
    Body { remaining: usize },
    Complete,
}

/// Failure of [`Reassembler::read_from`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ReadError<E> {
    /// The transport read failed.
    Transport(E),
    /// The bytes read do not frame a valid packet.
    Frame(FrameError),
}

impl<E> From<FrameError> for ReadError<E> {
    fn from(e: FrameError) -> Self {
        ReadError::Frame(e)
    }
}

/// Turns a byte stream into complete MQTT packet buffers.
#[derive(Debug)]
pub struct Reassembler<const N: usize = DEFAULT_MAX_PACKET_SIZE> {
    buf: heapless::Vec<u8, N>,
    phase: Phase,
}

impl<const N: usize> Default for Reassembler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Reassembler<N> {
    /// Create an empty reassembler waiting for a fixed header.
    pub const fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
            phase: Phase::Header,
        }
    }

    /// Number of bytes the current request asks for.
    ///
    /// Zero once a packet is complete and waiting in [`take_frame`](Self::take_frame).
    pub fn wanted(&self) -> usize {
        match self.phase {
            Phase::Header | Phase::Length => 1,
            Phase::Body { remaining } => remaining,
            Phase::Complete => 0,
        }
    }

    /// Whether a complete packet is buffered.
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Bytes accumulated for the packet in progress.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Feed a delivery, returning how many of its bytes were consumed.
    ///
    /// Consumption stops at the end of a packet; the caller takes the frame and
    /// pushes the rest of the delivery again.
    ///
    /// # Errors
    ///
    /// - [`FrameError::MalformedLength`] if four length bytes all carry the continuation bit
    /// - [`FrameError::TooLarge`] if the declared packet does not fit in `N` bytes
    ///
    /// After an error the reassembler is reset.
    pub fn push(&mut self, mut data: &[u8]) -> Result<usize, FrameError> {
        let mut consumed = 0;
        while !data.is_empty() && !self.is_complete() {
            let n = self.wanted().min(data.len());
            let (chunk, rest) = data.split_at(n);
            self.append(chunk)?;
            self.advance(n)?;
            consumed += n;
            data = rest;
        }
        Ok(consumed)
    }

    /// Issue the current request against `reader`, reading straight into the
    /// buffer. Returns the number of bytes read, `0` if the reader had nothing
    /// or a packet is already complete.
    ///
    /// # Errors
    ///
    /// [`ReadError::Transport`] with the reader's error, or [`ReadError::Frame`]
    /// as for [`push`](Self::push). The reassembler is reset after a framing error.
    pub fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<usize, ReadError<R::Error>> {
        let want = self.wanted();
        if want == 0 {
            return Ok(0);
        }
        let start = self.buf.len();
        self.grow(start + want)?;
        let n = match reader.read(&mut self.buf[start..]) {
            Ok(n) => n.min(want),
            Err(e) => {
                self.buf.truncate(start);
                return Err(ReadError::Transport(e));
            }
        };
        self.buf.truncate(start + n);
        if n > 0 {
            self.advance(n)?;
        }
        Ok(n)
    }

    /// Hand out the completed packet and start over.
    pub fn take_frame(&mut self) -> Option<alloc::vec::Vec<u8>> {
        if !self.is_complete() {
            return None;
        }
        let frame = self.buf.to_vec();
        self.reset();
        Some(frame)
    }

    /// Drop any partial packet and wait for a fixed header.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.phase = Phase::Header;
    }

    fn append(&mut self, chunk: &[u8]) -> Result<(), FrameError> {
        let declared = self.buf.len() + chunk.len();
        self.buf.extend_from_slice(chunk).map_err(|_| {
            self.reset();
            FrameError::TooLarge { declared }
        })
    }

    fn grow(&mut self, len: usize) -> Result<(), FrameError> {
        self.buf.resize(len, 0).map_err(|_| {
            self.reset();
            FrameError::TooLarge { declared: len }
        })
    }

    /// Account for `n` bytes just appended to the buffer in the current phase.
    fn advance(&mut self, n: usize) -> Result<(), FrameError> {
        match self.phase {
            Phase::Header => self.phase = Phase::Length,
            Phase::Length => {
                let length_bytes = self.buf.len() - 1;
                let last = self.buf[self.buf.len() - 1];
                if last & CONTINUATION == 0 {
                    let (remaining, used) = match varint::decode(&self.buf[1..]) {
                        Ok(decoded) => decoded,
                        Err(_) => return Err(self.fail_length()),
                    };
                    let total = 1 + used + remaining;
                    if total > N {
                        warn!("rejecting packet of {} bytes", remaining);
                        self.reset();
                        return Err(FrameError::TooLarge {
                            declared: remaining,
                        });
                    }
                    self.phase = match remaining {
                        0 => Phase::Complete,
                        _ => Phase::Body { remaining },
                    };
                } else if length_bytes >= MAX_LENGTH_BYTES {
                    return Err(self.fail_length());
                }
            }
            Phase::Body { remaining } => {
                let remaining = remaining - n;
                self.phase = match remaining {
                    0 => Phase::Complete,
                    _ => Phase::Body { remaining },
                };
            }
            Phase::Complete => {}
        }
        Ok(())
    }

    fn fail_length(&mut self) -> FrameError {
        warn!("malformed remaining length");
        self.reset();
        FrameError::MalformedLength
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mqtt::packet::{Packet, Publish};
    use crate::mqtt::QoS;
    use alloc::vec;
    use alloc::vec::Vec;

    struct Chunks {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl Read for Chunks {
        type Error = ();

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            let n = buf.len().min(self.chunk).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    fn sample_publish() -> Vec<u8> {
        Packet::Publish(Publish {
            dup: false,
            qos: QoS::AtLeastOnce,
            retain: false,
            topic: "a/b".into(),
            packet_id: Some(1),
            payload: vec![0x55; 300],
        })
        .encode()
        .unwrap()
    }

    #[test]
    fn single_byte_feeding_yields_one_identical_frame() {
        let bytes = sample_publish();
        let mut framer: Reassembler = Reassembler::new();
        let mut frames = Vec::new();
        for byte in &bytes {
            assert_eq!(framer.push(core::slice::from_ref(byte)), Ok(1));
            if let Some(frame) = framer.take_frame() {
                frames.push(frame);
            }
        }
        assert_eq!(frames, vec![bytes]);
    }

    #[test]
    fn empty_body_completes_after_length() {
        let mut framer: Reassembler = Reassembler::new();
        assert_eq!(framer.wanted(), 1);
        assert_eq!(framer.push(&[0xC0]), Ok(1));
        assert_eq!(framer.wanted(), 1);
        assert_eq!(framer.push(&[0x00]), Ok(1));
        assert!(framer.is_complete());
        assert_eq!(framer.wanted(), 0);
        assert_eq!(framer.take_frame(), Some(vec![0xC0, 0x00]));
        assert_eq!(framer.wanted(), 1);
        assert_eq!(framer.take_frame(), None);
    }

    #[test]
    fn body_request_matches_declared_length() {
        let mut framer: Reassembler = Reassembler::new();
        framer.push(&[0x30, 0xAC, 0x02]).unwrap();
        assert_eq!(framer.wanted(), 300);
        framer.push(&[0u8; 100]).unwrap();
        assert_eq!(framer.wanted(), 200);
    }

    #[test]
    fn push_stops_at_packet_boundary() {
        let mut stream = vec![0xD0, 0x00];
        stream.extend_from_slice(&[0x40, 0x02, 0x00, 0x07]);
        let mut framer: Reassembler = Reassembler::new();
        let used = framer.push(&stream).unwrap();
        assert_eq!(used, 2);
        assert_eq!(framer.take_frame(), Some(vec![0xD0, 0x00]));
        assert_eq!(framer.push(&stream[used..]), Ok(4));
        assert_eq!(framer.take_frame(), Some(vec![0x40, 0x02, 0x00, 0x07]));
    }

    #[test]
    fn rejects_packet_larger_than_buffer() {
        let mut framer = Reassembler::<64>::new();
        assert_eq!(
            framer.push(&[0x30, 0x80, 0x01, 0xAA]),
            Err(FrameError::TooLarge { declared: 128 })
        );
        assert_eq!(framer.buffered(), 0);
        assert_eq!(framer.wanted(), 1);
    }

    #[test]
    fn packet_filling_buffer_exactly_fits() {
        let mut framer = Reassembler::<8>::new();
        let packet = [0x30, 0x06, 0x00, 0x01, b't', b'x', b'y', b'z'];
        assert_eq!(framer.push(&packet), Ok(8));
        assert_eq!(framer.take_frame(), Some(packet.to_vec()));
    }

    #[test]
    fn rejects_unterminated_length() {
        let mut framer: Reassembler = Reassembler::new();
        assert_eq!(framer.push(&[0x30, 0xFF, 0xFF, 0xFF]), Ok(4));
        assert_eq!(framer.push(&[0xFF]), Err(FrameError::MalformedLength));
        assert_eq!(framer.buffered(), 0);
    }

    #[test]
    fn read_from_issues_exact_requests() {
        let bytes = sample_publish();
        let mut reader = Chunks {
            data: bytes.clone(),
            pos: 0,
            chunk: 64,
        };
        let mut framer: Reassembler = Reassembler::new();
        // header, two length bytes, then the body in reader-sized pieces
        assert_eq!(framer.read_from(&mut reader), Ok(1));
        assert_eq!(framer.read_from(&mut reader), Ok(1));
        assert_eq!(framer.read_from(&mut reader), Ok(1));
        while !framer.is_complete() {
            assert!(framer.read_from(&mut reader).unwrap() > 0);
        }
        assert_eq!(framer.read_from(&mut reader), Ok(0));
        assert_eq!(framer.take_frame(), Some(bytes));
        assert_eq!(framer.read_from(&mut reader), Ok(0));
    }

    #[test]
    fn read_from_keeps_progress_on_empty_reads() {
        let mut framer: Reassembler = Reassembler::new();
        framer.push(&[0x90, 0x03, 0x00]).unwrap();
        let mut idle = Chunks {
            data: vec![],
            pos: 0,
            chunk: 16,
        };
        assert_eq!(framer.read_from(&mut idle), Ok(0));
        assert_eq!(framer.buffered(), 3);
        assert_eq!(framer.wanted(), 2);
    }

    #[test]
    fn read_from_reports_transport_errors() {
        struct Broken;
        impl Read for Broken {
            type Error = &'static str;
            fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
                Err("reset")
            }
        }
        let mut framer: Reassembler = Reassembler::new();
        framer.push(&[0x20]).unwrap();
        assert_eq!(
            framer.read_from(&mut Broken),
            Err(ReadError::Transport("reset"))
        );
        assert_eq!(framer.buffered(), 1);
    }
}
