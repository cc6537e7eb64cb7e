//! Line framing transport
//!
//! Turns a raw [`ByteChannel`] into byte-exact, timeout-bounded reads and
//! raw command writes. Every read polls the channel in waits of one poll
//! interval; a wait that elapses with nothing to read ends the read with
//! [`ProtocolError::Timeout`]. Bytes accumulated before the timeout stay in
//! the caller's output buffer.
//!
//! NUL bytes are treated as line noise and never reach the output.

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use super::{stream::ByteChannel, ProtocolError};

/// Size of a single channel read
const READ_CHUNK: usize = 80;

/// Break bytes used by [`LineTransport::read_line`]
pub const LINE_BREAKS: &[u8] = b"\r\n";

/// Byte-exact reader/writer over an exclusively owned channel
pub struct LineTransport<C: ByteChannel> {
    channel: C,
    poll_interval: Duration,
}

impl<C: ByteChannel> LineTransport<C> {
    /// Wrap `channel`; each readiness wait lasts at most `poll_interval`
    pub fn new(channel: C, poll_interval: Duration) -> Self {
        Self {
            channel,
            poll_interval,
        }
    }

    /// Longest single readiness wait
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// The wrapped channel
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Give the channel back, ending the session
    pub fn into_inner(self) -> C {
        self.channel
    }

    /// Write `bytes` exactly as given and return how many were written
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize, ProtocolError> {
        tracing::trace!(bytes = ?String::from_utf8_lossy(bytes), "write");
        self.channel.write_all(bytes)?;
        self.channel.flush()?;
        Ok(bytes.len())
    }

    /// Read into `out` until a break byte or `max_chars` appended bytes.
    ///
    /// An empty `break_bytes` disables break detection and a `max_chars`
    /// of zero disables the length limit. Break bytes are consumed but not
    /// appended. Whatever else arrived in the same channel read after the
    /// terminating byte is dropped with it.
    pub fn read_until(
        &mut self,
        out: &mut Vec<u8>,
        break_bytes: &[u8],
        max_chars: usize,
    ) -> Result<(), ProtocolError> {
        let mut buf = [0u8; READ_CHUNK];
        let mut chars_read = 0usize;

        loop {
            if !self.channel.wait_readable(self.poll_interval)? {
                tracing::trace!(partial = out.len(), "poll interval elapsed");
                return Err(ProtocolError::Timeout);
            }

            let n = match self.channel.read(&mut buf) {
                Ok(0) => return Err(ProtocolError::ChannelClosed),
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                // Readiness was reported but the driver had nothing after all
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    continue
                }
                Err(e) => return Err(e.into()),
            };

            for &byte in &buf[..n] {
                if break_bytes.contains(&byte) {
                    return Ok(());
                }
                if byte == 0 {
                    continue;
                }
                out.push(byte);
                chars_read += 1;
                if max_chars > 0 && chars_read == max_chars {
                    return Ok(());
                }
            }
        }
    }

    /// Read one line, terminated by CR or LF
    pub fn read_line(&mut self) -> Result<Vec<u8>, ProtocolError> {
        let mut line = Vec::new();
        self.read_until(&mut line, LINE_BREAKS, 0)?;
        Ok(line)
    }

    /// Read exactly `n` non-NUL bytes with no break detection
    pub fn read_fixed(&mut self, n: usize) -> Result<Vec<u8>, ProtocolError> {
        let mut bytes = Vec::with_capacity(n);
        self.read_until(&mut bytes, &[], n)?;
        Ok(bytes)
    }
}
