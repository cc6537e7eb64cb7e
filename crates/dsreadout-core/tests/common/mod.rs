//! Scripted byte channel standing in for the RS-485 bus

#![allow(dead_code)]

use dsreadout_core::protocol::ByteChannel;
use dsreadout_core::transducer::{EngineConfig, Transducer};
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::time::Duration;

/// Mock bus: every write releases the next scripted reply.
///
/// A `None` reply models a silent bus; reads then time out.
pub struct ScriptedChannel {
    replies: VecDeque<Option<Vec<u8>>>,
    pending: VecDeque<u8>,
    /// Every write, in order
    pub written: Vec<Vec<u8>>,
    /// Every readiness wait requested by the transport
    pub waits: Vec<Duration>,
    pub fail_writes: bool,
    pub eof: bool,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self {
            replies: VecDeque::new(),
            pending: VecDeque::new(),
            written: Vec::new(),
            waits: Vec::new(),
            fail_writes: false,
            eof: false,
        }
    }

    /// Queue a reply for the next write
    pub fn reply(mut self, bytes: &[u8]) -> Self {
        self.replies.push_back(Some(bytes.to_vec()));
        self
    }

    /// Queue no reply for the next write
    pub fn silence(mut self) -> Self {
        self.replies.push_back(None);
        self
    }

    /// Bytes already on the line before anything is written
    pub fn preload(mut self, bytes: &[u8]) -> Self {
        self.pending.extend(bytes);
        self
    }

    pub fn written_str(&self) -> Vec<String> {
        self.written
            .iter()
            .map(|w| String::from_utf8_lossy(w).into_owned())
            .collect()
    }
}

impl Read for ScriptedChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        let n = buf.len().min(self.pending.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for ScriptedChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "Serial write failed"));
        }
        self.written.push(buf.to_vec());
        if let Some(Some(reply)) = self.replies.pop_front() {
            self.pending.extend(reply);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ByteChannel for ScriptedChannel {
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool> {
        self.waits.push(timeout);
        Ok(!self.pending.is_empty() || self.eof)
    }
}

/// Engine over a scripted bus with default settings
pub fn engine(channel: ScriptedChannel) -> Transducer<ScriptedChannel> {
    Transducer::new(channel, EngineConfig::default())
}

/// Live values line for a single-phase transducer
pub const SINGLE_PHASE_VALUES: &[u8] = b">+0.5000+0.4000+0.2000-0.0100+0.999050.000\r";

/// Live values line for a three-phase, four-wire transducer
pub const THREE_PHASE_VALUES: &[u8] =
    b">+0.7700+0.1000+0.7800+0.2000+0.7900+0.3000+0.6000+0.0500+0.980049.980\r";

/// Energy line with a valid checksum (0x76)
pub const ENERGY_OK: &[u8] = b"#0112345670089AB276\r";

/// Same payload with a wrong checksum
pub const ENERGY_BAD_CHECKSUM: &[u8] = b"#0112345670089AB299\r";
