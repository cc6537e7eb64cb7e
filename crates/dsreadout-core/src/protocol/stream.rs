//! Byte channels the transport can run over

use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

/// How often `SerialChannel` re-checks the input queue while waiting
const READINESS_CHECK_INTERVAL: Duration = Duration::from_millis(5);

/// Abstraction for an already-configured duplex byte channel
pub trait ByteChannel: Read + Write + Send {
    /// Block for at most `timeout` until input is available.
    ///
    /// Returns `Ok(false)` when the wait elapsed with nothing to read.
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool>;
}

impl<C: ByteChannel + ?Sized> ByteChannel for Box<C> {
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).wait_readable(timeout)
    }
}

/// Serial port wrapper implementing ByteChannel
pub struct SerialChannel {
    port: Box<dyn SerialPort>,
}

impl SerialChannel {
    /// Wrap an opened port
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }

    /// Name of the underlying port, if the driver knows it
    pub fn name(&self) -> Option<String> {
        self.port.name()
    }
}

impl Read for SerialChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}

impl Write for SerialChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

impl ByteChannel for SerialChannel {
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool> {
        let start = Instant::now();
        loop {
            let available = self
                .port
                .bytes_to_read()
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            if available > 0 {
                return Ok(true);
            }
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Ok(false);
            }
            std::thread::sleep(READINESS_CHECK_INTERVAL.min(timeout - elapsed));
        }
    }
}
