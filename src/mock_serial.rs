//! We use this mocking module in unit tests to stand in for a VE.Direct serial link.

/// Our mock type used to emulate the serial port a device is attached to.
pub struct MockSerial {
    /// Bytes written by the code under test.
    write_buffer: heapless::Vec<u8, 256>,
    /// Bytes the "device" has sent and that are waiting to be read.
    read_buffer: heapless::Vec<u8, 512>,
    /// Current position in the read buffer.
    read_position: usize,
    /// Total number of bytes handed out by `read()`.
    bytes_read: usize,
    /// Flag to simulate write errors.
    should_error_on_write: bool,
    /// Flag to simulate read errors.
    should_error_on_read: bool,
}

#[derive(Debug)]
pub enum MockSerialError {
    /// Simulated buffer overflow.
    BufferOverflow,
    /// Generic simulated error for testing.
    SimulatedError,
    /// Would block - no data available.
    WouldBlock,
}

impl core::fmt::Display for MockSerialError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

impl core::error::Error for MockSerialError {}

impl embedded_io::Error for MockSerialError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            MockSerialError::BufferOverflow => embedded_io::ErrorKind::OutOfMemory,
            MockSerialError::SimulatedError => embedded_io::ErrorKind::Other,
            MockSerialError::WouldBlock => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = MockSerialError;
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }

        self.write_buffer
            .extend_from_slice(buf)
            .map_err(|_| MockSerialError::BufferOverflow)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        Ok(())
    }
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_read {
            return Err(MockSerialError::SimulatedError);
        }

        let pending = &self.read_buffer[self.read_position..];
        if pending.is_empty() {
            return Err(MockSerialError::WouldBlock);
        }

        let count = core::cmp::min(buf.len(), pending.len());
        buf[..count].copy_from_slice(&pending[..count]);
        self.read_position += count;
        self.bytes_read += count;
        Ok(count)
    }
}

impl embedded_io::ReadReady for MockSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read_position < self.read_buffer.len())
    }
}

impl MockSerial {
    /// Create a new MockSerial instance with empty buffers.
    pub fn new() -> Self {
        Self {
            write_buffer: heapless::Vec::new(),
            read_buffer: heapless::Vec::new(),
            read_position: 0,
            bytes_read: 0,
            should_error_on_write: false,
            should_error_on_read: false,
        }
    }

    /// Replace whatever is left to read with `data`.
    pub fn set_read_data(&mut self, data: &[u8]) -> Result<(), MockSerialError> {
        self.read_buffer.clear();
        self.read_position = 0;
        self.read_buffer
            .extend_from_slice(data)
            .map_err(|_| MockSerialError::BufferOverflow)
    }

    /// Total bytes consumed through `read()` since creation.
    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    /// Get a reference to the data that was written to this mock serial port.
    pub fn written_data(&self) -> &[u8] {
        &self.write_buffer
    }

    /// Configure whether write operations should fail with an error.
    pub fn set_write_error(&mut self, should_error: bool) {
        self.should_error_on_write = should_error;
    }

    /// Configure whether read operations should fail with an error.
    pub fn set_read_error(&mut self, should_error: bool) {
        self.should_error_on_read = should_error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::{Read, ReadReady, Write};

    #[test]
    fn test_read_ready_tracks_pending_bytes() {
        let mut mock = MockSerial::new();
        assert!(!mock.read_ready().unwrap());

        mock.set_read_data(b"\r\n").unwrap();
        assert!(mock.read_ready().unwrap());

        let mut buffer = [0u8; 1];
        assert_eq!(mock.read(&mut buffer).unwrap(), 1);
        assert_eq!(mock.read(&mut buffer).unwrap(), 1);
        assert_eq!(&buffer, b"\n");
        assert!(!mock.read_ready().unwrap());
        assert_eq!(mock.bytes_read(), 2);
    }

    #[test]
    fn test_read_when_empty_would_block() {
        let mut mock = MockSerial::new();
        let mut buffer = [0u8; 4];
        assert!(matches!(
            mock.read(&mut buffer).unwrap_err(),
            MockSerialError::WouldBlock
        ));
    }

    #[test]
    fn test_read_partial_data() {
        let mut mock = MockSerial::new();
        mock.set_read_data(b"Checksum\tf").unwrap();

        let mut buffer = [0u8; 8];
        assert_eq!(mock.read(&mut buffer).unwrap(), 8);
        assert_eq!(&buffer, b"Checksum");
        assert_eq!(mock.read(&mut buffer).unwrap(), 2);
        assert_eq!(&buffer[..2], b"\tf");
    }

    #[test]
    fn test_set_read_data_overflow() {
        let mut mock = MockSerial::new();
        let large_data = vec![0u8; 600];
        assert!(matches!(
            mock.set_read_data(&large_data).unwrap_err(),
            MockSerialError::BufferOverflow
        ));
    }

    #[test]
    fn test_write_and_error_flags() {
        let mut mock = MockSerial::new();
        mock.write_all(b"V = 13260\r\n").unwrap();
        assert_eq!(mock.written_data(), b"V = 13260\r\n");

        mock.set_write_error(true);
        assert!(mock.write(b"x").is_err());
        assert!(mock.flush().is_err());

        mock.set_read_data(b"data").unwrap();
        mock.set_read_error(true);
        let mut buffer = [0u8; 4];
        assert!(mock.read(&mut buffer).is_err());
    }
}
