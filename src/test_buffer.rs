use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Clonable in-memory writer so a test can keep a handle on output that
/// was moved into a `Box<dyn Write>`.
#[derive(Clone, Default)]
pub struct TestBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl TestBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock().unwrap()).into_owned()
    }
}

impl Write for TestBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
