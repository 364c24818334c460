#![allow(dead_code)]

use logger::Sink;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// In-memory sink whose contents stay readable after it is handed off.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sink(&self) -> Sink {
        Sink::writer(self.clone())
    }

    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn temp_log_path() -> PathBuf {
    std::env::temp_dir().join(format!("logger-test-{}.log", uuid::Uuid::new_v4()))
}

/// Value of the quoted `time="..."` pair of a plain line.
pub fn timestamp_of(line: &str) -> &str {
    let rest = line.strip_prefix("time=\"").unwrap();
    &rest[..rest.find('"').unwrap()]
}

pub const API_KEY: &str = "0123456789abcdef0123456789abcdef";
