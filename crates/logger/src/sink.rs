use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::path::Path;

#[cfg(unix)]
const LOG_FILE_MODE: u32 = 0o664;

enum Target {
    Stderr,
    Stdout,
    File(File),
    Writer(Box<dyn Write + Send>),
}

/// Destination log entries are written to.
///
/// A sink is owned by exactly one logger (and shared by its children); each
/// entry is written and flushed in one call.
pub struct Sink {
    target: Target,
}

impl Sink {
    /// Standard error, the default sink.
    pub fn stderr() -> Self {
        Self {
            target: Target::Stderr,
        }
    }

    /// Standard output.
    pub fn stdout() -> Self {
        Self {
            target: Target::Stdout,
        }
    }

    /// Wraps an arbitrary writer, e.g. an in-memory buffer.
    pub fn writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            target: Target::Writer(Box::new(writer)),
        }
    }

    /// Opens `path` for reading and appending, creating it when absent.
    ///
    /// New files get mode `0664` on Unix (subject to the umask).
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let mut options = OpenOptions::new();
        options.read(true).append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(LOG_FILE_MODE);
        }

        let file = options.open(path)?;
        Ok(Self {
            target: Target::File(file),
        })
    }

    /// Whether the sink is an interactive terminal.
    ///
    /// Colors are only considered for terminal sinks; see
    /// [`crate::TextFormatter::colored`].
    pub fn is_terminal(&self) -> bool {
        match &self.target {
            Target::Stderr => io::stderr().is_terminal(),
            Target::Stdout => io::stdout().is_terminal(),
            Target::File(file) => file.is_terminal(),
            Target::Writer(_) => false,
        }
    }

    pub(crate) fn write_entry(&mut self, entry: &[u8]) -> io::Result<()> {
        match &mut self.target {
            Target::Stderr => {
                let mut stderr = io::stderr().lock();
                stderr.write_all(entry)?;
                stderr.flush()
            }
            Target::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(entry)?;
                stdout.flush()
            }
            Target::File(file) => file.write_all(entry),
            Target::Writer(writer) => {
                writer.write_all(entry)?;
                writer.flush()
            }
        }
    }
}

impl Default for Sink {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match &self.target {
            Target::Stderr => "stderr",
            Target::Stdout => "stdout",
            Target::File(_) => "file",
            Target::Writer(_) => "writer",
        };
        f.debug_struct("Sink").field("target", &target).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn temp_path() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("sink-{}.log", uuid::Uuid::new_v4()))
    }

    #[test]
    fn open_creates_then_appends() {
        let path = temp_path();

        let mut sink = Sink::open(&path).unwrap();
        sink.write_entry(b"first\n").unwrap();
        drop(sink);

        let mut sink = Sink::open(&path).unwrap();
        sink.write_entry(b"second\n").unwrap();
        drop(sink);

        let mut contents = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "first\nsecond\n");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn open_fails_in_missing_directory() {
        let path = temp_path().join("nested.log");
        let err = Sink::open(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn writers_and_files_are_not_terminals() {
        assert!(!Sink::writer(Vec::new()).is_terminal());

        let path = temp_path();
        assert!(!Sink::open(&path).unwrap().is_terminal());
        std::fs::remove_file(path).unwrap();
    }
}
