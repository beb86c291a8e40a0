//! Standard input source
//!
//! Line-count semantics:
//! - `1`: one line, trimmed
//! - `0`: everything up to end of stream
//! - `n`: `n - 1` lines as read, then one more trimmed line
//!
//! Once the stream is exhausted every poll comes back empty, which leaves
//! the displayed content as it was.
//!
//! Standard input is drained by a dedicated thread into an in-memory pipe.
//! A read blocked on a quiet producer never becomes a runtime task, so
//! quitting does not wait for the next line.

use std::io::{ErrorKind, Read};

use async_trait::async_trait;
use display_core::{Poll, Source, SourceError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, DuplexStream};
use tracing::{debug, warn};

/// Bytes buffered between the reader thread and the source
const PIPE_CAPACITY: usize = 64 * 1024;

/// Size of one blocking read
const CHUNK_SIZE: usize = 8 * 1024;

/// Reads display text from a buffered reader (stdin by default)
pub struct StdinSource<R> {
    reader: R,
    lines: usize,
    eof: bool,
}

impl StdinSource<BufReader<DuplexStream>> {
    /// Source over the process's standard input
    pub fn stdin(lines: usize) -> Self {
        Self::blocking(std::io::stdin(), lines)
    }

    /// Source over a blocking reader, drained on its own thread
    pub fn blocking<B>(reader: B, lines: usize) -> Self
    where
        B: Read + Send + 'static,
    {
        Self::new(BufReader::new(spawn_reader(reader)), lines)
    }
}

/// Copy `reader` into a pipe from a plain thread; the returned end sees EOF
/// once the reader ends or fails
fn spawn_reader<B>(mut reader: B) -> DuplexStream
where
    B: Read + Send + 'static,
{
    let (output, mut input) = tokio::io::duplex(PIPE_CAPACITY);

    let spawned = std::thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            let mut buffer = vec![0u8; CHUNK_SIZE];
            loop {
                let n = match reader.read(&mut buffer) {
                    Ok(0) => break,
                    Ok(n) => n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => {
                        warn!(error = %e, "stdin read failed");
                        break;
                    }
                };
                // Fails once the source is gone
                if futures::executor::block_on(input.write_all(&buffer[..n])).is_err() {
                    break;
                }
            }
            debug!("stdin reader finished");
        });

    if let Err(e) = spawned {
        warn!(error = %e, "Failed to start stdin reader");
    }
    output
}

impl<R> StdinSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Source over any buffered reader
    pub fn new(reader: R, lines: usize) -> Self {
        Self {
            reader,
            lines,
            eof: false,
        }
    }

    async fn read_line(&mut self, out: &mut String) -> Result<(), SourceError> {
        if self.reader.read_line(out).await? == 0 {
            if !self.eof {
                debug!("stdin reached end of stream");
            }
            self.eof = true;
        }
        Ok(())
    }
}

#[async_trait]
impl<R> Source for StdinSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    fn name(&self) -> &str {
        "stdin"
    }

    async fn poll(&mut self) -> Result<Poll, SourceError> {
        if self.eof {
            return Ok(Poll::default());
        }

        let mut text = String::new();
        match self.lines {
            0 => {
                self.reader.read_to_string(&mut text).await?;
                self.eof = true;
            }
            n => {
                for _ in 1..n {
                    self.read_line(&mut text).await?;
                }
                let mut last = String::new();
                self.read_line(&mut last).await?;
                text.push_str(last.trim());
            }
        }

        Ok(Poll::text(text))
    }
}
