//! Standard stream wiring for child processes.
//!
//! Inherited streams are attached to the child directly. Caller-supplied
//! readers and writers sit behind `Arc<Mutex<..>>` so one configuration can
//! be reused across executions; they are connected through pipes and
//! pumped by background tasks.

use std::fmt;
use std::io::{self, Read, Write};
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Buffer size for copying between pipes and caller streams.
const PUMP_BUFFER_SIZE: usize = 4096;

/// A reader shared between executions.
pub type SharedReader = Arc<Mutex<dyn Read + Send>>;

/// A writer shared between executions.
pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

/// Where a child's standard input comes from.
#[derive(Clone, Default)]
pub enum InputSource {
    /// The parent's standard input.
    #[default]
    Inherit,
    /// An empty input.
    Null,
    /// A caller-supplied reader.
    Reader(SharedReader),
}

impl InputSource {
    /// Wrap a reader so it can be shared between executions.
    pub fn reader<R: Read + Send + 'static>(reader: R) -> Self {
        Self::Reader(Arc::new(Mutex::new(reader)))
    }

    pub(crate) fn stdio(&self) -> Stdio {
        match self {
            Self::Inherit => Stdio::inherit(),
            Self::Null => Stdio::null(),
            Self::Reader(_) => Stdio::piped(),
        }
    }
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inherit => f.write_str("Inherit"),
            Self::Null => f.write_str("Null"),
            Self::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

/// Where a child's standard output or error goes.
#[derive(Clone, Default)]
pub enum OutputSink {
    /// The parent's corresponding stream.
    #[default]
    Inherit,
    /// Discarded.
    Null,
    /// A caller-supplied writer.
    Writer(SharedWriter),
}

impl OutputSink {
    /// Wrap a writer so it can be shared between executions.
    pub fn writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self::Writer(Arc::new(Mutex::new(writer)))
    }

    pub(crate) fn stdio(&self) -> Stdio {
        match self {
            Self::Inherit => Stdio::inherit(),
            Self::Null => Stdio::null(),
            Self::Writer(_) => Stdio::piped(),
        }
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inherit => f.write_str("Inherit"),
            Self::Null => f.write_str("Null"),
            Self::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

impl From<SharedBuffer> for OutputSink {
    fn from(buffer: SharedBuffer) -> Self {
        Self::writer(buffer)
    }
}

/// A cloneable in-memory writer; every clone appends to the same bytes.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.bytes().clone()
    }

    /// Everything written so far, decoded lossily as UTF-8.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }

    /// Discard everything written so far.
    pub fn clear(&self) {
        self.bytes().clear();
    }

    fn bytes(&self) -> MutexGuard<'_, Vec<u8>> {
        // A panic mid-write cannot leave a Vec<u8> in a broken state.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn poisoned() -> io::Error {
    io::Error::other("shared stream lock poisoned")
}

/// Copy everything from a child pipe into a shared writer.
///
/// The pipe is read on the runtime; writes happen on the blocking pool so a
/// slow writer never stalls a runtime thread. The writer is locked once per
/// chunk, so stdout and stderr may share one.
pub(crate) fn pump_output<R>(mut from: R, to: SharedWriter) -> JoinHandle<io::Result<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<Vec<u8>>(8);

    let writer = tokio::task::spawn_blocking(move || -> io::Result<()> {
        while let Some(chunk) = rx.blocking_recv() {
            to.lock().map_err(|_| poisoned())?.write_all(&chunk)?;
        }
        to.lock().map_err(|_| poisoned())?.flush()
    });

    tokio::spawn(async move {
        let mut buf = [0u8; PUMP_BUFFER_SIZE];
        loop {
            let n = from.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            // Writer gone means it failed; its error is reported below.
            if tx.send(buf[..n].to_vec()).await.is_err() {
                break;
            }
        }
        drop(tx);
        writer.await.map_err(io::Error::other)?
    })
}

/// Feed a shared reader into a child's stdin pipe.
///
/// Reading happens on the blocking pool. The pipe is closed once the reader
/// is exhausted, so the child sees end of input. A child that exits without
/// draining its input is not an error.
pub(crate) fn pump_input<W>(from: SharedReader, mut to: W)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<Vec<u8>>(8);

    tokio::task::spawn_blocking(move || -> io::Result<()> {
        let mut reader = from.lock().map_err(|_| poisoned())?;
        let mut buf = [0u8; PUMP_BUFFER_SIZE];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => return Ok(()),
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            // Receiver gone means the child side is closed.
            if tx.blocking_send(buf[..n].to_vec()).is_err() {
                return Ok(());
            }
        }
    });

    tokio::spawn(async move {
        while let Some(chunk) = rx.recv().await {
            if to.write_all(&chunk).await.is_err() {
                break;
            }
        }
        let _ = to.shutdown().await;
    });
}
