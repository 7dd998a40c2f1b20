//! # DevRS Exec Stream Draining
//!
//! File: exec/src/common/process/drain.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! A child that fills one pipe while its parent is blocked reading the other
//! one deadlocks both. The executor therefore reads stdout and stderr on two
//! separate tasks (`spawn_line_reader`) that run alongside its wait for the
//! child, and joins both (`join_reader`) before the captured lines are
//! considered final.
//!
//! Each reader:
//! - splits on `\n`, dropping a trailing `\r`, and decodes lossily as UTF-8;
//! - hands every line to the stream's callback, if any, before storing it;
//! - stores lines in a buffer shared with its `LineReader`, so lines read
//!   before the reader failed or was abandoned are still returned.
//!
use super::spec::LineCallback;
use crate::core::error::ExecError;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

/// Which of the child's output streams a reader is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    fn label(self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }
}

type SharedLines = Arc<Mutex<Vec<String>>>;

/// A running reader task and the lines it has stored so far.
#[derive(Debug)]
pub struct LineReader {
    kind: StreamKind,
    lines: SharedLines,
    handle: JoinHandle<Option<ExecError>>,
}

/// What one stream produced.
#[derive(Debug, Default)]
pub struct StreamCapture {
    /// Every line read, in order.
    pub lines: Vec<String>,
    /// The error that ended reading early, if any.
    pub error: Option<ExecError>,
    /// The reader was still running when its grace period ran out.
    pub abandoned: bool,
}

/// # Spawn Line Reader (`spawn_line_reader`)
///
/// Starts a task that reads `stream` to end-of-stream line by line.
///
/// # Arguments
///
/// * `stream` - The child's stdout or stderr pipe.
/// * `kind` - Which stream it is, for logs and error context.
/// * `callback` - Invoked with each line as it is read.
///
/// # Returns
///
/// A `LineReader` to pass to `join_reader`.
pub fn spawn_line_reader<R>(
    stream: R,
    kind: StreamKind,
    callback: Option<LineCallback>,
) -> LineReader
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let lines = SharedLines::default();
    let sink = Arc::clone(&lines);
    let handle = tokio::spawn(async move {
        match read_lines(stream, callback.as_ref(), &sink).await {
            Ok(()) => None,
            Err(e) => {
                warn!("Reading child {} failed: {}", kind.label(), e);
                Some(ExecError::io(format!("reading child {}", kind.label()), e))
            }
        }
    });
    LineReader {
        kind,
        lines,
        handle,
    }
}

async fn read_lines<R>(
    stream: R,
    callback: Option<&LineCallback>,
    lines: &Mutex<Vec<String>>,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        let line = String::from_utf8_lossy(&buf).into_owned();
        if let Some(callback) = callback {
            callback(&line);
        }
        lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }
}

/// # Join Reader (`join_reader`)
///
/// Waits for a reader to finish and collects what it read.
///
/// With `grace`, a reader still running after that long is aborted and marked
/// `abandoned`; the lines it stored before that are kept. This happens when
/// something other than the child (typically a background grandchild) still
/// holds the pipe open.
pub async fn join_reader(reader: LineReader, grace: Option<Duration>) -> StreamCapture {
    let LineReader {
        kind,
        lines,
        handle,
    } = reader;
    let abort = handle.abort_handle();
    let (error, abandoned) = match grace {
        Some(grace) => match tokio::time::timeout(grace, handle).await {
            Ok(joined) => (task_error(joined, kind), false),
            Err(_) => {
                warn!(
                    "Child {} still open {:?} after the child finished or was killed; abandoning reader",
                    kind.label(),
                    grace
                );
                abort.abort();
                (None, true)
            }
        },
        None => (task_error(handle.await, kind), false),
    };

    let lines = std::mem::take(&mut *lines.lock().unwrap_or_else(PoisonError::into_inner));
    debug!("Child {} drained: {} line(s)", kind.label(), lines.len());
    StreamCapture {
        lines,
        error,
        abandoned,
    }
}

fn task_error(joined: Result<Option<ExecError>, JoinError>, kind: StreamKind) -> Option<ExecError> {
    joined.unwrap_or_else(|e| {
        Some(ExecError::io(
            format!("draining child {}", kind.label()),
            io::Error::other(e.to_string()),
        ))
    })
}
