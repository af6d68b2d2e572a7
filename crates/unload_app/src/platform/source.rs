//! Scan sources: anything that yields one decoded scan line at a time.

use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use unload_logging::{unload_debug, unload_warn};

/// A producer of raw scanner lines. `Ok(None)` means the source is exhausted.
pub trait ScanSource: Send {
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Line-oriented source over any buffered reader. Keyboard-wedge scanners
/// type the code followed by Enter, so stdin and replay files look the same.
pub struct LineSource<R> {
    reader: R,
    buf: String,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
        }
    }
}

impl<R: BufRead + Send> ScanSource for LineSource<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.buf.trim_end_matches(['\r', '\n']).to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    Line(String),
    Closed,
    Failed(String),
}

/// Pump `source` on a background thread until it ends or the receiver goes away.
pub fn spawn(mut source: Box<dyn ScanSource>, tx: mpsc::Sender<SourceEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        let event = match source.next_line() {
            Ok(Some(line)) => SourceEvent::Line(line),
            Ok(None) => {
                unload_debug!("scan source closed");
                let _ = tx.send(SourceEvent::Closed);
                return;
            }
            Err(err) => {
                unload_warn!("scan source failed: {}", err);
                let _ = tx.send(SourceEvent::Failed(err.to_string()));
                return;
            }
        };
        if tx.send(event).is_err() {
            return;
        }
    })
}
