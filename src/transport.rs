// Copyright (c) 2026 MCU-Debug Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde_json::Value;
use std::io::{self, BufRead, BufReader, Write};
use thiserror::Error;

/// Largest frame body accepted from the peer.
pub const MAX_FRAME_LEN: usize = 4 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("transport I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The header block is unusable; the stream cannot be resynchronized.
    #[error("bad frame header: {0}")]
    Framing(String),

    /// The frame was read whole but its body is not JSON. The next frame is
    /// still readable.
    #[error("frame body is not valid JSON: {0}")]
    BadBody(#[source] serde_json::Error),

    #[error("message could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait Transport {
    /// Next message, or `None` once the peer has closed the stream cleanly.
    fn read_message(&mut self) -> Result<Option<Value>, TransportError>;
    fn write_message(&mut self, msg: &Value) -> Result<(), TransportError>;
}

/// `Content-Length` framed JSON over any reader/writer pair.
pub struct FramedTransport<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> FramedTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

/// Stdio-based transport (suitable for child-process JSON-RPC)
pub fn stdio() -> FramedTransport<BufReader<io::Stdin>, io::Stdout> {
    FramedTransport::new(BufReader::new(io::stdin()), io::stdout())
}

impl<R: BufRead, W: Write> Transport for FramedTransport<R, W> {
    fn read_message(&mut self) -> Result<Option<Value>, TransportError> {
        // Read headers until an empty line
        let mut content_length: Option<usize> = None;
        let mut saw_header = false;
        loop {
            let mut header_line = String::new();
            let n = self.reader.read_line(&mut header_line)?;
            if n == 0 {
                if saw_header {
                    return Err(TransportError::Framing("EOF while reading header".into()));
                }
                return Ok(None);
            }
            saw_header = true;
            let header_trim = header_line.trim();
            if header_trim.is_empty() {
                break; // end of headers
            }
            if header_trim.to_lowercase().starts_with("content-length") {
                if let Some(idx) = header_trim.find(':') {
                    let num = header_trim[idx + 1..].trim();
                    let len = num.parse::<usize>().map_err(|e| {
                        TransportError::Framing(format!("bad Content-Length {:?}: {}", num, e))
                    })?;
                    content_length = Some(len);
                }
            }
            // ignore other headers
        }

        let len = content_length
            .ok_or_else(|| TransportError::Framing("Missing Content-Length header".into()))?;
        if len > MAX_FRAME_LEN {
            return Err(TransportError::Framing(format!(
                "Content-Length too large: {} > {}",
                len, MAX_FRAME_LEN
            )));
        }
        let mut buf = vec![0u8; len];
        self.reader.read_exact(&mut buf)?;
        let v: Value = serde_json::from_slice(&buf).map_err(TransportError::BadBody)?;
        Ok(Some(v))
    }

    fn write_message(&mut self, msg: &Value) -> Result<(), TransportError> {
        write_frame(&mut self.writer, msg)
    }
}

/// Serialize first, then write header + body + flush in one go so frames
/// from different writers never interleave on a shared, locked stream.
pub fn write_frame<W: Write>(w: &mut W, msg: &Value) -> Result<(), TransportError> {
    let body = serde_json::to_vec(msg)?;
    write!(w, "Content-Length: {}\r\n\r\n", body.len())?;
    w.write_all(&body)?;
    w.flush()?;
    Ok(())
}
