//! Response-stream demultiplexing.
//!
//! A single ordered stream carries output from every unit of a run plus one
//! exit-code sentinel. Each message is handled in arrival order:
//! 1. its unit is recorded in the [`UnitRegistry`] (sentinels included);
//! 2. a sentinel payload sets the exit code;
//! 3. anything else is written to the output sink as one line, prefixed with the short unit id.

mod sentinel;
pub use sentinel::{Frame, SENTINEL_PREFIX, classify};

use std::io::Write;

use async_trait::async_trait;
use tracing::{debug, trace, warn};

use lambda_model::{StreamMessage, UnitId};

use crate::{error::RunError, registry::UnitRegistry};

/// Ordered source of response messages.
#[async_trait]
pub trait MessageStream: Send {
    /// Next message, or `Ok(None)` on a clean end-of-stream.
    ///
    /// A transport fault is reported as [`RunError::Stream`].
    async fn next_message(&mut self) -> Result<Option<StreamMessage>, RunError>;
}

pub struct Demultiplexer<W> {
    registry: UnitRegistry,
    out: W,
    exit_code: Option<i32>,
}

impl<W> Demultiplexer<W>
where
    W: Write + Send,
{
    pub fn new(registry: UnitRegistry, out: W) -> Self {
        Self {
            registry,
            out,
            exit_code: None,
        }
    }

    /// Exit code observed so far; `None` until a sentinel arrives.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn registry(&self) -> &UnitRegistry {
        &self.registry
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Process one message.
    ///
    /// If several sentinels arrive, the last one wins.
    pub fn handle(&mut self, msg: &StreamMessage) -> Result<(), RunError> {
        if self.registry.add(&msg.unit) {
            debug!(target: "lambda.core.demux", unit = %msg.unit, "new unit");
        }
        trace!(target: "lambda.core.demux", unit = %msg.unit, len = msg.payload.len(), "message");

        match classify(&msg.payload)? {
            Frame::ExitCode(code) => {
                if let Some(prev) = self.exit_code.replace(code) {
                    warn!(target: "lambda.core.demux", unit = %msg.unit, prev, code, "exit code reported again; keeping the latest");
                } else {
                    debug!(target: "lambda.core.demux", unit = %msg.unit, code, "exit code received");
                }
                Ok(())
            }
            Frame::Output(data) => self.display(&msg.unit, data),
        }
    }

    /// Drain `stream` until end-of-stream and return the exit code, if any was reported.
    ///
    /// Any error aborts draining; output already written stays written.
    pub async fn drain<S>(&mut self, stream: &mut S) -> Result<Option<i32>, RunError>
    where
        S: MessageStream + ?Sized,
    {
        while let Some(msg) = stream.next_message().await? {
            self.handle(&msg)?;
        }
        debug!(target: "lambda.core.demux", units = self.registry.len(), exit_code = ?self.exit_code, "stream finished");
        Ok(self.exit_code)
    }

    fn display(&mut self, unit: &UnitId, data: &[u8]) -> Result<(), RunError> {
        let data = strip_line_end(data);
        let short = unit.short().as_bytes();

        let mut line = Vec::with_capacity(short.len() + data.len() + 2);
        line.extend_from_slice(short);
        line.push(b' ');
        line.extend_from_slice(data);
        line.push(b'\n');

        self.out.write_all(&line)?;
        self.out.flush()?;
        Ok(())
    }
}

fn strip_line_end(data: &[u8]) -> &[u8] {
    let data = data.strip_suffix(b"\n").unwrap_or(data);
    data.strip_suffix(b"\r").unwrap_or(data)
}
