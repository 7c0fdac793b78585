//! The controller link: newline-delimited JSON over a non-blocking TCP
//! stream, with a standing offline fallback.
//!
//! Reads are buffered and only surfaced between frames; writes queue in a
//! local buffer and flush opportunistically. Any transport failure is a
//! one-way switch into offline mode — no reconnect loop.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::net::TcpStream;

use tracing::{debug, info, warn};

use super::offline::OfflineController;
use super::protocol::{Inbound, Outbound};

/// Cap on buffered unflushed writes before old bytes are dropped.
const MAX_WRITE_BUFFER: usize = 65_536;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    Connected,
    Offline,
}

/// Duplex channel to the presentation controller.
pub struct ControllerLink {
    mode: LinkMode,
    stream: Option<TcpStream>,
    read_buf: Vec<u8>,
    write_buf: Vec<u8>,
    inbound: VecDeque<Inbound>,
    offline: OfflineController,
}

impl ControllerLink {
    /// Start offline: the simulated controller answers everything.
    pub fn offline() -> Self {
        let mut offline = OfflineController::new();
        offline.queue_initial_state();
        info!("controller link running in offline mode");
        Self {
            mode: LinkMode::Offline,
            stream: None,
            read_buf: Vec::with_capacity(4096),
            write_buf: Vec::new(),
            inbound: VecDeque::new(),
            offline,
        }
    }

    /// Connect to a live controller; falls back to offline on failure.
    pub fn connect(address: &str) -> Self {
        match TcpStream::connect(address) {
            Ok(stream) => {
                if let Err(e) = stream.set_nonblocking(true) {
                    warn!("failed to set controller stream non-blocking: {e}");
                    return Self::offline();
                }
                info!(address, "controller link connected");
                Self {
                    mode: LinkMode::Connected,
                    stream: Some(stream),
                    read_buf: Vec::with_capacity(4096),
                    write_buf: Vec::new(),
                    inbound: VecDeque::new(),
                    offline: OfflineController::new(),
                }
            }
            Err(e) => {
                warn!(address, "controller connection failed: {e}");
                Self::offline()
            }
        }
    }

    pub fn mode(&self) -> LinkMode {
        self.mode
    }

    /// Send a message to the controller (or its offline stand-in).
    pub fn send(&mut self, message: &Outbound) {
        match self.mode {
            LinkMode::Offline => self.offline.handle(message),
            LinkMode::Connected => {
                let mut line = match serde_json::to_string(message) {
                    Ok(line) => line,
                    Err(e) => {
                        debug!("unserializable outbound message dropped: {e}");
                        return;
                    }
                };
                line.push('\n');
                self.write_buf.extend_from_slice(line.as_bytes());
                if self.write_buf.len() > MAX_WRITE_BUFFER {
                    let excess = self.write_buf.len() - MAX_WRITE_BUFFER;
                    self.write_buf.drain(..excess);
                    warn!("controller write buffer overflow; oldest bytes dropped");
                }
                if let Err(e) = self.flush_writes() {
                    self.fail_over(&format!("write error: {e}"));
                    self.offline.handle(message);
                }
            }
        }
    }

    fn flush_writes(&mut self) -> io::Result<()> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(());
        };
        while !self.write_buf.is_empty() {
            match stream.write(&self.write_buf) {
                Ok(0) => return Err(io::Error::new(io::ErrorKind::WriteZero, "write zero")),
                Ok(n) => {
                    self.write_buf.drain(..n);
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Pull everything the transport has buffered since the last frame.
    /// Called once per frame; messages never apply mid-frame.
    pub fn drain(&mut self) -> Vec<Inbound> {
        match self.mode {
            LinkMode::Offline => self.inbound.drain(..).chain(self.offline.drain()).collect(),
            LinkMode::Connected => {
                if let Err(reason) = self.pump_stream() {
                    self.fail_over(&reason);
                }
                self.inbound.drain(..).collect()
            }
        }
    }

    fn pump_stream(&mut self) -> Result<(), String> {
        let Some(stream) = self.stream.as_mut() else {
            return Err("stream missing".to_string());
        };

        let mut chunk = [0u8; 4096];
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => return Err("controller closed the connection".to_string()),
                Ok(n) => self.read_buf.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(format!("read error: {e}")),
            }
        }

        // Split complete lines out of the buffer; a partial line stays for
        // the next frame.
        while let Some(newline) = self.read_buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.read_buf.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line[..line.len() - 1]);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Inbound>(line) {
                Ok(message) => self.inbound.push_back(message),
                // Unknown type/target or malformed payload: dropped, no
                // state change.
                Err(e) => debug!("ignoring unrecognized controller message: {e}"),
            }
        }
        let _ = self.flush_writes();
        Ok(())
    }

    /// Advance the offline playback clock; a no-op while connected.
    pub fn tick_playback(&mut self, dt_s: f64) {
        if self.mode == LinkMode::Offline {
            self.offline.tick(dt_s);
        }
    }

    fn fail_over(&mut self, reason: &str) {
        warn!("controller link lost ({reason}); switching to offline mode");
        self.mode = LinkMode::Offline;
        self.stream = None;
        self.read_buf.clear();
        self.write_buf.clear();
    }
}
