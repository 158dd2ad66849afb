//! Buffered printer adapter
//!
//! One adapter owns one transport. Append operations accumulate into a
//! pending buffer; `flush` commits the whole buffer as a single
//! physical job. For OS-managed printers this is a correctness
//! requirement, not an optimization: each spooler submission is a
//! discrete job, and flushing per line would feed one receipt out as
//! many documents. The mock variant instead emits observable output per
//! call, so a hardware-less setup still shows what would have printed.

use crate::config::{ConnectionConfig, TransportKind};
use crate::error::PrintResult;
use crate::escpos;
use crate::transport::{MockOp, MockOps, Transport};
use tracing::debug;

pub use crate::escpos::{Align, TextSize};

/// A semantic formatting option, translated to control bytes per variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Align(Align),
    Bold(bool),
    Size(TextSize),
}

impl Format {
    /// Map a structured-job `set` record to a format option
    ///
    /// Unknown attributes return `None` and are ignored by callers;
    /// unknown values fall back the way the wire protocol always has
    /// (any unrecognized align means left, any non-bold font value
    /// means bold off).
    pub fn parse(attribute: &str, value: &str) -> Option<Format> {
        match attribute {
            "align" => Some(Format::Align(match value {
                "center" => Align::Center,
                "right" => Align::Right,
                _ => Align::Left,
            })),
            "font" | "bold" => Some(Format::Bold(matches!(value, "b" | "bold"))),
            "textSize" | "text_size" => Some(Format::Size(match value {
                "double" => TextSize::Double,
                "double-height" => TextSize::DoubleHeight,
                "double-width" => TextSize::DoubleWidth,
                "b" | "bold" => return Some(Format::Bold(true)),
                _ => TextSize::Normal,
            })),
            _ => None,
        }
    }

    fn to_bytes(self) -> [u8; 3] {
        match self {
            Format::Align(a) => escpos::align(a),
            Format::Bold(on) => escpos::bold(on),
            Format::Size(s) => escpos::size(s),
        }
    }
}

/// Buffered adapter over one printer connection
#[derive(Debug)]
pub struct PrinterAdapter {
    kind: TransportKind,
    transport: Transport,
    buffer: Vec<u8>,
}

impl PrinterAdapter {
    /// Open an adapter for a validated config
    ///
    /// Fails without side effects if the transport cannot be opened.
    pub async fn connect(
        kind: TransportKind,
        config: &ConnectionConfig,
        mock_mode: bool,
    ) -> PrintResult<Self> {
        let transport = Transport::connect(kind, config, mock_mode).await?;
        Ok(Self {
            kind,
            transport,
            buffer: Vec::new(),
        })
    }

    /// The kind this adapter was connected as
    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    /// Whether raw control bytes can be appended directly
    ///
    /// False only for the mock fallback, which renders text; callers
    /// re-encode raw payloads as latin-1 text instead.
    pub fn supports_raw(&self) -> bool {
        self.transport.as_mock().is_none()
    }

    /// Append encoded text to the pending job
    pub fn append_text(&mut self, s: &str) {
        if let Some(mock) = self.transport.as_mock() {
            mock.record(MockOp::Text(s.to_string()));
            return;
        }
        self.buffer.extend_from_slice(s.as_bytes());
    }

    /// Append raw printer control bytes to the pending job
    pub fn append_raw(&mut self, bytes: &[u8]) {
        if let Some(mock) = self.transport.as_mock() {
            mock.record(MockOp::Raw(bytes.to_vec()));
            return;
        }
        self.buffer.extend_from_slice(bytes);
    }

    /// Append the paper-cut command
    ///
    /// OS-managed printers get the literal ESC i sequence; other
    /// variants use the GS V full cut.
    pub fn append_cut(&mut self) {
        match &self.transport {
            Transport::Mock(mock) => mock.record(MockOp::Cut),
            Transport::OsManaged(_) => self.buffer.extend_from_slice(&escpos::CUT_ESC_I),
            _ => self.buffer.extend_from_slice(&escpos::CUT),
        }
    }

    /// Append the control bytes for a formatting option
    pub fn apply_format(&mut self, format: Format) {
        if let Some(mock) = self.transport.as_mock() {
            mock.record(MockOp::Format(format));
            return;
        }
        self.buffer.extend_from_slice(&format.to_bytes());
    }

    /// Commit all buffered output as one physical job
    ///
    /// No-op on an empty buffer; safe to call repeatedly. The buffer is
    /// taken before the transport write, so a failed submit discards
    /// the job rather than retrying it.
    pub async fn flush(&mut self) -> PrintResult<()> {
        if let Some(mock) = self.transport.as_mock() {
            mock.record(MockOp::Flush);
            return Ok(());
        }

        if self.buffer.is_empty() {
            return Ok(());
        }

        let data = std::mem::take(&mut self.buffer);
        debug!(kind = %self.kind, bytes = data.len(), "Flushing print job");
        self.transport.submit(&data).await
    }

    /// Release held handles, best-effort; safe to call multiple times
    pub async fn close(&mut self) {
        self.buffer.clear();
        self.transport.close().await;
    }

    /// Mock op-log handle, when this adapter fell back to the mock
    pub fn mock_ops(&self) -> Option<MockOps> {
        self.transport.mock_ops()
    }
}
