//! Printer transports
//!
//! A closed set of connection variants behind one operation surface:
//! open on connect, submit a finished job as one write, close. The
//! buffering that turns many logical operations into one submit lives
//! in [`crate::adapter::PrinterAdapter`]; transports only move bytes.
//!
//! Variants:
//! - Network: raw TCP (port 9100), connection opened per job
//! - Serial/File: raw writes to a held device/file handle
//! - OsManaged: one RAW spooler document per job (Win32 on Windows,
//!   `lp -o raw` on CUPS systems)
//! - Mock: no physical I/O, observable via log output and an op record

use crate::adapter::Format;
use crate::config::{ConnectionConfig, TransportKind};
use crate::error::{PrintError, PrintResult};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

/// One recorded operation on a mock printer
#[derive(Debug, Clone, PartialEq)]
pub enum MockOp {
    Text(String),
    Raw(Vec<u8>),
    Cut,
    Format(Format),
    Flush,
}

/// Shareable mock op log - clone it out of a session to assert on
/// operation order after the job completed.
pub type MockOps = Arc<Mutex<Vec<MockOp>>>;

/// Mock printer - used when no physical transport is available
///
/// Every operation produces console/log output so the rest of the
/// system stays operable and testable without hardware.
#[derive(Debug, Clone)]
pub struct MockTransport {
    label: String,
    ops: MockOps,
}

impl MockTransport {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ops: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the recorded operations
    pub fn ops(&self) -> MockOps {
        Arc::clone(&self.ops)
    }

    pub fn record(&self, op: MockOp) {
        match &op {
            MockOp::Text(s) => info!(printer = %self.label, "[PRINT] {}", s),
            MockOp::Raw(bytes) => info!(printer = %self.label, len = bytes.len(), "[PRINT] raw bytes"),
            MockOp::Cut => info!(printer = %self.label, "[PRINT] Paper cut"),
            MockOp::Format(f) => debug!(printer = %self.label, format = ?f, "[PRINT] format"),
            MockOp::Flush => debug!(printer = %self.label, "[PRINT] flush"),
        }
        self.ops.lock().expect("mock op log poisoned").push(op);
    }
}

/// Network printer transport (raw TCP)
///
/// The connection is opened per job, inside [`Transport::submit`], the
/// same way short-lived 9100 printing normally works.
#[derive(Debug)]
pub struct NetworkTransport {
    host: String,
    port: u16,
    timeout: Duration,
}

impl NetworkTransport {
    fn new(host: &str, port: u16) -> PrintResult<Self> {
        if host.trim().is_empty() {
            return Err(PrintError::InvalidConfig("network host is empty".into()));
        }
        Ok(Self {
            host: host.to_string(),
            port,
            timeout: Duration::from_secs(5),
        })
    }

    async fn submit(&self, data: &[u8]) -> PrintResult<()> {
        let addr = format!("{}:{}", self.host, self.port);

        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", addr, e)))?;

        stream.write_all(data).await?;
        stream.flush().await?;

        info!(addr = %addr, bytes = data.len(), "Print job sent");
        Ok(())
    }
}

/// Serial or file transport - a held handle written to raw
///
/// Serial ports are opened as device paths (`COM3`, `/dev/ttyUSB0`);
/// line settings stay as the OS configured them. File mode additionally
/// creates the target and appends, which covers LPT-style raw ports and
/// plain file output for testing.
#[derive(Debug)]
pub struct RawFileTransport {
    path: PathBuf,
    file: Option<tokio::fs::File>,
}

impl RawFileTransport {
    async fn open(path: PathBuf, create: bool) -> PrintResult<Self> {
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .append(true)
            .create(create)
            .open(&path)
            .await
            .map_err(|e| PrintError::Connection(format!("{}: {}", path.display(), e)))?;

        Ok(Self {
            path,
            file: Some(file),
        })
    }

    async fn submit(&mut self, data: &[u8]) -> PrintResult<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| PrintError::Connection(format!("{}: closed", self.path.display())))?;

        file.write_all(data).await?;
        file.flush().await?;

        info!(path = %self.path.display(), bytes = data.len(), "Print job written");
        Ok(())
    }

    async fn close(&mut self) {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush().await;
        }
    }
}

/// OS-managed printer transport - addressed by spooler name
///
/// Each submit is exactly one RAW document. Submitting line-by-line
/// would fan a single receipt out into many spooler jobs, which is why
/// this variant must sit behind the adapter's buffer.
#[derive(Debug)]
pub struct OsTransport {
    printer_name: String,
}

impl OsTransport {
    fn new(printer_name: &str) -> PrintResult<Self> {
        if printer_name.trim().is_empty() {
            return Err(PrintError::InvalidConfig("printer name is empty".into()));
        }
        Ok(Self {
            printer_name: printer_name.to_string(),
        })
    }

    #[cfg(windows)]
    async fn submit(&self, data: &[u8]) -> PrintResult<()> {
        // Win32 printing is synchronous, run in a blocking task
        let name = self.printer_name.clone();
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || write_raw_document(&name, &data))
            .await
            .map_err(|e| PrintError::OsPrinter(format!("Task join failed: {}", e)))?
    }

    #[cfg(not(windows))]
    async fn submit(&self, data: &[u8]) -> PrintResult<()> {
        use std::process::Stdio;

        let mut child = tokio::process::Command::new("lp")
            .args(["-d", &self.printer_name, "-o", "raw", "-s"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PrintError::OsPrinter(format!("spawn lp: {}", e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| PrintError::OsPrinter("lp stdin unavailable".into()))?;
        stdin.write_all(data).await?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| PrintError::OsPrinter(format!("lp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PrintError::OsPrinter(format!(
                "lp -d {} failed: {}",
                self.printer_name,
                stderr.trim()
            )));
        }

        info!(printer = %self.printer_name, bytes = data.len(), "Print job spooled");
        Ok(())
    }
}

/// Write one RAW document to a named Windows printer
#[cfg(windows)]
fn write_raw_document(name: &str, data: &[u8]) -> PrintResult<()> {
    use core::ffi::c_void;
    use windows::Win32::Graphics::Printing::{
        ClosePrinter, DOC_INFO_1W, EndDocPrinter, EndPagePrinter, OpenPrinterW, PRINTER_HANDLE,
        StartDocPrinterW, StartPagePrinter, WritePrinter,
    };
    use windows::core::{PCWSTR, PWSTR};

    fn to_wide(s: &str) -> Vec<u16> {
        s.encode_utf16().chain(std::iter::once(0)).collect()
    }

    unsafe {
        let mut handle: PRINTER_HANDLE = PRINTER_HANDLE::default();
        let name_w = to_wide(name);

        OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None)
            .map_err(|_| PrintError::OsPrinter("OpenPrinterW failed".to_string()))?;

        let doc_name_w = to_wide("Print Bridge Job");
        let datatype_w = to_wide("RAW");
        let doc_info = DOC_INFO_1W {
            pDocName: PWSTR(doc_name_w.as_ptr() as *mut _),
            pOutputFile: PWSTR::null(),
            pDatatype: PWSTR(datatype_w.as_ptr() as *mut _),
        };

        if StartDocPrinterW(handle, 1, &doc_info as *const DOC_INFO_1W) == 0 {
            let _ = ClosePrinter(handle);
            return Err(PrintError::OsPrinter("StartDocPrinter failed".to_string()));
        }

        if !StartPagePrinter(handle).as_bool() {
            let _ = EndDocPrinter(handle);
            let _ = ClosePrinter(handle);
            return Err(PrintError::OsPrinter("StartPagePrinter failed".to_string()));
        }

        let mut written: u32 = 0;
        let ok = WritePrinter(
            handle,
            data.as_ptr() as *const c_void,
            data.len() as u32,
            &mut written,
        );

        let _ = EndPagePrinter(handle);
        let _ = EndDocPrinter(handle);
        let _ = ClosePrinter(handle);

        if !ok.as_bool() {
            return Err(PrintError::OsPrinter("WritePrinter failed".to_string()));
        }

        if written != data.len() as u32 {
            return Err(PrintError::OsPrinter("Incomplete write".to_string()));
        }

        Ok(())
    }
}

/// The closed transport variant set
#[derive(Debug)]
pub enum Transport {
    Network(NetworkTransport),
    Serial(RawFileTransport),
    File(RawFileTransport),
    OsManaged(OsTransport),
    Mock(MockTransport),
}

impl Transport {
    /// Open a transport for a validated config
    ///
    /// `mock_mode` forces the mock fallback for every kind, keeping the
    /// system operable without the physical transport stack. USB always
    /// degrades to mock: no USB transport library is bundled.
    pub async fn connect(
        kind: TransportKind,
        config: &ConnectionConfig,
        mock_mode: bool,
    ) -> PrintResult<Self> {
        if mock_mode {
            return Ok(Transport::Mock(MockTransport::new(format!(
                "mock-{}",
                kind
            ))));
        }

        match (kind, config) {
            (TransportKind::Usb, ConnectionConfig::Usb(usb)) => {
                warn!(
                    vendor_id = format!("{:#06x}", usb.vendor_id),
                    product_id = format!("{:#06x}", usb.product_id),
                    "No USB transport library available, using mock printer"
                );
                Ok(Transport::Mock(MockTransport::new(format!(
                    "usb-{:04x}:{:04x}",
                    usb.vendor_id, usb.product_id
                ))))
            }
            (TransportKind::Serial, ConnectionConfig::Serial(serial)) => {
                let t = RawFileTransport::open(PathBuf::from(&serial.port), false).await?;
                debug!(port = %serial.port, baud_rate = serial.baud_rate, "Serial port opened");
                Ok(Transport::Serial(t))
            }
            (TransportKind::Network, ConnectionConfig::Network(net)) => Ok(Transport::Network(
                NetworkTransport::new(&net.host, net.port)?,
            )),
            (TransportKind::File, ConnectionConfig::File(file)) => Ok(Transport::File(
                RawFileTransport::open(file.file.clone(), true).await?,
            )),
            (TransportKind::OsManaged, ConnectionConfig::Os(os)) => {
                Ok(Transport::OsManaged(OsTransport::new(&os.printer_name)?))
            }
            (kind, _) => Err(PrintError::InvalidConfig(format!(
                "config does not match printer type {}",
                kind
            ))),
        }
    }

    /// Commit one finished job
    pub async fn submit(&mut self, data: &[u8]) -> PrintResult<()> {
        match self {
            Transport::Network(t) => t.submit(data).await,
            Transport::Serial(t) | Transport::File(t) => t.submit(data).await,
            Transport::OsManaged(t) => t.submit(data).await,
            Transport::Mock(_) => Ok(()),
        }
    }

    /// Release held handles, best-effort
    pub async fn close(&mut self) {
        match self {
            Transport::Serial(t) | Transport::File(t) => t.close().await,
            // Network opens per job, OS spooler handles close per
            // document, mock holds nothing
            Transport::Network(_) | Transport::OsManaged(_) | Transport::Mock(_) => {}
        }
    }

    /// Mock op-log handle, when this is the fallback variant
    pub fn mock_ops(&self) -> Option<MockOps> {
        match self {
            Transport::Mock(m) => Some(m.ops()),
            _ => None,
        }
    }

    pub fn as_mock(&self) -> Option<&MockTransport> {
        match self {
            Transport::Mock(m) => Some(m),
            _ => None,
        }
    }
}
