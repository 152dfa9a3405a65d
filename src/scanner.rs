//! Tag scanning on top of a platform NFC capability
//!
//! [`TagScanner`] is `Idle` until [`TagScanner::read_tag`] starts a scan and
//! `Scanning` until the scan is stopped or its [`TagScan`] handle is dropped.
//! Only one scan runs per scanner. Writing does not touch the scan state.

pub mod cancel;
pub mod event;
pub mod platform;

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;
use rollcall_nfc::NdefMessage;
use tap::TapFallible as _;
use tracing::{debug, error, info, warn};

use cancel::CancellationToken;
use event::TagReadEvent;
use platform::{NfcPlatform, PlatformReading};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NfcError {
    #[error("NFC is not supported on this device")]
    Unsupported,

    #[error("Already scanning for NFC tags")]
    AlreadyScanning,

    #[error("Failed to read NFC tag")]
    ReadFailed,

    #[error("tag does not hold a valid NDEF message: {0}")]
    InvalidMessage(String),

    #[error("Failed to write NFC tag: {0}")]
    WriteFailed(String),

    #[error("NFC error: {0}")]
    Platform(String),
}

type Error = NfcError;
type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Default)]
enum ScanState {
    #[default]
    Idle,
    Scanning {
        scan_id: u64,
        cancel: CancellationToken,
    },
}

#[derive(Debug)]
pub struct TagScanner {
    platform: Arc<dyn NfcPlatform>,
    state: Arc<Mutex<ScanState>>,
    next_scan_id: AtomicU64,
}

impl TagScanner {
    pub fn new(platform: Arc<dyn NfcPlatform>) -> Self {
        Self {
            platform,
            state: Arc::new(Mutex::new(ScanState::Idle)),
            next_scan_id: AtomicU64::new(0),
        }
    }

    pub fn check_support(&self) -> Result<()> {
        if !self.platform.is_supported() {
            return Err(Error::Unsupported);
        }

        Ok(())
    }

    pub fn is_scanning(&self) -> bool {
        matches!(*self.state.lock(), ScanState::Scanning { .. })
    }

    /// Start scanning, readings are pulled from the returned [`TagScan`]
    ///
    /// Fails without touching the running scan if one is already active.
    pub async fn read_tag(&self) -> Result<TagScan> {
        self.check_support().tap_err(|error| error!("NFC error: {error}"))?;

        let (scan_id, cancel) = {
            let mut state = self.state.lock();
            if let ScanState::Scanning { .. } = &*state {
                warn!("NFC scan requested while another scan is running");
                return Err(Error::AlreadyScanning);
            }

            let scan_id = self.next_scan_id.fetch_add(1, Ordering::Relaxed);
            let cancel = CancellationToken::new();
            *state = ScanState::Scanning { scan_id, cancel: cancel.clone() };

            (scan_id, cancel)
        };

        // undone on error and when this future is dropped mid-setup
        let mut setup = ScanSetup { state: &self.state, scan_id, cancel: &cancel, armed: true };

        let readings = self.platform.scan(cancel.clone()).await.map_err(|error| {
            error!("NFC error: {error}");
            Error::Platform(error.to_string())
        })?;

        setup.armed = false;
        drop(setup);

        info!("NFC scan started");
        Ok(TagScan { scan_id, readings, cancel, state: self.state.clone() })
    }

    /// Encode `data` as a single text record and write it to the next tag
    pub async fn write_tag(&self, data: &str) -> Result<()> {
        self.write(data).await.tap_err(|error| error!("NFC write error: {error}"))
    }

    async fn write(&self, data: &str) -> Result<()> {
        self.check_support()?;

        let message = rollcall_nfc::encode_message(&NdefMessage::text(data))
            .map_err(|error| Error::InvalidMessage(error.to_string()))?;

        self.platform
            .write(message)
            .await
            .map_err(|error| Error::WriteFailed(error.to_string()))?;

        info!("NFC tag written successfully");
        Ok(())
    }

    /// Return to `Idle` and cancel the running scan, if any
    ///
    /// The platform receives the cancellation through the token it was handed
    /// in [`NfcPlatform::scan`], the [`TagScan`] yields nothing afterwards.
    pub fn stop_scan(&self) {
        let previous = std::mem::take(&mut *self.state.lock());

        if let ScanState::Scanning { cancel, .. } = previous {
            cancel.cancel();
            info!("NFC scan stopped");
        }
    }

    /// Best-effort probe, the platform negotiates real permission when a scan starts
    pub fn request_permission(&self) -> bool {
        match self.check_support() {
            Ok(()) => true,
            Err(error) => {
                warn!("NFC permission error: {error}");
                false
            }
        }
    }
}

/// Handle to an active scan
///
/// Dropping the handle cancels the scan and returns the scanner to `Idle`,
/// unless a newer scan has already replaced it.
#[derive(Debug)]
pub struct TagScan {
    scan_id: u64,
    readings: flume::Receiver<PlatformReading>,
    cancel: CancellationToken,
    state: Arc<Mutex<ScanState>>,
}

impl TagScan {
    /// Next reading, `None` once the scan is cancelled or the platform stops
    pub async fn next(&mut self) -> Option<Result<TagReadEvent>> {
        if self.cancel.is_cancelled() {
            return None;
        }

        let reading = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            reading = self.readings.recv_async() => reading.ok(),
        };

        let event = match reading? {
            PlatformReading::Tag { serial_number, message } => {
                debug!("NFC tag detected: {serial_number}");
                TagReadEvent::from_reading(serial_number, &message)
                    .tap_err(|error| error!("NFC error: {error}"))
            }

            PlatformReading::Error => {
                error!("NFC read error");
                Err(Error::ReadFailed)
            }
        };

        Some(event)
    }

    /// The next reading that decoded cleanly, read errors are skipped
    pub async fn next_tag(&mut self) -> Option<TagReadEvent> {
        while let Some(reading) = self.next().await {
            if let Ok(event) = reading {
                return Some(event);
            }
        }

        None
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
        reset_if_current(&self.state, self.scan_id);
    }
}

impl Drop for TagScan {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A scan that has claimed the state but has no [`TagScan`] yet
struct ScanSetup<'a> {
    state: &'a Mutex<ScanState>,
    scan_id: u64,
    cancel: &'a CancellationToken,
    armed: bool,
}

impl Drop for ScanSetup<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.cancel.cancel();
            reset_if_current(self.state, self.scan_id);
        }
    }
}

fn reset_if_current(state: &Mutex<ScanState>, scan_id: u64) {
    let mut state = state.lock();

    if matches!(&*state, ScanState::Scanning { scan_id: current, .. } if *current == scan_id) {
        *state = ScanState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::types::TagId, test_support::FakePlatform};
    use futures::FutureExt as _;
    use pretty_assertions::assert_eq;

    fn text_message(text: &str) -> Vec<u8> {
        rollcall_nfc::encode_message(&NdefMessage::text(text)).unwrap()
    }

    fn scanner_with(platform: &Arc<FakePlatform>) -> TagScanner {
        TagScanner::new(platform.clone())
    }

    #[tokio::test]
    async fn reading_delivers_serial_and_text() {
        let platform = Arc::new(FakePlatform::new());
        let scanner = scanner_with(&platform);

        let mut scan = scanner.read_tag().await.unwrap();
        assert!(scanner.is_scanning());

        platform.tap("04:a2:5b:1f", text_message("21CS042"));
        let event = scan.next().await.unwrap().unwrap();

        assert_eq!(event.tag_id, TagId::from("04:a2:5b:1f"));
        assert_eq!(event.data.as_deref(), Some("21CS042"));
        assert_eq!(event.raw_message.records().len(), 1);
    }

    #[tokio::test]
    async fn blank_tag_has_no_data() {
        let platform = Arc::new(FakePlatform::new());
        let scanner = scanner_with(&platform);
        let mut scan = scanner.read_tag().await.unwrap();

        platform.tap("04:00", vec![]);
        let event = scan.next().await.unwrap().unwrap();

        assert_eq!(event.data, None);
        assert!(event.raw_message.is_empty());
    }

    #[tokio::test]
    async fn second_read_while_scanning_fails_and_keeps_first_scan() {
        let platform = Arc::new(FakePlatform::new());
        let scanner = scanner_with(&platform);
        let mut first = scanner.read_tag().await.unwrap();

        let error = scanner.read_tag().await.unwrap_err();
        assert_eq!(error, NfcError::AlreadyScanning);
        assert_eq!(error.to_string(), "Already scanning for NFC tags");
        assert!(scanner.is_scanning());
        assert_eq!(*platform.scans_started.lock(), 1);

        platform.tap("04:a2", text_message("still here"));
        let event = first.next().await.unwrap().unwrap();
        assert_eq!(event.data.as_deref(), Some("still here"));
    }

    #[tokio::test]
    async fn read_errors_and_bad_messages_are_reported() {
        let platform = Arc::new(FakePlatform::new());
        let scanner = scanner_with(&platform);
        let mut scan = scanner.read_tag().await.unwrap();

        platform.read_error();
        assert_eq!(scan.next().await, Some(Err(NfcError::ReadFailed)));

        platform.tap("04:a2", vec![0xD1, 0x01, 0x08, b'T']);
        assert!(matches!(scan.next().await, Some(Err(NfcError::InvalidMessage(_)))));

        // the scan keeps going after an error
        platform.tap("04:a3", text_message("ok"));
        assert!(matches!(scan.next().await, Some(Ok(_))));
    }

    #[tokio::test]
    async fn next_tag_skips_failed_readings() {
        let platform = Arc::new(FakePlatform::new());
        let scanner = scanner_with(&platform);
        let mut scan = scanner.read_tag().await.unwrap();

        platform.read_error();
        platform.tap("04:b7", text_message("x"));

        let event = scan.next_tag().await.unwrap();
        assert_eq!(event.tag_id, TagId::from("04:b7"));
    }

    #[tokio::test]
    async fn stop_scan_cancels_and_returns_to_idle() {
        let platform = Arc::new(FakePlatform::new());
        let scanner = scanner_with(&platform);
        let mut scan = scanner.read_tag().await.unwrap();

        scanner.stop_scan();
        assert!(!scanner.is_scanning());
        assert!(platform.last_cancel.lock().as_ref().unwrap().is_cancelled());

        platform.tap("04:a2", text_message("late"));
        assert_eq!(scan.next().await, None);

        // a new scan can start, dropping the stale handle leaves it alone
        let _second = scanner.read_tag().await.unwrap();
        drop(scan);
        assert!(scanner.is_scanning());
    }

    #[tokio::test]
    async fn stop_scan_wakes_a_pending_reader() {
        let platform = Arc::new(FakePlatform::new());
        let scanner = Arc::new(scanner_with(&platform));
        let mut scan = scanner.read_tag().await.unwrap();

        let stopper = scanner.clone();
        let handle = tokio::spawn(async move {
            tokio::task::yield_now().await;
            stopper.stop_scan();
        });

        assert_eq!(scan.next().await, None);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn dropping_the_scan_returns_to_idle() {
        let platform = Arc::new(FakePlatform::new());
        let scanner = scanner_with(&platform);

        let scan = scanner.read_tag().await.unwrap();
        let token = scan.cancellation_token();
        drop(scan);

        assert!(!scanner.is_scanning());
        assert!(token.is_cancelled());
        assert!(scanner.read_tag().await.is_ok());
    }

    #[tokio::test]
    async fn failed_setup_returns_to_idle() {
        let platform = Arc::new(FakePlatform::failing_scan());
        let scanner = scanner_with(&platform);

        let error = scanner.read_tag().await.unwrap_err();
        assert!(matches!(error, NfcError::Platform(_)));
        assert!(!scanner.is_scanning());
    }

    #[tokio::test]
    async fn abandoned_setup_returns_to_idle() {
        let platform = Arc::new(FakePlatform::stalled());
        let scanner = scanner_with(&platform);

        assert!(scanner.read_tag().now_or_never().is_none());

        assert!(!scanner.is_scanning());
        assert!(platform.last_cancel.lock().as_ref().unwrap().is_cancelled());
        assert!(scanner.read_tag().now_or_never().is_none());
        assert_eq!(*platform.scans_started.lock(), 2);
    }

    #[tokio::test]
    async fn unsupported_platform_fails_fast() {
        let platform = Arc::new(FakePlatform::unsupported());
        let scanner = scanner_with(&platform);

        assert_eq!(scanner.check_support(), Err(NfcError::Unsupported));
        assert_eq!(scanner.read_tag().await.unwrap_err(), NfcError::Unsupported);
        assert_eq!(scanner.write_tag("x").await, Err(NfcError::Unsupported));
        assert!(!scanner.request_permission());
        assert!(!scanner.is_scanning());
    }

    #[tokio::test]
    async fn write_tag_sends_one_text_record() {
        let platform = Arc::new(FakePlatform::new());
        let scanner = scanner_with(&platform);

        scanner.write_tag("21CS042").await.unwrap();

        let written = platform.written.lock().clone();
        assert_eq!(written.len(), 1);

        let message = rollcall_nfc::parse_message(&written[0]).unwrap();
        assert_eq!(message.records().len(), 1);
        assert_eq!(message.first_text(), Some("21CS042"));
    }

    #[tokio::test]
    async fn write_does_not_depend_on_scan_state() {
        let platform = Arc::new(FakePlatform::new());
        let scanner = scanner_with(&platform);
        let _scan = scanner.read_tag().await.unwrap();

        scanner.write_tag("during scan").await.unwrap();
        assert!(scanner.is_scanning());
    }

    #[tokio::test]
    async fn write_failure_is_returned() {
        let platform = Arc::new(FakePlatform::failing_write());
        let scanner = scanner_with(&platform);

        let error = scanner.write_tag("x").await.unwrap_err();
        assert!(matches!(error, NfcError::WriteFailed(_)));
        assert!(scanner.request_permission());
    }
}
