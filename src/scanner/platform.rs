//! The NFC radio seam, implemented by the host (Web NFC, Android, a USB reader)

use std::fmt::Debug;

use async_trait::async_trait;

use super::cancel::CancellationToken;

/// One event from an active platform scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformReading {
    /// A tag came into range, `message` holds its raw NDEF message bytes
    Tag { serial_number: String, message: Vec<u8> },

    /// The platform saw a tag but could not read it
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct PlatformError {
    pub message: String,
}

impl PlatformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[async_trait]
pub trait NfcPlatform: Send + Sync + Debug + 'static {
    /// Whether the device exposes an NFC scanning primitive at all
    fn is_supported(&self) -> bool;

    /// Start scanning, readings are delivered until `cancel` fires or the
    /// platform drops the sender
    ///
    /// Permission, if the platform has such a thing, is negotiated here
    async fn scan(
        &self,
        cancel: CancellationToken,
    ) -> Result<flume::Receiver<PlatformReading>, PlatformError>;

    /// Write a raw NDEF message to the next tag in range
    async fn write(&self, message: Vec<u8>) -> Result<(), PlatformError>;
}
