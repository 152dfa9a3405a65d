pub mod api;
pub mod config;
pub mod format;
pub mod logging;
pub mod scanner;
pub mod tap_flow;
pub mod validation;
pub mod view;

#[cfg(test)]
mod test_support;

pub use rollcall_nfc as nfc;
