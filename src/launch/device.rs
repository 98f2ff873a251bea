//! Accelerator device selection.

use crate::utils::config::DEVICE_ENV_VAR;
use std::fmt;

/// A single accelerator index advertised to the child process
///
/// The launcher never checks that the device exists; the index is passed
/// through the environment and the tool's runtime decides what to do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSelector(u32);

impl DeviceSelector {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Environment pair to inject into the child
    pub fn env_pair(&self) -> (String, String) {
        (DEVICE_ENV_VAR.to_string(), self.0.to_string())
    }
}

impl From<u32> for DeviceSelector {
    fn from(index: u32) -> Self {
        Self::new(index)
    }
}

impl fmt::Display for DeviceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", DEVICE_ENV_VAR, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_pair() {
        let device = DeviceSelector::new(6);
        assert_eq!(
            device.env_pair(),
            ("CUDA_VISIBLE_DEVICES".to_string(), "6".to_string())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(DeviceSelector::from(0).to_string(), "CUDA_VISIBLE_DEVICES=0");
    }
}
