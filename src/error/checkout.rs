//! Checkout, scan and import errors

use super::ScmError;

/// Creates a checkout failure for one location
pub fn checkout_failed(location: impl Into<String>, reason: impl Into<String>) -> ScmError {
    ScmError::CheckoutFailed {
        location: location.into(),
        reason: reason.into(),
    }
}

/// Creates a scan failure for a root or manifest path
pub fn scan_failed(path: impl Into<String>, reason: impl Into<String>) -> ScmError {
    ScmError::ScanFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a model read failure for a manifest
pub fn model_read_failed(path: impl Into<String>, reason: impl Into<String>) -> ScmError {
    ScmError::ModelReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an import failure
pub fn import_failed(message: impl Into<String>) -> ScmError {
    ScmError::ImportFailed {
        message: message.into(),
    }
}

/// Creates a cleanup failure for a location
pub fn cleanup_failed(path: impl Into<String>, reason: impl Into<String>) -> ScmError {
    ScmError::CleanupFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
