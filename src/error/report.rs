//! Problem report errors

use super::ScmError;

/// Creates an archive failure for the report file
pub fn archive_failed(path: impl Into<String>, reason: impl Into<String>) -> ScmError {
    ScmError::ArchiveFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a gathering failure for one data unit or gatherer
pub fn gather_failed(source_id: impl Into<String>, message: impl Into<String>) -> ScmError {
    ScmError::GatherFailed {
        source_id: source_id.into(),
        message: message.into(),
    }
}
