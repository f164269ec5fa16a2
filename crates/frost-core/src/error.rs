//! Three-level error taxonomy shared by every pipeline stage.
//!
//! `Internal` marks an interpreter invariant violated by our own code, never
//! by user input. `Unrecoverable` marks a user program that cannot run at
//! all (parse failure, closure construction failure, malformed pattern).
//! `Recoverable` marks a dynamic fault during evaluation that aborts the
//! current top-level statement but lets the driver continue with the next.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    Internal,
    Unrecoverable,
    #[default]
    Recoverable,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Internal => write!(f, "internal"),
            Severity::Unrecoverable => write!(f, "unrecoverable"),
            Severity::Recoverable => write!(f, "recoverable"),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct FrostError {
    pub severity: Severity,
    pub message: String,
}

impl FrostError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self { severity: Severity::Internal, message: message.into() }
    }

    pub fn unrecoverable(message: impl Into<String>) -> Self {
        Self { severity: Severity::Unrecoverable, message: message.into() }
    }

    pub fn recoverable(message: impl Into<String>) -> Self {
        Self { severity: Severity::Recoverable, message: message.into() }
    }

    pub fn is_recoverable(&self) -> bool {
        self.severity == Severity::Recoverable
    }
}

/// An unreachable branch was hit. Never triggered by user input.
#[macro_export]
macro_rules! unreachable_internal {
    ($($arg:tt)*) => {
        $crate::error::FrostError::internal(format!(
            "unreachable: {} ({}:{})",
            format!($($arg)*),
            file!(),
            line!()
        ))
    };
}

pub type Result<T> = std::result::Result<T, FrostError>;
