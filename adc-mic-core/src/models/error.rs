use std::fmt;

use thiserror::Error;

/// Device lifecycle step that failed during acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitStage {
    DataInterface,
    Device,
    Open,
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DataInterface => "data interface",
            Self::Device => "device",
            Self::Open => "open",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by a capture call.
///
/// A failed read inside the acquisition loop is not an error: it ends the
/// loop early and the caller receives whatever was already snapshotted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{}", resource_init_message(.stage, .status))]
    ResourceInit {
        stage: InitStage,
        status: Option<i32>,
    },

    #[error("out of memory: cannot allocate {requested} bytes")]
    OutOfMemory { requested: usize },

    #[error("storage error: {0}")]
    StorageError(String),
}

impl CaptureError {
    pub fn is_resource_init(&self) -> bool {
        matches!(self, Self::ResourceInit { .. })
    }

    /// Driver status code carried by a failed open, if any.
    pub fn driver_status(&self) -> Option<i32> {
        match self {
            Self::ResourceInit { status, .. } => *status,
            _ => None,
        }
    }
}

fn resource_init_message(stage: &InitStage, status: &Option<i32>) -> String {
    match (*stage, *status) {
        (InitStage::DataInterface, _) => "cannot create data interface".into(),
        (InitStage::Device, _) => "cannot create device".into(),
        (InitStage::Open, Some(code)) => format!("device open failed: {}", code),
        (InitStage::Open, None) => "device open failed".into(),
    }
}
