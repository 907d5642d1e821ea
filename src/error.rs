use std::{fmt, time::Duration};

use thiserror::Error;

use crate::navigator::Stage;

/// The remote lookups a dispatch can perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupKind {
    Regions,
    Instances,
    Tags,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LookupKind::Regions => "regions",
            LookupKind::Instances => "instances",
            LookupKind::Tags => "tags",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    /// No profiles could be discovered; the run ends before any stage.
    #[error("no AWS profiles available: {0}")]
    Configuration(String),
    #[error("failed loading {kind}: {reason}")]
    Lookup { kind: LookupKind, reason: String },
    #[error("timeout loading {kind} after {}s", .after.as_secs_f32())]
    Timeout { kind: LookupKind, after: Duration },
    #[error("no {} found", .stage.noun())]
    EmptySelection { stage: Stage },
}

impl SelectorError {
    pub fn lookup(kind: LookupKind, err: &anyhow::Error) -> Self {
        SelectorError::Lookup {
            kind,
            reason: format!("{err:#}"),
        }
    }
}
