//! Access kind definitions
//!

use serde::Deserialize;

/// Access type of a parameter, as declared by its `access` attribute
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// Read-only
    ReadOnly,
    /// Read-write
    ReadWrite,
    /// May be written once, and is read-only afterwards
    WriteOnceReadOnly,
    /// No access declared, or an object entry with no parameters
    #[default]
    Any,
}

impl AccessKind {
    /// All access kinds, in display order
    pub const ALL: [AccessKind; 4] = [
        AccessKind::ReadOnly,
        AccessKind::ReadWrite,
        AccessKind::WriteOnceReadOnly,
        AccessKind::Any,
    ];

    /// Map an `access` attribute value to an access kind
    ///
    /// Matching is case-sensitive against the values used in data-model files. Returns `None` for
    /// anything unrecognized.
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "readOnly" => Some(AccessKind::ReadOnly),
            "readWrite" => Some(AccessKind::ReadWrite),
            "writeOnceReadOnly" => Some(AccessKind::WriteOnceReadOnly),
            _ => None,
        }
    }

    /// The attribute spelling of this access kind, or `"any"` for [`AccessKind::Any`]
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessKind::ReadOnly => "readOnly",
            AccessKind::ReadWrite => "readWrite",
            AccessKind::WriteOnceReadOnly => "writeOnceReadOnly",
            AccessKind::Any => "any",
        }
    }

    /// Returns true if a parameter with this access kind can never be written
    pub fn is_read_only(&self) -> bool {
        matches!(self, AccessKind::ReadOnly)
    }
}

impl core::fmt::Display for AccessKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Constraint on access kind applied while filtering
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum AccessFilter {
    /// Keep every entry
    #[default]
    #[serde(rename = "any")]
    Any,
    /// Keep only [`AccessKind::ReadOnly`] entries
    #[serde(rename = "read-only")]
    ReadOnlyOnly,
    /// Keep every entry except [`AccessKind::ReadOnly`] ones
    #[serde(rename = "read-write")]
    ReadWriteOnly,
}

impl AccessFilter {
    /// Returns true if an entry with the given access kind passes this filter
    pub fn admits(&self, access: AccessKind) -> bool {
        match self {
            AccessFilter::Any => true,
            AccessFilter::ReadOnlyOnly => access.is_read_only(),
            AccessFilter::ReadWriteOnly => !access.is_read_only(),
        }
    }
}

impl core::fmt::Display for AccessFilter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            AccessFilter::Any => "any",
            AccessFilter::ReadOnlyOnly => "read-only",
            AccessFilter::ReadWriteOnly => "read-write",
        };
        f.pad(s)
    }
}
