//! Server-side transpiler directive.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value, json};

use crate::error::{OqtopusError, OqtopusResult};

/// How the service should transpile submitted programs.
///
/// Omitting the directive (`None` at the call site) lets the service apply
/// its default transpiler.
#[derive(Debug, Clone, PartialEq)]
pub enum TranspilerInfo {
    /// Run the programs exactly as submitted.
    Disabled,
    /// Run a named transpiler with options.
    Named {
        /// Transpiler library, e.g. `"qiskit"`.
        lib: String,
        /// Options passed to the transpiler.
        options: Map<String, Value>,
    },
}

impl TranspilerInfo {
    /// Disable server-side transpilation.
    pub fn disabled() -> Self {
        TranspilerInfo::Disabled
    }

    /// Use a named transpiler with no options.
    pub fn named(lib: impl Into<String>) -> Self {
        TranspilerInfo::Named {
            lib: lib.into(),
            options: Map::new(),
        }
    }

    /// Add a transpiler option. No effect on [`TranspilerInfo::Disabled`].
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let TranspilerInfo::Named { options, .. } = &mut self {
            options.insert(key.into(), value.into());
        }
        self
    }

    /// Check the directive before submission.
    pub fn validate(&self) -> OqtopusResult<()> {
        match self {
            TranspilerInfo::Named { lib, .. } if lib.trim().is_empty() => Err(
                OqtopusError::InvalidParameter("transpiler_lib must not be empty".into()),
            ),
            _ => Ok(()),
        }
    }

    /// Wire form of an optional directive.
    pub fn to_wire(info: Option<&TranspilerInfo>) -> Value {
        match info {
            None => json!({}),
            Some(TranspilerInfo::Disabled) => json!({ "transpiler_lib": null }),
            Some(TranspilerInfo::Named { lib, options }) => json!({
                "transpiler_lib": lib,
                "transpiler_options": options,
            }),
        }
    }
}

impl FromStr for TranspilerInfo {
    type Err = OqtopusError;

    /// `none` and `pass` disable transpilation; anything else names a library.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let info = match s.to_ascii_lowercase().as_str() {
            "none" | "pass" => TranspilerInfo::Disabled,
            _ => TranspilerInfo::named(s),
        };
        info.validate()?;
        Ok(info)
    }
}

impl fmt::Display for TranspilerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranspilerInfo::Disabled => write!(f, "none"),
            TranspilerInfo::Named { lib, .. } => write!(f, "{lib}"),
        }
    }
}
