//! `#extension` bookkeeping.

use std::fmt;

/// Extensions the compiler knows how to support.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Extension {
    OesStandardDerivatives,
}

impl Extension {
    pub const ALL: &'static [Extension] = &[Extension::OesStandardDerivatives];

    pub const fn name(self) -> &'static str {
        match self {
            Extension::OesStandardDerivatives => "GL_OES_standard_derivatives",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|ext| ext.name() == name)
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Behavior requested by an `#extension` directive.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExtensionBehavior {
    Require,
    Enable,
    Warn,
    Disable,
}

impl ExtensionBehavior {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "require" => Some(ExtensionBehavior::Require),
            "enable" => Some(ExtensionBehavior::Enable),
            "warn" => Some(ExtensionBehavior::Warn),
            "disable" => Some(ExtensionBehavior::Disable),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ExtensionBehavior::Require => "require",
            ExtensionBehavior::Enable => "enable",
            ExtensionBehavior::Warn => "warn",
            ExtensionBehavior::Disable => "disable",
        }
    }

    /// Whether the extension's features become available.
    pub fn enables(self) -> bool {
        !matches!(self, ExtensionBehavior::Disable)
    }
}

/// Final behavior of every extension the source mentioned, in first-mention
/// order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    entries: Vec<(Extension, ExtensionBehavior)>,
}

impl ExtensionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, extension: Extension, behavior: ExtensionBehavior) {
        match self.entries.iter_mut().find(|(ext, _)| *ext == extension) {
            Some(entry) => entry.1 = behavior,
            None => self.entries.push((extension, behavior)),
        }
    }

    pub fn behavior(&self, extension: Extension) -> Option<ExtensionBehavior> {
        self.entries
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|&(_, behavior)| behavior)
    }

    pub fn is_enabled(&self, extension: Extension) -> bool {
        self.behavior(extension).is_some_and(ExtensionBehavior::enables)
    }

    /// Extensions left enabled, for re-emitting `#extension` lines.
    pub fn enabled(&self) -> impl Iterator<Item = (Extension, ExtensionBehavior)> + '_ {
        self.entries
            .iter()
            .copied()
            .filter(|(_, behavior)| behavior.enables())
    }
}
