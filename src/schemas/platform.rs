// Defines the canonical platform identifier used to pick the release artifact.
// Only the closed set of operating systems and architectures the chrysalis
// release pipeline publishes for can be represented here.

use std::fmt;

/// Operating systems chrysalis ships prebuilt artifacts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Darwin,
    Windows,
}

impl Os {
    /// The segment used in artifact names and `os/arch` displays.
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
            Os::Windows => "windows",
        }
    }

    /// `true` for the platforms that publish `.tar.gz` archives.
    pub fn is_unix(&self) -> bool {
        !matches!(self, Os::Windows)
    }
}

/// CPU architectures chrysalis ships prebuilt artifacts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    Amd64,
    Arm64,
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }
}

/// The normalized `(os, arch)` pair for the host.
///
/// Computed once per run by the platform detector and never mutated
/// afterwards. Every supported pair has exactly one value; unsupported pairs
/// have no representation at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformIdentifier {
    os: Os,
    arch: Arch,
}

impl PlatformIdentifier {
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    pub fn os(&self) -> Os {
        self.os
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }
}

impl fmt::Display for PlatformIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os.as_str(), self.arch.as_str())
    }
}
