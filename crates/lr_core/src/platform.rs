use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsName {
    Windows,
    Osx,
    Linux,
}

impl OsName {
    /// The name used by version metadata rules and native classifiers.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OsName::Windows => "windows",
            OsName::Osx => "osx",
            OsName::Linux => "linux",
        }
    }

    /// File extensions of native shared libraries on this OS.
    #[must_use]
    pub fn shared_library_extensions(self) -> &'static [&'static str] {
        match self {
            OsName::Windows => &["dll"],
            OsName::Osx => &["dylib", "jnilib"],
            OsName::Linux => &["so"],
        }
    }

    #[must_use]
    pub fn classpath_separator(self) -> char {
        match self {
            OsName::Windows => ';',
            OsName::Osx | OsName::Linux => ':',
        }
    }
}

impl Display for OsName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X64,
    X86,
    Arm64,
}

impl Arch {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::X86 => "x86",
            Arch::Arm64 => "arm64",
        }
    }

    /// Pointer width, substituted for `${arch}` in native classifiers.
    #[must_use]
    pub fn bits(self) -> &'static str {
        match self {
            Arch::X64 | Arch::Arm64 => "64",
            Arch::X86 => "32",
        }
    }
}

impl Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The operating system and CPU architecture the launcher runs on.
///
/// Detected once at startup and carried in
/// [`crate::LauncherConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    pub os: OsName,
    pub arch: Arch,
}

impl Platform {
    /// Detects the platform this binary was built for.
    ///
    /// # Errors
    /// If the OS isn't Windows, macOS or Linux,
    /// or the CPU isn't x86, x86_64 or aarch64.
    pub fn current() -> Result<Self, PlatformError> {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Builds a platform from OS and architecture names, accepting both
    /// Rust's (`macos`, `x86_64`) and the metadata spelling (`osx`, `x64`).
    ///
    /// # Errors
    /// See [`Platform::current`].
    pub fn from_parts(os: &str, arch: &str) -> Result<Self, PlatformError> {
        let os = match os {
            "windows" => OsName::Windows,
            "macos" | "osx" => OsName::Osx,
            "linux" => OsName::Linux,
            _ => return Err(PlatformError::UnsupportedOs(os.to_owned())),
        };
        let arch = match arch {
            "x86_64" | "x64" => Arch::X64,
            "x86" => Arch::X86,
            "aarch64" | "arm64" => Arch::Arm64,
            _ => return Err(PlatformError::UnsupportedArch(arch.to_owned())),
        };
        Ok(Self { os, arch })
    }

    /// The default native classifier, eg. `natives-linux`.
    #[must_use]
    pub fn natives_classifier(&self) -> String {
        format!("natives-{}", self.os)
    }

    #[must_use]
    pub fn classpath_separator(&self) -> char {
        self.os.classpath_separator()
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("invalid platform: unsupported operating system {0:?}")]
    UnsupportedOs(String),
    #[error("invalid platform: unsupported architecture {0:?}")]
    UnsupportedArch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rust_and_metadata_names() {
        let p = Platform::from_parts("macos", "aarch64").unwrap();
        assert_eq!(p.os, OsName::Osx);
        assert_eq!(p.arch, Arch::Arm64);
        assert_eq!(p, Platform::from_parts("osx", "arm64").unwrap());
        assert_eq!(p.to_string(), "osx-arm64");
    }

    #[test]
    fn rejects_unknown_platforms() {
        assert!(matches!(
            Platform::from_parts("freebsd", "x86_64"),
            Err(PlatformError::UnsupportedOs(_))
        ));
        assert!(matches!(
            Platform::from_parts("linux", "riscv64"),
            Err(PlatformError::UnsupportedArch(_))
        ));
    }

    #[test]
    fn separators_and_extensions() {
        let windows = Platform::from_parts("windows", "x86").unwrap();
        assert_eq!(windows.classpath_separator(), ';');
        assert_eq!(windows.natives_classifier(), "natives-windows");
        assert_eq!(windows.arch.bits(), "32");
        assert_eq!(OsName::Linux.classpath_separator(), ':');
        assert_eq!(OsName::Osx.shared_library_extensions(), ["dylib", "jnilib"]);
    }
}
