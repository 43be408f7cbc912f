use std::fmt::Display;

use lr_core::{Arch, OsName, Platform};

/// A Java runtime the launcher knows how to install.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JavaVersion {
    Java8,
    Java16,
    Java17,
    Java21,
}

impl JavaVersion {
    #[must_use]
    pub fn major(self) -> u32 {
        match self {
            JavaVersion::Java8 => 8,
            JavaVersion::Java16 => 16,
            JavaVersion::Java17 => 17,
            JavaVersion::Java21 => 21,
        }
    }

    /// Where to download a JDK archive of this version for `platform`.
    ///
    /// Java 8 comes from OpenLogic, newer ones are Oracle's
    /// `latest` builds. Windows gets `.zip`, everything else `.tar.gz`.
    #[must_use]
    pub fn download_url(self, platform: &Platform) -> String {
        let extension = ArchiveKind::for_os(platform.os).extension();

        if let JavaVersion::Java8 = self {
            let os = match platform.os {
                OsName::Windows => "windows",
                OsName::Osx => "mac",
                OsName::Linux => "linux",
            };
            let arch = match platform.arch {
                Arch::X64 => "x64",
                Arch::X86 => "x32",
                Arch::Arm64 => "aarch64",
            };
            return format!(
                "https://builds.openlogic.com/downloadJDK/openlogic-openjdk/8u422-b05/openlogic-openjdk-8u422-b05-{os}-{arch}.{extension}"
            );
        }

        let major = self.major();
        let os = match platform.os {
            OsName::Windows => "windows",
            OsName::Osx => "macos",
            OsName::Linux => "linux",
        };
        let arch = match platform.arch {
            Arch::X64 => "x64",
            Arch::X86 => "x86",
            Arch::Arm64 => "aarch64",
        };
        format!("https://download.oracle.com/java/{major}/latest/jdk-{major}_{os}-{arch}_bin.{extension}")
    }
}

impl Display for JavaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "java_{}", self.major())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    TarGz,
}

impl ArchiveKind {
    #[must_use]
    pub fn for_os(os: OsName) -> Self {
        match os {
            OsName::Windows => ArchiveKind::Zip,
            OsName::Osx | OsName::Linux => ArchiveKind::TarGz,
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveKind::Zip => "zip",
            ArchiveKind::TarGz => "tar.gz",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_urls() {
        let x64 = Platform {
            os: OsName::Windows,
            arch: Arch::X64,
        };
        assert_eq!(
            JavaVersion::Java21.download_url(&x64),
            "https://download.oracle.com/java/21/latest/jdk-21_windows-x64_bin.zip"
        );
        let x86 = Platform {
            os: OsName::Windows,
            arch: Arch::X86,
        };
        assert_eq!(
            JavaVersion::Java8.download_url(&x86),
            "https://builds.openlogic.com/downloadJDK/openlogic-openjdk/8u422-b05/openlogic-openjdk-8u422-b05-windows-x32.zip"
        );
    }

    #[test]
    fn unix_urls_are_tarballs() {
        let mac = Platform {
            os: OsName::Osx,
            arch: Arch::Arm64,
        };
        assert_eq!(
            JavaVersion::Java17.download_url(&mac),
            "https://download.oracle.com/java/17/latest/jdk-17_macos-aarch64_bin.tar.gz"
        );
        let linux = Platform {
            os: OsName::Linux,
            arch: Arch::X64,
        };
        assert!(JavaVersion::Java8
            .download_url(&linux)
            .ends_with("openlogic-openjdk-8u422-b05-linux-x64.tar.gz"));
    }

    #[test]
    fn display() {
        assert_eq!(JavaVersion::Java16.to_string(), "java_16");
    }
}
