//! Minecraft version ids and the ordering used to pick
//! Java runtimes and asset layouts.
//!
//! Two dialects exist:
//! - releases: `1.20.4`, `1.20.5-pre1`, `1.18-rc3`
//! - snapshots: `24w13a`
//!
//! April-fools versions are mapped to the snapshot they were built on
//! before parsing. Comparing a release with a snapshot is meaningless
//! and always answers `false`.

use std::{fmt::Display, sync::LazyLock};

use regex::Regex;

static SNAPSHOT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)w(\d+)([a-z]?)").unwrap());

const JOKE_VERSIONS: &[(&str, &str)] = &[
    ("1.rv-pre1", "16w13a"),
    ("15w14a", "15w14a"),
    ("20w14infinite", "20w13c"),
    ("22w13oneblockatatime", "22w13b"),
    ("23w13a_or_b", "23w13b"),
    ("3d shareware v1.34", "19w13c"),
    ("24w14potato", "24w13b"),
];

/// Lower-cases `id` and maps known joke versions to a real snapshot id.
#[must_use]
pub fn normalize_version(id: &str) -> String {
    let id = id.trim().to_lowercase();
    JOKE_VERSIONS
        .iter()
        .find(|(joke, _)| *joke == id)
        .map_or(id, |(_, real)| (*real).to_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReleaseStage {
    Pre(u32),
    Rc(u32),
    Release,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionKind {
    Release {
        minor: u32,
        patch: u32,
        stage: ReleaseStage,
    },
    Snapshot {
        year: u32,
        week: u32,
        letter: Option<char>,
    },
}

/// A parsed version id. Keeps the id it was parsed from for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameVersion {
    id: String,
    kind: VersionKind,
}

impl GameVersion {
    /// Parses a version id. Never fails: anything that isn't a snapshot
    /// is read as a release, with unreadable numbers counting as `0`.
    #[must_use]
    pub fn parse(id: &str) -> Self {
        let normalized = normalize_version(id);

        let kind = if let Some(captures) = SNAPSHOT_REGEX.captures(&normalized) {
            VersionKind::Snapshot {
                year: captures[1].parse().unwrap_or(0),
                week: captures[2].parse().unwrap_or(0),
                letter: captures.get(3).and_then(|m| m.as_str().chars().next()),
            }
        } else {
            parse_release(&normalized)
        };

        Self {
            id: id.to_owned(),
            kind,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> &VersionKind {
        &self.kind
    }

    #[must_use]
    pub fn is_snapshot(&self) -> bool {
        matches!(self.kind, VersionKind::Snapshot { .. })
    }

    /// Whether `self >= other`.
    ///
    /// A bare release is newer than its release candidates, which are
    /// newer than its pre-releases. Mixed dialects give `false`.
    #[must_use]
    pub fn is_at_least(&self, other: &GameVersion) -> bool {
        match (&self.kind, &other.kind) {
            (
                VersionKind::Snapshot { year, week, letter },
                VersionKind::Snapshot {
                    year: o_year,
                    week: o_week,
                    letter: o_letter,
                },
            ) => (year, week, letter) >= (o_year, o_week, o_letter),
            (
                VersionKind::Release {
                    minor,
                    patch,
                    stage,
                },
                VersionKind::Release {
                    minor: o_minor,
                    patch: o_patch,
                    stage: o_stage,
                },
            ) => (minor, patch, stage) >= (o_minor, o_patch, o_stage),
            _ => false,
        }
    }

    /// Versions up to `1.7.2` (or snapshot `13w48b`) store assets
    /// by their logical path instead of by hash.
    #[must_use]
    pub fn uses_legacy_assets(&self) -> bool {
        let last_legacy = if self.is_snapshot() {
            GameVersion::parse("13w48b")
        } else {
            GameVersion::parse("1.7.2")
        };
        last_legacy.is_at_least(self)
    }
}

impl Display for GameVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

fn parse_release(id: &str) -> VersionKind {
    let (base, stage) = split_stage(id);

    // The major component is always `1`.
    let mut parts = base.split('.').skip(1);
    let mut next_number = || {
        parts
            .next()
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(0)
    };
    let minor = next_number();
    let patch = next_number();

    VersionKind::Release {
        minor,
        patch,
        stage,
    }
}

fn split_stage(id: &str) -> (&str, ReleaseStage) {
    if let Some((base, n)) = id.split_once("-pre") {
        if let Ok(n) = n.parse() {
            return (base, ReleaseStage::Pre(n));
        }
    }
    if let Some((base, n)) = id.split_once("-rc") {
        if let Ok(n) = n.parse() {
            return (base, ReleaseStage::Rc(n));
        }
    }
    (id, ReleaseStage::Release)
}

/// Whether version `a` is greater than or equal to version `b`.
#[must_use]
pub fn is_version_greater_or_equal(a: &str, b: &str) -> bool {
    GameVersion::parse(a).is_at_least(&GameVersion::parse(b))
}
