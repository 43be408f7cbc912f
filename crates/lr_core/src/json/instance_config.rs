use serde::{Deserialize, Serialize};

/// Java flags applied to new instances.
pub const DEFAULT_JAVA_ARGS: &str = "-XX:+UnlockExperimentalVMOptions -XX:+UseG1GC -XX:G1NewSizePercent=20 -XX:G1ReservePercent=20 -XX:MaxGCPauseMillis=50 -XX:G1HeapRegionSize=32M";

/// Launch settings of one instance.
///
/// Stored inside the instance's entry in `instances.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InstanceConfigJson {
    /// Window width in pixels.
    pub width: u32,
    /// Window height in pixels.
    pub height: u32,
    /// Maximum heap size, in the JVM's `-Xmx` syntax (`2G`, `4096M`).
    pub max_memory: String,
    /// Extra whitespace-separated arguments for Java.
    pub java_args: String,
}

impl Default for InstanceConfigJson {
    fn default() -> Self {
        Self {
            width: 854,
            height: 480,
            max_memory: "2G".to_owned(),
            java_args: DEFAULT_JAVA_ARGS.to_owned(),
        }
    }
}

impl InstanceConfigJson {
    /// Returns a String containing the Java argument to
    /// allocate the configured amount of RAM.
    #[must_use]
    pub fn get_ram_argument(&self) -> String {
        format!("-Xmx{}", self.max_memory)
    }

    /// `java_args`, split on whitespace.
    pub fn java_args_split(&self) -> impl Iterator<Item = &str> {
        self.java_args.split_whitespace()
    }

    #[must_use]
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Applies a `WIDTHxHEIGHT` resolution string.
    /// Returns `false`, changing nothing, if it can't be parsed.
    pub fn set_resolution(&mut self, resolution: &str) -> bool {
        match parse_resolution(resolution) {
            Some((width, height)) => {
                self.width = width;
                self.height = height;
                true
            }
            None => false,
        }
    }
}

/// Parses `WIDTHxHEIGHT` (eg. `1920x1080`).
#[must_use]
pub fn parse_resolution(resolution: &str) -> Option<(u32, u32)> {
    let (width, height) = resolution.trim().split_once(['x', 'X'])?;
    let width = width.trim().parse().ok().filter(|w| *w > 0)?;
    let height = height.trim().parse().ok().filter(|h| *h > 0)?;
    Some((width, height))
}

/// Checks a `-Xmx` style size like `2G`, `512M` or `1048576`.
#[must_use]
pub fn is_valid_memory(memory: &str) -> bool {
    let digits = memory.trim_end_matches(['k', 'K', 'm', 'M', 'g', 'G']);
    let suffix_len = memory.len() - digits.len();
    suffix_len <= 1 && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = InstanceConfigJson::default();
        assert_eq!(config.resolution(), "854x480");
        assert_eq!(config.get_ram_argument(), "-Xmx2G");
        assert_eq!(config.java_args_split().count(), 6);
        assert_eq!(
            config.java_args_split().next(),
            Some("-XX:+UnlockExperimentalVMOptions")
        );
    }

    #[test]
    fn resolutions() {
        assert_eq!(parse_resolution("1920x1080"), Some((1920, 1080)));
        assert_eq!(parse_resolution(" 800X600 "), Some((800, 600)));
        assert_eq!(parse_resolution("1920"), None);
        assert_eq!(parse_resolution("0x600"), None);
        assert_eq!(parse_resolution("axb"), None);

        let mut config = InstanceConfigJson::default();
        assert!(!config.set_resolution("wide"));
        assert_eq!(config.resolution(), "854x480");
        assert!(config.set_resolution("1280x720"));
        assert_eq!((config.width, config.height), (1280, 720));
    }

    #[test]
    fn memory_sizes() {
        assert!(is_valid_memory("2G"));
        assert!(is_valid_memory("4096m"));
        assert!(is_valid_memory("1048576"));
        assert!(!is_valid_memory("G"));
        assert!(!is_valid_memory("2GG"));
        assert!(!is_valid_memory("two"));
        assert!(!is_valid_memory(""));
    }

    #[test]
    fn empty_java_args_add_nothing() {
        let config = InstanceConfigJson {
            java_args: "   ".to_owned(),
            ..Default::default()
        };
        assert_eq!(config.java_args_split().count(), 0);
    }
}
