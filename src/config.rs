use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::types::Platform;

/// Default seconds an external collaborator command may run.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Project configuration loaded from `.blogport.toml`.
/// Include/exclude patterns are path prefixes applied to markdown source files.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Diagram renderer command.
    #[serde(default = "CommandConfig::diagram_default")]
    pub diagram: CommandConfig,
    /// Path prefixes that are never exported in batch mode.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Exit with code 1 from `score` when the total is below this.
    #[serde(default)]
    pub fail_below: u32,
    /// Path prefixes exported in batch mode; empty means everything.
    #[serde(default)]
    pub include: Vec<String>,
    /// Platform used when the command line does not name one.
    #[serde(default)]
    pub platform: Option<Platform>,
    /// SVG-to-PNG rasterizer command.
    #[serde(default = "CommandConfig::rasterizer_default")]
    pub rasterizer: CommandConfig,
}

/// An external collaborator program. `{scale}` in `args` is substituted at call time.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
    /// Arguments passed to the program.
    #[serde(default)]
    pub args: Vec<String>,
    /// Program name or path.
    pub command: String,
    /// When false the collaborator is never invoked.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Seconds before the program is killed.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl CommandConfig {
    /// Mermaid CLI reading the diagram on stdin and writing SVG to stdout.
    fn diagram_default() -> Self {
        return Self {
            args: ["-i", "-", "-o", "-", "-e", "svg"].map(String::from).to_vec(),
            command: "mmdc".to_string(),
            enabled: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        };
    }

    /// librsvg converter reading SVG on stdin and writing PNG to stdout.
    fn rasterizer_default() -> Self {
        return Self {
            args: ["-f", "png", "-z", "{scale}"].map(String::from).to_vec(),
            command: "rsvg-convert".to_string(),
            enabled: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        };
    }
}

impl Default for Config {
    /// Config that exports everything and uses the stock collaborator commands.
    fn default() -> Self {
        return Self {
            diagram: CommandConfig::diagram_default(),
            exclude: Vec::new(),
            fail_below: 0,
            include: Vec::new(),
            platform: None,
            rasterizer: CommandConfig::rasterizer_default(),
        };
    }
}

impl Config {
    /// Load config from `.blogport.toml` in the given root directory.
    /// Returns the default if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; never silently
    /// falls back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".blogport.toml");
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };

        tracing::debug!(path = %path.display(), "loaded config");
        return Self::parse(&content);
    }

    /// Parse config from TOML content.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, Error> {
        return Ok(toml::from_str(content)?);
    }

    /// Check whether a markdown file path should be exported in batch mode.
    ///
    /// A path is included if no include patterns are set (export everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_export(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}

/// Serde default for `enabled`.
const fn enabled_by_default() -> bool {
    return true;
}

/// Serde default for `timeout_secs`.
const fn default_timeout_secs() -> u64 {
    return DEFAULT_TIMEOUT_SECS;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_stock_commands() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.diagram.command, "mmdc");
        assert_eq!(config.rasterizer.command, "rsvg-convert");
        assert!(config.platform.is_none());
    }

    #[test]
    fn parses_platform_and_collaborators() {
        let config = Config::parse(
            "platform = \"medium\"\nfail_below = 60\n\n[diagram]\ncommand = \"render-diagram\"\nenabled = false\n",
        )
        .unwrap();
        assert_eq!(config.platform, Some(Platform::Medium));
        assert_eq!(config.fail_below, 60);
        assert_eq!(config.diagram.command, "render-diagram");
        assert!(!config.diagram.enabled);
        assert!(config.diagram.args.is_empty());
        assert_eq!(config.diagram.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(Config::parse("platfrom = \"naver\""), Err(Error::TomlDe(_))));
    }

    #[test]
    fn include_then_exclude_prefixes() {
        let config = Config::parse("include = [\"posts/\"]\nexclude = [\"posts/drafts/\"]").unwrap();
        assert!(config.should_export("posts/hello.md"));
        assert!(!config.should_export("posts/drafts/wip.md"));
        assert!(!config.should_export("notes/todo.md"));
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.include.is_empty());
        assert!(config.should_export("anything.md"));
    }
}
