use std::path::PathBuf;

use serde::Serialize;

use crate::config;
use crate::scanner;
use crate::types::Platform;

/// Output the comprehensive blogport reference document.
pub fn run(json: bool) {
    let root = PathBuf::from(".");
    let state = gather_state(&root);

    if json {
        print_json(&state);
    } else {
        print_markdown(&state);
    }
}

// ── State gathering ───────────────────────────────────────────────────

/// What `info` reports about the working directory.
struct CurrentState {
    /// `.blogport.toml` exists.
    config_found: bool,
    /// Config could not be parsed; the reason.
    config_error: Option<String>,
    /// Default platform from the config.
    default_platform: Option<Platform>,
    /// Diagram renderer command and whether it is enabled.
    diagram: (String, bool),
    /// Posts batch mode would export.
    post_count: usize,
    /// Rasterizer command and whether it is enabled.
    rasterizer: (String, bool),
}

/// Inspect config and posts under `root`.
fn gather_state(root: &std::path::Path) -> CurrentState {
    let config_found = root.join(".blogport.toml").exists();
    let (config, config_error) = match config::Config::load(root) {
        Err(e) => (config::Config::default(), Some(e.to_string())),
        Ok(c) => (c, None),
    };

    return CurrentState {
        config_found,
        config_error,
        default_platform: config.platform,
        diagram: (config.diagram.command.clone(), config.diagram.enabled),
        post_count: scanner::scan(root, &config).len(),
        rasterizer: (config.rasterizer.command.clone(), config.rasterizer.enabled),
    };
}

// ── Markdown output ───────────────────────────────────────────────────

/// Full reference document as markdown.
fn print_markdown(state: &CurrentState) {
    let version = env!("CARGO_PKG_VERSION");
    print_markdown_header(version);
    print_markdown_platforms();
    print_markdown_state(state);
    println!();
    print_markdown_exit_codes();
}

/// Static part of the reference.
fn print_markdown_header(version: &str) {
    print!(
        "\
# blogport {version}

Markdown blog posts to platform-styled HTML for clipboard publishing, plus an
SEO score for the same post.

## Commands

    blogport export <post.md> --platform <p>    Inline-styled HTML for one platform
    blogport export <post.md> --json            HTML plus markdown fallback as JSON
    blogport blocks <post.md>                   Render tree as JSON
    blogport score <post.md> --keyword <k>      SEO score, sub-scores and checklist
    blogport page <post.md> --format html       Standalone HTML page, markdown file or plain text
    blogport batch --out-dir <dir>              Export every configured post
    blogport watch <post.md> --out <file>       Re-export on every save

The title is `--title`, else the first `# ` heading (removed from the body),
else the file name.

## Configuration (.blogport.toml)

    include = [\"posts/\"]              # batch only exports these paths
    exclude = [\"posts/drafts/\"]       # and skips these
    platform = \"naver\"                # default platform
    fail_below = 60                   # `score` exits 1 below this total

    [diagram]                         # mermaid fences -> SVG
    command = \"mmdc\"
    args = [\"-i\", \"-\", \"-o\", \"-\", \"-e\", \"svg\"]
    timeout_secs = 30
    enabled = true

    [rasterizer]                      # SVG -> PNG, `{{scale}}` is substituted
    command = \"rsvg-convert\"
    args = [\"-f\", \"png\", \"-z\", \"{{scale}}\"]

Set `BLOGPORT_LOG=debug` (or pass `-v`) for detailed logs.

"
    );
}

/// Platform table.
fn print_markdown_platforms() {
    println!("## Platforms\n");
    println!("| Slug      | Platform  |");
    println!("|-----------|-----------|");
    for platform in Platform::ALL {
        println!("| {:<9} | {:<9} |", platform.slug(), platform.display_name());
    }
    println!("\n## Current State\n");
}

/// Config and post discovery summary.
fn print_markdown_state(state: &CurrentState) {
    match (&state.config_error, state.config_found) {
        (Some(reason), _) => println!("Config:     .blogport.toml (invalid: {reason})"),
        (None, true) => println!("Config:     .blogport.toml (found)"),
        (None, false) => println!("Config:     .blogport.toml (not found, using defaults)"),
    }

    let platform = state.default_platform.map_or("(none)", Platform::slug);
    println!("Platform:   {platform}");
    println!("Diagrams:   {}", collaborator_label(&state.diagram));
    println!("Rasterizer: {}", collaborator_label(&state.rasterizer));
    println!("Posts:      {}", state.post_count);
}

/// `command` or `command (disabled)`.
fn collaborator_label((command, enabled): &(String, bool)) -> String {
    if *enabled {
        return command.clone();
    }
    return format!("{command} (disabled)");
}

/// Exit code table.
fn print_markdown_exit_codes() {
    print!(
        "\
## Exit Codes

| Code | Meaning |
|------|---------|
| 0    | Success |
| 1    | SEO score below `fail_below` |
| 3    | Runtime error |
"
    );
}

// ── JSON output ───────────────────────────────────────────────────────

/// Machine-readable reference.
#[derive(Serialize)]
struct InfoJson {
    /// Current working-directory state.
    current_state: StateJson,
    /// Meaning of each exit code.
    exit_codes: Vec<ExitCodeInfo>,
    /// Supported platforms.
    platforms: Vec<PlatformInfo>,
    /// Crate version.
    version: String,
}

/// One exit code.
#[derive(Serialize)]
struct ExitCodeInfo {
    /// Process exit code.
    code: u8,
    /// What it means.
    meaning: String,
}

/// One platform.
#[derive(Serialize)]
struct PlatformInfo {
    /// Human-readable name.
    name: String,
    /// Value accepted by `--platform`.
    slug: String,
}

/// Working-directory state.
#[derive(Serialize)]
struct StateJson {
    /// Config file exists.
    config_found: bool,
    /// Config parse error, if any.
    config_error: Option<String>,
    /// Default platform slug.
    default_platform: Option<String>,
    /// Diagram renderer command, `None` when disabled.
    diagram_command: Option<String>,
    /// Posts batch mode would export.
    post_count: usize,
    /// Rasterizer command, `None` when disabled.
    rasterizer_command: Option<String>,
}

/// Print the reference as pretty JSON.
fn print_json(state: &CurrentState) {
    let enabled_command = |(command, enabled): &(String, bool)| return enabled.then(|| return command.clone());
    let info = InfoJson {
        current_state: StateJson {
            config_found: state.config_found,
            config_error: state.config_error.clone(),
            default_platform: state.default_platform.map(|p| return p.slug().to_string()),
            diagram_command: enabled_command(&state.diagram),
            post_count: state.post_count,
            rasterizer_command: enabled_command(&state.rasterizer),
        },
        exit_codes: vec![
            ExitCodeInfo { code: 0, meaning: "Success".to_string() },
            ExitCodeInfo { code: 1, meaning: "SEO score below fail_below".to_string() },
            ExitCodeInfo { code: 3, meaning: "Runtime error".to_string() },
        ],
        platforms: Platform::ALL
            .iter()
            .map(|p| return PlatformInfo { name: p.display_name().to_string(), slug: p.slug().to_string() })
            .collect(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    // serde_json::to_string_pretty won't fail on this structure.
    let json = serde_json::to_string_pretty(&info).unwrap_or_default();
    println!("{json}");
}
