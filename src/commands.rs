//! Core CLI commands for blogport: export, blocks, score, page, batch.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::blocks::parse_blocks;
use crate::config::Config;
use crate::diagnosis;
use crate::diagram::{self, data_uri};
use crate::error;
use crate::export::{Collaborators, ExportOptions, render_clipboard, render_html};
use crate::inline::plain_text;
use crate::page;
use crate::scanner;
use crate::seo::SeoReport;
use crate::types::{BlockNode, Platform};

/// Platform used when neither the command line nor the config names one.
const DEFAULT_PLATFORM: Platform = Platform::Naver;

/// Output format of the `page` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PageFormat {
    /// Standalone HTML document.
    Html,
    /// Markdown with the title as a `#` heading.
    Markdown,
    /// Plain text: the title, a blank line, then one line per block.
    Text,
}

/// A markdown post with its title resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Markdown body; a heading used as the title is removed.
    pub body: String,
    /// Post title.
    pub title: String,
}

/// Options for one `export` invocation.
pub struct ExportRequest<'a> {
    /// Markdown post.
    pub file: &'a Path,
    /// Header image URL, data URI or local image path.
    pub header_image: Option<&'a str>,
    /// Emit the clipboard payload as JSON instead of bare HTML.
    pub json: bool,
    /// Write here instead of stdout.
    pub out: Option<&'a Path>,
    /// Target platform, falling back to the config.
    pub platform: Option<Platform>,
    /// Explicit title.
    pub title: Option<&'a str>,
}

/// Options for one `score` invocation.
pub struct ScoreRequest<'a> {
    /// Markdown post.
    pub file: &'a Path,
    /// Emit the report as JSON.
    pub json: bool,
    /// Target keyword; empty means none.
    pub keyword: &'a str,
    /// File holding deep-analysis suggestions.
    pub suggestions: Option<&'a Path>,
    /// Explicit title.
    pub title: Option<&'a str>,
}

/// Export every post the config selects into `out_dir`, one
/// `<stem>.<platform>.html` file per post. A failing post is reported and
/// the batch continues.
///
/// # Errors
///
/// Returns `Error::Io` if the output directory cannot be created.
pub async fn batch(root: &Path, platform: Option<Platform>, out_dir: &Path, config: &Config) -> Result<ExitCode, error::Error> {
    let platform = resolve_platform(platform, config);
    std::fs::create_dir_all(out_dir)?;

    let posts = scanner::scan(root, config);
    let mut failed = 0_u32;
    for relative in &posts {
        let source = root.join(relative);
        let out = out_dir.join(batch_output_name(relative, platform));
        match export_to_file(&source, platform, &out, config).await {
            Err(e) => {
                failed = failed.saturating_add(1);
                eprintln!("FAILED  {} ({e})", relative.display());
            },
            Ok(()) => eprintln!("wrote   {}", out.display()),
        }
    }

    let total = posts.len();
    eprintln!("Exported {} of {total} posts for {}", total.saturating_sub(usize::try_from(failed).unwrap_or(usize::MAX)), platform.display_name());
    if failed > 0 {
        return Ok(ExitCode::from(3));
    }
    return Ok(ExitCode::SUCCESS);
}

/// Output file name for a post in batch mode. Nested posts keep their
/// directories flattened into the name so two `index.md` files never collide.
fn batch_output_name(relative: &Path, platform: Platform) -> String {
    let stem = relative.with_extension("").to_string_lossy().replace(['/', '\\'], "__");
    return format!("{stem}.{}.html", platform.slug());
}

/// Print the render tree of a post as JSON.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the post is missing or `Error::Json` if
/// serialization fails.
pub fn blocks(file: &Path) -> Result<(), error::Error> {
    let markdown = read_markdown(file)?;
    let tree = parse_blocks(&markdown);
    println!("{}", serde_json::to_string_pretty(&tree)?);
    return Ok(());
}

/// Render a post for a platform and print or write it.
///
/// # Errors
///
/// Returns errors from reading the post or header image, serialization, or
/// writing the output.
pub async fn export(request: &ExportRequest<'_>, config: &Config) -> Result<(), error::Error> {
    let post = read_post(request.file, request.title)?;
    let platform = resolve_platform(request.platform, config);
    let options = ExportOptions {
        header_image_url: request.header_image.map(header_image_source).transpose()?,
        include_header_image: request.header_image.is_some(),
    };

    let diagrams = diagram::diagram_renderer(&config.diagram);
    let rasterizer = diagram::rasterizer(&config.rasterizer);
    let collaborators = Collaborators { diagrams: diagrams.as_ref(), rasterizer: rasterizer.as_ref() };

    let output = if request.json {
        let payload = render_clipboard(&post.body, &post.title, platform, &options, &collaborators).await;
        serde_json::to_string_pretty(&payload)?
    } else {
        render_html(&post.body, &post.title, platform, &options, &collaborators).await
    };

    return write_output(request.out, &output);
}

/// Render one post to an HTML file. Used by `batch` and `watch`.
///
/// # Errors
///
/// Returns errors from reading the post or writing the output.
pub async fn export_to_file(file: &Path, platform: Platform, out: &Path, config: &Config) -> Result<(), error::Error> {
    let post = read_post(file, None)?;
    let diagrams = diagram::diagram_renderer(&config.diagram);
    let rasterizer = diagram::rasterizer(&config.rasterizer);
    let collaborators = Collaborators { diagrams: diagrams.as_ref(), rasterizer: rasterizer.as_ref() };

    let html = render_html(&post.body, &post.title, platform, &ExportOptions::default(), &collaborators).await;
    if let Some(parent) = out.parent().filter(|p| return !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(out, html)?;
    return Ok(());
}

/// Turn the `--header-image` value into something an `<img src>` accepts.
/// URLs and data URIs pass through; anything else is read as a local image.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if a local image path does not exist.
fn header_image_source(value: &str) -> Result<String, error::Error> {
    if value.starts_with("http://") || value.starts_with("https://") || value.starts_with("data:") {
        return Ok(value.to_string());
    }
    let path = PathBuf::from(value);
    let bytes = std::fs::read(&path).map_err(|_err| return error::Error::FileNotFound { path: path.clone() })?;
    return Ok(data_uri(image_mime(&path), &bytes));
}

/// MIME type for an image file by extension.
fn image_mime(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| return e.to_str()).unwrap_or_default().to_ascii_lowercase();
    return match ext.as_str() {
        "gif" => "image/gif",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "image/png",
    };
}

/// Output a comprehensive reference document for blogport.
pub fn info(json: bool) {
    return crate::info::run(json);
}

/// Write a standalone HTML page, a Markdown file or plain text for a post.
///
/// # Errors
///
/// Returns errors from reading the post or writing the output.
pub fn page(file: &Path, title: Option<&str>, format: PageFormat, out: Option<&Path>) -> Result<(), error::Error> {
    let post = read_post(file, title)?;
    let output = match format {
        PageFormat::Html => page::standalone_page(&post.title, &parse_blocks(&post.body)),
        PageFormat::Markdown => page::markdown_document(&post.title, &post.body),
        PageFormat::Text => format!("{}\n\n{}\n", post.title, page::plain_text(&parse_blocks(&post.body))),
    };
    return write_output(out, &output);
}

/// Read a markdown file.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if it does not exist, or `Error::Io`.
fn read_markdown(file: &Path) -> Result<String, error::Error> {
    return match std::fs::read_to_string(file) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(error::Error::FileNotFound { path: file.to_path_buf() }),
        Err(e) => Err(error::Error::Io(e)),
        Ok(markdown) => Ok(markdown),
    };
}

/// Read a post and resolve its title.
///
/// # Errors
///
/// Returns errors from [`read_markdown`].
fn read_post(file: &Path, title: Option<&str>) -> Result<Post, error::Error> {
    let markdown = read_markdown(file)?;
    let stem = file.file_stem().map(|s| return s.to_string_lossy().into_owned()).unwrap_or_default();
    return Ok(resolve_title(&markdown, title, &stem));
}

/// Command line first, then config, then the built-in default.
pub fn resolve_platform(platform: Option<Platform>, config: &Config) -> Platform {
    return platform.or(config.platform).unwrap_or(DEFAULT_PLATFORM);
}

/// Pick the title: an explicit one, else the first `# ` heading (which is
/// removed from the body along with the blank lines after it), else the
/// file stem.
pub fn resolve_title(markdown: &str, explicit: Option<&str>, stem: &str) -> Post {
    if let Some(title) = explicit {
        return Post { body: markdown.to_string(), title: title.to_string() };
    }

    let heading = parse_blocks(markdown).into_iter().find_map(|block| {
        if let BlockNode::Heading { inline, level: 1 } = block.node {
            return Some((block.lines.start, plain_text(&inline)));
        }
        return None;
    });

    let Some((line_idx, title)) = heading else {
        return Post { body: markdown.to_string(), title: stem.to_string() };
    };

    let lines: Vec<&str> = markdown.split('\n').collect();
    let before = lines.get(..line_idx).unwrap_or_default().join("\n");
    let after: Vec<&str> = lines
        .iter()
        .skip(line_idx.saturating_add(1))
        .skip_while(|l| return l.trim().is_empty())
        .copied()
        .collect();
    let after = after.join("\n");

    let body = if before.is_empty() { after } else { format!("{before}\n{after}") };
    return Post { body, title: title.trim().to_string() };
}

/// Score a post. Exits 1 when the total is below the config's `fail_below`.
///
/// # Errors
///
/// Returns errors from reading the post or the suggestions file.
pub fn score(request: &ScoreRequest<'_>, config: &Config) -> Result<ExitCode, error::Error> {
    let post = read_post(request.file, request.title)?;
    let suggestion_count = match request.suggestions {
        None => 0,
        Some(path) => diagnosis::load_diagnoses(path)?.len(),
    };

    let report = SeoReport::build(&post.body, &post.title, request.keyword, suggestion_count);
    tracing::info!(total = report.scores.total, suggestions = suggestion_count, "scored post");

    if request.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", score_markdown(&post.title, &report));
    }

    if report.scores.total < config.fail_below {
        eprintln!("score {} is below fail_below = {}", report.scores.total, config.fail_below);
        return Ok(ExitCode::from(1));
    }
    return Ok(ExitCode::SUCCESS);
}

/// Markdown rendering of an SEO report.
fn score_markdown(title: &str, report: &SeoReport) -> String {
    let scores = &report.scores;
    let metrics = &report.metrics;
    let mut out = format!(
        "\
# SEO Score: {}/100 ({})

Title: {title}

| Slice     | Score |
|-----------|-------|
| Length    | {} |
| Structure | {} |
| Keyword   | {} |
| Quality   | {} |

## Metrics

- words: {}
- characters (no whitespace): {}
- H2 sections: {}
- links: {}
- images: {}
- keyword occurrences: {} ({:.2}% density)

## Checklist

",
        scores.total,
        report.grade.label(),
        scores.length,
        scores.structure,
        scores.keyword,
        scores.quality,
        metrics.word_count,
        metrics.char_count,
        metrics.h2_count,
        metrics.link_count,
        metrics.image_count,
        metrics.keyword_count,
        metrics.keyword_density,
    );
    for item in &report.checklist {
        let mark = if item.passed { "x" } else { " " };
        let _ = writeln!(out, "- [{mark}] {}: {}", item.label, item.message);
    }
    return out;
}

/// Print to stdout, or write to `out` when given.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be written.
fn write_output(out: Option<&Path>, content: &str) -> Result<(), error::Error> {
    match out {
        None => println!("{content}"),
        Some(path) => {
            std::fs::write(path, content)?;
            eprintln!("Wrote {}", path.display());
        },
    }
    return Ok(());
}
