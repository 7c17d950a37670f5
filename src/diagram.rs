//! External collaborators for diagram fences: a diagram renderer producing
//! SVG and a rasterizer turning SVG into PNG for clipboard-friendly embedding.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tokio::io::AsyncWriteExt as _;

use crate::config::CommandConfig;
use crate::error::Error;

/// Placeholder in rasterizer arguments replaced with the pixel density.
const SCALE_PLACEHOLDER: &str = "{scale}";

/// Renders SVG by piping the diagram source through an external program.
pub struct CommandDiagramRenderer {
    /// Program, arguments and timeout.
    config: CommandConfig,
}

/// Rasterizes SVG by piping it through an external program.
pub struct CommandRasterizer {
    /// Program, arguments and timeout.
    config: CommandConfig,
}

/// Renderer used when diagrams are turned off; every call fails.
pub struct DisabledDiagramRenderer;

/// Rasterizer used when rasterizing is turned off; callers fall back to SVG.
pub struct DisabledRasterizer;

/// Turns diagram source into an SVG document.
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    /// Render one diagram.
    ///
    /// # Errors
    ///
    /// Returns an error when the diagram cannot be rendered for any reason.
    async fn render(&self, source: &str) -> Result<String, Error>;
}

/// Turns an SVG document into PNG bytes at a pixel density multiplier.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Rasterize one SVG.
    ///
    /// # Errors
    ///
    /// Returns an error when the SVG cannot be decoded or drawn.
    async fn rasterize(&self, svg: &str, scale: u32) -> Result<Vec<u8>, Error>;
}

impl CommandDiagramRenderer {
    /// Wrap a configured command.
    pub const fn new(config: CommandConfig) -> Self {
        return Self { config };
    }
}

impl CommandRasterizer {
    /// Wrap a configured command.
    pub const fn new(config: CommandConfig) -> Self {
        return Self { config };
    }
}

#[async_trait]
impl DiagramRenderer for CommandDiagramRenderer {
    async fn render(&self, source: &str) -> Result<String, Error> {
        let stdout = run_piped(&self.config, &self.config.args, source.as_bytes()).await?;
        let svg = String::from_utf8(stdout).map_err(|_err| {
            return Error::CommandFailed {
                command: self.config.command.clone(),
                reason: "output is not UTF-8".to_string(),
            };
        })?;
        if !svg.contains("<svg") {
            return Err(Error::CommandFailed {
                command: self.config.command.clone(),
                reason: "output is not an SVG document".to_string(),
            });
        }
        return Ok(svg);
    }
}

#[async_trait]
impl Rasterizer for CommandRasterizer {
    async fn rasterize(&self, svg: &str, scale: u32) -> Result<Vec<u8>, Error> {
        let scale_arg = scale.to_string();
        let args: Vec<String> = self
            .config
            .args
            .iter()
            .map(|a| return a.replace(SCALE_PLACEHOLDER, &scale_arg))
            .collect();
        let png = run_piped(&self.config, &args, svg.as_bytes()).await?;
        if png.is_empty() {
            return Err(Error::CommandFailed {
                command: self.config.command.clone(),
                reason: "empty output".to_string(),
            });
        }
        return Ok(png);
    }
}

#[async_trait]
impl DiagramRenderer for DisabledDiagramRenderer {
    async fn render(&self, _source: &str) -> Result<String, Error> {
        return Err(Error::DiagramUnavailable);
    }
}

#[async_trait]
impl Rasterizer for DisabledRasterizer {
    async fn rasterize(&self, _svg: &str, _scale: u32) -> Result<Vec<u8>, Error> {
        return Err(Error::RasterizerUnavailable);
    }
}

/// Encode bytes as a base64 `data:` URI.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    return format!("data:{mime};base64,{}", STANDARD.encode(bytes));
}

/// Build the configured diagram renderer.
pub fn diagram_renderer(config: &CommandConfig) -> Box<dyn DiagramRenderer> {
    if !config.enabled {
        return Box::new(DisabledDiagramRenderer);
    }
    return Box::new(CommandDiagramRenderer::new(config.clone()));
}

/// Build the configured rasterizer.
pub fn rasterizer(config: &CommandConfig) -> Box<dyn Rasterizer> {
    if !config.enabled {
        return Box::new(DisabledRasterizer);
    }
    return Box::new(CommandRasterizer::new(config.clone()));
}

/// Spawn `config.command` with `args`, write `input` to its stdin and collect
/// stdout. The child is killed if the timeout elapses or the future is dropped.
///
/// # Errors
///
/// Returns `Error::CommandFailed` if the program cannot be spawned or exits
/// unsuccessfully, or `Error::CommandTimedOut` if it runs too long.
async fn run_piped(config: &CommandConfig, args: &[String], input: &[u8]) -> Result<Vec<u8>, Error> {
    let command = config.command.clone();
    tracing::debug!(command = %command, args = ?args, input_bytes = input.len(), "spawning collaborator");

    let mut child = tokio::process::Command::new(&config.command)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| return Error::CommandFailed { command: command.clone(), reason: e.to_string() })?;

    let Some(mut stdin) = child.stdin.take() else {
        return Err(Error::CommandFailed { command, reason: "stdin unavailable".to_string() });
    };

    let write_input = async move {
        let written = stdin.write_all(input).await;
        drop(stdin);
        return written;
    };
    let run = async { return tokio::join!(write_input, child.wait_with_output()) };

    let timeout = Duration::from_secs(config.timeout_secs);
    let (written, output) = tokio::time::timeout(timeout, run).await.map_err(|_elapsed| {
        return Error::CommandTimedOut { command: command.clone(), timeout_secs: config.timeout_secs };
    })?;

    if let Err(e) = written {
        // The program may exit before reading everything; its status decides.
        tracing::debug!(command = %command, error = %e, "stdin write failed");
    }

    let output = output.map_err(|e| return Error::CommandFailed { command: command.clone(), reason: e.to_string() })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::CommandFailed {
            command,
            reason: format!("{}: {}", output.status, stderr.trim()),
        });
    }

    return Ok(output.stdout);
}
