use std::path::Path;
use std::process::Command;

fn blogport_cmd(fixture: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_blogport"));
    cmd.current_dir(Path::new("tests/fixtures").join(fixture));
    cmd.env_remove("BLOGPORT_LOG");
    cmd
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn export_medium_uses_medium_styles_and_no_title_rule() {
    let output = blogport_cmd("blog")
        .args(["export", "posts/hello.md", "--platform", "medium"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let html = String::from_utf8(output.stdout).unwrap();
    assert!(html.contains(">Hello Blogport</h1>"));
    assert!(!html.contains("<hr"));
    assert!(html.contains("<h2 style=\"font-family: sans-serif;"));
    assert!(html.contains("<table"));
    assert!(html.contains("<code class=\"language-rust\">fn main() {}</code>"));
    assert!(html.contains("<a href=\"https://example.com\" target=\"_blank\""));
}

#[test]
fn disabled_diagrams_export_an_error_block() {
    let output = blogport_cmd("blog")
        .args(["export", "posts/hello.md"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let html = String::from_utf8(output.stdout).unwrap();
    assert!(html.contains("Diagram could not be rendered"));
    assert!(html.contains("graph TD; A--&gt;B"));
    // config default platform is naver, which draws a rule under the title
    assert!(html.contains("<hr"));
}

#[test]
fn export_json_carries_markdown_fallback() {
    let output = blogport_cmd("blog")
        .args(["export", "posts/hello.md", "--platform", "tistory", "--json", "--title", "Custom"])
        .output()
        .unwrap();
    let payload = stdout_json(&output);

    assert_eq!(payload["platform"], "tistory");
    assert!(payload["html"].as_str().unwrap().contains(">Custom</h1>"));
    assert!(payload["plain_text"].as_str().unwrap().starts_with("# Hello Blogport"));
}

#[test]
fn blocks_prints_render_tree() {
    let output = blogport_cmd("blog").args(["blocks", "posts/hello.md"]).output().unwrap();
    let tree = stdout_json(&output);

    let blocks = tree.as_array().unwrap();
    assert_eq!(blocks[0]["node"]["kind"], "heading");
    assert!(blocks.iter().any(|b| b["node"]["kind"] == "table"));
    assert!(blocks.iter().any(|b| b["node"]["is_diagram"] == true));
}

#[test]
fn score_reports_keyword_metrics() {
    let output = blogport_cmd("blog")
        .args(["score", "posts/hello.md", "--keyword", "rust", "--json"])
        .output()
        .unwrap();
    let report = stdout_json(&output);

    assert_eq!(report["metrics"]["h2_count"], 3);
    assert_eq!(report["metrics"]["in_first_para"], true);
    assert_eq!(report["scores"]["quality"], 20.0);
    assert_eq!(report["checklist"].as_array().unwrap().len(), 4);
}

#[test]
fn suggestions_lower_quality() {
    let output = blogport_cmd("blog")
        .args(["score", "posts/hello.md", "--suggestions", "suggestions.json", "--json"])
        .output()
        .unwrap();
    let report = stdout_json(&output);
    assert_eq!(report["scores"]["quality"], 10.0);
    assert_eq!(report["scores"]["keyword"], 0.0);
}

#[test]
fn score_below_threshold_exits_1() {
    let output = blogport_cmd("strict").args(["score", "post.md"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let report = String::from_utf8(output.stdout).unwrap();
    assert!(report.starts_with("# SEO Score: "));
}

#[test]
fn page_writes_markdown_with_title() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("post.md");
    let output = blogport_cmd("blog")
        .args(["page", "posts/hello.md", "--format", "markdown", "--out"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("# Hello Blogport\n\nIntro paragraph"));
}

#[test]
fn page_text_is_title_then_plain_blocks() {
    let output = blogport_cmd("blog")
        .args(["page", "posts/hello.md", "--format", "text"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.starts_with("Hello Blogport\n\nIntro paragraph about rust blogging with a link."));
    assert!(text.contains("Name\tValue\na\t1"));
    assert!(text.contains("graph TD; A-->B"));
    assert!(!text.contains("**"));
    assert!(!text.contains("<"));
}

#[test]
fn page_html_is_standalone() {
    let output = blogport_cmd("blog").args(["page", "posts/hello.md"]).output().unwrap();
    assert!(output.status.success());
    let html = String::from_utf8(output.stdout).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<pre class=\"mermaid\">"));
}

#[test]
fn batch_respects_include_and_exclude() {
    let dir = tempfile::tempdir().unwrap();
    let output = blogport_cmd("blog")
        .args(["batch", "--platform", "wordpress", "--out-dir"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["posts__hello.wordpress.html".to_string()]);
}

#[test]
fn missing_post_is_a_runtime_error() {
    let output = blogport_cmd("blog").args(["export", "posts/nope.md"]).output().unwrap();
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("File Not Found"));
}

#[test]
fn info_json_lists_platforms() {
    let output = blogport_cmd("blog").args(["info", "--json"]).output().unwrap();
    let info = stdout_json(&output);
    assert_eq!(info["platforms"].as_array().unwrap().len(), 5);
    assert_eq!(info["current_state"]["config_found"], true);
    assert_eq!(info["current_state"]["post_count"], 1);
    assert!(info["current_state"]["diagram_command"].is_null());
}
