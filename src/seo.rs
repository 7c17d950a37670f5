//! SEO metrics and the weighted 0-100 score derived from them.
//!
//! Both entry points are total: any content, title and keyword produce a
//! result, and a zero word count yields zero density rather than a division
//! by zero.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Markdown headings that count as H2 sections. Deeper headings match too.
static H2_PATTERN: LazyLock<Regex> = LazyLock::new(|| return Regex::new(r"(?m)^##\s?").expect("valid regex"));

/// `![alt](url)`.
static IMAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| return Regex::new(r"!\[.*?\]\(.*?\)").expect("valid regex"));

/// `[label](url)`; images also match.
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| return Regex::new(r"\[.*?\]\(.*?\)").expect("valid regex"));

/// Minimum `##` sections for the checklist.
const CHECKLIST_MIN_H2: u32 = 4;

/// Characters of content searched for the keyword's first-paragraph check.
const FIRST_PARAGRAPH_CHARS: usize = 300;

/// Character count that earns the full length score.
const LENGTH_TARGET_CHARS: u32 = 1500;

/// Score cap for the length slice.
const LENGTH_MAX: f64 = 20.0;

/// Length cap when keyword points are redistributed.
const LENGTH_MAX_WITHOUT_KEYWORD: f64 = 30.0;

/// Points deducted per deep-analysis suggestion.
const QUALITY_PENALTY: u32 = 5;

/// Starting quality score.
const QUALITY_MAX: u32 = 20;

/// Structure cap when keyword points are redistributed.
const STRUCTURE_MAX_WITHOUT_KEYWORD: f64 = 40.0;

/// Title length bounds (exclusive) for the checklist.
const TITLE_CHARS: (usize, usize) = (10, 50);

/// One pass/fail line of the checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckItem {
    /// What was checked.
    pub label: &'static str,
    /// Human-readable detail.
    pub message: String,
    /// Whether the check passed.
    pub passed: bool,
}

/// Verdict band for a total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    /// 80 and above.
    Excellent,
    /// 50 to 79.
    Fair,
    /// Below 50.
    Poor,
}

/// Structural and keyword measurements of one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SeoMetrics {
    /// Characters excluding whitespace.
    pub char_count: u32,
    /// Lines starting with `##`.
    pub h2_count: u32,
    /// `![..](..)` occurrences.
    pub image_count: u32,
    /// Keyword appears in the first 300 characters.
    pub in_first_para: bool,
    /// Keyword appears in the title.
    pub in_title: bool,
    /// Case-insensitive keyword occurrences.
    pub keyword_count: u32,
    /// Keyword occurrences per hundred words.
    pub keyword_density: f64,
    /// `[..](..)` occurrences, images included.
    pub link_count: u32,
    /// Whitespace-separated tokens after removing `#`.
    pub word_count: u32,
}

/// Everything the `score` command reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoReport {
    /// Pass/fail checks.
    pub checklist: Vec<CheckItem>,
    /// Verdict for `scores.total`.
    pub grade: Grade,
    /// Measurements.
    pub metrics: SeoMetrics,
    /// Weighted scores.
    pub scores: SeoScores,
}

/// Sub-scores and their capped total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeoScores {
    /// 0-40, or 0 when no keyword was given.
    pub keyword: f64,
    /// 0-20, or 0-30 without a keyword.
    pub length: f64,
    /// 0-20.
    pub quality: f64,
    /// 0-20, or 0-40 without a keyword.
    pub structure: f64,
    /// Rounded sum, at most 100.
    pub total: u32,
}

impl Grade {
    /// Short label for reports.
    pub const fn label(self) -> &'static str {
        return match self {
            Self::Excellent => "Excellent",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        };
    }
}

impl SeoReport {
    /// Measure and score a document in one step.
    pub fn build(content: &str, title: &str, keyword: &str, suggestion_count: usize) -> Self {
        let metrics = calculate_seo_metrics(content, title, keyword);
        let scores = calculate_seo_scores(&metrics, keyword, suggestion_count);
        return Self { checklist: checklist(&metrics, title, keyword), grade: scores.grade(), metrics, scores };
    }
}

impl SeoScores {
    /// Verdict band for the total.
    pub const fn grade(&self) -> Grade {
        if self.total >= 80 {
            return Grade::Excellent;
        }
        if self.total >= 50 {
            return Grade::Fair;
        }
        return Grade::Poor;
    }
}

/// Measure content against an optional keyword. An empty or whitespace-only
/// keyword leaves every keyword field at zero.
pub fn calculate_seo_metrics(content: &str, title: &str, keyword: &str) -> SeoMetrics {
    let without_hashes = content.replace('#', "");
    let word_count = count(without_hashes.split_whitespace().count());
    let char_count = count(content.chars().filter(|c| return !c.is_whitespace()).count());

    let mut metrics = SeoMetrics {
        char_count,
        h2_count: count(H2_PATTERN.find_iter(content).count()),
        image_count: count(IMAGE_PATTERN.find_iter(content).count()),
        link_count: count(LINK_PATTERN.find_iter(content).count()),
        word_count,
        ..SeoMetrics::default()
    };

    let keyword = keyword.trim();
    if keyword.is_empty() {
        return metrics;
    }

    metrics.keyword_count = Regex::new(&format!("(?i){}", regex::escape(keyword)))
        .map_or(0, |pattern| return count(pattern.find_iter(content).count()));
    metrics.keyword_density = if word_count > 0 {
        f64::from(metrics.keyword_count) / f64::from(word_count) * 100.0
    } else {
        0.0
    };
    metrics.in_title = title.contains(keyword);
    let first_paragraph: String = content.chars().take(FIRST_PARAGRAPH_CHARS).collect();
    metrics.in_first_para = first_paragraph.contains(keyword);

    return metrics;
}

/// Weighted scores for a set of metrics.
///
/// Without a keyword the 40 keyword points are redistributed by scaling the
/// length and structure slices. Each deep-analysis suggestion costs five
/// quality points.
pub fn calculate_seo_scores(metrics: &SeoMetrics, keyword: &str, suggestion_count: usize) -> SeoScores {
    let mut length = if metrics.char_count >= LENGTH_TARGET_CHARS {
        LENGTH_MAX
    } else {
        (f64::from(metrics.char_count) / f64::from(LENGTH_TARGET_CHARS) * LENGTH_MAX).round()
    };

    let mut structure = (f64::from(metrics.h2_count) / 3.0 * 10.0).min(10.0)
        + (f64::from(metrics.image_count) * 5.0).min(5.0)
        + (f64::from(metrics.link_count) * 5.0).min(5.0);

    let mut keyword_score = 0.0;
    if keyword.trim().is_empty() {
        length = (length * 1.5).min(LENGTH_MAX_WITHOUT_KEYWORD);
        structure = (structure * 2.0).min(STRUCTURE_MAX_WITHOUT_KEYWORD);
    } else {
        if metrics.in_title {
            keyword_score += 15.0;
        }
        if metrics.in_first_para {
            keyword_score += 10.0;
        }
        keyword_score += density_bonus(metrics.keyword_density);
    }

    let penalty = count(suggestion_count).saturating_mul(QUALITY_PENALTY);
    let quality = f64::from(QUALITY_MAX.saturating_sub(penalty));

    let total = round_total(length + structure + keyword_score + quality);
    return SeoScores { keyword: keyword_score, length, quality, structure, total };
}

/// Pass/fail checks shown next to the score. The keyword check only appears
/// when a keyword was given.
pub fn checklist(metrics: &SeoMetrics, title: &str, keyword: &str) -> Vec<CheckItem> {
    let title_chars = title.chars().count();
    let (title_min, title_max) = TITLE_CHARS;
    let mut items = vec![
        CheckItem {
            label: "Title length",
            message: if title_chars > title_max {
                format!("title is too long ({title_chars} characters)")
            } else if title_chars <= title_min {
                format!("title is too short ({title_chars} characters)")
            } else {
                "title length is appropriate".to_string()
            },
            passed: title_chars > title_min && title_chars < title_max,
        },
        CheckItem {
            label: "Body length",
            message: format!(
                "{} characters (at least {LENGTH_TARGET_CHARS} recommended)",
                metrics.char_count
            ),
            passed: metrics.char_count >= LENGTH_TARGET_CHARS,
        },
        CheckItem {
            label: "Section headings (H2)",
            message: format!("{} used (at least {CHECKLIST_MIN_H2} recommended)", metrics.h2_count),
            passed: metrics.h2_count >= CHECKLIST_MIN_H2,
        },
    ];

    if !keyword.trim().is_empty() {
        items.push(CheckItem {
            label: "Keyword in title",
            message: if metrics.in_title {
                "title contains the keyword".to_string()
            } else {
                "title does not contain the keyword".to_string()
            },
            passed: metrics.in_title,
        });
    }
    return items;
}

/// Saturating `usize` to `u32`.
fn count(n: usize) -> u32 {
    return u32::try_from(n).unwrap_or(u32::MAX);
}

/// Bonus for keyword density. Too low and too high earn the same small bonus;
/// exactly zero earns nothing.
fn density_bonus(density: f64) -> f64 {
    if (0.5..=3.0).contains(&density) {
        return 15.0;
    }
    if density > 0.0 && density < 0.5 {
        return 5.0;
    }
    if density > 3.0 {
        return 5.0;
    }
    return 0.0;
}

/// Round, cap at 100 and floor at 0.
#[allow(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is rounded and clamped to 0..=100 first"
)]
fn round_total(sum: f64) -> u32 {
    return sum.round().clamp(0.0, 100.0) as u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perfect_metrics() -> SeoMetrics {
        SeoMetrics {
            char_count: 2000,
            h2_count: 5,
            image_count: 2,
            in_first_para: true,
            in_title: true,
            keyword_count: 15,
            keyword_density: 1.5,
            link_count: 2,
            word_count: 1000,
        }
    }

    #[test]
    fn basic_counts() {
        let metrics = calculate_seo_metrics("## Title\nHello world. This is a robust test content.", "Test Title", "");
        assert!(metrics.char_count > 0);
        assert_eq!(metrics.h2_count, 1);
        assert_eq!(metrics.word_count, 9);
        assert_eq!(metrics.keyword_count, 0);
        assert!(!metrics.in_title);
    }

    #[test]
    fn keyword_is_case_insensitive_in_body_but_literal_in_title() {
        let metrics = calculate_seo_metrics("Apple is a fruit. I like apple.", "About Apple", "Apple");
        assert_eq!(metrics.keyword_count, 2);
        assert!(metrics.in_title);
        assert!(metrics.in_first_para);

        let lower = calculate_seo_metrics("Apple pie", "About Apple", "apple");
        assert!(!lower.in_title);
        assert!(!lower.in_first_para);
    }

    #[test]
    fn keyword_density_above_three_percent_earns_five() {
        let metrics = calculate_seo_metrics("Keyword keyword keyword other words.", "", "keyword");
        assert_eq!(metrics.word_count, 5);
        assert_eq!(metrics.keyword_count, 3);
        assert!((metrics.keyword_density - 60.0).abs() < 1e-9);
        assert!((density_bonus(metrics.keyword_density) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn density_bands() {
        assert!(density_bonus(0.0).abs() < f64::EPSILON);
        assert!((density_bonus(0.2) - 5.0).abs() < f64::EPSILON);
        assert!((density_bonus(0.5) - 15.0).abs() < f64::EPSILON);
        assert!((density_bonus(3.0) - 15.0).abs() < f64::EPSILON);
        assert!((density_bonus(3.1) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn keyword_is_escaped() {
        let metrics = calculate_seo_metrics("c++ and c++ but not cpp", "", "c++");
        assert_eq!(metrics.keyword_count, 2);
    }

    #[test]
    fn deeper_headings_count_as_h2() {
        let metrics = calculate_seo_metrics("## A\n### B\n#### C\n# D\n##E", "", "");
        assert_eq!(metrics.h2_count, 4);
    }

    #[test]
    fn images_also_count_as_links() {
        let metrics = calculate_seo_metrics("![a](a.png) [b](b)", "", "");
        assert_eq!(metrics.image_count, 1);
        assert_eq!(metrics.link_count, 2);
    }

    #[test]
    fn first_paragraph_is_first_300_characters() {
        let content = format!("{}needle", "가".repeat(300));
        let metrics = calculate_seo_metrics(&content, "", "needle");
        assert_eq!(metrics.keyword_count, 1);
        assert!(!metrics.in_first_para);
    }

    #[test]
    fn empty_document_is_all_zero() {
        let metrics = calculate_seo_metrics("", "", "seo");
        assert_eq!(metrics.word_count, 0);
        assert_eq!(metrics.char_count, 0);
        assert!(metrics.keyword_density.abs() < f64::EPSILON);
    }

    #[test]
    fn whitespace_keyword_is_no_keyword() {
        let metrics = calculate_seo_metrics("   ", "   ", "   ");
        assert!(!metrics.in_title);
        assert_eq!(metrics.keyword_count, 0);
    }

    #[test]
    fn perfect_content_scores_100() {
        let scores = calculate_seo_scores(&perfect_metrics(), "test", 0);
        assert!((scores.length - 20.0).abs() < f64::EPSILON);
        assert!((scores.structure - 20.0).abs() < f64::EPSILON);
        assert!((scores.keyword - 40.0).abs() < f64::EPSILON);
        assert!((scores.quality - 20.0).abs() < f64::EPSILON);
        assert_eq!(scores.total, 100);
        assert_eq!(scores.grade(), Grade::Excellent);
    }

    #[test]
    fn suggestions_penalize_quality() {
        let scores = calculate_seo_scores(&perfect_metrics(), "test", 2);
        assert!((scores.quality - 10.0).abs() < f64::EPSILON);
        assert_eq!(scores.total, 90);

        let floored = calculate_seo_scores(&perfect_metrics(), "test", 9);
        assert!(floored.quality.abs() < f64::EPSILON);
    }

    #[test]
    fn no_keyword_redistributes_points() {
        let metrics = SeoMetrics { char_count: 750, h2_count: 3, ..SeoMetrics::default() };
        let with_keyword = calculate_seo_scores(&metrics, "k", 0);
        assert!((with_keyword.length - 10.0).abs() < f64::EPSILON);
        assert!((with_keyword.structure - 10.0).abs() < f64::EPSILON);

        let scores = calculate_seo_scores(&metrics, "", 0);
        assert!((scores.length - 15.0).abs() < f64::EPSILON);
        assert!((scores.structure - 20.0).abs() < f64::EPSILON);
        assert!(scores.keyword.abs() < f64::EPSILON);
        assert_eq!(scores.total, 55);
        assert_eq!(scores.grade(), Grade::Fair);
    }

    #[test]
    fn total_is_capped_at_100() {
        let scores = calculate_seo_scores(&perfect_metrics(), "", 0);
        assert!((scores.length - 30.0).abs() < f64::EPSILON);
        assert!((scores.structure - 40.0).abs() < f64::EPSILON);
        assert_eq!(scores.total, 90);
        assert_eq!(round_total(130.4), 100);
    }

    #[test]
    fn checklist_reports_each_rule() {
        let metrics = calculate_seo_metrics("## a\n## b", "Short", "rust");
        let items = checklist(&metrics, "Short", "rust");
        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|item| !item.passed));

        let no_keyword = checklist(&metrics, "A reasonable title", "");
        assert_eq!(no_keyword.len(), 3);
        assert!(no_keyword[0].passed);
    }

    #[test]
    fn report_grades_total() {
        let report = SeoReport::build("tiny", "t", "", 10);
        assert_eq!(report.grade, Grade::Poor);
        assert_eq!(report.grade.label(), "Poor");
    }
}
