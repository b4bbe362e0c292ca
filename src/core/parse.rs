//! Total parsers for the free-text fields of jobs and profiles.
//!
//! Every function here returns 0 when nothing matches; none of them can fail.

use std::sync::LazyLock;

use regex::Regex;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("number regex"));

/// All non-negative numbers appearing in `text`, in order.
fn numbers(text: &str) -> Vec<f32> {
    NUMBER
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f32>().ok())
        .filter(|value| value.is_finite())
        .collect()
}

/// Years of experience: the first number in the text.
///
/// "3-5年" -> 3, "5+ years" -> 5, "应届" -> 0.
#[must_use]
pub fn parse_years(text: &str) -> f32 {
    numbers(text).first().copied().unwrap_or(0.0)
}

/// Salary range in thousands as `(min, max)`.
///
/// "15k-25k" -> (15, 25), "1.5-2万" -> (15, 20), "20K" -> (20, 20),
/// "面议" -> (0, 0). Only the first two numbers are read, so suffixes like
/// "·13薪" are ignored.
#[must_use]
pub fn parse_salary_range(text: &str) -> (f32, f32) {
    let scale = if text.contains('万') { 10.0 } else { 1.0 };
    let values = numbers(text);
    match values.as_slice() {
        [] => (0.0, 0.0),
        [single] => (single * scale, single * scale),
        [first, second, ..] => {
            let (low, high) = if first <= second {
                (*first, *second)
            } else {
                (*second, *first)
            };
            (low * scale, high * scale)
        }
    }
}

/// Education as an ordinal 1 (high school) to 5 (doctorate), 0 if unknown.
#[must_use]
pub fn education_level(text: &str) -> f32 {
    let lowered = text.to_lowercase();
    let contains_any = |needles: &[&str]| needles.iter().any(|needle| lowered.contains(needle));

    if contains_any(&["博士", "phd", "doctor"]) {
        5.0
    } else if contains_any(&["硕士", "研究生", "master"]) {
        4.0
    } else if contains_any(&["本科", "学士", "bachelor"]) {
        3.0
    } else if contains_any(&["大专", "专科", "associate", "college"]) {
        2.0
    } else if contains_any(&["高中", "中专", "high school", "不限"]) {
        1.0
    } else {
        0.0
    }
}

/// Company size as an ordinal 1 (tiny) to 5 (enterprise), 0 if unknown.
///
/// Headcount ranges use their upper bound: "50-150人" -> 2, "500-2000人" -> 4.
#[must_use]
pub fn company_size_level(text: &str) -> f32 {
    let lowered = text.to_lowercase();
    if let Some(max) = numbers(&lowered)
        .into_iter()
        .reduce(f32::max)
    {
        let open_ended = lowered.contains("以上") || lowered.contains('+');
        return match max {
            m if m > 2000.0 || (open_ended && m >= 1000.0) => 5.0,
            m if m > 500.0 => 4.0,
            m if m > 150.0 => 3.0,
            m if m > 50.0 => 2.0,
            _ => 1.0,
        };
    }

    match lowered.trim() {
        "startup" | "tiny" | "初创" => 1.0,
        "small" | "小型" => 2.0,
        "medium" | "mid" | "中型" => 3.0,
        "large" | "大型" => 4.0,
        "enterprise" | "huge" | "超大型" => 5.0,
        _ => 0.0,
    }
}
