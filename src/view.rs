// 🖼️ Comparison View - display model shared by the TUI, text output and web page
//
// "On {date}, {subject} market cap is ${X}M or the {category}..."

use crate::bracket::{LiveValue, SelectionResult};
use crate::format::{format_display_date, format_entry_value, format_market_cap};
use chrono::NaiveDate;
use serde::Serialize;

/// One slot of the neighbors strip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StripItem {
    pub label: String,
    pub image_ref: String,
    pub highlighted: bool,
}

/// Everything a renderer needs, already formatted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonView {
    pub date: String,
    pub subject: String,
    pub subject_url: String,
    pub market_cap: f64,
    pub market_cap_display: String,
    pub category: String,
    pub label: String,
    pub image_ref: String,
    pub value_display: String,
    pub strip: Vec<StripItem>,
}

impl ComparisonView {
    pub fn build(
        selection: &SelectionResult,
        live: LiveValue,
        date: NaiveDate,
        subject: &str,
        subject_url: &str,
    ) -> Self {
        let strip = selection
            .window_with_highlight()
            .map(|(entry, highlighted)| StripItem {
                label: entry.label.clone(),
                image_ref: entry.image_ref.clone(),
                highlighted,
            })
            .collect();

        ComparisonView {
            date: format_display_date(date),
            subject: subject.to_string(),
            subject_url: subject_url.to_string(),
            market_cap: live.get(),
            market_cap_display: format_market_cap(live.get()),
            category: selection.chosen.category.clone(),
            label: selection.chosen.label.clone(),
            image_ref: selection.chosen.image_ref.clone(),
            value_display: format_entry_value(selection.chosen.value),
            strip,
        }
    }

    pub fn date_line(&self) -> String {
        format!("On {},", self.date)
    }

    pub fn market_line(&self) -> String {
        format!("{} market cap is ${}", self.subject, self.market_cap_display)
    }

    pub fn category_line(&self) -> String {
        format!("or the {}...", self.category)
    }

    /// Strip items in display order: left-to-right, or top-to-bottom with the
    /// largest entry first when stacked vertically.
    pub fn strip_ordered(&self, vertical: bool) -> Vec<&StripItem> {
        if vertical {
            self.strip.iter().rev().collect()
        } else {
            self.strip.iter().collect()
        }
    }
}

/// Plain text rendering for `show`
pub fn render_text(view: &ComparisonView) -> String {
    let strip: Vec<String> = view
        .strip
        .iter()
        .map(|item| {
            if item.highlighted {
                format!("[{}]", item.label)
            } else {
                item.label.clone()
            }
        })
        .collect();

    format!(
        "{}\n{}\n{}\n\n  {}\n  {}\n\n{}\n",
        view.date_line(),
        view.market_line(),
        view.category_line(),
        view.label,
        view.value_display,
        strip.join("  |  ")
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Standalone HTML page for the web server. `None` renders an empty page.
pub fn render_html(view: Option<&ComparisonView>) -> String {
    let body = match view {
        None => String::new(),
        Some(view) => {
            let strip: String = view
                .strip
                .iter()
                .map(|item| {
                    let class = if item.highlighted { "current" } else { "other" };
                    format!(
                        r#"<img class="{}" src="{}" alt="{}">"#,
                        class,
                        escape_html(&item.image_ref),
                        escape_html(&item.label)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n      ");

            format!(
                r#"<main>
    <h2>On <span class="accent">{date},</span></h2>
    <h3><a href="{subject_url}" target="_blank" rel="noopener noreferrer">{subject}</a> market cap is <span class="accent">${mcap}</span></h3>
    <p class="lead">or the {category}...</p>
    <figure>
      <img class="featured" src="{image}" alt="{label}">
      <h4>{label}</h4>
      <p class="accent">{value}</p>
    </figure>
    <div class="strip">
      {strip}
    </div>
  </main>"#,
                date = escape_html(&view.date),
                subject_url = escape_html(&view.subject_url),
                subject = escape_html(&view.subject),
                mcap = escape_html(&view.market_cap_display),
                category = escape_html(&view.category),
                image = escape_html(&view.image_ref),
                label = escape_html(&view.label),
                value = escape_html(&view.value_display),
                strip = strip,
            )
        }
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Market Cap Comparison</title>
  <style>
    body {{ font-family: sans-serif; font-weight: bold; text-align: center; }}
    .accent {{ color: #1E30D8; }}
    .featured {{ width: 12rem; height: 12rem; }}
    .strip img {{ width: 4rem; height: 4rem; margin: 0 .25rem; }}
    .strip .other {{ filter: grayscale(1); }}
    .strip .current {{ border: 2px solid #1E30D8; }}
  </style>
</head>
<body>
  {body}
</body>
</html>
"#,
        body = body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::{evaluate, WindowSpec};
    use crate::table::{ReferenceEntry, ReferenceTable};

    fn sample_view() -> ComparisonView {
        let table = ReferenceTable::sorted(vec![
            ReferenceEntry::new(100.0, "Ant", "tiny insect", "ant.png"),
            ReferenceEntry::new(1_000_000.0, "Cat", "house pet", "cat.png"),
            ReferenceEntry::new(5_000_000.0, "Whale", "blue whale", "whale.png"),
        ]);
        let live = LiveValue::new(2_300_000.0).unwrap();
        let selection = evaluate(&table, live, WindowSpec::default()).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        ComparisonView::build(&selection, live, date, "DeGods", "https://de.xyz")
    }

    #[test]
    fn test_build_view_lines() {
        let view = sample_view();

        assert_eq!(view.date_line(), "On October 18, 2026,");
        assert_eq!(view.market_line(), "DeGods market cap is $2M");
        assert_eq!(view.category_line(), "or the house pet...");
        assert_eq!(view.label, "Cat");
        assert_eq!(view.value_display, "$1 Million USD");
    }

    #[test]
    fn test_strip_highlights_chosen() {
        let view = sample_view();
        let highlighted: Vec<&str> = view
            .strip
            .iter()
            .filter(|s| s.highlighted)
            .map(|s| s.label.as_str())
            .collect();

        assert_eq!(view.strip.len(), 3);
        assert_eq!(highlighted, vec!["Cat"]);
    }

    #[test]
    fn test_strip_ordered_vertical_reverses() {
        let view = sample_view();
        let ordered = view.strip_ordered(true);
        let vertical: Vec<&str> = ordered.iter().map(|s| s.label.as_str()).collect();

        assert_eq!(vertical, vec!["Whale", "Cat", "Ant"]);
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&sample_view());

        assert!(text.starts_with("On October 18, 2026,\n"));
        assert!(text.contains("Ant  |  [Cat]  |  Whale"));
    }

    #[test]
    fn test_render_html_escapes() {
        let mut view = sample_view();
        view.label = "<script>".to_string();
        let html = render_html(Some(&view));

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<h4><script>"));
    }

    #[test]
    fn test_render_html_without_view() {
        let html = render_html(None);
        assert!(html.contains("<body>"));
        assert!(!html.contains("<main>"));
    }

    #[test]
    fn test_view_serializes_to_json() {
        let json = serde_json::to_value(sample_view()).unwrap();
        assert_eq!(json["label"], "Cat");
        assert_eq!(json["strip"][1]["highlighted"], true);
    }
}
