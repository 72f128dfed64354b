//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined and one SVG
//! line chart per exam type.

use anyhow::{Context, Result};
use std::path::Path;

use netrack_core::chart::{ChartBounds, ChartPoint};
use netrack_core::format::{format_net, format_trend, long_date_label};
use netrack_core::model::ExamRecord;
use netrack_core::report::{AnalyticsReport, ExamTypeSection};
use netrack_core::statistics::total_net;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report. `records` feed the record list, newest first.
pub fn generate_html(report: &AnalyticsReport, records: &[ExamRecord]) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"tr\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>netrack report: {}</title>\n",
        html_escape(&report.user_id)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>netrack report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">User: <strong>{}</strong> | {} records | {}</p>\n",
        html_escape(&report.user_id),
        report.record_count,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    if report.sections.is_empty() {
        html.push_str("<p class=\"empty\">No exams recorded yet.</p>\n");
    } else {
        html.push_str("<table class=\"summary\">\n");
        html.push_str("<thead><tr><th>Exam</th><th>Count</th><th>Average</th><th>Best</th><th>Lowest</th><th>Trend</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for section in &report.sections {
            let s = &section.stats;
            let trend_class = if s.trend > 0.0 {
                "up"
            } else if s.trend < 0.0 {
                "down"
            } else {
                "flat"
            };
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td></tr>\n",
                html_escape(&section.label),
                s.count,
                format_net(s.avg_net),
                format_net(s.max_net),
                format_net(s.min_net),
                trend_class,
                format_trend(s.trend),
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    for section in &report.sections {
        html.push_str(&generate_section(section));
    }

    // Record list
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Exams</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Date</th><th onclick=\"sortTable(1)\">Exam</th><th onclick=\"sortTable(2)\">Total net</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for record in records {
        let (label, net) = match record.parse_exam_type() {
            Ok(t) => (t.label().to_string(), format_net(total_net(record, t))),
            Err(_) => (record.exam_type.clone(), "-".to_string()),
        };
        html.push_str(&format!(
            "<tr><td data-sort=\"{}\">{}</td><td>{}</td><td>{}</td></tr>\n",
            record.exam_date,
            long_date_label(record.exam_date),
            html_escape(&label),
            net
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

fn generate_section(section: &ExamTypeSection) -> String {
    let mut html = format!(
        "<section class=\"exam-type\" id=\"{}\">\n<h2>{}</h2>\n",
        section.exam_type.tag(),
        html_escape(&section.label)
    );

    if !section.series.is_empty() {
        html.push_str(&generate_line_chart(&section.series));
    }

    html.push_str("<table class=\"subjects\">\n");
    html.push_str("<thead><tr><th>Subject</th><th>Average net</th><th>Success</th></tr></thead>\n<tbody>\n");
    for avg in &section.subject_averages {
        let pct = avg.avg_percentage.clamp(0.0, 100.0);
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td><div class=\"bar\"><span style=\"width:{:.0}%\"></span></div>{:.1}%</td></tr>\n",
            html_escape(&avg.name),
            format_net(avg.avg_net),
            pct,
            avg.avg_percentage,
        ));
    }
    html.push_str("</tbody></table>\n</section>\n");
    html
}

/// Net-over-time polyline. Points are spread evenly along the x axis.
fn generate_line_chart(series: &[ChartPoint]) -> String {
    let width = 640.0;
    let height = 240.0;
    let pad = 36.0;
    let plot_w = width - 2.0 * pad;
    let plot_h = height - 2.0 * pad;

    let bounds = ChartBounds::of(series);
    let step = if series.len() > 1 {
        plot_w / (series.len() - 1) as f64
    } else {
        0.0
    };
    let coords: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = if series.len() > 1 {
                pad + i as f64 * step
            } else {
                width / 2.0
            };
            let y = height - pad - bounds.ratio(p.total_net) * plot_h;
            (x, y)
        })
        .collect();

    let mut svg = format!(
        "<svg class=\"chart\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" xmlns=\"http://www.w3.org/2000/svg\">\n"
    );

    // Axis labels for the bounds.
    for (value, y) in [(bounds.max, pad), (bounds.min, height - pad)] {
        svg.push_str(&format!(
            "  <line x1=\"{pad}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" stroke=\"currentColor\" stroke-opacity=\"0.2\"/>\n",
            width - pad
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{y}\" font-size=\"11\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{:.0}</text>\n",
            pad - 6.0,
            value
        ));
    }

    let points: Vec<String> = coords.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect();
    svg.push_str(&format!(
        "  <polyline points=\"{}\" fill=\"none\" stroke=\"#6366f1\" stroke-width=\"2\"/>\n",
        points.join(" ")
    ));

    for (point, (x, y)) in series.iter().zip(&coords) {
        svg.push_str(&format!(
            "  <circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"4\" fill=\"#6366f1\"><title>{}: {}</title></circle>\n",
            long_date_label(point.full_date),
            format_net(point.total_net)
        ));
        svg.push_str(&format!(
            "  <text x=\"{x:.1}\" y=\"{}\" font-size=\"11\" fill=\"currentColor\" text-anchor=\"middle\">{}</text>\n",
            height - pad + 16.0,
            html_escape(&point.date)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &AnalyticsReport, records: &[ExamRecord], path: &Path) -> Result<()> {
    let html = generate_html(report, records);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --up: #16a34a; --down: #dc2626; --accent: #6366f1; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --up: #4ade80; --down: #f87171; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta, .empty { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.up { color: var(--up); }
.down { color: var(--down); }
.bar { display: inline-block; width: 120px; height: 8px; margin-right: 0.5rem; background: var(--border); border-radius: 4px; overflow: hidden; }
.bar span { display: block; height: 100%; background: var(--accent); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; max-width: 100%; height: auto; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  const key = cell => cell.dataset.sort || cell.textContent;
  rows.sort((a, b) => {
    const va = key(a.cells[col]);
    const vb = key(b.cells[col]);
    const na = parseFloat(va), nb = parseFloat(vb);
    const cmp = !isNaN(na) && !isNaN(nb) && col == 2 ? na - nb : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
