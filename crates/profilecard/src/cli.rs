//! Terminal output for the CLI commands

use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use profilecard_core::cache::{CacheLoadStatus, YearCommits};
use profilecard_core::models::CardStats;
use profilecard_core::svg::format_thousands;
use profilecard_core::{CommitCache, RefreshReport};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

/// Reason the cache started empty, if it was recovered from a bad file
pub fn recovery_reason(cache: &CommitCache) -> Option<&str> {
    match cache.status() {
        CacheLoadStatus::Recovered { reason } => Some(reason.as_str()),
        _ => None,
    }
}

/// Commit cache as a table (or JSON)
pub fn format_cache_table(cache: &CommitCache, json: bool, no_color: bool) -> String {
    if json {
        let map: BTreeMap<&str, &YearCommits> = cache.users().collect();
        return serde_json::to_string_pretty(&map).unwrap_or_else(|_| "{}".to_string());
    }

    if cache.is_empty() {
        return format!("No cached commits in {}", cache.path().display());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    if no_color {
        table.set_header(vec!["User", "Year", "Commits"]);
    } else {
        table.set_header(vec![
            Cell::new("User").fg(Color::Cyan),
            Cell::new("Year").fg(Color::Cyan),
            Cell::new("Commits").fg(Color::Cyan),
        ]);
    }

    for (user, years) in cache.users() {
        for (year, commits) in years {
            table.add_row(Row::from(vec![
                user.to_string(),
                year.clone(),
                format_thousands(*commits),
            ]));
        }
    }

    let total = format_thousands(cache.total_commits());
    if no_color {
        table.add_row(Row::from(vec!["Total", "", total.as_str()]));
    } else {
        table.add_row(Row::from(vec![
            Cell::new("Total").fg(Color::Yellow),
            Cell::new(""),
            Cell::new(&total).fg(Color::Yellow),
        ]));
    }

    table.to_string()
}

/// Result lines printed after `update`
pub fn format_update_report(
    report: &RefreshReport,
    badge: Option<&CardStats>,
    template: &Path,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Updated {}", template.display());
    let _ = writeln!(out, "   {:<15}{}", "Age:", report.age);
    let _ = writeln!(
        out,
        "   {:<15}{}",
        "Repositories:",
        format_thousands(report.repositories)
    );
    let _ = writeln!(
        out,
        "   {:<15}{}",
        "Commits:",
        format_thousands(report.total_commits)
    );

    match badge {
        Some(stats) if !stats.is_empty() => {
            let _ = writeln!(out, "Badge:");
            for (label, value) in stats.iter() {
                let _ = writeln!(
                    out,
                    "   {:<15}{}",
                    format!("{}:", label),
                    format_thousands(value)
                );
            }
        }
        _ => {
            let _ = writeln!(out, "Badge: no data");
        }
    }

    out
}
