// src/pipeline/report.rs

//! Console rendering of statistics.

use crate::models::StatTable;
use crate::pipeline::stats::StatisticsReport;

/// Render a table with a header, its rows and a trailing `Total` row.
pub fn render_table(table: &StatTable) -> String {
    let header: Vec<String> = table.kind.columns().iter().map(|c| c.to_string()).collect();
    let rows = table.rows_with_total();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let last = widths.len().saturating_sub(1);
    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &width))| {
                // Counts are right-aligned
                if i == last {
                    format!("{cell:>width$}")
                } else {
                    format!("{cell:<width$}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(header.as_slice())];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(rows.iter().map(|row| format_row(row.as_slice())));
    lines.join("\n")
}

/// Log the run summary followed by the domain tables.
pub fn log_report(report: &StatisticsReport) {
    log::info!(
        "Total number of raw datasets:\n{}",
        render_table(&report.datasets_per_scraper)
    );
    if report.datasets_per_scraper.degraded {
        log::warn!("Raw dataset counts were taken from the full output tree");
    }
    log::info!(
        "Total number of pages: {}",
        report.page_count_per_domain.total()
    );
    log::info!(
        "Total number of resources: {}",
        report.resource_count_per_domain.total()
    );
    log::info!(
        "Total number of pages by domain:\n{}",
        render_table(&report.page_count_per_domain)
    );
    log::info!(
        "Total number of resources by domain:\n{}",
        render_table(&report.resource_count_per_domain)
    );
    log::debug!(
        "Resources per page:\n{}",
        render_table(&report.resource_count_per_page)
    );
}
