mod formatters;

use crate::batch::SubmitReport;
use crate::commands::stats::MergeStats;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use formatters::{format_count, format_range, format_total};

pub fn print_summary(stats: &MergeStats) {
    println!(
        "✓ Merged {} files ({} skipped) into {} in {}ms ({} = {})",
        stats.files_merged.len(),
        stats.files_skipped.len(),
        stats.output.display(),
        stats.total_duration.as_millis(),
        stats.count_attribute,
        stats.total_count
    );
}

pub fn print_detailed(stats: &MergeStats) {
    let mut summary_table = Table::new();
    summary_table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Merge Summary")
                .add_attribute(Attribute::Bold)
                .set_alignment(comfy_table::CellAlignment::Left),
            Cell::new(""),
        ]);

    summary_table.add_row(vec![
        "Merge Time",
        &format!("{}ms", stats.total_duration.as_millis()),
    ]);
    summary_table.add_row(vec![
        "Files Merged",
        &format!("{}", stats.files_merged.len()),
    ]);
    summary_table.add_row(vec![
        "Files Skipped",
        &format!("{}", stats.files_skipped.len()),
    ]);
    summary_table.add_row(vec![
        stats.count_attribute.as_str(),
        &stats.total_count.to_string(),
    ]);
    summary_table.add_row(vec!["Total Entries", &format_count(stats.total_entries())]);
    summary_table.add_row(vec!["Output", &stats.output.display().to_string()]);

    println!("{summary_table}\n");

    if !stats.files_skipped.is_empty() {
        let mut skipped_table = Table::new();
        skipped_table
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![Cell::new("Skipped File").add_attribute(Attribute::Bold)]);
        for file in &stats.files_skipped {
            skipped_table.add_row(vec![file.display().to_string()]);
        }
        println!("{skipped_table}\n");
    }

    let mut detail_table = Table::new();
    detail_table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Histogram").add_attribute(Attribute::Bold),
            Cell::new("Binning").add_attribute(Attribute::Bold),
            Cell::new("Entries").add_attribute(Attribute::Bold),
            Cell::new("Total").add_attribute(Attribute::Bold),
        ]);

    for hist in &stats.histograms {
        detail_table.add_row(vec![
            Cell::new(&hist.name),
            Cell::new(format_range(hist.low, hist.high, hist.nbins, hist.log_spaced)),
            Cell::new(format_count(hist.entries)),
            Cell::new(format_total(hist.total)),
        ]);
    }

    println!("{detail_table}");
}

pub fn print_submit_report(report: &SubmitReport) {
    let verb = if report.dry_run { "Wrote" } else { "Submitted" };
    println!("✓ {} {} job script(s)", verb, report.scripts.len());
    if let Some(final_script) = &report.final_script {
        println!("  final job: {}", final_script.display());
    }
    if let Some(kill_file) = &report.kill_file {
        println!("  cancel with: bash {}", kill_file.display());
    }
}
