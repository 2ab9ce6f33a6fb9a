// Colored terminal output for volume summaries, audits and rankings.
//
// All terminal-specific formatting lives here: colors, tables, progress
// bars. The pipeline and main.rs delegate to these functions.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use super::truncate_chars;
use crate::models::{AuditRow, RankedRow, VolumeRow};

/// Progress bar in the house style: `  <label> [=====] pos/len (eta)`.
pub fn progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let template = format!("  {label} [{{bar:30}}] {{pos}}/{{len}} ({{eta}})");
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}

/// Top `limit` canonical brands by volume for one country.
pub fn display_top_volumes(country: &str, rows: &[VolumeRow], limit: usize) {
    if rows.is_empty() {
        println!("  {} no volumes returned", country.to_uppercase().bold());
        return;
    }

    let mut sorted: Vec<&VolumeRow> = rows.iter().collect();
    sorted.sort_by(|a, b| b.volume_or_zero().cmp(&a.volume_or_zero()));

    println!(
        "\n{}",
        format!("=== Top {} in {} ===", limit.min(sorted.len()), country.to_uppercase()).bold()
    );
    for (i, row) in sorted.iter().take(limit).enumerate() {
        println!(
            "  {:>3}. {:<28} {:>10}",
            i + 1,
            truncate_chars(&row.keyword, 28),
            row.volume_or_zero().to_string().cyan(),
        );
    }
}

/// Counts for one country's audit: brands, competitors found, already used,
/// competitors banned.
pub fn display_audit_summary(country: &str, rows: &[AuditRow]) {
    let with_competitor = rows.iter().filter(|r| r.has_competitor()).count();
    let used = rows.iter().filter(|r| r.used).count();
    let banned = rows.iter().filter(|r| r.competitor_banned).count();

    println!(
        "  {} {} brands, {} with competitor, {} used, {} banned",
        country.to_uppercase().bold(),
        rows.len(),
        with_competitor.to_string().green(),
        used.to_string().yellow(),
        if banned > 0 {
            banned.to_string().red()
        } else {
            banned.to_string().normal()
        },
    );
}

/// Ranked table, first `limit` rows.
pub fn display_ranked(title: &str, rows: &[RankedRow], limit: usize) {
    if rows.is_empty() {
        println!("{} {}", title.bold(), "(no rows)".dimmed());
        return;
    }

    println!("\n{}", format!("=== {title} ({} rows) ===", rows.len()).bold());
    println!(
        "  {:>4}  {:<24} {:<3} {:>4}  {:>10}  {:<40}",
        "Rank".dimmed(),
        "Keyword".dimmed(),
        "CC".dimmed(),
        "Used".dimmed(),
        "Volume".dimmed(),
        "Competitor".dimmed(),
    );
    println!("  {}", "-".repeat(92).dimmed());

    for (i, row) in rows.iter().take(limit).enumerate() {
        let used = if row.used { "yes".yellow() } else { "no".normal() };
        let competitor = if row.has_competitor() {
            truncate_chars(&row.competitor, 40).normal()
        } else {
            "-".dimmed()
        };
        println!(
            "  {:>4}. {:<24} {:<3} {:>4}  {:>10}  {}",
            i + 1,
            truncate_chars(&row.keyword, 24),
            row.country,
            used,
            row.search_volume,
            competitor,
        );
    }

    if rows.len() > limit {
        println!("  {}", format!("... {} more", rows.len() - limit).dimmed());
    }
}
