use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::scoring::ScoredItem;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a normalized score with fixed precision ("0.8731")
pub fn format_score(score: f64) -> String {
    format!("{:.4}", score)
}

/// Format a multiplier as "x1.0300"
pub fn format_multiplier(multiplier: f64) -> String {
    format!("x{:.4}", multiplier)
}

/// Format an effective rank, dropping ".0" for whole ranks ("#4", "#75.5")
pub fn format_rank(rank: f64) -> String {
    if rank.fract() == 0.0 {
        format!("#{}", rank as i64)
    } else {
        format!("#{}", rank)
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate title to fit available width, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_width {
        title.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn song_title(scored: &ScoredItem<'_>) -> String {
    format!("{} - {}", scored.item.artist, scored.item.name)
}

/// Format ranked songs as a table with columns: Rank, Score, Title, Lists
/// No headers. Rank column is 4 chars (fits "999."), score column 6.
pub fn format_ranked_table(items: &[ScoredItem<'_>], use_colors: bool) -> String {
    if items.is_empty() {
        return "No songs found.".to_string();
    }

    let term_width = get_terminal_width();
    let rank_width = 4;
    let score_width = 6;
    let separator = "  ";

    items
        .iter()
        .map(|scored| {
            let rank_str = format!("{:>3}.", scored.rank);
            let score_str = format!("{:>width$}", format_score(scored.normalized_score), width = score_width);
            let lists_str = format!("{} lists", scored.item.list_count);

            let fixed_width = rank_width + 1 + score_width + separator.len() * 2 + lists_str.len();
            let full_title = song_title(scored);
            let title = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_title(&full_title, width - fixed_width),
                Some(_) => truncate_title(&full_title, 20),
                None => full_title,
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str.dimmed(),
                    score_str.bold(),
                    separator,
                    title,
                    separator,
                    lists_str.cyan()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str, score_str, separator, title, separator, lists_str
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the full score breakdown for one song (for `show`)
pub fn format_item_detail(scored: &ScoredItem<'_>, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let heading = format!("#{} {}", scored.rank, song_title(scored));
    if use_colors {
        lines.push(heading.bold().to_string());
    } else {
        lines.push(heading);
    }

    lines.push(format!("  Score: {} (raw {:.6})", format_score(scored.normalized_score), scored.raw_score));
    lines.push(format!("  Base score: {:.6}", scored.base_score));
    lines.push(format!(
        "  Boosts: consensus {}, provocation {}, cluster {}",
        format_multiplier(scored.multipliers.consensus),
        format_multiplier(scored.multipliers.provocation),
        format_multiplier(scored.multipliers.cluster)
    ));
    lines.push(format!(
        "  Lists: {} ({} recognized), best rank {}",
        scored.item.list_count,
        scored.recognized_count,
        scored.min_rank.map(format_rank).unwrap_or_else(|| "-".to_string())
    ));

    if !scored.source_contributions.is_empty() {
        lines.push("  Contributions:".to_string());
        for contribution in &scored.source_contributions {
            let name = if use_colors {
                contribution.source_name.cyan().to_string()
            } else {
                contribution.source_name.clone()
            };
            lines.push(format!(
                "    {:<8} {:.6}  {}",
                format_rank(contribution.rank),
                contribution.contribution,
                name
            ));
        }
    }

    let clusters = &scored.clusters;
    if !clusters.all.is_empty() {
        let summarize = |counts: &[(String, usize)]| {
            counts
                .iter()
                .map(|(name, count)| format!("{}:{}", name, count))
                .collect::<Vec<_>>()
                .join(", ")
        };
        lines.push(format!("  Clusters (qualifying): {}", summarize(&clusters.qualifying)));
        lines.push(format!("  Clusters (all): {}", summarize(&clusters.all)));
    }

    lines.join("\n")
}

/// Format ranked songs as tab-separated values for scripting
/// Columns: rank, score, name, artist, list_count (no headers, no colors)
pub fn format_tsv(items: &[ScoredItem<'_>]) -> String {
    items
        .iter()
        .map(|scored| {
            format!(
                "{}\t{:.8}\t{}\t{}\t{}",
                scored.rank,
                scored.normalized_score,
                scored.item.name,
                scored.item.artist,
                scored.item.list_count
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format ranked songs as a pretty-printed JSON array
pub fn format_json(items: &[ScoredItem<'_>]) -> Result<String> {
    serde_json::to_string_pretty(items).context("Failed to serialize rankings")
}
