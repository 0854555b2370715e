use std::fmt::Write as _;

use feed_core::{AppViewModel, ClassificationStatus, DocumentRow, RegionView};

use super::layout::TerminalLayout;

const END_OF_FEED: &str = "-- end of feed --";

/// Renders the whole screen. The feed area shows the lines of the active feed
/// between the window scroll offset and the bottom of the terminal.
pub fn render(view: &AppViewModel, layout: &TerminalLayout) -> String {
    let mut out = String::new();
    push_header(&mut out, view);

    let active = view.feeds.iter().find(|feed| feed.visible);
    match active {
        Some(feed) => {
            let lines = region_lines(feed, layout);
            let start = layout.scroll_top().max(0) as usize;
            for line in lines.iter().skip(start).take(layout.feed_height() as usize) {
                let _ = writeln!(out, "{line}");
            }
        }
        None => {
            let _ = writeln!(out, "(no feed)");
        }
    }

    if let Some((feed, keyword, region)) = &view.preview {
        let _ = writeln!(out, "==== preview {feed} \"{keyword}\" (close to return) ====");
        let lines = region_lines(region, layout);
        let start = layout.preview_scroll().max(0) as usize;
        for line in lines
            .iter()
            .skip(start)
            .take(layout.preview_height() as usize)
        {
            let _ = writeln!(out, "{line}");
        }
    }

    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "!! {notice} (dismiss to continue)");
    }
    out
}

fn push_header(out: &mut String, view: &AppViewModel) {
    let feed = view
        .active_feed
        .map(|feed| feed.to_string())
        .unwrap_or_else(|| "-".to_string());
    match &view.stats {
        Some(stats) if stats.result_status_visible => {
            let _ = writeln!(
                out,
                "[{feed}] kept {} | discarded {} | total {} | snr {}",
                stats.kept, stats.discarded, stats.total, stats.snr
            );
        }
        _ => {
            let _ = writeln!(out, "[{feed}]");
        }
    }
    let _ = writeln!(out, "+ {}", view.keywords.positive.join(", "));
    let _ = writeln!(out, "- {}", view.keywords.negative.join(", "));
}

/// Every line of a region, in the same units the layout measures.
fn region_lines(region: &RegionView, layout: &TerminalLayout) -> Vec<String> {
    let mut lines = Vec::new();
    for row in &region.documents {
        lines.push(separator(row));
        lines.extend(layout.document_lines(&row.id, &row.html));
    }
    match &region.loading {
        Some(placeholder) => lines.push(placeholder.clone()),
        None if !region.has_more => lines.push(END_OF_FEED.to_string()),
        None => {}
    }
    lines
}

fn separator(row: &DocumentRow) -> String {
    let marker = match row.status {
        ClassificationStatus::Keep => "[keep]",
        ClassificationStatus::Discard => "[discard]",
        ClassificationStatus::Unknown => "[ ]",
    };
    if row.deciding_keywords.is_empty() {
        format!("{marker} {}", row.id)
    } else {
        format!("{marker} {} ({})", row.id, row.deciding_keywords.join(", "))
    }
}
