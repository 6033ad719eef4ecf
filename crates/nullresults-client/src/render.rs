//! Text renderers for the view states. Every match is exhaustive; adding a
//! state without a rendering is a compile error.

use crate::flows::{DetailState, ListState, SubmitState};
use nullresults_model::{display_author, format_created_at, parse_tags, ExperimentSummary};

#[must_use]
pub fn render_submit(state: &SubmitState) -> String {
    match state {
        SubmitState::Idle => "Share a failed experiment.".to_string(),
        SubmitState::Submitting => "Submitting…".to_string(),
        SubmitState::Success { id } => {
            format!("Thanks! Your experiment was published as #{id}.")
        }
        SubmitState::Error { message } => format!("Submission failed: {message}"),
    }
}

#[must_use]
pub fn render_list(state: &ListState) -> String {
    match state {
        ListState::Loading => "Loading experiments…".to_string(),
        ListState::Failed { message } => message.clone(),
        ListState::Loaded { entries } if entries.is_empty() => {
            "No experiments yet. Be the first brave soul.\nSubmit one →".to_string()
        }
        ListState::Loaded { entries } => {
            let mut out = String::new();
            for entry in entries {
                out.push_str(&render_list_entry(entry));
                out.push('\n');
            }
            out
        }
    }
}

fn render_list_entry(entry: &ExperimentSummary) -> String {
    let mut out = format!(
        "#{} {}\n  {} • {}\n  {}",
        entry.id,
        entry.title,
        format_created_at(&entry.created_at),
        display_author(entry.author_name.as_deref()),
        entry.summary,
    );
    if let Some(chips) = render_tag_chips(entry.tags.as_deref()) {
        out.push_str("\n  ");
        out.push_str(&chips);
    }
    out.push('\n');
    out
}

#[must_use]
pub fn render_detail(state: &DetailState) -> String {
    match state {
        DetailState::Loading => "Loading detailed failure report…".to_string(),
        DetailState::NotFound => "Experiment not found.".to_string(),
        DetailState::Failed { message } => message.clone(),
        DetailState::Loaded { experiment } => {
            let mut out = format!(
                "{}\n{}\nby {}\n\n{}\n\nWhat did they try?\n{}\n\nWhat went wrong?\n{}\n\nWhat did they learn?\n{}\n",
                experiment.title,
                experiment.created_at,
                display_author(experiment.author_name.as_deref()),
                experiment.summary,
                experiment.what_tried,
                experiment.what_went_wrong,
                experiment.what_learned,
            );
            if let Some(chips) = render_tag_chips(experiment.tags.as_deref()) {
                out.push_str("\nTags: ");
                out.push_str(&chips);
                out.push('\n');
            }
            out
        }
    }
}

fn render_tag_chips(tags: Option<&str>) -> Option<String> {
    let chips = parse_tags(tags?);
    if chips.is_empty() {
        return None;
    }
    Some(
        chips
            .iter()
            .map(|t| format!("[{t}]"))
            .collect::<Vec<_>>()
            .join(" "),
    )
}
