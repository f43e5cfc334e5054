//! Plain-text rendering for terminal front-ends.
use crate::{
    admin::{Analytics, LeadingOption, leading_option, status_label},
    detail::PollDetail,
    models::{Poll, VoteRecord},
    utils::Page,
    wizard::{Step, Wizard},
};

const BAR_WIDTH: usize = 30;

pub const POLL_NOT_FOUND: &str = "Poll not found";
pub const POLL_NOT_ACTIVE: &str = "Poll not active";

fn bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), " ".repeat(BAR_WIDTH - filled))
}

pub fn step_header(step: Step) -> String {
    format!(
        "Step {} of {}  {}\n{} {}%",
        step.number(),
        Step::COUNT,
        step.label(),
        bar(step.progress() as f64),
        step.progress()
    )
}

pub fn error_banner(error: Option<&str>) -> Option<String> {
    error.map(|message| format!("! {message}  (enter 'dismiss' to hide)"))
}

pub fn not_found() -> String {
    POLL_NOT_FOUND.to_string()
}

pub fn inactive(poll: &Poll, browse_url: &str) -> String {
    format!(
        "{POLL_NOT_ACTIVE}\n\"{}\" is not accepting votes right now.\nBrowse other polls: {browse_url}",
        poll.title
    )
}

pub fn load_failed(message: &str) -> String {
    format!("{message}\nEnter 'retry' to try again.")
}

pub fn code_sent(wizard: &Wizard) -> String {
    format!(
        "We've sent a verification code to {}\nEnter 6-digit code",
        wizard.voter().email.trim()
    )
}

pub fn ballot(wizard: &Wizard) -> String {
    let mut out = format!("{}\n", wizard.poll().title);

    for (index, option) in wizard.poll().options.iter().enumerate() {
        let marker = if option.id == wizard.selected_option() { "x" } else { " " };
        out.push_str(&format!("  ({marker}) {}. {}\n", index + 1, option.text));
    }

    out
}

pub fn results(wizard: &Wizard) -> String {
    let Some(results) = wizard.results() else {
        return "Results are not available yet.".to_string();
    };

    let mut out = format!("{}\n", wizard.poll().title);
    for result in &results.options {
        let share = results.percentage(result);
        out.push_str(&format!(
            "  {:<24} {} {} votes ({share:.1}%)\n",
            result.text,
            bar(share),
            result.votes
        ));
    }
    out.push_str(&format!("Total votes: {}", results.total()));

    out
}

fn leading_line(leading: &LeadingOption) -> String {
    match leading.option_id {
        Some(_) => format!(
            "Leading option: {} {}% ({} vote(s))",
            leading.text,
            leading.percentage(),
            leading.votes
        ),
        None => format!("Leading option: {}", leading.text),
    }
}

pub fn poll_table(page: &Page<&Poll>) -> String {
    if page.items.is_empty() {
        return "No polls found.".to_string();
    }

    let mut lines: Vec<String> = page
        .items
        .iter()
        .flat_map(|poll| {
            [
                format!(
                    "[{}] {}  ({}, {} vote(s), {} option(s))",
                    poll.id,
                    poll.title,
                    status_label(poll.active),
                    poll.votes.len(),
                    poll.options.len()
                ),
                format!("    {}", leading_line(&leading_option(poll))),
            ]
        })
        .collect();

    let mut footer = format!("Page {} of {}", page.page, page.total_pages);
    if page.has_previous() {
        footer.push_str(&format!("  previous: --page {}", page.page - 1));
    }
    if page.has_next() {
        footer.push_str(&format!("  next: --page {}", page.page + 1));
    }
    lines.push(footer);

    lines.join("\n")
}

pub fn poll_detail(detail: &PollDetail, voters: &Page<&VoteRecord>) -> String {
    let poll = detail.poll();
    let mut out = format!(
        "{}  ({})\n{} votes • {} options\n\n",
        poll.title,
        status_label(poll.active),
        detail.voters().len(),
        poll.options.len()
    );

    for option in detail.breakdown() {
        out.push_str(&format!(
            "  {:<24} {} {} votes ({}%)\n",
            option.text,
            bar(option.percentage as f64),
            option.votes,
            option.percentage
        ));
    }

    out.push('\n');
    if voters.items.is_empty() {
        out.push_str("No voters found matching your criteria.");
        return out;
    }

    for vote in &voters.items {
        let (name, email) = vote
            .voter
            .as_ref()
            .map(|voter| (voter.name.as_str(), voter.email.as_str()))
            .unwrap_or(("Unknown", ""));
        out.push_str(&format!(
            "  [{}] {name} <{email}> -> {}\n",
            vote.id,
            detail.option_label(vote)
        ));
    }
    out.push_str(&format!(
        "Showing {}-{} of {} voters",
        voters.first_index(),
        voters.first_index() + voters.items.len() - 1,
        voters.total_items
    ));

    out
}

pub fn analytics(analytics: &Analytics) -> String {
    let mut out = format!(
        "Polls: {} ({} active, {}% of total polls)\nVotes: {} (avg {} votes per poll)\n",
        analytics.total_polls,
        analytics.active_polls,
        analytics.active_percentage,
        analytics.total_votes,
        analytics.average_votes
    );

    let most = analytics.bars.iter().map(|(_, votes)| *votes).max().unwrap_or(0);
    for (title, votes) in &analytics.bars {
        let share = if most == 0 { 0.0 } else { *votes as f64 / most as f64 * 100.0 };
        out.push_str(&format!("  {title:<24} {} {votes}\n", bar(share)));
    }

    out
}
