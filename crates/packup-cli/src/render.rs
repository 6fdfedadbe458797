use std::io::IsTerminal;
use std::time::Duration;

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{ProgressBar, ProgressStyle};
use packup_core::{PackageOutcome, PackageRecord, PlanEntry, SkipReason, UpgradeOutcome};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn current_output_style() -> OutputStyle {
    output_style_for(
        std::io::stdout().is_terminal(),
        std::env::var("NO_COLOR").ok().as_deref(),
    )
}

pub(crate) fn output_style_for(is_terminal: bool, no_color: Option<&str>) -> OutputStyle {
    if is_terminal && no_color.map_or(true, str::is_empty) {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("{} {message}", status_badge(status)),
    }
}

fn status_badge(status: &str) -> &'static str {
    match status {
        "ok" => "[OK]",
        "warn" => "[WARN]",
        "err" => "[ERR]",
        _ => "[..]",
    }
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

pub(crate) fn render_section_header(style: OutputStyle, title: &str) -> String {
    match style {
        OutputStyle::Plain => title.to_string(),
        OutputStyle::Rich => colorize(section_style(), &format!("== {title} ==")),
    }
}

pub(crate) fn format_plan_entry_lines(entry: &PlanEntry, style: OutputStyle) -> Vec<String> {
    match entry {
        PlanEntry::Package(outcome) => vec![format_package_outcome(outcome, style)],
        PlanEntry::NoPackagesFound => vec![
            render_status_line(
                style,
                "warn",
                "No packages found. Have you installed a recent fabric8 package yet?",
            ),
            "You could try passing `fabric8-console` or `fabric8-platform` as a command line argument instead of the `--all` flag".to_string(),
        ],
    }
}

fn format_package_outcome(outcome: &PackageOutcome, style: OutputStyle) -> String {
    let name = &outcome.name;
    match &outcome.outcome {
        UpgradeOutcome::AlreadyCurrent { version } => render_status_line(
            style,
            "step",
            &format!("package {name} is already on version: {version}"),
        ),
        UpgradeOutcome::Upgraded { from, to } => {
            let from = from.as_deref().unwrap_or("none");
            render_status_line(
                style,
                "ok",
                &format!("upgraded package {name} from {from} to {to}"),
            )
        }
        UpgradeOutcome::Skipped(reason @ SkipReason::MissingMetadata { .. }) => {
            render_status_line(style, "warn", &format!("invalid package {name}: {reason}"))
        }
        UpgradeOutcome::Skipped(SkipReason::UnknownPackage) => {
            render_status_line(style, "warn", &format!("unknown package name {name}"))
        }
        UpgradeOutcome::Failed(err) => {
            render_status_line(style, "err", &format!("package {name} failed: {err}"))
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct UpgradeTally {
    pub(crate) upgraded: usize,
    pub(crate) current: usize,
    pub(crate) skipped: usize,
    pub(crate) failed: usize,
}

impl UpgradeTally {
    pub(crate) fn record(&mut self, entry: &PlanEntry) {
        let Some(outcome) = entry.package() else {
            return;
        };
        match outcome.outcome {
            UpgradeOutcome::AlreadyCurrent { .. } => self.current += 1,
            UpgradeOutcome::Upgraded { .. } => self.upgraded += 1,
            UpgradeOutcome::Skipped(_) => self.skipped += 1,
            UpgradeOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub(crate) fn summary_line(&self, style: OutputStyle) -> String {
        let status = if self.failed > 0 { "warn" } else { "ok" };
        render_status_line(
            style,
            status,
            &format!(
                "upgraded={} current={} skipped={} failed={}",
                self.upgraded, self.current, self.skipped, self.failed
            ),
        )
    }
}

pub(crate) fn format_package_list_lines(records: &[PackageRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            let version = record.installed_version.as_deref().unwrap_or("unknown");
            match record.missing_metadata() {
                Some(reason) => format!("{} {version} (invalid: {reason})", record.name),
                None => format!("{} {version}", record.name),
            }
        })
        .collect()
}

/// Spinner shown while packages are checked; lines printed through it do not tear the bar.
pub(crate) struct UpgradeProgress {
    progress_bar: Option<ProgressBar>,
}

impl UpgradeProgress {
    pub(crate) fn start(style: OutputStyle, label: &str) -> Self {
        let progress_bar = if style == OutputStyle::Rich {
            let progress_bar = ProgressBar::new_spinner();
            if let Ok(spinner) = ProgressStyle::with_template("{spinner:.cyan.bold} {msg} {elapsed}")
            {
                progress_bar.set_style(spinner.tick_chars("-=~* "));
            }
            progress_bar.set_message(label.to_string());
            progress_bar.enable_steady_tick(Duration::from_millis(80));
            Some(progress_bar)
        } else {
            None
        };
        Self { progress_bar }
    }

    pub(crate) fn print_lines(&self, lines: &[String]) {
        let print = || {
            for line in lines {
                println!("{line}");
            }
        };
        match &self.progress_bar {
            Some(progress_bar) => progress_bar.suspend(print),
            None => print(),
        }
    }

    pub(crate) fn finish(mut self) {
        if let Some(progress_bar) = self.progress_bar.take() {
            progress_bar.finish_and_clear();
        }
    }
}
