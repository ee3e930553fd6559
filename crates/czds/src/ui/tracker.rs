use czds_fetch::{Outcome, Report};
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

const PB_STYLE: &str =
    "{spinner:.blue} {prefix:>10.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len} ({eta}) {msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    let style = match ProgressStyle::with_template(PB_STYLE) {
        Ok(style) => style.tick_chars(TICK).progress_chars(PB_CHARS),
        Err(_) => return None,
    };

    Some(style)
});

/// One tick per settled zone.
#[derive(Clone)]
pub struct ZoneTracker {
    pb: ProgressBar,
}

impl ZoneTracker {
    pub fn new(zones: u64) -> Self {
        let pb = ProgressBar::new(zones);
        let pb = match PB_TEMPLATE.as_ref() {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };
        pb.set_prefix("fetch");
        Self { pb }
    }

    pub fn observe(&self, report: &Report) {
        let verb = match report.outcome {
            Outcome::Skipped => "skipped",
            Outcome::Transferred { .. } => "fetched",
            Outcome::Failed { .. } | Outcome::Abandoned => "failed",
            Outcome::Cancelled => "cancelled",
        };
        self.pb.set_message(format!("{verb} {}", czds_api::tld_from_url(&report.url)));
        self.pb.inc(1);
    }

    pub fn finish(self) {
        self.pb.finish_with_message("done");
    }
}
