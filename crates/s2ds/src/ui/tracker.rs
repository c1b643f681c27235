use std::sync::Arc;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use once_cell::sync::Lazy;
use s2ds_datasets::{BoxLines, DatasetEvent, EventCallback, Shard};
use tracing::debug;

const SHARD_STYLE: &str = "{spinner:.blue} {prefix:>10.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len} {wide_msg}";

const LINE_STYLE: &str = "{spinner:.blue} {prefix:>10.cyan.bold} {human_pos} ({per_sec}) {wide_msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static SHARD_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    let style = match ProgressStyle::with_template(SHARD_STYLE) {
        Ok(style) => style.tick_chars(TICK).progress_chars(PB_CHARS),
        Err(_) => return None,
    };

    Some(style)
});

static LINE_TEMPLATE: Lazy<Option<ProgressStyle>> =
    Lazy::new(|| ProgressStyle::with_template(LINE_STYLE).ok().map(|style| style.tick_chars(TICK)));

fn styled(pb: ProgressBar, style: &Lazy<Option<ProgressStyle>>) -> ProgressBar {
    match style.as_ref() {
        Some(style) => pb.with_style(style.clone()),
        None => pb,
    }
}

/// Two stacked bars on stderr: shards done, and lines of the current shard.
///
/// Driven by dataset events plus an optional line layer; cloning shares the bars.
#[derive(Debug, Clone)]
pub struct ShardProgress {
    multi:  MultiProgress,
    shards: ProgressBar,
    lines:  ProgressBar,
}

impl Default for ShardProgress {
    fn default() -> Self { Self::new() }
}

impl ShardProgress {
    pub fn new() -> Self {
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::stderr());
        let shards = multi.add(styled(ProgressBar::new(0), &SHARD_TEMPLATE));
        shards.set_prefix("shards");
        let lines = multi.add(styled(ProgressBar::new_spinner(), &LINE_TEMPLATE));
        lines.set_prefix("lines");

        Self { multi, shards, lines }
    }

    pub fn on_event(&self, event: &DatasetEvent) {
        match event {
            DatasetEvent::ReleaseResolved { release_id } => {
                self.shards.set_message(format!("release {release_id}"));
            }
            DatasetEvent::ShardsListed { dataset, release_id, count } => {
                self.shards.set_length(*count as u64);
                self.shards.set_message(format!("{dataset} @ {release_id}"));
            }
            DatasetEvent::ShardStarted { shard } => self.start_shard(shard.to_string()),
            DatasetEvent::ShardStreamed { .. } => self.shards.inc(1),
            DatasetEvent::ShardDownloaded { path, bytes, .. } => {
                self.shards.inc(1);
                self.lines.set_message(format!("{} ({bytes} bytes)", path.display()));
            }
        }
    }

    /// Resets the line spinner for a new shard labelled `label`.
    pub fn start_shard(&self, label: impl Into<String>) {
        self.lines.reset();
        self.lines.set_message(label.into());
    }

    pub fn event_callback(&self) -> EventCallback {
        let progress = self.clone();
        Arc::new(move |event| progress.on_event(event))
    }

    /// Counts lines as they pass through.
    pub fn count_lines<'a>(&self, lines: BoxLines<'a>) -> BoxLines<'a> {
        let bar = self.lines.clone();
        Box::new(lines.inspect(move |_| bar.inc(1)))
    }

    /// Line layer for [`Datasets::records_with`](s2ds_datasets::Datasets::records_with).
    pub fn layer<'a>(&self) -> impl FnMut(&Shard, BoxLines<'a>) -> BoxLines<'a> {
        let progress = self.clone();
        move |_shard: &Shard, lines: BoxLines<'a>| progress.count_lines(lines)
    }

    pub fn finish(self) {
        self.lines.finish_and_clear();
        self.shards.finish();
        if let Err(err) = self.multi.clear() {
            debug!(error = %err, "failed to clear progress bars");
        }
    }
}
