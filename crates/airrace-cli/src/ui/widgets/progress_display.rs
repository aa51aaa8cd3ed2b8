use std::{iter, time::Duration};

use airrace_training::strategy::GenerationReport;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

/// What the learning panel shows.
#[derive(Debug, Clone, Copy)]
pub struct LearningStatus<'a> {
    pub latest: Option<&'a GenerationReport>,
    pub enabled: bool,
    pub delay: Duration,
}

/// "AI progress" panel: generation, best and average kill times, improvement
/// and the learner settings.
pub struct ProgressDisplay<'a> {
    status: LearningStatus<'a>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> ProgressDisplay<'a> {
    pub fn new(status: LearningStatus<'a>) -> Self {
        Self {
            status,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap() + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Seconds with one decimal, or `–` before the first generation.
fn seconds(value: Option<f64>) -> String {
    value.map_or_else(|| "–".to_owned(), |v| format!("{v:.1}s"))
}

/// A faster kill time shows as a negative change.
pub fn format_improvement(improvement: Option<f64>) -> String {
    match improvement {
        None => "–".to_owned(),
        Some(d) if d >= 0.0 => format!("-{d:.1}s"),
        Some(d) => format!("+{:.1}s", -d),
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    LabelValue(&'static str, &'static dyn Fn(&LearningStatus) -> String),
}

const ROWS: &[Row] = &[
    Row::LabelValue("Generation:", &|status| {
        status
            .latest
            .map_or(0, |report| report.generation)
            .to_string()
    }),
    Row::LabelValue("Best:", &|status| {
        seconds(status.latest.map(|report| report.best_fitness))
    }),
    Row::LabelValue("Average:", &|status| {
        seconds(status.latest.map(|report| report.elite_mean_fitness))
    }),
    Row::LabelValue("Improvement:", &|status| {
        format_improvement(status.latest.and_then(|report| report.improvement))
    }),
    Row::Empty,
    Row::LabelValue("Learning:", &|status| {
        let label = if status.enabled { "ON" } else { "OFF" };
        label.to_owned()
    }),
    Row::LabelValue("Delay:", &|status| format!("{} ms", status.delay.as_millis())),
];

impl Widget for ProgressDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style::LABEL)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(&self.status), style::DEFAULT)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
