use airrace_evaluator::policy::StrategySummary;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

/// "AI strategy (simplified)" panel.
pub struct StrategyDisplay<'a> {
    summary: StrategySummary,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StrategyDisplay<'a> {
    pub fn new(summary: StrategySummary) -> Self {
        Self {
            summary,
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
        4 + super::block_vertical_margin(self.block.as_ref())
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let StrategySummary {
            distance,
            shooting,
            evasion,
            weave,
            tempo,
        } = self.summary;
        vec![
            entry("Preferred distance: ", distance.to_string()),
            entry("Willingness to shoot: ", shooting.to_string()),
            entry("Evasion: ", evasion.to_string()),
            Line::from(vec![
                Span::styled("Weave: ", style::LABEL),
                Span::styled(weave.to_string(), style::DEFAULT),
                Span::styled(" · Tempo: ", style::LABEL),
                Span::styled(tempo.to_string(), style::DEFAULT),
            ]),
        ]
    }
}

fn entry(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, style::LABEL),
        Span::styled(value, style::DEFAULT),
    ])
}

impl Widget for StrategyDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        Text::from(self.lines()).render(area, buf);
    }
}
