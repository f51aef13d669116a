//! Parameter panel widget

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use saavy_waves::osc::{ParamId, Params};
use saavy_waves::WaveSlot;

/// Width of the value bar in cells
const BAR_WIDTH: usize = 24;

/// One editable line of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Param(ParamId),
    /// Shape LFO depth, a performance control rather than a unit parameter
    LfoDepth,
}

impl Row {
    pub const PARAM_COUNT: usize = ParamId::ALL.len();

    pub const ALL: [Row; ParamId::ALL.len() + 1] = [
        Row::Param(ParamId::Id1),
        Row::Param(ParamId::Id2),
        Row::Param(ParamId::Id3),
        Row::Param(ParamId::Id4),
        Row::Param(ParamId::Id5),
        Row::Param(ParamId::Id6),
        Row::Param(ParamId::Shape),
        Row::Param(ParamId::ShiftShape),
        Row::LfoDepth,
    ];

    pub fn param_id(self) -> Option<ParamId> {
        match self {
            Row::Param(id) => Some(id),
            Row::LfoDepth => None,
        }
    }

    pub fn wave_slot(self) -> Option<WaveSlot> {
        match self {
            Row::Param(ParamId::Id1) => Some(WaveSlot::Primary),
            Row::Param(ParamId::Id2) => Some(WaveSlot::Secondary),
            Row::Param(ParamId::Id3) => Some(WaveSlot::Sub),
            _ => None,
        }
    }

    /// `(max, step)` of the raw host value for continuous rows.
    pub fn raw_range(self) -> (u16, u16) {
        match self {
            Row::Param(ParamId::Shape | ParamId::ShiftShape) => (1023, 32),
            _ => (100, 5),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Row::Param(ParamId::Id1) => "Wave A",
            Row::Param(ParamId::Id2) => "Wave B",
            Row::Param(ParamId::Id3) => "Sub wave",
            Row::Param(ParamId::Id4) => "Sub mix",
            Row::Param(ParamId::Id5) => "Ring mix",
            Row::Param(ParamId::Id6) => "Bit crush",
            Row::Param(ParamId::Shape) => "Shape",
            Row::Param(ParamId::ShiftShape) => "Drift",
            Row::LfoDepth => "LFO depth",
        }
    }
}

enum Readout {
    Index(u8),
    Level(f32),
}

fn readout(row: Row, params: &Params, lfo_depth: f32) -> Readout {
    match row {
        Row::Param(ParamId::Id1) => Readout::Index(params.wave0),
        Row::Param(ParamId::Id2) => Readout::Index(params.wave1),
        Row::Param(ParamId::Id3) => Readout::Index(params.subwave),
        Row::Param(ParamId::Id4) => Readout::Level(params.submix),
        Row::Param(ParamId::Id5) => Readout::Level(params.ringmix),
        Row::Param(ParamId::Id6) => Readout::Level(params.bitcrush),
        Row::Param(ParamId::Shape) => Readout::Level(params.shape),
        Row::Param(ParamId::ShiftShape) => Readout::Level(params.shiftshape),
        Row::LfoDepth => Readout::Level(lfo_depth),
    }
}

fn bar(level: f32) -> String {
    let filled = (level.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize;
    let mut s = "█".repeat(filled);
    s.push_str(&"·".repeat(BAR_WIDTH - filled));
    s
}

/// Render the parameter list, highlighting `selected`.
pub fn render_panel(
    frame: &mut Frame,
    area: Rect,
    params: &Params,
    lfo_depth: f32,
    selected: usize,
) {
    let block = Block::default().title(" Parameters ").borders(Borders::ALL);

    let lines: Vec<Line> = Row::ALL
        .iter()
        .enumerate()
        .map(|(i, &row)| {
            let marker = if i == selected { "▶ " } else { "  " };
            let label_style = if i == selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let value = match readout(row, params, lfo_depth) {
                Readout::Index(index) => Span::styled(
                    format!("#{index:<3}"),
                    Style::default().fg(Color::LightMagenta),
                ),
                Readout::Level(level) => Span::styled(
                    format!("{} {:>5.3}", bar(level), level),
                    Style::default().fg(Color::Green),
                ),
            };

            Line::from(vec![
                Span::styled(format!("{marker}{:<10}", row.label()), label_style),
                value,
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
