//! Triggered oscilloscope
//!
//! The trace starts at a rising zero crossing and spans a fixed number of
//! periods of the held note, so a steady tone stands still on screen instead
//! of scrolling with the audio ring.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Line,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use saavy_waves::pitch::midi_note_to_freq;
use saavy_waves::Pitch;

/// Periods of the held note shown across the scope
const CYCLES_SHOWN: f32 = 2.0;

/// Samples in `CYCLES_SHOWN` periods of `pitch`, at least two.
fn window_len(pitch: Pitch, sample_rate: f32) -> usize {
    let hz = midi_note_to_freq(pitch.note as f32 + pitch.fine as f32 / 256.0);
    ((CYCLES_SHOWN * sample_rate / hz).round() as usize).max(2)
}

/// Index of the first rising zero crossing that leaves `len` samples after
/// it, or the start of the last `len` samples when the signal never crosses.
fn trigger_point(samples: &[f32], len: usize) -> usize {
    let last = samples.len().saturating_sub(len);
    let end = (last + 1).min(samples.len());
    samples[..end]
        .windows(2)
        .position(|w| w[0] < 0.0 && w[1] >= 0.0)
        .map_or(last, |i| i + 1)
}

pub fn render_waveform(
    frame: &mut Frame,
    area: Rect,
    audio_buffer: &[f32],
    pitch: Pitch,
    sample_rate: f32,
) {
    let len = window_len(pitch, sample_rate).min(audio_buffer.len());
    let start = trigger_point(audio_buffer, len);
    let trace = &audio_buffer[start..start + len];

    let points: Vec<(f64, f64)> = trace
        .iter()
        .enumerate()
        .map(|(i, &y)| (i as f64, y as f64))
        .collect();
    let peak = trace.iter().fold(0.0f32, |m, y| m.max(y.abs()));

    let scope = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(&points);

    let title = Line::from(format!(
        " Scope · note {} · {} smp · peak {:.2} ",
        pitch.note, len, peak
    ));
    let chart = Chart::new(vec![scope])
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .bounds([0.0, len.saturating_sub(1) as f64])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .labels(vec!["-1.0", "0.0", "+1.0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
