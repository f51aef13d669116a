//! TUI module for saavy-waves
//!
//! Oscilloscope, spectrum and a parameter panel. Every edit goes through the
//! oscillator's [`Controller`], so the panel exercises the same cross-thread
//! path a host would.

mod panel;
mod spectrum;
mod waveform;

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use saavy_waves::pitch::MAX_NOTE;
use saavy_waves::{Controller, OscInput, Pitch};

use super::app::Performance;
use panel::{render_panel, Row};
use spectrum::{render_spectrum, SpectrumAnalyzer};
use waveform::render_waveform;

/// Audio visualization buffer size, also the FFT length
pub const VIS_BUFFER_SIZE: usize = 1024;

const LFO_DEPTH_STEP: f32 = 0.05;

/// UI application state
pub struct UiApp {
    /// Ring buffer receiver for audio samples
    audio_rx: Consumer<f32>,
    controller: Controller,
    performance: Arc<Performance>,
    /// Last raw host value sent for each parameter row
    raw: [u16; Row::PARAM_COUNT],
    selected: usize,
    /// Audio sample buffer for visualization
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    sample_rate: f32,
    /// Whether the app should quit
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        audio_rx: Consumer<f32>,
        controller: Controller,
        performance: Arc<Performance>,
        sample_rate: f32,
    ) -> Self {
        Self {
            audio_rx,
            controller,
            performance,
            raw: [0; Row::PARAM_COUNT],
            selected: 0,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            sample_rate,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Poll for new audio samples from ring buffer, keeping the last
    /// `VIS_BUFFER_SIZE`.
    fn poll_audio(&mut self) {
        let available = self.audio_rx.slots();
        if available == 0 {
            return;
        }

        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }

        self.spectrum.update(&self.audio_buffer);
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.checked_sub(1).unwrap_or(Row::ALL.len() - 1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1) % Row::ALL.len();
            }
            KeyCode::Left | KeyCode::Char('h') => self.nudge(false),
            KeyCode::Right | KeyCode::Char('l') => self.nudge(true),
            KeyCode::Char(' ') => {
                let input = OscInput::new(self.performance.pitch());
                self.controller.note_on(&input);
            }
            KeyCode::Char('-') => self.transpose(-1),
            KeyCode::Char('=') | KeyCode::Char('+') => self.transpose(1),
            KeyCode::Char('[') => self.transpose(-12),
            KeyCode::Char(']') => self.transpose(12),
            _ => {}
        }
    }

    /// Step the selected row up or down by one detent.
    fn nudge(&mut self, up: bool) {
        let row = Row::ALL[self.selected];
        let Some(id) = row.param_id() else {
            let step = if up { LFO_DEPTH_STEP } else { -LFO_DEPTH_STEP };
            let depth = self.performance.lfo_depth() + step;
            self.performance.set_lfo_depth(depth);
            return;
        };

        let i = id.index() as usize;
        let value = match row.wave_slot() {
            Some(slot) => {
                let count = self.controller.wave_count(slot) as u16;
                if up {
                    (self.raw[i] + 1) % count
                } else {
                    (self.raw[i] + count - 1) % count
                }
            }
            None => {
                let (max, step) = row.raw_range();
                if up {
                    (self.raw[i] + step).min(max)
                } else {
                    self.raw[i].saturating_sub(step)
                }
            }
        };

        self.raw[i] = value;
        self.controller.set_parameter(id.index(), value);
    }

    fn transpose(&mut self, semitones: i16) {
        let pitch = self.performance.pitch();
        let note = (pitch.note as i16 + semitones).clamp(0, MAX_NOTE as i16) as u8;
        self.performance.set_pitch(Pitch::new(note, pitch.fine));
        log::debug!("note {} -> {}", pitch.note, note);
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),   // Scope + spectrum
                Constraint::Length(12), // Parameter panel
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let scopes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        render_waveform(
            frame,
            scopes[0],
            &self.audio_buffer,
            self.performance.pitch(),
            self.sample_rate,
        );
        render_spectrum(frame, scopes[1], self.spectrum.data());

        render_panel(
            frame,
            rows[1],
            &self.controller.params(),
            self.performance.lfo_depth(),
            self.selected,
        );

        let help = Paragraph::new(
            " [Q] Quit  [↑↓] Select  [←→] Adjust  [Space] Retrigger  [-=] Semitone  [[]] Octave",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[2]);
    }
}
