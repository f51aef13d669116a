//! Audio side: the cpal stream that owns the oscillator.

use std::f32::consts::TAU;
use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};
use std::sync::Arc;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ratatui::DefaultTerminal;
use rtrb::{Consumer, PushError, RingBuffer};

use saavy_waves::{
    Controller, EqualTemperament, MorphOsc, OscInput, Pitch, WaveBank, MAX_BLOCK_SIZE,
};

use super::ui::{UiApp, VIS_BUFFER_SIZE};

/// Capacity in analysis windows for the audio→UI ring
const AUDIO_RING_BLOCKS: usize = 16;

/// Shape LFO rate. Depth is under keyboard control.
const LFO_RATE_HZ: f32 = 0.3;

/// Performance values the UI writes and the audio callback reads once per
/// block. These live outside the oscillator: they are what a host would put
/// into [`OscInput`].
#[derive(Debug)]
pub struct Performance {
    pitch: AtomicU16,
    lfo_depth: AtomicU32,
}

impl Performance {
    fn new(note: u8) -> Self {
        Self {
            pitch: AtomicU16::new(Pitch::new(note, 0).to_word()),
            lfo_depth: AtomicU32::new(0.0f32.to_bits()),
        }
    }

    pub fn pitch(&self) -> Pitch {
        Pitch::from(self.pitch.load(Ordering::Relaxed))
    }

    pub fn set_pitch(&self, pitch: Pitch) {
        self.pitch.store(pitch.to_word(), Ordering::Relaxed);
    }

    pub fn lfo_depth(&self) -> f32 {
        f32::from_bits(self.lfo_depth.load(Ordering::Relaxed))
    }

    pub fn set_lfo_depth(&self, depth: f32) {
        self.lfo_depth
            .store(depth.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }
}

/// A running audio stream plus the handles the UI needs.
pub struct Audition {
    // Dropping the stream stops audio
    _stream: cpal::Stream,
    controller: Controller,
    performance: Arc<Performance>,
    audio_rx: Consumer<f32>,
    sample_rate: f32,
}

impl Audition {
    pub fn start(note: u8) -> EyreResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        log::info!("output: {} Hz, {} channels", sample_rate, channels);

        // The stream callback must be 'static, and so must the bank it borrows
        let bank: &'static WaveBank = Box::leak(Box::new(WaveBank::new()));
        let mut osc = MorphOsc::new(bank, EqualTemperament::with_sample_rate(sample_rate));
        osc.init(0, 0);
        let controller = osc.controller();
        let performance = Arc::new(Performance::new(note));

        let (audio_tx, audio_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * AUDIO_RING_BLOCKS);

        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &config.into(),
                {
                    let performance = Arc::clone(&performance);
                    let mut audio_tx = audio_tx;
                    let mut lfo_phase = 0.0f32;
                    move |data: &mut [f32], _| {
                        let total_frames = data.len() / channels;
                        let mut frames_written = 0;
                        while frames_written < total_frames {
                            let frames_remaining = total_frames - frames_written;
                            let frames_to_render = frames_remaining.min(MAX_BLOCK_SIZE);

                            lfo_phase += frames_to_render as f32 * LFO_RATE_HZ / sample_rate;
                            lfo_phase -= lfo_phase.trunc();
                            let lfo = performance.lfo_depth() * (TAU * lfo_phase).sin();
                            let input = OscInput::new(performance.pitch()).with_shape_lfo(lfo);

                            let block = &mut render_buf[..frames_to_render];
                            osc.render_f32(&input, block);

                            // Duplicate mono to all channels and write to device
                            let out_off = frames_written * channels;
                            for (i, &s) in block.iter().enumerate() {
                                for ch in 0..channels {
                                    data[out_off + i * channels + ch] = s;
                                }
                            }

                            // Push mono block to UI ring, non-blocking (drop on overflow)
                            for &s in block.iter() {
                                if let Err(PushError::Full(_)) = audio_tx.push(s) {
                                    break;
                                }
                            }

                            frames_written += frames_to_render;
                        }
                    }
                },
                move |err| log::error!("stream error: {err}"),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;

        Ok(Self {
            _stream: stream,
            controller,
            performance,
            audio_rx,
            sample_rate,
        })
    }

    /// Run the UI until the user quits. Audio stops when this returns.
    pub fn run(self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let Self {
            _stream: stream,
            controller,
            performance,
            audio_rx,
            sample_rate,
        } = self;

        let mut ui = UiApp::new(audio_rx, controller, performance, sample_rate);
        let res = ui.run(terminal);
        drop(stream);
        res
    }
}
