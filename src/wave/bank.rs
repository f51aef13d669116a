use std::f32::consts::{PI, TAU};

use crate::wave::WaveTable;

/*
Wave Bank
=========

Six families of single-cycle tables, all built additively from harmonic
series so every table is band-limited to HARMONICS partials and loops
cleanly:

| family | count | character                                              |
| ------ | ----- | ------------------------------------------------------ |
| A      | 16    | saw-like, 1..16 harmonics at 1/k                       |
| B      | 16    | square-like, 1..16 odd harmonics at 1/k                |
| C      | 14    | formant: harmonics weighted around a moving peak       |
| D      | 13    | triangle-like, odd harmonics at 1/k^2, widening        |
| E      | 15    | band-limited pulse, duty 1/32..15/32                   |
| F      | 16    | organ: fundamental + one drawbar harmonic 2..17        |

Each oscillator slot sees a different window onto the bank:

    Primary   = A ++ B ++ C   (46 tables)
    Secondary = D ++ E ++ F   (44 tables)
    Sub       = A             (16 tables)

The tables are generated once at construction. Rendering only ever borrows
them.
*/

const HARMONICS: usize = 32;

pub const WAVES_A_CNT: usize = 16;
pub const WAVES_B_CNT: usize = 16;
pub const WAVES_C_CNT: usize = 14;
pub const WAVES_D_CNT: usize = 13;
pub const WAVES_E_CNT: usize = 15;
pub const WAVES_F_CNT: usize = 16;

/// Which oscillator a wavetable index is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveSlot {
    /// First morph source (`wave0`)
    Primary,
    /// Second morph source (`wave1`)
    Secondary,
    /// Sub-oscillator (`subwave`)
    Sub,
}

/// Resolves wavetable indices to tables the oscillator can read.
///
/// Implementations own the tables; the oscillator keeps plain borrows into
/// them and never copies or frees a table.
pub trait WaveSelector {
    /// Number of selectable tables for a slot. Indices wrap modulo this.
    /// Indices are `u8`, so only the first 256 tables are reachable.
    fn wave_count(&self, slot: WaveSlot) -> usize;

    /// The table at `index` for `slot`, or `None` if the index is out of range.
    fn select(&self, slot: WaveSlot, index: u8) -> Option<&WaveTable>;
}

pub struct WaveBank {
    a: Vec<WaveTable>,
    b: Vec<WaveTable>,
    c: Vec<WaveTable>,
    d: Vec<WaveTable>,
    e: Vec<WaveTable>,
    f: Vec<WaveTable>,
}

impl WaveBank {
    pub fn new() -> Self {
        Self {
            a: (0..WAVES_A_CNT).map(saw_table).collect(),
            b: (0..WAVES_B_CNT).map(square_table).collect(),
            c: (0..WAVES_C_CNT).map(formant_table).collect(),
            d: (0..WAVES_D_CNT).map(triangle_table).collect(),
            e: (0..WAVES_E_CNT).map(pulse_table).collect(),
            f: (0..WAVES_F_CNT).map(organ_table).collect(),
        }
    }

    fn groups(&self, slot: WaveSlot) -> [&[WaveTable]; 3] {
        match slot {
            WaveSlot::Primary => [self.a.as_slice(), &self.b, &self.c],
            WaveSlot::Secondary => [self.d.as_slice(), &self.e, &self.f],
            WaveSlot::Sub => [self.a.as_slice(), &[], &[]],
        }
    }
}

impl Default for WaveBank {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveSelector for WaveBank {
    fn wave_count(&self, slot: WaveSlot) -> usize {
        self.groups(slot).iter().map(|g| g.len()).sum()
    }

    fn select(&self, slot: WaveSlot, index: u8) -> Option<&WaveTable> {
        let mut idx = index as usize;
        for group in self.groups(slot) {
            if idx < group.len() {
                return Some(&group[idx]);
            }
            idx -= group.len();
        }
        None
    }
}

/// Sum of sine partials `amp(k) * sin(2 pi k p)`, normalized.
fn additive(amp: impl Fn(usize) -> f32) -> WaveTable {
    WaveTable::from_fn(|p| {
        (1..=HARMONICS)
            .map(|k| amp(k) * (TAU * k as f32 * p).sin())
            .sum()
    })
    .normalized()
}

fn saw_table(i: usize) -> WaveTable {
    let partials = i + 1;
    additive(|k| if k <= partials { 1.0 / k as f32 } else { 0.0 })
}

fn square_table(i: usize) -> WaveTable {
    let partials = i + 1;
    additive(|k| {
        let odd_rank = (k + 1) / 2;
        if k % 2 == 1 && odd_rank <= partials {
            1.0 / k as f32
        } else {
            0.0
        }
    })
}

fn formant_table(i: usize) -> WaveTable {
    let center = 2.0 + i as f32 * 1.5;
    additive(|k| {
        let d = (k as f32 - center) / 2.0;
        (-d * d).exp() + if k == 1 { 0.3 } else { 0.0 }
    })
}

fn triangle_table(i: usize) -> WaveTable {
    let partials = i + 1;
    additive(|k| {
        let odd_rank = (k + 1) / 2;
        if k % 2 == 1 && odd_rank <= partials {
            // Alternating sign keeps the triangle's corners sharp
            let sign = if odd_rank % 2 == 1 { 1.0 } else { -1.0 };
            sign / (k * k) as f32
        } else {
            0.0
        }
    })
}

fn pulse_table(i: usize) -> WaveTable {
    let duty = (i + 1) as f32 / 32.0;
    // Cosine series of a pulse centred on phase 0
    WaveTable::from_fn(|p| {
        (1..=HARMONICS)
            .map(|k| {
                let kf = k as f32;
                (PI * kf * duty).sin() / kf * (TAU * kf * p).cos()
            })
            .sum()
    })
    .normalized()
}

fn organ_table(i: usize) -> WaveTable {
    let drawbar = i + 2;
    additive(|k| match k {
        1 => 1.0,
        k if k == drawbar => 0.6,
        _ => 0.0,
    })
}
