//! Bit-set types stored in replays: gameplay mods and per-frame inputs

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Gameplay modifiers enabled for a play
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mods(u32);

impl Mods {
    pub const NONE: Mods = Mods(0);
    pub const NO_FAIL: Mods = Mods(1 << 0);
    pub const EASY: Mods = Mods(1 << 1);
    pub const TOUCH_DEVICE: Mods = Mods(1 << 2);
    pub const HIDDEN: Mods = Mods(1 << 3);
    pub const HARD_ROCK: Mods = Mods(1 << 4);
    pub const SUDDEN_DEATH: Mods = Mods(1 << 5);
    pub const DOUBLE_TIME: Mods = Mods(1 << 6);
    pub const RELAX: Mods = Mods(1 << 7);
    pub const HALF_TIME: Mods = Mods(1 << 8);
    /// Always set together with `DOUBLE_TIME`
    pub const NIGHTCORE: Mods = Mods(1 << 9);
    pub const FLASHLIGHT: Mods = Mods(1 << 10);
    pub const AUTOPLAY: Mods = Mods(1 << 11);
    pub const SPUN_OUT: Mods = Mods(1 << 12);
    pub const AUTOPILOT: Mods = Mods(1 << 13);
    /// Always set together with `SUDDEN_DEATH`
    pub const PERFECT: Mods = Mods(1 << 14);
    pub const KEY4: Mods = Mods(1 << 15);
    pub const KEY5: Mods = Mods(1 << 16);
    pub const KEY6: Mods = Mods(1 << 17);
    pub const KEY7: Mods = Mods(1 << 18);
    pub const KEY8: Mods = Mods(1 << 19);
    pub const FADE_IN: Mods = Mods(1 << 20);
    pub const RANDOM: Mods = Mods(1 << 21);
    pub const CINEMA: Mods = Mods(1 << 22);
    pub const TARGET: Mods = Mods(1 << 23);
    pub const KEY9: Mods = Mods(1 << 24);
    pub const KEY_COOP: Mods = Mods(1 << 25);
    pub const KEY1: Mods = Mods(1 << 26);
    pub const KEY3: Mods = Mods(1 << 27);
    pub const KEY2: Mods = Mods(1 << 28);
    pub const SCORE_V2: Mods = Mods(1 << 29);
    pub const MIRROR: Mods = Mods(1 << 30);

    pub const KEY_MOD: Mods = Mods(
        Self::KEY1.0
            | Self::KEY2.0
            | Self::KEY3.0
            | Self::KEY4.0
            | Self::KEY5.0
            | Self::KEY6.0
            | Self::KEY7.0
            | Self::KEY8.0
            | Self::KEY9.0
            | Self::KEY_COOP.0,
    );
    pub const FREE_MOD_ALLOWED: Mods = Mods(
        Self::NO_FAIL.0
            | Self::EASY.0
            | Self::HIDDEN.0
            | Self::HARD_ROCK.0
            | Self::SUDDEN_DEATH.0
            | Self::FLASHLIGHT.0
            | Self::FADE_IN.0
            | Self::RELAX.0
            | Self::AUTOPILOT.0
            | Self::SPUN_OUT.0
            | Self::KEY_MOD.0,
    );
    pub const SCORE_INCREASE_MODS: Mods = Mods(
        Self::HIDDEN.0 | Self::HARD_ROCK.0 | Self::DOUBLE_TIME.0 | Self::FLASHLIGHT.0 | Self::FADE_IN.0,
    );

    /// Acronyms in bit order
    const ACRONYMS: [(Mods, &'static str); 31] = [
        (Self::NO_FAIL, "NF"),
        (Self::EASY, "EZ"),
        (Self::TOUCH_DEVICE, "TD"),
        (Self::HIDDEN, "HD"),
        (Self::HARD_ROCK, "HR"),
        (Self::SUDDEN_DEATH, "SD"),
        (Self::DOUBLE_TIME, "DT"),
        (Self::RELAX, "RX"),
        (Self::HALF_TIME, "HT"),
        (Self::NIGHTCORE, "NC"),
        (Self::FLASHLIGHT, "FL"),
        (Self::AUTOPLAY, "AT"),
        (Self::SPUN_OUT, "SO"),
        (Self::AUTOPILOT, "AP"),
        (Self::PERFECT, "PF"),
        (Self::KEY4, "4K"),
        (Self::KEY5, "5K"),
        (Self::KEY6, "6K"),
        (Self::KEY7, "7K"),
        (Self::KEY8, "8K"),
        (Self::FADE_IN, "FI"),
        (Self::RANDOM, "RD"),
        (Self::CINEMA, "CN"),
        (Self::TARGET, "TP"),
        (Self::KEY9, "9K"),
        (Self::KEY_COOP, "CO"),
        (Self::KEY1, "1K"),
        (Self::KEY3, "3K"),
        (Self::KEY2, "2K"),
        (Self::SCORE_V2, "V2"),
        (Self::MIRROR, "MR"),
    ];

    /// Wrap raw mod bits as stored in a replay
    pub const fn from_bits(bits: u32) -> Self {
        Mods(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set
    pub const fn contains(self, other: Mods) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if at least one bit of `other` is set
    pub const fn intersects(self, other: Mods) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn union(self, other: Mods) -> Mods {
        Mods(self.0 | other.0)
    }

    pub const fn intersection(self, other: Mods) -> Mods {
        Mods(self.0 & other.0)
    }

    pub const fn difference(self, other: Mods) -> Mods {
        Mods(self.0 & !other.0)
    }
}

impl BitOr for Mods {
    type Output = Mods;

    fn bitor(self, rhs: Mods) -> Mods {
        self.union(rhs)
    }
}

impl BitOrAssign for Mods {
    fn bitor_assign(&mut self, rhs: Mods) {
        *self = self.union(rhs);
    }
}

impl BitAnd for Mods {
    type Output = Mods;

    fn bitand(self, rhs: Mods) -> Mods {
        self.intersection(rhs)
    }
}

impl fmt::Display for Mods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "NM");
        }
        for (mod_bit, acronym) in Self::ACRONYMS {
            if self.contains(mod_bit) {
                write!(f, "{}", acronym)?;
            }
        }
        Ok(())
    }
}

/// Buttons held during a replay frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inputs(u32);

impl Inputs {
    pub const NONE: Inputs = Inputs(0);
    pub const M1: Inputs = Inputs(1 << 0);
    pub const M2: Inputs = Inputs(1 << 1);
    pub const K1: Inputs = Inputs(1 << 2);
    pub const K2: Inputs = Inputs(1 << 3);
    pub const SMOKE: Inputs = Inputs(1 << 4);

    pub const fn from_bits(bits: u32) -> Self {
        Inputs(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Inputs) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Inputs) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn union(self, other: Inputs) -> Inputs {
        Inputs(self.0 | other.0)
    }

    /// True if some button is held now that was not held in `previous`
    pub const fn has_new_press(self, previous: Inputs) -> bool {
        self.0 & !previous.0 != 0
    }
}

impl BitOr for Inputs {
    type Output = Inputs;

    fn bitor(self, rhs: Inputs) -> Inputs {
        self.union(rhs)
    }
}
