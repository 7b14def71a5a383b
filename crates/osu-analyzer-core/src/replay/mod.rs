//! .osr replay decoding

mod binary;
mod frames;
pub mod lzma;
mod model;
mod mods;
mod reader;

pub use binary::{ReplayCursor, ReplayField};
pub use frames::{decode_frames, decode_life_bar, FrameData};
pub use model::{Grade, LifeBarPoint, ReplayFrame, ReplayInfo};
pub use mods::{Inputs, Mods};
pub use reader::{datetime_from_ticks, decode_replay, parse_replay_bytes, read_replay_file};
