//! .osu beatmap parsing

mod document;
mod osu_file;

pub use document::{Entry, OsuDocument, Section};
pub use osu_file::{
    decode_beatmap, parse_beatmap_bytes, parse_beatmap_str, parse_hit_object, parse_osu_file,
};
