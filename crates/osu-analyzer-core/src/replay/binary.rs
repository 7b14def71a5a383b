//! Field-by-field reading of the .osr binary layout
//!
//! All integers are little-endian. Strings use osu!'s two-step encoding:
//! - 0x00: absent string
//! - any other marker: ULEB128 byte length, then UTF-8 bytes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Field of a replay, in the order it appears in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReplayField {
    Mode,
    Version,
    BeatmapHash,
    PlayerName,
    ReplayHash,
    Count300,
    Count100,
    Count50,
    CountGeki,
    CountKatu,
    CountMiss,
    Score,
    MaxCombo,
    PerfectCombo,
    Mods,
    LifeBarData,
    Timestamp,
    RawDataLength,
    RawData,
    Seed,
    ScoreId,
}

impl ReplayField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplayField::Mode => "mode",
            ReplayField::Version => "version",
            ReplayField::BeatmapHash => "beatmap hash",
            ReplayField::PlayerName => "player name",
            ReplayField::ReplayHash => "replay hash",
            ReplayField::Count300 => "300 count",
            ReplayField::Count100 => "100 count",
            ReplayField::Count50 => "50 count",
            ReplayField::CountGeki => "geki count",
            ReplayField::CountKatu => "katu count",
            ReplayField::CountMiss => "miss count",
            ReplayField::Score => "score",
            ReplayField::MaxCombo => "max combo",
            ReplayField::PerfectCombo => "perfect combo flag",
            ReplayField::Mods => "mods",
            ReplayField::LifeBarData => "life bar data",
            ReplayField::Timestamp => "timestamp",
            ReplayField::RawDataLength => "raw data length",
            ReplayField::RawData => "raw data",
            ReplayField::Seed => "seed",
            ReplayField::ScoreId => "score id",
        }
    }
}

impl fmt::Display for ReplayField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cursor over an in-memory replay that remembers which field it is reading.
///
/// Every failed read reports the current field.
#[derive(Debug)]
pub struct ReplayCursor<'a> {
    data: &'a [u8],
    position: usize,
    field: ReplayField,
}

impl<'a> ReplayCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            field: ReplayField::Mode,
        }
    }

    /// Mark the start of a new field
    pub fn enter(&mut self, field: ReplayField) {
        tracing::trace!("Reading {} at offset {}", field, self.position);
        self.field = field;
    }

    /// Field currently being read
    pub fn field(&self) -> ReplayField {
        self.field
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of unread bytes
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Build an invalid-value error for the current field
    pub fn invalid(&self, message: impl Into<String>) -> Error {
        Error::InvalidReplayField {
            field: self.field,
            message: message.into(),
        }
    }

    /// Take the next `len` bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::TruncatedReplay {
                field: self.field,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_bytes(N)?);
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Any non-zero byte is `true`
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    /// Read a ULEB128 (unsigned LEB128) encoded length.
    ///
    /// 7 bits per byte for data, the high bit is a continuation flag. Lengths
    /// are limited to `i32::MAX`.
    pub fn read_uleb128(&mut self) -> Result<u32> {
        let mut result: u32 = 0;
        let mut shift = 0;

        loop {
            let byte = self.read_u8()?;
            if shift == 28 && byte & 0xF8 != 0 {
                return Err(self.invalid("ULEB128 length too large"));
            }

            result |= ((byte & 0x7F) as u32) << shift;

            if byte & 0x80 == 0 {
                break;
            }

            shift += 7;
        }

        if result > i32::MAX as u32 {
            return Err(self.invalid("ULEB128 length too large"));
        }
        Ok(result)
    }

    /// Read an osu! format string; `None` for the absent marker
    pub fn read_string(&mut self) -> Result<Option<String>> {
        if self.read_u8()? == 0x00 {
            return Ok(None);
        }

        let length = self.read_uleb128()? as usize;
        let bytes = self.read_bytes(length)?;

        String::from_utf8(bytes.to_vec())
            .map(Some)
            .map_err(|e| self.invalid(format!("Invalid UTF-8 in string: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_uleb128(buf: &mut Vec<u8>, mut value: u32) {
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            buf.push(byte);
            if value == 0 {
                break;
            }
        }
    }

    #[test]
    fn test_little_endian_reads() {
        let data = [0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0xFF, 0xFF];
        let mut cursor = ReplayCursor::new(&data);

        assert_eq!(cursor.read_u8().unwrap(), 1);
        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        assert_eq!(cursor.read_i32().unwrap(), 0x12345678);
        assert_eq!(cursor.read_i16().unwrap(), -1);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_truncated_read_reports_field() {
        let data = [0x01, 0x02];
        let mut cursor = ReplayCursor::new(&data);
        cursor.enter(ReplayField::Score);

        match cursor.read_i32() {
            Err(Error::TruncatedReplay {
                field,
                needed,
                remaining,
            }) => {
                assert_eq!(field, ReplayField::Score);
                assert_eq!(needed, 4);
                assert_eq!(remaining, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        // failed reads do not consume
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_uleb128_small() {
        let data = [127u8];
        let mut cursor = ReplayCursor::new(&data);
        assert_eq!(cursor.read_uleb128().unwrap(), 127);
    }

    #[test]
    fn test_uleb128_multi_byte() {
        // 300 = 0b100101100 -> 0xAC 0x02
        let data = [0xAC, 0x02];
        let mut cursor = ReplayCursor::new(&data);
        assert_eq!(cursor.read_uleb128().unwrap(), 300);
    }

    #[test]
    fn test_uleb128_too_large() {
        let data = [0xFF, 0xFF, 0xFF, 0xFF, 0x0F];
        let mut cursor = ReplayCursor::new(&data);
        assert!(matches!(
            cursor.read_uleb128(),
            Err(Error::InvalidReplayField { .. })
        ));
    }

    #[test]
    fn test_read_string_markers() {
        let mut data = vec![0x00, 0x0b];
        write_uleb128(&mut data, 5);
        data.extend_from_slice(b"peppy");
        data.push(0x0b);
        write_uleb128(&mut data, 0);

        let mut cursor = ReplayCursor::new(&data);
        assert_eq!(cursor.read_string().unwrap(), None);
        assert_eq!(cursor.read_string().unwrap(), Some("peppy".to_string()));
        assert_eq!(cursor.read_string().unwrap(), Some(String::new()));
    }

    #[test]
    fn test_read_string_truncated_payload() {
        let data = [0x0b, 0x05, b'a', b'b'];
        let mut cursor = ReplayCursor::new(&data);
        cursor.enter(ReplayField::PlayerName);

        match cursor.read_string() {
            Err(e) => assert_eq!(e.replay_field(), Some(ReplayField::PlayerName)),
            Ok(s) => panic!("unexpected string: {:?}", s),
        }
    }
}
