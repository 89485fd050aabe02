//! Per-frame footer decoding.
//!
//! When a frame is fetched with the footer flag, the native layer appends a
//! packed little-endian structure past the image: a generic software header
//! (timestamps, frame counter, filter mark) followed by a hardware section
//! whose layout depends on the camera family. The first word of the
//! hardware section is the footer class identifier and doubles as that
//! family's status word.

use bytes::{Buf, Bytes};

/// Byte length of the generic software header.
const GENERIC_HEADER_LEN: usize = 32;

/// Filter-wheel position and trigger state word of Onca-family footers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OncaStatus(pub u16);

impl OncaStatus {
    /// External trigger state.
    pub fn trig_ext(self) -> bool {
        self.0 & 0x0001 != 0
    }

    /// Camera Link trigger pin state.
    pub fn trig_cl(self) -> bool {
        self.0 & 0x0002 != 0
    }

    /// Software trigger state.
    pub fn trig_soft(self) -> bool {
        self.0 & 0x0004 != 0
    }

    /// Line camera uses a single readout.
    pub fn linecam_fixed_sh(self) -> bool {
        self.0 & 0x0100 != 0
    }

    /// Line camera line order.
    pub fn linecam_shb_first(self) -> bool {
        self.0 & 0x0200 != 0
    }

    /// Current filter wheel position.
    pub fn filterwheel(self) -> u8 {
        (self.0 >> 13) as u8
    }
}

/// Hardware footer of Onca-family cameras.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OncaFooter {
    pub status: OncaStatus,
    /// Active exposure time in truncated microseconds.
    pub tint: u32,
    pub time_lo: u32,
    pub time_hi: u32,
    /// Die temperature in Kelvin.
    pub temp_die: u16,
    /// Case temperature in Kelvin.
    pub temp_case: u16,
}

/// Hardware footer of Gobi-family cameras.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GobiFooter {
    /// Bit 0 carries the external trigger state.
    pub status: u16,
    /// Integration time in microseconds.
    pub tint: u32,
    pub time_lo: u32,
    pub time_hi: u32,
    /// Die temperature in Kelvin.
    pub temp_die: u16,
    pub tag: u16,
    pub image_offset: u32,
    pub image_gain: u16,
    pub frame_counter: u16,
}

impl GobiFooter {
    /// External trigger state.
    pub fn trig_ext(&self) -> bool {
        self.status & 0x0001 != 0
    }
}

/// Hardware footer of Tigris-family cameras.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TigrisFooter {
    pub status: u16,
    pub time_lo: u32,
    pub time_hi: u32,
    pub counter: u32,
    pub sample_counter: u32,
    pub offset_x: u16,
    pub offset_y: u16,
}

/// Hardware footer of Manx-family cameras.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManxFooter {
    /// Bit 0 is the index of the first line in the image.
    pub status: u16,
    pub time_lo: u32,
    pub time_hi: u32,
    pub frame_counter: u32,
}

impl ManxFooter {
    /// Index of the first line in the image.
    pub fn first_line_index(&self) -> bool {
        self.status & 0x0001 != 0
    }
}

/// Family-specific hardware section, selected by the footer class
/// identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareFooter {
    Onca(OncaFooter),
    Gobi(GobiFooter),
    Tigris(TigrisFooter),
    Manx(ManxFooter),
}

/// Decoded per-frame footer: generic header plus any recognized hardware
/// section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFooter {
    /// Structure length as reported by the camera.
    pub len: u16,
    /// Footer version, fixed to `0xAA00`.
    pub version: u16,
    /// Time of start of capture, microseconds since the Unix epoch.
    pub start_of_capture_us: i64,
    /// Time of frame reception, microseconds since the Unix epoch.
    pub time_of_reception_us: i64,
    /// Frame counter.
    pub frame_counter: u32,
    /// Filter marker; the top nibble specifies its purpose.
    pub filter_mark: u32,
    /// Hardware footer length as reported by the camera.
    pub hardware_len: u32,
    /// Footer class identifier of the hardware section.
    pub pid: u16,
    /// Decoded hardware section, `None` for unrecognized identifiers.
    pub hardware: Option<HardwareFooter>,
}

impl FrameFooter {
    /// Decode a raw footer. Returns `None` when the bytes cannot hold the
    /// generic header.
    pub fn parse(raw: Bytes) -> Option<Self> {
        if raw.len() < GENERIC_HEADER_LEN + 2 {
            return None;
        }
        let mut buf = raw.clone();
        let len = buf.get_u16_le();
        let version = buf.get_u16_le();
        let start_of_capture_us = buf.get_i64_le();
        let time_of_reception_us = buf.get_i64_le();
        let frame_counter = buf.get_u32_le();
        let filter_mark = buf.get_u32_le();
        let hardware_len = buf.get_u32_le();
        // The hardware section starts here; its first word is the class
        // identifier.
        let pid = {
            let mut peek = buf.clone();
            peek.get_u16_le()
        };
        let hardware = match pid {
            0xF040 => parse_onca(&mut buf).map(HardwareFooter::Onca),
            0xF003 => parse_gobi(&mut buf).map(HardwareFooter::Gobi),
            0xF090 => parse_tigris(&mut buf).map(HardwareFooter::Tigris),
            0xF086 => parse_manx(&mut buf).map(HardwareFooter::Manx),
            _ => None,
        };
        Some(Self {
            len,
            version,
            start_of_capture_us,
            time_of_reception_us,
            frame_counter,
            filter_mark,
            hardware_len,
            pid,
            hardware,
        })
    }
}

fn parse_onca(buf: &mut Bytes) -> Option<OncaFooter> {
    if buf.remaining() < 18 {
        return None;
    }
    Some(OncaFooter {
        status: OncaStatus(buf.get_u16_le()),
        tint: buf.get_u32_le(),
        time_lo: buf.get_u32_le(),
        time_hi: buf.get_u32_le(),
        temp_die: buf.get_u16_le(),
        temp_case: buf.get_u16_le(),
    })
}

fn parse_gobi(buf: &mut Bytes) -> Option<GobiFooter> {
    if buf.remaining() < 28 {
        return None;
    }
    let status = buf.get_u16_le();
    let tint = buf.get_u32_le();
    let time_lo = buf.get_u32_le();
    let time_hi = buf.get_u32_le();
    let temp_die = buf.get_u16_le();
    buf.advance(2); // reserved
    let tag = buf.get_u16_le();
    let image_offset = buf.get_u32_le();
    let image_gain = buf.get_u16_le();
    let frame_counter = buf.get_u16_le();
    Some(GobiFooter {
        status,
        tint,
        time_lo,
        time_hi,
        temp_die,
        tag,
        image_offset,
        image_gain,
        frame_counter,
    })
}

fn parse_tigris(buf: &mut Bytes) -> Option<TigrisFooter> {
    if buf.remaining() < 22 {
        return None;
    }
    Some(TigrisFooter {
        status: buf.get_u16_le(),
        time_lo: buf.get_u32_le(),
        time_hi: buf.get_u32_le(),
        counter: buf.get_u32_le(),
        sample_counter: buf.get_u32_le(),
        offset_x: buf.get_u16_le(),
        offset_y: buf.get_u16_le(),
    })
}

fn parse_manx(buf: &mut Bytes) -> Option<ManxFooter> {
    if buf.remaining() < 14 {
        return None;
    }
    Some(ManxFooter {
        status: buf.get_u16_le(),
        time_lo: buf.get_u32_le(),
        time_hi: buf.get_u32_le(),
        frame_counter: buf.get_u32_le(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BufMut;

    fn generic_header(pidless: bool) -> Vec<u8> {
        let mut raw = Vec::new();
        raw.put_u16_le(66); // len
        raw.put_u16_le(0xAA00); // ver
        raw.put_i64_le(1_000_000); // soc
        raw.put_i64_le(1_016_667); // tft
        raw.put_u32_le(42); // tfc
        raw.put_u32_le(0); // fltref
        raw.put_u32_le(if pidless { 0 } else { 28 }); // hfl
        raw
    }

    #[test]
    fn decodes_generic_header_fields() {
        let mut raw = generic_header(true);
        raw.put_u16_le(0xBEEF); // unrecognized class identifier
        let footer = FrameFooter::parse(Bytes::from(raw)).unwrap();
        assert_eq!(footer.version, 0xAA00);
        assert_eq!(footer.start_of_capture_us, 1_000_000);
        assert_eq!(footer.time_of_reception_us, 1_016_667);
        assert_eq!(footer.frame_counter, 42);
        assert_eq!(footer.pid, 0xBEEF);
        assert!(footer.hardware.is_none());
    }

    #[test]
    fn decodes_gobi_hardware_section() {
        let mut raw = generic_header(false);
        raw.put_u16_le(0xF003); // status word doubling as class id
        raw.put_u32_le(25_000); // tint
        raw.put_u32_le(0x1234_5678); // timelo
        raw.put_u32_le(0x0000_0001); // timehi
        raw.put_u16_le(295); // temp_die
        raw.put_u16_le(0); // reserved
        raw.put_u16_le(7); // tag
        raw.put_u32_le(100); // image_offset
        raw.put_u16_le(3); // image_gain
        raw.put_u16_le(42); // frame_cnt
        raw.put_u16_le(0); // reserved
        let footer = FrameFooter::parse(Bytes::from(raw)).unwrap();
        assert_eq!(footer.pid, 0xF003);
        match footer.hardware {
            Some(HardwareFooter::Gobi(gobi)) => {
                assert_eq!(gobi.tint, 25_000);
                assert_eq!(gobi.temp_die, 295);
                assert_eq!(gobi.tag, 7);
                assert_eq!(gobi.frame_counter, 42);
                assert!(gobi.trig_ext()); // bit 0 of 0xF003 is set
            }
            other => panic!("expected Gobi footer, got {other:?}"),
        }
    }

    #[test]
    fn decodes_onca_status_bits() {
        let status = OncaStatus(0b1010_0000_0000_0101);
        assert!(status.trig_ext());
        assert!(!status.trig_cl());
        assert!(status.trig_soft());
        assert_eq!(status.filterwheel(), 5);
    }

    #[test]
    fn short_input_is_rejected() {
        assert!(FrameFooter::parse(Bytes::from_static(&[0u8; 16])).is_none());
    }

    #[test]
    fn truncated_hardware_section_keeps_generic_header() {
        let mut raw = generic_header(false);
        raw.put_u16_le(0xF090);
        raw.put_u32_le(1); // not enough for a Tigris section
        let footer = FrameFooter::parse(Bytes::from(raw)).unwrap();
        assert_eq!(footer.pid, 0xF090);
        assert!(footer.hardware.is_none());
    }
}
