//! Frame formats and host-side frame buffers.
//!
//! The native frame fetch writes pixel data into a caller-owned buffer and,
//! when asked, appends the per-frame footer past the advertised image size.
//! The footer does not get its own allocation: the buffer is extended by
//! whole rows, enough of them to hold the footer bytes. [`FrameBuffer`]
//! owns that allocation and the geometry arithmetic around it.

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::footer::FrameFooter;

/// Pixel layout of a fetched frame.
///
/// `Native` asks the camera for whatever it produces; it carries no fixed
/// pixel size, so buffers cannot be sized for it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameFormat {
    /// Frame type could not be determined.
    Unknown,
    /// The camera's own format, no conversion.
    Native,
    Gray8,
    Gray16,
    Gray32,
    Rgba32,
    Rgb32,
    Bgra32,
    Bgr32,
}

impl FrameFormat {
    /// Map a native frame type code onto a variant.
    pub fn from_native(value: i32) -> Self {
        match value {
            0 => FrameFormat::Native,
            1 => FrameFormat::Gray8,
            2 => FrameFormat::Gray16,
            3 => FrameFormat::Gray32,
            4 => FrameFormat::Rgba32,
            5 => FrameFormat::Rgb32,
            6 => FrameFormat::Bgra32,
            7 => FrameFormat::Bgr32,
            _ => FrameFormat::Unknown,
        }
    }

    /// The native frame type code.
    pub fn to_native(self) -> i32 {
        match self {
            FrameFormat::Unknown => -1,
            FrameFormat::Native => 0,
            FrameFormat::Gray8 => 1,
            FrameFormat::Gray16 => 2,
            FrameFormat::Gray32 => 3,
            FrameFormat::Rgba32 => 4,
            FrameFormat::Rgb32 => 5,
            FrameFormat::Bgra32 => 6,
            FrameFormat::Bgr32 => 7,
        }
    }

    /// Bytes occupied by one whole pixel, all channels included. Fails for
    /// formats without a fixed layout.
    pub fn bytes_per_pixel(self) -> Result<usize> {
        match self {
            FrameFormat::Gray8 => Ok(1),
            FrameFormat::Gray16 => Ok(2),
            FrameFormat::Rgb32 | FrameFormat::Bgr32 => Ok(3),
            FrameFormat::Gray32 | FrameFormat::Rgba32 | FrameFormat::Bgra32 => Ok(4),
            FrameFormat::Native | FrameFormat::Unknown => {
                Err(Error::UnsupportedFrameFormat(self))
            }
        }
    }

    /// Channels per pixel. Fails for formats without a fixed layout.
    pub fn channels(self) -> Result<usize> {
        match self {
            FrameFormat::Gray8 | FrameFormat::Gray16 => Ok(1),
            FrameFormat::Rgb32 | FrameFormat::Bgr32 => Ok(3),
            FrameFormat::Gray32 | FrameFormat::Rgba32 | FrameFormat::Bgra32 => Ok(4),
            FrameFormat::Native | FrameFormat::Unknown => {
                Err(Error::UnsupportedFrameFormat(self))
            }
        }
    }
}

/// Caller-owned destination for one frame, sized for pixels plus any
/// footer rows.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    format: FrameFormat,
    footer_len: usize,
    footer_rows: usize,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Allocate a buffer for `width` x `height` pixels of `format`, with
    /// room for `footer_len` footer bytes rounded up to whole rows.
    ///
    /// Fails for [`FrameFormat::Native`] and [`FrameFormat::Unknown`], which
    /// carry no pixel size to allocate by.
    pub fn new(width: usize, height: usize, format: FrameFormat, footer_len: usize) -> Result<Self> {
        let bpp = format.bytes_per_pixel()?;
        let row = width * bpp;
        let footer_rows = if footer_len == 0 || row == 0 {
            0
        } else {
            footer_len.div_ceil(row)
        };
        let total = (height + footer_rows) * row;
        Ok(Self {
            width,
            height,
            format,
            footer_len,
            footer_rows,
            data: vec![0u8; total],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> FrameFormat {
        self.format
    }

    /// Footer bytes per frame this buffer was sized for.
    pub fn footer_len(&self) -> usize {
        self.footer_len
    }

    /// Rows appended past the image to hold the footer.
    pub fn footer_rows(&self) -> usize {
        self.footer_rows
    }

    /// Byte size of the image region, the value advertised to the native
    /// fetch as the destination size.
    pub fn image_size(&self) -> usize {
        self.width * self.height * self.format.bytes_per_pixel().unwrap_or(0)
    }

    /// Byte size of the whole allocation, image plus footer rows.
    pub fn total_size(&self) -> usize {
        self.data.len()
    }

    /// The whole allocation.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The whole allocation, writable. Backends fill this.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The image region only.
    pub fn image_data(&self) -> &[u8] {
        &self.data[..self.image_size().min(self.data.len())]
    }

    /// Raw footer bytes of the last fetched frame, empty when the buffer
    /// was sized without a footer.
    pub fn footer_data(&self) -> &[u8] {
        let start = self.image_size().min(self.data.len());
        let end = (start + self.footer_len).min(self.data.len());
        &self.data[start..end]
    }

    /// Decode the footer of the last fetched frame. `None` when the buffer
    /// holds no footer bytes.
    pub fn footer(&self) -> Option<FrameFooter> {
        if self.footer_len == 0 {
            return None;
        }
        FrameFooter::parse(Bytes::copy_from_slice(self.footer_data()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_codes_round_trip() {
        for code in -1..=7 {
            assert_eq!(FrameFormat::from_native(code).to_native(), code);
        }
        assert_eq!(FrameFormat::from_native(99), FrameFormat::Unknown);
    }

    #[test]
    fn footer_fits_in_one_row() {
        let buf = FrameBuffer::new(640, 480, FrameFormat::Gray16, 32).unwrap();
        assert_eq!(buf.footer_rows(), 1);
        assert_eq!(buf.image_size(), 640 * 480 * 2);
        assert_eq!(buf.total_size(), 640 * 481 * 2);
    }

    #[test]
    fn wide_footer_takes_two_rows() {
        let buf = FrameBuffer::new(640, 480, FrameFormat::Gray8, 700).unwrap();
        assert_eq!(buf.footer_rows(), 2);
        assert_eq!(buf.total_size(), 640 * 482);
    }

    #[test]
    fn four_channel_pixels_size_the_whole_pixel() {
        assert_eq!(FrameFormat::Gray32.channels().unwrap(), 4);
        assert_eq!(FrameFormat::Gray32.bytes_per_pixel().unwrap(), 4);
        let buf = FrameBuffer::new(640, 480, FrameFormat::Gray32, 0).unwrap();
        assert_eq!(buf.image_size(), 640 * 480 * 4);
        assert_eq!(buf.total_size(), 640 * 480 * 4);
    }

    #[test]
    fn three_channel_footer_rows_count_full_pixels() {
        // 700 footer bytes fit inside one 640 * 3 byte row.
        let buf = FrameBuffer::new(640, 480, FrameFormat::Rgb32, 700).unwrap();
        assert_eq!(buf.footer_rows(), 1);
        assert_eq!(buf.image_size(), 640 * 480 * 3);
        assert_eq!(buf.total_size(), 640 * 481 * 3);
    }

    #[test]
    fn no_footer_means_no_extra_rows() {
        let buf = FrameBuffer::new(320, 240, FrameFormat::Gray16, 0).unwrap();
        assert_eq!(buf.footer_rows(), 0);
        assert_eq!(buf.total_size(), buf.image_size());
        assert!(buf.footer().is_none());
    }

    #[test]
    fn sizing_rejects_native_format() {
        assert!(matches!(
            FrameBuffer::new(640, 480, FrameFormat::Native, 0),
            Err(Error::UnsupportedFrameFormat(FrameFormat::Native))
        ));
    }
}
