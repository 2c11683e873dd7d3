//! Frame size derivation, validation and frame buffers.
//!
//! Frame header (default layout):
//! - CRC (2 bytes, LE): CRC-16 over bytes `[2, frame_size)`
//! - SIZE (1 byte): payload length in bytes
//! - FLAGS (1 byte): opaque to the link layer
//! - DEVICE IDENTIFIER (8 bytes, LE): opaque to the link layer
//!
//! `frame_size = header_len + SIZE`.

use core::fmt;

use crate::crc::crc16;

/// Default header length
pub const HEADER_LEN: usize = 12;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 236;

/// Frame buffer capacity (header + maximum payload + 4 bytes of slack)
///
/// Receive slots are this large so a frame that overruns its declared size
/// by a few bytes still lands in the buffer and fails validation cleanly.
pub const FRAME_CAPACITY: usize = HEADER_LEN + MAX_PAYLOAD_SIZE + 4;

const CRC_LEN: usize = 2;
const FLAGS_OFFSET: usize = 3;
const DEVICE_ID_OFFSET: usize = 4;

/// Errors that can occur during frame validation or construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Fewer bytes than the declared frame size
    TooShort,
    /// Checksum does not match the header
    CrcMismatch,
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Header layout offsets are inconsistent
    InvalidLayout,
}

/// Position of the size field and length of the header
///
/// The checksum always occupies the first two bytes; everything else about
/// the header is described here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameLayout {
    size_offset: usize,
    header_len: usize,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self::JACDAC
    }
}

impl FrameLayout {
    /// JACDAC v1 header: CRC, size, flags, 64-bit device identifier
    pub const JACDAC: Self = Self {
        size_offset: 2,
        header_len: HEADER_LEN,
    };

    /// Describe a custom header
    ///
    /// The size field must follow the checksum and lie inside the header,
    /// and the header must fit in a frame buffer.
    pub const fn new(size_offset: usize, header_len: usize) -> Result<Self, FrameError> {
        if size_offset < CRC_LEN
            || size_offset >= header_len
            || header_len < 4
            || header_len > FRAME_CAPACITY
        {
            return Err(FrameError::InvalidLayout);
        }
        Ok(Self {
            size_offset,
            header_len,
        })
    }

    /// Offset of the payload-size byte
    pub const fn size_offset(&self) -> usize {
        self.size_offset
    }

    /// Length of the header in bytes
    pub const fn header_len(&self) -> usize {
        self.header_len
    }

    /// Total encoded frame length declared by the header
    ///
    /// A buffer too short to hold the size field reads as an empty payload.
    pub fn frame_size(&self, frame: &[u8]) -> usize {
        let size = frame.get(self.size_offset).copied().unwrap_or(0);
        self.header_len + size as usize
    }

    /// Check that a fully received frame is complete and intact
    ///
    /// Reports `TooShort` before looking at the checksum, so exactly one
    /// error is ever returned.
    pub fn validate(&self, frame: &[u8], bytes_received: usize) -> Result<(), FrameError> {
        let size = self.frame_size(frame);
        if bytes_received < size || frame.len() < size {
            return Err(FrameError::TooShort);
        }

        let expected = u16::from_le_bytes([frame[0], frame[1]]);
        if crc16(&frame[CRC_LEN..size]) != expected {
            return Err(FrameError::CrcMismatch);
        }

        Ok(())
    }
}

/// Total encoded frame length using the default layout
pub fn frame_size(frame: &[u8]) -> usize {
    FrameLayout::JACDAC.frame_size(frame)
}

/// Validate a frame using the default layout
pub fn validate(frame: &[u8], bytes_received: usize) -> Result<(), FrameError> {
    FrameLayout::JACDAC.validate(frame, bytes_received)
}

/// A frame in the default layout, stored in a fixed-capacity buffer
///
/// Build with [`FrameBuf::new`], fill the payload, then [`FrameBuf::seal`]
/// to write the checksum before handing it to the driver.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuf {
    bytes: [u8; FRAME_CAPACITY],
}

impl FrameBuf {
    /// Create an empty, unsealed frame
    pub fn new(device_identifier: u64, flags: u8) -> Self {
        let mut bytes = [0u8; FRAME_CAPACITY];
        bytes[FLAGS_OFFSET] = flags;
        bytes[DEVICE_ID_OFFSET..HEADER_LEN].copy_from_slice(&device_identifier.to_le_bytes());
        Self { bytes }
    }

    /// Copy a received frame, checking size and checksum
    pub fn from_bytes(data: &[u8]) -> Result<Self, FrameError> {
        let size = frame_size(data);
        if size - HEADER_LEN > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }
        validate(data, data.len())?;

        let mut bytes = [0u8; FRAME_CAPACITY];
        bytes[..size].copy_from_slice(&data[..size]);
        Ok(Self { bytes })
    }

    /// Checksum stored in the header
    pub fn crc(&self) -> u16 {
        u16::from_le_bytes([self.bytes[0], self.bytes[1]])
    }

    /// Payload length from the header
    pub fn size(&self) -> u8 {
        self.bytes[FrameLayout::JACDAC.size_offset()]
    }

    /// Total encoded length
    pub fn frame_size(&self) -> usize {
        HEADER_LEN + self.size() as usize
    }

    /// Header flags
    pub fn flags(&self) -> u8 {
        self.bytes[FLAGS_OFFSET]
    }

    /// Set the header flags; invalidates the checksum until resealed
    pub fn set_flags(&mut self, flags: u8) {
        self.bytes[FLAGS_OFFSET] = flags;
    }

    /// 64-bit device identifier
    pub fn device_identifier(&self) -> u64 {
        let mut id = [0u8; 8];
        id.copy_from_slice(&self.bytes[DEVICE_ID_OFFSET..HEADER_LEN]);
        u64::from_le_bytes(id)
    }

    /// Payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..self.frame_size()]
    }

    /// Replace the payload; invalidates the checksum until resealed
    pub fn set_payload(&mut self, payload: &[u8]) -> Result<(), FrameError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }
        self.bytes[HEADER_LEN..HEADER_LEN + payload.len()].copy_from_slice(payload);
        self.bytes[FrameLayout::JACDAC.size_offset()] = payload.len() as u8;
        Ok(())
    }

    /// Compute and store the checksum
    pub fn seal(&mut self) {
        let crc = crc16(&self.bytes[CRC_LEN..self.frame_size()]);
        self.bytes[..CRC_LEN].copy_from_slice(&crc.to_le_bytes());
    }

    /// Check the stored checksum
    pub fn is_sealed(&self) -> bool {
        validate(self.as_bytes(), self.frame_size()).is_ok()
    }

    /// The encoded frame, exactly `frame_size` bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.frame_size()]
    }
}

impl AsRef<[u8]> for FrameBuf {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for FrameBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuf")
            .field("crc", &self.crc())
            .field("size", &self.size())
            .field("flags", &self.flags())
            .field("device_identifier", &self.device_identifier())
            .field("payload", &self.payload())
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FrameBuf {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "FrameBuf[crc={=u16:#x} dev={=u64:#x} flags={=u8:#x} payload={=[u8]:x}]",
            self.crc(),
            self.device_identifier(),
            self.flags(),
            self.payload()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sealed(payload: &[u8]) -> FrameBuf {
        let mut frame = FrameBuf::new(0x0123_4567_89AB_CDEF, 0x01);
        frame.set_payload(payload).unwrap();
        frame.seal();
        frame
    }

    #[test]
    fn test_header_fields() {
        let frame = sealed(&[0xAA, 0xBB, 0xCC]);
        let bytes = frame.as_bytes();

        assert_eq!(bytes.len(), 15);
        assert_eq!(bytes[2], 3); // size
        assert_eq!(bytes[3], 0x01); // flags
        assert_eq!(&bytes[4..12], &0x0123_4567_89AB_CDEFu64.to_le_bytes());
        assert_eq!(frame.payload(), &[0xAA, 0xBB, 0xCC]);
        assert_eq!(frame.crc(), crc16(&bytes[2..]));
    }

    #[test]
    fn test_frame_size_reads_header() {
        let frame = sealed(&[0; 20]);
        assert_eq!(frame_size(frame.as_bytes()), 32);
        assert_eq!(frame.frame_size(), 32);
    }

    #[test]
    fn test_frame_size_of_truncated_buffer() {
        assert_eq!(frame_size(&[0x12, 0x34]), HEADER_LEN);
    }

    #[test]
    fn test_validate_complete_frame() {
        let frame = sealed(&[1, 2, 3, 4]);
        assert_eq!(validate(frame.as_bytes(), 16), Ok(()));
        assert!(frame.is_sealed());
    }

    #[test]
    fn test_validate_extra_bytes_ok() {
        let frame = sealed(&[1, 2, 3, 4]);
        let mut slot = [0u8; FRAME_CAPACITY];
        slot[..16].copy_from_slice(frame.as_bytes());
        assert_eq!(validate(&slot, 20), Ok(()));
    }

    #[test]
    fn test_validate_too_short() {
        let frame = sealed(&[1, 2, 3, 4]);
        assert_eq!(validate(frame.as_bytes(), 15), Err(FrameError::TooShort));
    }

    #[test]
    fn test_too_short_wins_over_bad_crc() {
        let mut frame = sealed(&[1, 2, 3, 4]);
        frame.set_flags(0x80); // breaks the checksum
        assert_eq!(validate(frame.as_bytes(), 6), Err(FrameError::TooShort));
    }

    #[test]
    fn test_validate_crc_mismatch() {
        let frame = sealed(&[1, 2, 3, 4]);
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(frame.as_bytes());
        bytes[13] ^= 0x40;
        assert_eq!(validate(&bytes, 16), Err(FrameError::CrcMismatch));
    }

    #[test]
    fn test_set_payload_invalidates_seal() {
        let mut frame = sealed(&[1, 2]);
        frame.set_payload(&[1, 2, 3]).unwrap();
        assert!(!frame.is_sealed());
        frame.seal();
        assert!(frame.is_sealed());
    }

    #[test]
    fn test_payload_too_large() {
        let mut frame = FrameBuf::new(0, 0);
        let large_payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        assert_eq!(
            frame.set_payload(&large_payload),
            Err(FrameError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_from_bytes() {
        let frame = sealed(&[9, 8, 7]);
        let copy = FrameBuf::from_bytes(frame.as_bytes()).unwrap();
        assert_eq!(copy, frame);
        assert_eq!(copy.device_identifier(), 0x0123_4567_89AB_CDEF);
    }

    #[test]
    fn test_from_bytes_rejects_oversized_declaration() {
        let mut bytes = [0u8; FRAME_CAPACITY];
        bytes[2] = 0xFF;
        assert_eq!(
            FrameBuf::from_bytes(&bytes),
            Err(FrameError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_custom_layout() {
        // 2-byte CRC, 1-byte size, 1 byte of flags: minimal 4-byte header
        let layout = FrameLayout::new(2, 4).unwrap();
        let mut bytes = [0u8; 7];
        bytes[2] = 3;
        bytes[3] = 0x55;
        bytes[4..].copy_from_slice(&[1, 2, 3]);
        let crc = crc16(&bytes[2..]);
        bytes[..2].copy_from_slice(&crc.to_le_bytes());

        assert_eq!(layout.frame_size(&bytes), 7);
        assert_eq!(layout.validate(&bytes, 7), Ok(()));
        assert_eq!(layout.validate(&bytes, 6), Err(FrameError::TooShort));
    }

    #[test]
    fn test_invalid_layouts() {
        assert_eq!(FrameLayout::new(1, 12), Err(FrameError::InvalidLayout));
        assert_eq!(FrameLayout::new(12, 12), Err(FrameError::InvalidLayout));
        assert_eq!(FrameLayout::new(2, 3), Err(FrameError::InvalidLayout));
        assert_eq!(
            FrameLayout::new(2, FRAME_CAPACITY + 1),
            Err(FrameError::InvalidLayout)
        );
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn validate_ok_iff_complete_and_intact(
                payload in proptest::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE),
                received in 0usize..=FRAME_CAPACITY,
                corrupt in proptest::option::of((0usize..FRAME_CAPACITY, 1u8..=255)),
            ) {
                let mut frame = FrameBuf::new(42, 0);
                frame.set_payload(&payload).unwrap();
                frame.seal();

                let size = frame.frame_size();
                let mut slot = [0u8; FRAME_CAPACITY];
                slot[..size].copy_from_slice(frame.as_bytes());

                // Corrupt a checksummed byte (never the size field)
                let mut corrupted = false;
                if let Some((pos, mask)) = corrupt {
                    let pos = 3 + pos % (size - 3);
                    slot[pos] ^= mask;
                    corrupted = true;
                }

                let result = validate(&slot, received);
                if received < size {
                    prop_assert_eq!(result, Err(FrameError::TooShort));
                } else if corrupted {
                    prop_assert_eq!(result, Err(FrameError::CrcMismatch));
                } else {
                    prop_assert_eq!(result, Ok(()));
                }
            }

            #[test]
            fn frame_size_never_below_minimum(bytes in proptest::collection::vec(any::<u8>(), 0..32)) {
                prop_assert!(frame_size(&bytes) >= 4);
            }
        }
    }
}
