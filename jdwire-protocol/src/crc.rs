//! CRC-16/CCITT-FALSE
//!
//! Polynomial 0x1021, initial value 0xFFFF, no reflection, no final XOR.

const POLY: u16 = 0x1021;

/// Compute the frame checksum over `data`
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;

    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLY;
            } else {
                crc <<= 1;
            }
        }
    }

    crc
}
