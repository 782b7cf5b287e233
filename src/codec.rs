use std::str::FromStr;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::constants::*;
use super::CipherError;

/// Byte order used for all integer packing inside a cipher context.
///
/// Key and block words must be unpacked with the same order on the
/// encrypting and the decrypting side; a mismatch produces a different
/// (still invertible) permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    #[default]
    Big,
    Little,
}

impl FromStr for Endian {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Endian, CipherError> {
        match s {
            "big" => Ok(Endian::Big),
            "little" => Ok(Endian::Little),
            _ => Err(CipherError::InvalidByteOrder),
        }
    }
}

pub fn to_bytes(value: u64, length: usize, endian: Endian) -> Vec<u8> {
    assert!(length >= 1 && length <= 8, "length must be in 1..=8");

    let mut dst = vec![0u8; length];
    match endian {
        Endian::Big => BigEndian::write_uint(&mut dst, value, length),
        Endian::Little => LittleEndian::write_uint(&mut dst, value, length),
    }
    dst
}

pub fn from_bytes(src: &[u8], endian: Endian) -> u64 {
    assert!(src.len() >= 1 && src.len() <= 8, "length must be in 1..=8");

    match endian {
        Endian::Big => BigEndian::read_uint(src, src.len()),
        Endian::Little => LittleEndian::read_uint(src, src.len()),
    }
}

pub fn unpack_key(key: &[u8], endian: Endian) -> [u32; 4] {
    assert!(key.len() == KEY_SIZE, "key length is not 16");

    let mut words = [0u32; 4];
    for (i, word) in words.iter_mut().enumerate() {
        let chunk = &key[i * 4..(i + 1) * 4];
        *word = match endian {
            Endian::Big => BigEndian::read_u32(chunk),
            Endian::Little => LittleEndian::read_u32(chunk),
        };
    }
    words
}

pub fn unpack_block(block: &[u8], endian: Endian) -> [u32; 2] {
    assert!(block.len() == BLOCK_SIZE, "block length is not 8");

    match endian {
        Endian::Big => [BigEndian::read_u32(&block[..4]), BigEndian::read_u32(&block[4..])],
        Endian::Little => [
            LittleEndian::read_u32(&block[..4]),
            LittleEndian::read_u32(&block[4..]),
        ],
    }
}

pub fn pack_block(words: [u32; 2], endian: Endian) -> [u8; BLOCK_SIZE] {
    let mut dst = [0u8; BLOCK_SIZE];
    match endian {
        Endian::Big => {
            BigEndian::write_u32(&mut dst[..4], words[0]);
            BigEndian::write_u32(&mut dst[4..], words[1]);
        }
        Endian::Little => {
            LittleEndian::write_u32(&mut dst[..4], words[0]);
            LittleEndian::write_u32(&mut dst[4..], words[1]);
        }
    }
    dst
}

pub fn xor_in_place(dst: &mut [u8], src: &[u8]) {
    dst.iter_mut().zip(src.iter()).for_each(|(x1, x2)| *x1 ^= x2);
}
