//! The XTEA block transform and its inverse. These functions deal with a
//! single 8-byte block at a time; the word-level pair is the bit-exact
//! interoperability surface shared with other implementations.

use super::codec::{self, Endian};
use super::constants::*;
use super::CipherError;

/// Encrypt one block of two 32-bit words. One cycle is two rounds.
pub fn encrypt_words(key: &[u32; 4], block: [u32; 2], cycles: u32) -> [u32; 2] {
    let [mut v0, mut v1] = block;
    let mut sum: u32 = 0;

    for _ in 0..cycles {
        v0 = v0.wrapping_add(
            ((v1 << 4) ^ (v1 >> 5))
                .wrapping_add(v1)
                ^ sum.wrapping_add(key[(sum & 3) as usize]),
        );
        sum = sum.wrapping_add(DELTA);
        v1 = v1.wrapping_add(
            ((v0 << 4) ^ (v0 >> 5))
                .wrapping_add(v0)
                ^ sum.wrapping_add(key[((sum >> 11) & 3) as usize]),
        );
    }

    [v0, v1]
}

/// The exact inverse of [`encrypt_words`] for the same key and cycle count.
pub fn decrypt_words(key: &[u32; 4], block: [u32; 2], cycles: u32) -> [u32; 2] {
    let [mut v0, mut v1] = block;
    let mut sum = DELTA.wrapping_mul(cycles);

    for _ in 0..cycles {
        v1 = v1.wrapping_sub(
            ((v0 << 4) ^ (v0 >> 5))
                .wrapping_add(v0)
                ^ sum.wrapping_add(key[((sum >> 11) & 3) as usize]),
        );
        sum = sum.wrapping_sub(DELTA);
        v0 = v0.wrapping_sub(
            ((v1 << 4) ^ (v1 >> 5))
                .wrapping_add(v1)
                ^ sum.wrapping_add(key[(sum & 3) as usize]),
        );
    }

    [v0, v1]
}

/// Encrypt a single 8-byte block with a 16-byte key.
///
/// Key and block words are unpacked under `endian`; both sides of an
/// encrypt/decrypt pair must use the same order.
pub fn encrypt_block(
    key: &[u8],
    block: &[u8],
    cycles: u32,
    endian: Endian,
) -> Result<[u8; BLOCK_SIZE], CipherError> {
    if key.len() != KEY_SIZE {
        return Err(CipherError::InvalidKeyLength);
    }
    if block.len() != BLOCK_SIZE {
        return Err(CipherError::InvalidLength);
    }

    let k = codec::unpack_key(key, endian);
    let v = codec::unpack_block(block, endian);

    Ok(codec::pack_block(encrypt_words(&k, v, cycles), endian))
}

/// Decrypt a single 8-byte block with a 16-byte key.
pub fn decrypt_block(
    key: &[u8],
    block: &[u8],
    cycles: u32,
    endian: Endian,
) -> Result<[u8; BLOCK_SIZE], CipherError> {
    if key.len() != KEY_SIZE {
        return Err(CipherError::InvalidKeyLength);
    }
    if block.len() != BLOCK_SIZE {
        return Err(CipherError::InvalidLength);
    }

    let k = codec::unpack_key(key, endian);
    let v = codec::unpack_block(block, endian);

    Ok(codec::pack_block(decrypt_words(&k, v, cycles), endian))
}
