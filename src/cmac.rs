//! CMAC over the XTEA block transform, per NIST SP 800-38B, plus a
//! legacy raw CBC-MAC variant.

use super::block::encrypt_words;
use super::codec::{self, Endian};
use super::constants::*;
use super::CipherError;

// Subkey doubling in GF(2^64) with reduction constant 0x1B.
fn dbl(x: u64) -> u64 {
    if x & (1 << 63) == 0 {
        x << 1
    } else {
        (x << 1) ^ CMAC_RB
    }
}

// The MAC constructions always run the block transform with the default
// 64 rounds and big-endian words, independent of any cipher context.
fn mac_transform(key: &[u32; 4], block: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
    let cycles = DEFAULT_ROUNDS / 2;
    codec::pack_block(
        encrypt_words(key, codec::unpack_block(block, Endian::Big), cycles),
        Endian::Big,
    )
}

fn cbc_tag(key: &[u32; 4], blocks: &[u8]) -> [u8; BLOCK_SIZE] {
    let mut register = [0u8; BLOCK_SIZE];

    for block in blocks.chunks(BLOCK_SIZE) {
        codec::xor_in_place(&mut register, block);
        register = mac_transform(key, &register);
    }

    register
}

/// CMAC message authentication producing an 8-byte tag.
///
/// Subkeys K1/K2 are derived once at construction by doubling
/// `E(key, 0-block)` in GF(2^64); the tag is the final block of a
/// zero-IV CBC pass over the padded message.
pub struct Cmac {
    key: [u32; 4],
    k1: u64,
    k2: u64,
    message: Vec<u8>,
    finalized: bool,
}

impl Cmac {
    pub fn new(key: &[u8]) -> Result<Cmac, CipherError> {
        if key.len() != KEY_SIZE {
            return Err(CipherError::InvalidKeyLength);
        }

        let key = codec::unpack_key(key, Endian::Big);
        let l = codec::from_bytes(&mac_transform(&key, &[0u8; BLOCK_SIZE]), Endian::Big);
        let k1 = dbl(l);
        let k2 = dbl(k1);

        Ok(Cmac {
            key,
            k1,
            k2,
            message: Vec::new(),
            finalized: false,
        })
    }

    /// Append `data` to the accumulated message.
    pub fn update(&mut self, data: &[u8]) -> Result<(), CipherError> {
        if self.finalized {
            return Err(CipherError::InvalidState);
        }
        self.message.extend_from_slice(data);
        Ok(())
    }

    /// Pad, apply the subkey and return the 8-byte tag. The context may
    /// not be updated or finalized again afterwards.
    pub fn finalize(&mut self) -> Result<[u8; BLOCK_SIZE], CipherError> {
        if self.finalized {
            return Err(CipherError::InvalidState);
        }
        self.finalized = true;

        let mut blocks = self.message.clone();
        let last_len = blocks.len() % BLOCK_SIZE;

        let subkey = if !blocks.is_empty() && last_len == 0 {
            self.k1
        } else {
            // Pad the last partial block with a single 1 bit then zeros.
            // An empty message becomes one all-padding block.
            blocks.push(0x80);
            blocks.resize(blocks.len() + BLOCK_SIZE - 1 - last_len, 0);
            self.k2
        };

        let offset = blocks.len() - BLOCK_SIZE;
        codec::xor_in_place(
            &mut blocks[offset..],
            &codec::to_bytes(subkey, BLOCK_SIZE, Endian::Big),
        );

        Ok(cbc_tag(&self.key, &blocks))
    }

    /// Finalize and return the tag as a lowercase hex string.
    pub fn hex_digest(&mut self) -> Result<String, CipherError> {
        Ok(hex::encode(self.finalize()?))
    }
}

/// Legacy CBC-MAC: the last ciphertext block of a zero-IV CBC pass over
/// the raw message, without subkeys or padding.
///
/// This construction is insecure for variable-length messages and is
/// kept only for compatibility with historical callers. Prefer [`Cmac`].
pub struct CbcMac {
    key: [u32; 4],
    message: Vec<u8>,
    finalized: bool,
}

impl CbcMac {
    pub fn new(key: &[u8]) -> Result<CbcMac, CipherError> {
        if key.len() != KEY_SIZE {
            return Err(CipherError::InvalidKeyLength);
        }

        Ok(CbcMac {
            key: codec::unpack_key(key, Endian::Big),
            message: Vec::new(),
            finalized: false,
        })
    }

    pub fn update(&mut self, data: &[u8]) -> Result<(), CipherError> {
        if self.finalized {
            return Err(CipherError::InvalidState);
        }
        self.message.extend_from_slice(data);
        Ok(())
    }

    /// Return the tag. The message must be non-empty and a multiple of
    /// 8 bytes long.
    pub fn finalize(&mut self) -> Result<[u8; BLOCK_SIZE], CipherError> {
        if self.finalized {
            return Err(CipherError::InvalidState);
        }
        if self.message.is_empty() || self.message.len() % BLOCK_SIZE != 0 {
            return Err(CipherError::InvalidLength);
        }
        self.finalized = true;

        Ok(cbc_tag(&self.key, &self.message))
    }
}
