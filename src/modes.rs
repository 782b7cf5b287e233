//! Modes of operation over the XTEA block transform.
//!
//! A [`XteaCipher`] context is bound to a key, a mode and the mode's
//! auxiliary state (feedback register or counter). Chaining state is
//! persistent: every `encrypt`/`decrypt` call advances it, so repeated
//! calls on one context continue the same stream instead of restarting
//! from the original IV. Contexts are reusable until dropped and must be
//! owned by exactly one logical stream.

use std::collections::VecDeque;

use super::block::{decrypt_words, encrypt_words};
use super::codec::{self, Endian};
use super::constants::*;
use super::{CipherError, KeystreamSource};

/// Mode of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Electronic codebook. Stateless; identical plaintext blocks give
    /// identical ciphertext blocks, which is usually insecure.
    Ecb,
    /// Cipher block chaining.
    Cbc,
    /// Cipher feedback with full-block (8-byte) segments.
    Cfb,
    /// Output feedback.
    Ofb,
    /// Counter mode, driven by an injected [`KeystreamSource`].
    Ctr,
    /// Not implemented; selecting it fails with `UnsupportedMode`.
    Pgp,
}

/// Mode-specific construction parameters.
///
/// CBC, CFB and OFB require an 8-byte `iv`; CTR requires a `counter`;
/// ECB requires neither. `rounds` must be even and defaults to 64.
pub struct CipherOptions {
    pub iv: Option<Vec<u8>>,
    pub counter: Option<Box<dyn KeystreamSource>>,
    pub rounds: u32,
    pub endian: Endian,
}

impl Default for CipherOptions {
    fn default() -> CipherOptions {
        CipherOptions {
            iv: None,
            counter: None,
            rounds: DEFAULT_ROUNDS,
            endian: Endian::Big,
        }
    }
}

impl CipherOptions {
    pub fn with_iv(mut self, iv: &[u8]) -> CipherOptions {
        self.iv = Some(iv.to_vec());
        self
    }

    pub fn with_counter(mut self, counter: impl KeystreamSource + 'static) -> CipherOptions {
        self.counter = Some(Box::new(counter));
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> CipherOptions {
        self.rounds = rounds;
        self
    }

    pub fn with_endian(mut self, endian: Endian) -> CipherOptions {
        self.endian = endian;
        self
    }
}

// One variant per mode keeps the dispatch exhaustive and the auxiliary
// state impossible to mix up between modes.
enum ModeState {
    Ecb,
    Cbc {
        register: [u8; BLOCK_SIZE],
    },
    Cfb {
        register: [u8; BLOCK_SIZE],
    },
    Ofb {
        register: [u8; BLOCK_SIZE],
        keystream: VecDeque<u8>,
    },
    Ctr {
        counter: Box<dyn KeystreamSource>,
        keystream: VecDeque<u8>,
    },
}

/// An XTEA cipher context.
pub struct XteaCipher {
    key: [u32; 4],
    cycles: u32,
    endian: Endian,
    state: ModeState,
}

impl XteaCipher {
    /// Create a context for `key` in the given mode.
    ///
    /// Fails eagerly when the key is not 16 bytes or the mode's required
    /// auxiliary state is missing or mis-sized.
    pub fn new(key: &[u8], mode: Mode, options: CipherOptions) -> Result<XteaCipher, CipherError> {
        if key.len() != KEY_SIZE {
            return Err(CipherError::InvalidKeyLength);
        }

        let CipherOptions { iv, counter, rounds, endian } = options;

        let state = match mode {
            Mode::Ecb => ModeState::Ecb,
            Mode::Cbc => ModeState::Cbc { register: take_iv(iv)? },
            Mode::Cfb => ModeState::Cfb { register: take_iv(iv)? },
            Mode::Ofb => ModeState::Ofb {
                register: take_iv(iv)?,
                keystream: VecDeque::new(),
            },
            Mode::Ctr => match counter {
                Some(counter) => ModeState::Ctr {
                    counter,
                    keystream: VecDeque::new(),
                },
                None => return Err(CipherError::MissingCounter),
            },
            Mode::Pgp => return Err(CipherError::UnsupportedMode),
        };

        Ok(XteaCipher {
            key: codec::unpack_key(key, endian),
            cycles: rounds / 2,
            endian,
            state,
        })
    }

    /// Encrypt `data`, advancing the chaining state.
    ///
    /// ECB, CBC and CFB require the input length to be a multiple of 8;
    /// OFB and CTR accept any length.
    pub fn encrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.check_length(data)?;

        let (key, cycles, endian) = (self.key, self.cycles, self.endian);
        let out = match &mut self.state {
            ModeState::Ecb => ecb_blocks(&key, cycles, endian, data, Direction::Encrypt),
            ModeState::Cbc { register } => cbc_encrypt(&key, cycles, endian, register, data),
            ModeState::Cfb { register } => cfb_encrypt(&key, cycles, endian, register, data),
            ModeState::Ofb { register, keystream } => {
                ofb_xor(&key, cycles, endian, register, keystream, data)
            }
            ModeState::Ctr { counter, keystream } => {
                ctr_xor(&key, cycles, endian, counter.as_mut(), keystream, data)
            }
        };

        Ok(out)
    }

    /// Decrypt `data`, advancing the chaining state.
    ///
    /// For OFB and CTR this is the same keystream XOR as `encrypt`.
    pub fn decrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.check_length(data)?;

        let (key, cycles, endian) = (self.key, self.cycles, self.endian);
        let out = match &mut self.state {
            ModeState::Ecb => ecb_blocks(&key, cycles, endian, data, Direction::Decrypt),
            ModeState::Cbc { register } => cbc_decrypt(&key, cycles, endian, register, data),
            ModeState::Cfb { register } => cfb_decrypt(&key, cycles, endian, register, data),
            ModeState::Ofb { register, keystream } => {
                ofb_xor(&key, cycles, endian, register, keystream, data)
            }
            ModeState::Ctr { counter, keystream } => {
                ctr_xor(&key, cycles, endian, counter.as_mut(), keystream, data)
            }
        };

        Ok(out)
    }

    // Validation happens before any state mutation; a failed call leaves
    // the chaining state untouched.
    fn check_length(&self, data: &[u8]) -> Result<(), CipherError> {
        let block_aligned = matches!(
            self.state,
            ModeState::Ecb | ModeState::Cbc { .. } | ModeState::Cfb { .. }
        );

        if block_aligned && data.len() % BLOCK_SIZE != 0 {
            return Err(CipherError::InvalidLength);
        }
        Ok(())
    }
}

fn take_iv(iv: Option<Vec<u8>>) -> Result<[u8; BLOCK_SIZE], CipherError> {
    match iv {
        Some(iv) if iv.len() == BLOCK_SIZE => Ok(iv.try_into().expect("length checked")),
        Some(_) => Err(CipherError::InvalidIVLength),
        None => Err(CipherError::MissingIV),
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Encrypt,
    Decrypt,
}

fn forward(key: &[u32; 4], cycles: u32, endian: Endian, block: &[u8]) -> [u8; BLOCK_SIZE] {
    codec::pack_block(
        encrypt_words(key, codec::unpack_block(block, endian), cycles),
        endian,
    )
}

fn ecb_blocks(
    key: &[u32; 4],
    cycles: u32,
    endian: Endian,
    data: &[u8],
    direction: Direction,
) -> Vec<u8> {
    let mut out = vec![0u8; data.len()];

    for (src, dst) in data.chunks(BLOCK_SIZE).zip(out.chunks_mut(BLOCK_SIZE)) {
        let v = codec::unpack_block(src, endian);
        let r = match direction {
            Direction::Encrypt => encrypt_words(key, v, cycles),
            Direction::Decrypt => decrypt_words(key, v, cycles),
        };
        dst.copy_from_slice(&codec::pack_block(r, endian));
    }

    out
}

fn cbc_encrypt(
    key: &[u32; 4],
    cycles: u32,
    endian: Endian,
    register: &mut [u8; BLOCK_SIZE],
    data: &[u8],
) -> Vec<u8> {
    let mut out = vec![0u8; data.len()];

    for (src, dst) in data.chunks(BLOCK_SIZE).zip(out.chunks_mut(BLOCK_SIZE)) {
        codec::xor_in_place(register, src);
        *register = forward(key, cycles, endian, register);
        dst.copy_from_slice(register);
    }

    out
}

fn cbc_decrypt(
    key: &[u32; 4],
    cycles: u32,
    endian: Endian,
    register: &mut [u8; BLOCK_SIZE],
    data: &[u8],
) -> Vec<u8> {
    let mut out = vec![0u8; data.len()];

    for (src, dst) in data.chunks(BLOCK_SIZE).zip(out.chunks_mut(BLOCK_SIZE)) {
        let v = decrypt_words(key, codec::unpack_block(src, endian), cycles);
        dst.copy_from_slice(&codec::pack_block(v, endian));
        codec::xor_in_place(dst, register);
        register.copy_from_slice(src);
    }

    out
}

// CFB keystream always comes from the forward transform, in both
// directions; only the register update differs.
fn cfb_encrypt(
    key: &[u32; 4],
    cycles: u32,
    endian: Endian,
    register: &mut [u8; BLOCK_SIZE],
    data: &[u8],
) -> Vec<u8> {
    let mut out = vec![0u8; data.len()];

    for (src, dst) in data.chunks(BLOCK_SIZE).zip(out.chunks_mut(BLOCK_SIZE)) {
        let tx = forward(key, cycles, endian, register);
        dst.copy_from_slice(src);
        codec::xor_in_place(dst, &tx);
        register.copy_from_slice(dst);
    }

    out
}

fn cfb_decrypt(
    key: &[u32; 4],
    cycles: u32,
    endian: Endian,
    register: &mut [u8; BLOCK_SIZE],
    data: &[u8],
) -> Vec<u8> {
    let mut out = vec![0u8; data.len()];

    for (src, dst) in data.chunks(BLOCK_SIZE).zip(out.chunks_mut(BLOCK_SIZE)) {
        let tx = forward(key, cycles, endian, register);
        dst.copy_from_slice(src);
        codec::xor_in_place(dst, &tx);
        register.copy_from_slice(src);
    }

    out
}

fn ofb_xor(
    key: &[u32; 4],
    cycles: u32,
    endian: Endian,
    register: &mut [u8; BLOCK_SIZE],
    keystream: &mut VecDeque<u8>,
    data: &[u8],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());

    for &byte in data {
        if keystream.is_empty() {
            *register = forward(key, cycles, endian, register);
            keystream.extend(register.iter().copied());
        }
        out.push(byte ^ keystream.pop_front().expect("keystream refilled"));
    }

    out
}

fn ctr_xor(
    key: &[u32; 4],
    cycles: u32,
    endian: Endian,
    counter: &mut dyn KeystreamSource,
    keystream: &mut VecDeque<u8>,
    data: &[u8],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());

    for &byte in data {
        if keystream.is_empty() {
            let block = forward(key, cycles, endian, &counter.next_block());
            keystream.extend(block);
        }
        out.push(byte ^ keystream.pop_front().expect("keystream refilled"));
    }

    out
}
