//! XTEA block cipher (8-byte block, 16-byte key) with the ECB, CBC,
//! CFB, OFB and CTR modes of operation, a CTR counter and CMAC message
//! authentication.
//!
//! This is a low level library. XTEA carries no modern security margin,
//! reduced-round configurations even less so; nothing here makes a
//! strength claim.

mod block;
mod codec;
mod constants;

pub mod cmac;
pub mod counter;
pub mod modes;

pub use block::{decrypt_block, encrypt_block};
pub use cmac::{CbcMac, Cmac};
pub use codec::{from_bytes, to_bytes, Endian};
pub use constants::{BLOCK_SIZE, DEFAULT_ROUNDS, KEY_SIZE};
pub use counter::Counter;
pub use modes::{CipherOptions, Mode, XteaCipher};

use thiserror::Error;

/// Source of 8-byte keystream index blocks for CTR mode.
///
/// The mode engine calls this exactly once per keystream block and never
/// generates counter values itself. Implemented by [`Counter`].
pub trait KeystreamSource {
    fn next_block(&mut self) -> [u8; BLOCK_SIZE];
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CipherError {
    #[error("key must be exactly 16 bytes")]
    InvalidKeyLength,
    #[error("IV must be exactly 8 bytes")]
    InvalidIVLength,
    #[error("this mode of operation requires an IV")]
    MissingIV,
    #[error("CTR mode requires a counter")]
    MissingCounter,
    #[error("input length must be a multiple of the 8-byte block size")]
    InvalidLength,
    #[error("mode of operation is not implemented")]
    UnsupportedMode,
    #[error("byte order must be either 'big' or 'little'")]
    InvalidByteOrder,
    #[error("context has already been finalized")]
    InvalidState,
}
