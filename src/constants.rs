/// Block size of XTEA in bytes.
pub const BLOCK_SIZE: usize = 8;

/// Key size of XTEA in bytes (128 bit).
pub const KEY_SIZE: usize = 16;

/// Default number of rounds. One cycle of the round function is two rounds.
pub const DEFAULT_ROUNDS: u32 = 64;

pub const DELTA: u32 = 0x9E3779B9;

/// Reduction constant for subkey doubling in GF(2^64).
pub const CMAC_RB: u64 = 0x1B;
