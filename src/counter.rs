//! Deterministic counter for the CTR mode of operation.

use super::codec::{self, Endian};
use super::constants::BLOCK_SIZE;
use super::KeystreamSource;

/// Counter suitable for CTR mode.
///
/// Starts at the decoded nonce value and increments modulo 2^64 on every
/// call. The nonce must be unique per key: for a fixed key no two outputs
/// across the key's lifetime may repeat. That contract is the caller's to
/// keep, including across independently constructed counters sharing a
/// nonce; the counter itself only guarantees the arithmetic.
#[derive(Debug, Clone)]
pub struct Counter {
    nonce: [u8; BLOCK_SIZE],
    endian: Endian,
    current: u64,
}

impl Counter {
    pub fn new(nonce: [u8; BLOCK_SIZE], endian: Endian) -> Counter {
        let current = codec::from_bytes(&nonce, endian);
        Counter { nonce, endian, current }
    }

    /// Return the current value as 8 bytes, then increment.
    pub fn call(&mut self) -> [u8; BLOCK_SIZE] {
        let value = codec::to_bytes(self.current, BLOCK_SIZE, self.endian);
        self.current = self.current.wrapping_add(1);

        value.try_into().expect("counter value is 8 bytes")
    }

    /// Restore the value from the original nonce.
    pub fn reset(&mut self) {
        self.current = codec::from_bytes(&self.nonce, self.endian);
    }
}

impl KeystreamSource for Counter {
    fn next_block(&mut self) -> [u8; BLOCK_SIZE] {
        self.call()
    }
}
