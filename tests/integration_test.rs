use rand::Rng;

use xtea::{
    decrypt_block, encrypt_block, CipherOptions, Cmac, Counter, Endian, Mode, XteaCipher,
    BLOCK_SIZE,
};

fn random_key(rng: &mut impl Rng) -> Vec<u8> {
    (0..16).map(|_| rng.gen()).collect()
}

fn random_iv(rng: &mut impl Rng) -> Vec<u8> {
    (0..8).map(|_| rng.gen()).collect()
}

#[test]
fn block_identity_over_round_range() {
    let mut rng = rand::thread_rng();

    for rounds in (2..=128).step_by(2) {
        let key = random_key(&mut rng);
        let block: Vec<u8> = (0..8).map(|_| rng.gen()).collect();
        let cycles = rounds / 2;

        let encrypted = encrypt_block(&key, &block, cycles, Endian::Big).unwrap();
        let decrypted = decrypt_block(&key, &encrypted, cycles, Endian::Big).unwrap();

        assert_eq!(decrypted.to_vec(), block, "rounds={}", rounds);
    }
}

#[test]
fn ecb_round_trip() {
    let mut rng = rand::thread_rng();

    for _ in 0..50 {
        let key = random_key(&mut rng);
        let length = rng.gen_range(1..100) * BLOCK_SIZE;
        let plaintext: Vec<u8> = (0..length).map(|_| rng.gen()).collect();

        let mut enc = XteaCipher::new(&key, Mode::Ecb, CipherOptions::default()).unwrap();
        let mut dec = XteaCipher::new(&key, Mode::Ecb, CipherOptions::default()).unwrap();

        let ciphertext = enc.encrypt(&plaintext).unwrap();
        assert_eq!(dec.decrypt(&ciphertext).unwrap(), plaintext);
    }
}

#[test]
fn cbc_round_trip() {
    let mut rng = rand::thread_rng();

    for _ in 0..50 {
        let key = random_key(&mut rng);
        let iv = random_iv(&mut rng);
        let length = rng.gen_range(1..100) * BLOCK_SIZE;
        let plaintext: Vec<u8> = (0..length).map(|_| rng.gen()).collect();

        let mut enc =
            XteaCipher::new(&key, Mode::Cbc, CipherOptions::default().with_iv(&iv)).unwrap();
        let mut dec =
            XteaCipher::new(&key, Mode::Cbc, CipherOptions::default().with_iv(&iv)).unwrap();

        let ciphertext = enc.encrypt(&plaintext).unwrap();
        assert_eq!(dec.decrypt(&ciphertext).unwrap(), plaintext);
    }
}

#[test]
fn cfb_round_trip() {
    let mut rng = rand::thread_rng();

    for _ in 0..50 {
        let key = random_key(&mut rng);
        let iv = random_iv(&mut rng);
        let length = rng.gen_range(1..100) * BLOCK_SIZE;
        let plaintext: Vec<u8> = (0..length).map(|_| rng.gen()).collect();

        let mut enc =
            XteaCipher::new(&key, Mode::Cfb, CipherOptions::default().with_iv(&iv)).unwrap();
        let mut dec =
            XteaCipher::new(&key, Mode::Cfb, CipherOptions::default().with_iv(&iv)).unwrap();

        let ciphertext = enc.encrypt(&plaintext).unwrap();
        assert_eq!(dec.decrypt(&ciphertext).unwrap(), plaintext);
    }
}

#[test]
fn ofb_round_trip_arbitrary_length() {
    let mut rng = rand::thread_rng();

    for _ in 0..50 {
        let key = random_key(&mut rng);
        let iv = random_iv(&mut rng);
        let length = rng.gen_range(1..800);
        let plaintext: Vec<u8> = (0..length).map(|_| rng.gen()).collect();

        let mut enc =
            XteaCipher::new(&key, Mode::Ofb, CipherOptions::default().with_iv(&iv)).unwrap();
        let mut dec =
            XteaCipher::new(&key, Mode::Ofb, CipherOptions::default().with_iv(&iv)).unwrap();

        let ciphertext = enc.encrypt(&plaintext).unwrap();
        assert_eq!(dec.decrypt(&ciphertext).unwrap(), plaintext);
    }
}

#[test]
fn ctr_round_trip_arbitrary_length() {
    let mut rng = rand::thread_rng();

    for _ in 0..50 {
        let key = random_key(&mut rng);
        let nonce: [u8; 8] = rng.gen();
        let length = rng.gen_range(1..800);
        let plaintext: Vec<u8> = (0..length).map(|_| rng.gen()).collect();

        let mut enc = XteaCipher::new(
            &key,
            Mode::Ctr,
            CipherOptions::default().with_counter(Counter::new(nonce, Endian::Big)),
        )
        .unwrap();
        let mut dec = XteaCipher::new(
            &key,
            Mode::Ctr,
            CipherOptions::default().with_counter(Counter::new(nonce, Endian::Big)),
        )
        .unwrap();

        let ciphertext = enc.encrypt(&plaintext).unwrap();
        assert_eq!(dec.decrypt(&ciphertext).unwrap(), plaintext);
    }
}

#[test]
fn little_endian_round_trip() {
    let mut rng = rand::thread_rng();

    for _ in 0..20 {
        let key = random_key(&mut rng);
        let iv = random_iv(&mut rng);
        let plaintext: Vec<u8> = (0..64).map(|_| rng.gen()).collect();

        let options = || {
            CipherOptions::default()
                .with_iv(&iv)
                .with_endian(Endian::Little)
        };
        let mut enc = XteaCipher::new(&key, Mode::Cbc, options()).unwrap();
        let mut dec = XteaCipher::new(&key, Mode::Cbc, options()).unwrap();

        let ciphertext = enc.encrypt(&plaintext).unwrap();
        assert_eq!(dec.decrypt(&ciphertext).unwrap(), plaintext);

        // The same key under the other byte order is an incompatible
        // permutation.
        let mut other = XteaCipher::new(&key, Mode::Ecb, CipherOptions::default()).unwrap();
        let mut this =
            XteaCipher::new(&key, Mode::Ecb, CipherOptions::default().with_endian(Endian::Little))
                .unwrap();
        assert_ne!(
            other.encrypt(&plaintext).unwrap(),
            this.encrypt(&plaintext).unwrap()
        );
    }
}

#[test]
fn cbc_plaintext_flip_propagates_to_all_later_blocks() {
    let mut rng = rand::thread_rng();

    let key = random_key(&mut rng);
    let iv = random_iv(&mut rng);
    let plaintext: Vec<u8> = (0..48).map(|_| rng.gen()).collect();

    let mut a = XteaCipher::new(&key, Mode::Cbc, CipherOptions::default().with_iv(&iv)).unwrap();
    let reference = a.encrypt(&plaintext).unwrap();

    let mut flipped = plaintext.clone();
    flipped[9] ^= 0x40; // second block

    let mut b = XteaCipher::new(&key, Mode::Cbc, CipherOptions::default().with_iv(&iv)).unwrap();
    let corrupted = b.encrypt(&flipped).unwrap();

    assert_eq!(reference[..8], corrupted[..8]);
    for i in 1..6 {
        assert_ne!(
            reference[i * 8..(i + 1) * 8],
            corrupted[i * 8..(i + 1) * 8],
            "block {}",
            i
        );
    }
}

#[test]
fn cbc_self_synchronizes_after_corrupted_ciphertext_block() {
    let mut rng = rand::thread_rng();

    let key = random_key(&mut rng);
    let iv = random_iv(&mut rng);
    let plaintext: Vec<u8> = (0..32).map(|_| rng.gen()).collect();

    let mut enc = XteaCipher::new(&key, Mode::Cbc, CipherOptions::default().with_iv(&iv)).unwrap();
    let mut ciphertext = enc.encrypt(&plaintext).unwrap();
    ciphertext[10] ^= 0x04; // corrupt block 1

    let mut dec = XteaCipher::new(&key, Mode::Cbc, CipherOptions::default().with_iv(&iv)).unwrap();
    let decrypted = dec.decrypt(&ciphertext).unwrap();

    // Block 0 is before the corruption; block 2 differs in exactly the
    // flipped bit; block 3 onwards recovers.
    assert_eq!(decrypted[..8], plaintext[..8]);
    assert_ne!(decrypted[8..16], plaintext[8..16]);

    let mut expected_block2 = plaintext[16..24].to_vec();
    expected_block2[2] ^= 0x04;
    assert_eq!(decrypted[16..24], expected_block2[..]);

    assert_eq!(decrypted[24..], plaintext[24..]);
}

#[test]
fn cfb_self_synchronizes_after_corrupted_ciphertext_block() {
    let mut rng = rand::thread_rng();

    let key = random_key(&mut rng);
    let iv = random_iv(&mut rng);
    let plaintext: Vec<u8> = (0..32).map(|_| rng.gen()).collect();

    let mut enc = XteaCipher::new(&key, Mode::Cfb, CipherOptions::default().with_iv(&iv)).unwrap();
    let mut ciphertext = enc.encrypt(&plaintext).unwrap();
    ciphertext[10] ^= 0x04; // corrupt block 1

    let mut dec = XteaCipher::new(&key, Mode::Cfb, CipherOptions::default().with_iv(&iv)).unwrap();
    let decrypted = dec.decrypt(&ciphertext).unwrap();

    // The corrupted block decrypts with exactly the flipped bit, the next
    // block is garbled, then the chain recovers.
    let mut expected_block1 = plaintext[8..16].to_vec();
    expected_block1[2] ^= 0x04;

    assert_eq!(decrypted[..8], plaintext[..8]);
    assert_eq!(decrypted[8..16], expected_block1[..]);
    assert_ne!(decrypted[16..24], plaintext[16..24]);
    assert_eq!(decrypted[24..], plaintext[24..]);
}

#[test]
fn stream_modes_encrypt_equals_decrypt() {
    let mut rng = rand::thread_rng();

    let key = random_key(&mut rng);
    let iv = random_iv(&mut rng);
    let data: Vec<u8> = (0..100).map(|_| rng.gen()).collect();

    let mut a = XteaCipher::new(&key, Mode::Ofb, CipherOptions::default().with_iv(&iv)).unwrap();
    let mut b = XteaCipher::new(&key, Mode::Ofb, CipherOptions::default().with_iv(&iv)).unwrap();
    assert_eq!(a.encrypt(&data).unwrap(), b.decrypt(&data).unwrap());

    let nonce: [u8; 8] = rng.gen();
    let mut a = XteaCipher::new(
        &key,
        Mode::Ctr,
        CipherOptions::default().with_counter(Counter::new(nonce, Endian::Big)),
    )
    .unwrap();
    let mut b = XteaCipher::new(
        &key,
        Mode::Ctr,
        CipherOptions::default().with_counter(Counter::new(nonce, Endian::Big)),
    )
    .unwrap();
    assert_eq!(a.encrypt(&data).unwrap(), b.decrypt(&data).unwrap());
}

#[test]
fn counter_reset_replays_keystream() {
    let mut rng = rand::thread_rng();

    let key = random_key(&mut rng);
    let nonce: [u8; 8] = rng.gen();
    let plaintext: Vec<u8> = (0..200).map(|_| rng.gen()).collect();

    // A counter that has already produced values replays the same
    // sequence after reset, so decryption can reuse it.
    let mut counter = Counter::new(nonce, Endian::Big);
    let burned: Vec<_> = (0..4).map(|_| counter.call()).collect();
    counter.reset();
    let replayed: Vec<_> = (0..4).map(|_| counter.call()).collect();
    assert_eq!(burned, replayed);

    counter.reset();
    let mut enc = XteaCipher::new(
        &key,
        Mode::Ctr,
        CipherOptions::default().with_counter(counter.clone()),
    )
    .unwrap();
    let ciphertext = enc.encrypt(&plaintext).unwrap();

    let mut dec = XteaCipher::new(
        &key,
        Mode::Ctr,
        CipherOptions::default().with_counter(counter),
    )
    .unwrap();
    assert_eq!(dec.decrypt(&ciphertext).unwrap(), plaintext);
}

#[test]
fn cmac_is_stable_under_random_splits() {
    let mut rng = rand::thread_rng();

    for _ in 0..20 {
        let key = random_key(&mut rng);
        let length = rng.gen_range(0..300);
        let message: Vec<u8> = (0..length).map(|_| rng.gen()).collect();

        let mut whole = Cmac::new(&key).unwrap();
        whole.update(&message).unwrap();
        let expected = whole.finalize().unwrap();
        assert_eq!(expected.len(), BLOCK_SIZE);

        let split = if message.is_empty() {
            0
        } else {
            rng.gen_range(0..message.len())
        };
        let mut pieces = Cmac::new(&key).unwrap();
        pieces.update(&message[..split]).unwrap();
        pieces.update(&message[split..]).unwrap();

        assert_eq!(pieces.finalize().unwrap(), expected);
    }
}
