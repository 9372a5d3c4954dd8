//! Envelope encryption and decryption.
//!
//! The core transform takes caller-provided salt and IV so tests can be
//! deterministic. [`encrypt`] is the production entry point and samples both
//! from the OS RNG.

use aes::Aes256;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use cbc::{Decryptor, Encryptor};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::CodecError;

/// Salt length in bytes (envelope bytes 0..16).
pub const SALT_SIZE: usize = 16;

/// IV length in bytes (envelope bytes 16..32).
pub const IV_SIZE: usize = 16;

/// Minimum decoded envelope length: salt plus IV.
pub const ENVELOPE_HEADER_SIZE: usize = SALT_SIZE + IV_SIZE;

/// Derived AES key length in bytes.
pub const KEY_SIZE: usize = 32;

/// PBKDF2-HMAC-SHA256 iteration count.
pub const PBKDF2_ROUNDS: u32 = 1000;

type Aes256CbcEnc = Encryptor<Aes256>;
type Aes256CbcDec = Decryptor<Aes256>;

/// Encrypt a plaintext line into an envelope under `passphrase`.
///
/// Samples a fresh salt and IV from the OS RNG on every call, so two
/// envelopes for the same plaintext never match. Cannot fail for string
/// input; always returns non-empty text.
pub fn encrypt(plaintext: &str, passphrase: &str) -> String {
    let mut salt = [0u8; SALT_SIZE];
    let mut iv = [0u8; IV_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    rand::rngs::OsRng.fill_bytes(&mut iv);

    encrypt_with_params(plaintext, passphrase, salt, iv)
}

/// Encrypt with caller-provided salt and IV.
///
/// Deterministic: same inputs always produce the same envelope. Production
/// code must use [`encrypt`]; reusing a salt/IV pair across messages leaks
/// plaintext relationships.
pub fn encrypt_with_params(
    plaintext: &str,
    passphrase: &str,
    salt: [u8; SALT_SIZE],
    iv: [u8; IV_SIZE],
) -> String {
    let key = derive_key(passphrase, &salt);
    let key_bytes: &[u8; KEY_SIZE] = &key;

    let ciphertext = Aes256CbcEnc::new(key_bytes.into(), (&iv).into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let mut raw = Vec::with_capacity(ENVELOPE_HEADER_SIZE + ciphertext.len());
    raw.extend_from_slice(&salt);
    raw.extend_from_slice(&iv);
    raw.extend_from_slice(&ciphertext);

    BASE64.encode(raw)
}

/// Decrypt an envelope back to plaintext under `passphrase`.
///
/// # Errors
///
/// - [`CodecError::Decode`]: not valid base64, or decoded length is shorter
///   than salt + IV
/// - [`CodecError::Authentication`]: wrong passphrase, corrupted ciphertext,
///   bad padding, or a non-UTF-8 result
pub fn decrypt(envelope: &str, passphrase: &str) -> Result<String, CodecError> {
    let raw = BASE64
        .decode(envelope.trim())
        .map_err(|e| CodecError::Decode { reason: format!("invalid base64: {e}") })?;

    if raw.len() < ENVELOPE_HEADER_SIZE {
        return Err(CodecError::Decode {
            reason: format!(
                "envelope is {} bytes, need at least {ENVELOPE_HEADER_SIZE} for salt and IV",
                raw.len()
            ),
        });
    }

    let (salt, rest) = raw.split_at(SALT_SIZE);
    let (iv, ciphertext) = rest.split_at(IV_SIZE);

    let key = derive_key(passphrase, salt);
    let key_bytes: &[u8; KEY_SIZE] = &key;

    let cipher = Aes256CbcDec::new_from_slices(key_bytes, iv)
        .map_err(|e| CodecError::Authentication { reason: format!("cipher init failed: {e}") })?;

    let plaintext_bytes = cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CodecError::Authentication {
            reason: "bad padding or wrong passphrase".to_string(),
        })?;

    String::from_utf8(plaintext_bytes)
        .map_err(|_| CodecError::Authentication { reason: "plaintext is not UTF-8".to_string() })
}

/// Derive the 256-bit AES key from the passphrase and salt.
///
/// Recomputed on every encrypt/decrypt call; the key material is zeroized
/// when the returned guard drops.
fn derive_key(passphrase: &str, salt: &[u8]) -> Zeroizing<[u8; KEY_SIZE]> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, PBKDF2_ROUNDS, &mut *key);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: [u8; SALT_SIZE] = [0x11; SALT_SIZE];
    const IV: [u8; IV_SIZE] = [0x22; IV_SIZE];

    #[test]
    fn roundtrip() {
        let envelope = encrypt("hello relay", "hunter2");
        let plaintext = decrypt(&envelope, "hunter2").unwrap();

        assert_eq!(plaintext, "hello relay");
    }

    #[test]
    fn roundtrip_unicode() {
        let message = "grüße aus dem café ☕";
        let envelope = encrypt(message, "pässwörd");

        assert_eq!(decrypt(&envelope, "pässwörd").unwrap(), message);
    }

    #[test]
    fn roundtrip_empty_plaintext() {
        let envelope = encrypt("", "key");

        assert_eq!(decrypt(&envelope, "key").unwrap(), "");
    }

    #[test]
    fn encrypt_is_nondeterministic() {
        let a = encrypt("same message", "same key");
        let b = encrypt("same message", "same key");

        assert_ne!(a, b, "fresh salt/IV must produce different envelopes");
        assert_eq!(decrypt(&a, "same key").unwrap(), "same message");
        assert_eq!(decrypt(&b, "same key").unwrap(), "same message");
    }

    #[test]
    fn encrypt_with_params_is_deterministic() {
        let a = encrypt_with_params("msg", "key", SALT, IV);
        let b = encrypt_with_params("msg", "key", SALT, IV);

        assert_eq!(a, b);
    }

    #[test]
    fn wrong_passphrase_never_recovers_plaintext() {
        let envelope = encrypt("secret message", "right key");

        // CBC without a MAC: a wrong key usually fails unpadding, but can in
        // principle produce garbage. It must never yield the original text.
        match decrypt(&envelope, "wrong key") {
            Err(CodecError::Authentication { .. }) => {},
            Ok(garbage) => assert_ne!(garbage, "secret message"),
            Err(e) => panic!("unexpected error kind: {e}"),
        }
    }

    #[test]
    fn tampered_ciphertext_never_recovers_plaintext() {
        let envelope = encrypt_with_params("original message", "key", SALT, IV);
        let mut raw = BASE64.decode(&envelope).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xFF;
        let tampered = BASE64.encode(raw);

        match decrypt(&tampered, "key") {
            Err(CodecError::Authentication { .. }) => {},
            Ok(garbage) => assert_ne!(garbage, "original message"),
            Err(e) => panic!("unexpected error kind: {e}"),
        }
    }

    #[test]
    fn non_base64_is_decode_failure() {
        let result = decrypt("this is !!! not base64", "key");

        assert!(matches!(result, Err(CodecError::Decode { .. })));
    }

    #[test]
    fn undersized_envelope_is_decode_failure() {
        // Valid base64, but only 10 decoded bytes - shorter than salt + IV.
        let short = BASE64.encode([0u8; 10]);
        let result = decrypt(&short, "key");

        assert!(matches!(result, Err(CodecError::Decode { .. })));
    }

    #[test]
    fn exactly_header_sized_envelope_has_empty_ciphertext() {
        // 32 bytes decode fine but leave no ciphertext; unpadding fails.
        let header_only = BASE64.encode([0u8; ENVELOPE_HEADER_SIZE]);
        let result = decrypt(&header_only, "key");

        assert!(matches!(result, Err(CodecError::Authentication { .. })));
    }

    #[test]
    fn partial_block_ciphertext_is_authentication_failure() {
        // 7 trailing bytes cannot be a CBC ciphertext (not a block multiple).
        let truncated = BASE64.encode([0u8; ENVELOPE_HEADER_SIZE + 7]);
        let result = decrypt(&truncated, "key");

        assert!(matches!(result, Err(CodecError::Authentication { .. })));
    }

    #[test]
    fn trailing_newline_is_tolerated() {
        // Envelopes arrive newline-terminated off the wire.
        let envelope = encrypt("line", "key");
        let with_newline = format!("{envelope}\n");

        assert_eq!(decrypt(&with_newline, "key").unwrap(), "line");
    }

    #[test]
    fn envelope_layout_is_salt_then_iv() {
        let envelope = encrypt_with_params("x", "key", SALT, IV);
        let raw = BASE64.decode(envelope).unwrap();

        assert_eq!(&raw[..SALT_SIZE], &SALT);
        assert_eq!(&raw[SALT_SIZE..ENVELOPE_HEADER_SIZE], &IV);
        // One padded AES block of ciphertext follows.
        assert_eq!(raw.len(), ENVELOPE_HEADER_SIZE + 16);
    }
}
