//! Password-based encryption of journal files
//!
//! Layout of a sealed file:
//!
//! ```text
//! "MLOG" | version u8 | m_cost u32 | t_cost u32 | p_cost u32 | salt[16] | nonce[12] | ciphertext
//! ```
//!
//! The key is Argon2id(password, salt). The whole header is authenticated as
//! associated data, so the stored KDF parameters cannot be swapped silently.

use argon2::{Algorithm, Argon2, Params, Version};
use chacha20poly1305::{
    aead::{Aead, AeadCore, KeyInit, OsRng, Payload},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

const MAGIC: &[u8; 4] = b"MLOG";
const VERSION: u8 = 1;
const KEY_LEN: usize = 32;
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const HEADER_LEN: usize = MAGIC.len() + 1 + 12 + SALT_LEN + NONCE_LEN;

// Upper bounds on stored costs; the header is only authenticated after the key is derived
const MAX_MEMORY_KIB: u32 = 1024 * 1024;
const MAX_ITERATIONS: u32 = 64;
const MAX_PARALLELISM: u32 = 16;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid key derivation parameters: {0}")]
    InvalidParams(String),

    #[error("not a moodlog journal file")]
    BadMagic,

    #[error("unsupported journal file version {0}")]
    UnsupportedVersion(u8),

    #[error("journal file header is damaged")]
    BadHeader,

    #[error("journal file is truncated")]
    Truncated,

    #[error("wrong password or corrupted journal file")]
    Decrypt,

    #[error("encryption failed")]
    Encrypt,
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        KdfParams {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        KdfParams {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        self.argon2_params()
            .map(|_| ())
            .map_err(|e| crate::error::JournalError::Config(e.to_string()))
    }

    fn within_limits(&self) -> bool {
        self.memory_kib <= MAX_MEMORY_KIB
            && self.iterations <= MAX_ITERATIONS
            && self.parallelism <= MAX_PARALLELISM
    }

    fn argon2_params(&self) -> Result<Params, CryptoError> {
        if !self.within_limits() {
            return Err(CryptoError::InvalidParams(format!(
                "costs above the limits (memory_kib <= {}, iterations <= {}, parallelism <= {})",
                MAX_MEMORY_KIB, MAX_ITERATIONS, MAX_PARALLELISM
            )));
        }
        Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|e| CryptoError::InvalidParams(e.to_string()))
    }

    fn cipher(&self, password: &[u8], salt: &[u8]) -> Result<ChaCha20Poly1305, CryptoError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.argon2_params()?);

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        argon2
            .hash_password_into(password, salt, &mut key[..])
            .map_err(|e| CryptoError::InvalidParams(e.to_string()))?;

        Ok(ChaCha20Poly1305::new(Key::from_slice(&key[..])))
    }
}

/// Encrypt `plaintext` under a key derived from `password` with a fresh salt and nonce
pub fn seal(password: &[u8], params: &KdfParams, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);

    let mut out = Vec::with_capacity(HEADER_LEN + plaintext.len() + 16);
    out.extend_from_slice(MAGIC);
    out.push(VERSION);
    out.extend_from_slice(&params.memory_kib.to_le_bytes());
    out.extend_from_slice(&params.iterations.to_le_bytes());
    out.extend_from_slice(&params.parallelism.to_le_bytes());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&nonce);

    let cipher = params.cipher(password, &salt)?;
    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad: &out,
            },
        )
        .map_err(|_| CryptoError::Encrypt)?;

    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt a sealed file; any tampering or a wrong password yields `CryptoError::Decrypt`
pub fn open(password: &[u8], sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < MAGIC.len() + 1 {
        return Err(CryptoError::Truncated);
    }
    if &sealed[..MAGIC.len()] != MAGIC {
        return Err(CryptoError::BadMagic);
    }
    let version = sealed[MAGIC.len()];
    if version != VERSION {
        return Err(CryptoError::UnsupportedVersion(version));
    }
    if sealed.len() < HEADER_LEN {
        return Err(CryptoError::Truncated);
    }

    let (header, ciphertext) = sealed.split_at(HEADER_LEN);
    let params_start = MAGIC.len() + 1;
    let params = KdfParams::new(
        read_u32(header, params_start),
        read_u32(header, params_start + 4),
        read_u32(header, params_start + 8),
    );
    if !params.within_limits() {
        return Err(CryptoError::BadHeader);
    }

    let salt_start = params_start + 12;
    let salt = &header[salt_start..salt_start + SALT_LEN];
    let nonce = Nonce::from_slice(&header[salt_start + SALT_LEN..]);

    params
        .cipher(password, salt)?
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad: header,
            },
        )
        .map_err(|_| CryptoError::Decrypt)
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
