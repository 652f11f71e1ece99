use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncryptionError {
    #[error("加密失败: {0}")]
    EncryptionFailed(String),
    #[error("解密失败: {0}")]
    DecryptionFailed(String),
    #[error("口令不能为空")]
    EmptyPassphrase,
}

const KEY_SIZE: usize = 32; // 256 bits
const NONCE_SIZE: usize = 12; // 96 bits for GCM
const SALT_SIZE: usize = 16;
pub const PBKDF2_ROUNDS: u32 = 100_000;

/// 由口令和盐派生 256 位密钥：PBKDF2-HMAC-SHA256
pub fn derive_key(passphrase: &str, salt: &[u8]) -> [u8; KEY_SIZE] {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, PBKDF2_ROUNDS, &mut key);
    key
}

/// 用口令加密备份内容
///
/// # 返回
/// Base64( salt(16) + nonce(12) + ciphertext )
pub fn encrypt_with_passphrase(content: &str, passphrase: &str) -> Result<String, EncryptionError> {
    if passphrase.is_empty() {
        return Err(EncryptionError::EmptyPassphrase);
    }

    let mut salt = [0u8; SALT_SIZE];
    rand::thread_rng().fill_bytes(&mut salt);
    let key = derive_key(passphrase, &salt);

    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| EncryptionError::EncryptionFailed(format!("初始化加密器失败: {}", e)))?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, content.as_bytes())
        .map_err(|e| EncryptionError::EncryptionFailed(e.to_string()))?;

    let mut combined = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + ciphertext.len());
    combined.extend_from_slice(&salt);
    combined.extend_from_slice(&nonce);
    combined.extend_from_slice(&ciphertext);

    Ok(general_purpose::STANDARD.encode(&combined))
}

/// 用口令解密备份内容
pub fn decrypt_with_passphrase(encrypted: &str, passphrase: &str) -> Result<String, EncryptionError> {
    if passphrase.is_empty() {
        return Err(EncryptionError::EmptyPassphrase);
    }

    let combined = general_purpose::STANDARD
        .decode(encrypted.trim())
        .map_err(|e| EncryptionError::DecryptionFailed(format!("Base64解码失败: {}", e)))?;

    if combined.len() < SALT_SIZE + NONCE_SIZE {
        return Err(EncryptionError::DecryptionFailed(
            "加密数据格式不正确".to_string(),
        ));
    }

    let (salt, rest) = combined.split_at(SALT_SIZE);
    let (nonce, ciphertext) = rest.split_at(NONCE_SIZE);
    let key = derive_key(passphrase, salt);

    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| EncryptionError::DecryptionFailed(format!("初始化解密器失败: {}", e)))?;

    // 口令错误时 GCM 校验失败
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| EncryptionError::DecryptionFailed("口令错误或数据已损坏".to_string()))?;

    String::from_utf8(plaintext)
        .map_err(|e| EncryptionError::DecryptionFailed(format!("UTF-8解码失败: {}", e)))
}
