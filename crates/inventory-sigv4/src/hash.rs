//! SHA-256 digests and the HMAC chain behind SigV4 signing keys.

use hmac::{Hmac, Mac};
use inventory_core::{Error, Result};
use sha2::{Digest, Sha256};

use crate::constants::SCOPE_TERMINATOR;

/// Lowercase hex SHA-256 of `content`, as used for payload and
/// canonical request hashes.
pub fn hex_sha256(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

fn hmac_sha256(key: &[u8], content: &[u8]) -> Result<Vec<u8>> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|err| Error::SigningError(format!("invalid HMAC key: {err}")))?;
    mac.update(content);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Lowercase hex HMAC-SHA256, used for the final request signature.
pub fn hex_hmac_sha256(key: &[u8], content: &[u8]) -> Result<String> {
    hmac_sha256(key, content).map(hex::encode)
}

/// Derive the signing key for one scope.
///
/// The secret is prefixed with `AWS4` and folded through the date
/// (`YYYYMMDD`), region, service and `aws4_request` in turn.
pub fn derive_signing_key(
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>> {
    let seed = format!("AWS4{secret}").into_bytes();
    [date, region, service, SCOPE_TERMINATOR]
        .iter()
        .try_fold(seed, |key, part| hmac_sha256(&key, part.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_sha256_empty_payload() {
        assert_eq!(
            hex_sha256(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hex_hmac_sha256_rfc4231_case_2() {
        assert_eq!(
            hex_hmac_sha256(b"Jefe", b"what do ya want for nothing?").unwrap(),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_derive_signing_key_documented_example() {
        let key = derive_signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        )
        .unwrap();
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }
}
