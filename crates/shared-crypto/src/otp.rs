//! # Time-Based One-Time Passwords
//!
//! Parses `otpauth://totp/...` provisioning URLs and generates RFC 6238
//! codes. A provisioning URL is only accepted into the vault if a code can
//! actually be produced from it.

use chrono::{DateTime, Utc};
use data_encoding::BASE32_NOPAD;
use totp_rs::{Algorithm, TOTP};
use url::Url;

use crate::CryptoError;

const DEFAULT_DIGITS: u32 = 6;
const DEFAULT_PERIOD: u64 = 30;

/// HMAC digest used for code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpAlgorithm {
    /// HMAC-SHA1 (the near-universal default)
    Sha1,
    /// HMAC-SHA256
    Sha256,
    /// HMAC-SHA512
    Sha512,
}

impl From<OtpAlgorithm> for Algorithm {
    fn from(algorithm: OtpAlgorithm) -> Self {
        match algorithm {
            OtpAlgorithm::Sha1 => Algorithm::SHA1,
            OtpAlgorithm::Sha256 => Algorithm::SHA256,
            OtpAlgorithm::Sha512 => Algorithm::SHA512,
        }
    }
}

/// A TOTP key decoded from a provisioning URL.
#[derive(Clone)]
pub struct OtpKey {
    totp: TOTP,
    algorithm: OtpAlgorithm,
    issuer: Option<String>,
    account_name: String,
}

impl std::fmt::Debug for OtpKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpKey")
            .field("secret", &"***")
            .field("algorithm", &self.algorithm)
            .field("digits", &self.totp.digits)
            .field("period", &self.totp.step)
            .field("issuer", &self.issuer)
            .field("account_name", &self.account_name)
            .finish()
    }
}

impl OtpKey {
    /// Parse an `otpauth://totp/<label>?secret=...` URL.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidOtpUrl` if the URL is malformed, not TOTP,
    /// lacks a secret, or carries unsupported parameters.
    pub fn from_url(provisioning_url: &str) -> Result<Self, CryptoError> {
        let url = Url::parse(provisioning_url)
            .map_err(|e| CryptoError::InvalidOtpUrl(e.to_string()))?;

        if url.scheme() != "otpauth" {
            return Err(CryptoError::InvalidOtpUrl(format!(
                "unexpected scheme {}",
                url.scheme()
            )));
        }
        if url.host_str() != Some("totp") {
            return Err(CryptoError::InvalidOtpUrl(
                "only totp keys are supported".to_string(),
            ));
        }

        let account_name = url.path().trim_start_matches('/').to_string();

        let mut secret = None;
        let mut algorithm = OtpAlgorithm::Sha1;
        let mut digits = DEFAULT_DIGITS;
        let mut period = DEFAULT_PERIOD;
        let mut issuer = None;

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "secret" => secret = Some(decode_secret(&value)?),
                "algorithm" => {
                    algorithm = match value.to_ascii_uppercase().as_str() {
                        "SHA1" => OtpAlgorithm::Sha1,
                        "SHA256" => OtpAlgorithm::Sha256,
                        "SHA512" => OtpAlgorithm::Sha512,
                        other => {
                            return Err(CryptoError::InvalidOtpUrl(format!(
                                "unsupported algorithm {other}"
                            )))
                        }
                    }
                }
                "digits" => {
                    digits = match value.parse() {
                        Ok(d @ (6 | 8)) => d,
                        _ => {
                            return Err(CryptoError::InvalidOtpUrl(format!(
                                "unsupported digits {value}"
                            )))
                        }
                    }
                }
                "period" => {
                    period = match value.parse() {
                        Ok(p) if p > 0 => p,
                        _ => {
                            return Err(CryptoError::InvalidOtpUrl(format!(
                                "invalid period {value}"
                            )))
                        }
                    }
                }
                "issuer" => issuer = Some(value.into_owned()),
                _ => {}
            }
        }

        let secret =
            secret.ok_or_else(|| CryptoError::InvalidOtpUrl("missing secret".to_string()))?;

        // `TOTP::new` would also refuse secrets shorter than 128 bits.
        let totp = TOTP::new_unchecked(algorithm.into(), digits as usize, 0, period, secret);

        Ok(Self {
            totp,
            algorithm,
            issuer,
            account_name,
        })
    }

    /// Issuer parameter, if present.
    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    /// Label path of the URL (usually `Issuer:account`), percent-encoded.
    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    /// HMAC digest.
    pub fn algorithm(&self) -> OtpAlgorithm {
        self.algorithm
    }

    /// Code length.
    pub fn digits(&self) -> u32 {
        self.totp.digits as u32
    }

    /// Time step in seconds.
    pub fn period(&self) -> u64 {
        self.totp.step
    }

    /// Generate the code valid at `at`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidInput` for instants before the Unix epoch.
    pub fn generate_code(&self, at: DateTime<Utc>) -> Result<String, CryptoError> {
        let seconds = u64::try_from(at.timestamp()).map_err(|_| {
            CryptoError::InvalidInput("time before unix epoch".to_string())
        })?;
        Ok(self.totp.generate(seconds))
    }
}

fn decode_secret(value: &str) -> Result<Vec<u8>, CryptoError> {
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let secret = BASE32_NOPAD
        .decode(normalized.as_bytes())
        .map_err(|e| CryptoError::InvalidOtpUrl(format!("secret is not base32: {e}")))?;
    if secret.is_empty() {
        return Err(CryptoError::InvalidOtpUrl("empty secret".to_string()));
    }
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // RFC 6238 appendix B seed "12345678901234567890"
    const RFC_SHA1_URL: &str =
        "otpauth://totp/Example:alice@example.com?secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ&issuer=Example&digits=8";

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    #[test]
    fn test_rfc6238_vectors() {
        let key = OtpKey::from_url(RFC_SHA1_URL).unwrap();
        assert_eq!(key.generate_code(at(59)).unwrap(), "94287082");
        assert_eq!(key.generate_code(at(1111111109)).unwrap(), "07081804");
        assert_eq!(key.generate_code(at(1234567890)).unwrap(), "89005924");
    }

    #[test]
    fn test_default_six_digits() {
        let key = OtpKey::from_url(
            "otpauth://totp/Example:alice?secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ",
        )
        .unwrap();
        assert_eq!(key.digits(), 6);
        assert_eq!(key.period(), 30);
        assert_eq!(key.generate_code(at(59)).unwrap(), "287082");
    }

    #[test]
    fn test_rfc6238_sha256_and_sha512() {
        let sha256 = OtpKey::from_url(
            "otpauth://totp/x?secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZA&algorithm=SHA256&digits=8",
        )
        .unwrap();
        assert_eq!(sha256.algorithm(), OtpAlgorithm::Sha256);
        assert_eq!(sha256.generate_code(at(59)).unwrap(), "46119246");

        let sha512 = OtpKey::from_url(
            "otpauth://totp/x?secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNA&algorithm=SHA512&digits=8",
        )
        .unwrap();
        assert_eq!(sha512.generate_code(at(59)).unwrap(), "90693936");
    }

    #[test]
    fn test_short_secret_still_generates() {
        let key = OtpKey::from_url("otpauth://totp/x?secret=GEZDGNBV").unwrap();
        assert_eq!(key.generate_code(at(59)).unwrap().len(), 6);
    }

    #[test]
    fn test_lowercase_and_padded_secret_accepted() {
        let key = OtpKey::from_url(
            "otpauth://totp/x?secret=gezdgnbvgy3tqojqgezdgnbvgy3tqojq%3D%3D",
        )
        .unwrap();
        assert_eq!(key.generate_code(at(59)).unwrap(), "287082");
    }

    #[test]
    fn test_metadata() {
        let key = OtpKey::from_url(RFC_SHA1_URL).unwrap();
        assert_eq!(key.issuer(), Some("Example"));
        assert_eq!(key.account_name(), "Example:alice@example.com");
        assert!(!format!("{key:?}").contains("GEZDGNBV"));
    }

    #[test]
    fn test_rejects_bad_urls() {
        for url in [
            "not a url",
            "https://totp/x?secret=GEZDGNBV",
            "otpauth://hotp/x?secret=GEZDGNBV&counter=1",
            "otpauth://totp/x",
            "otpauth://totp/x?secret=1!1",
            "otpauth://totp/x?secret=GEZDGNBV&algorithm=MD5",
            "otpauth://totp/x?secret=GEZDGNBV&digits=7",
            "otpauth://totp/x?secret=GEZDGNBV&period=0",
        ] {
            assert!(
                matches!(OtpKey::from_url(url), Err(CryptoError::InvalidOtpUrl(_))),
                "accepted {url}"
            );
        }
    }
}
