//! HMAC-SHA256 request signing for Volcengine OpenAPI.
//!
//! Canonical request, credential scope and signing-key derivation follow the
//! vendor's V4 scheme; the secret key is used as-is for the first HMAC round.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HMAC-SHA256";
const SIGNED_HEADERS: &str = "content-type;host;x-content-sha256;x-date";
pub const CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub service: String,
}

/// Headers to attach to a signed request.
#[derive(Debug, Clone)]
pub struct SignedHeaders {
    pub x_date: String,
    pub x_content_sha256: String,
    pub authorization: String,
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = match HmacSha256::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => unreachable!("hmac accepts any key length"),
    };
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
pub fn uri_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Sorted, encoded query string. Used both on the wire and in the signature.
pub fn canonical_query(params: &[(&str, &str)]) -> String {
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (uri_encode(k), uri_encode(v)))
        .collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

impl Credentials {
    fn signing_key(&self, short_date: &str) -> Vec<u8> {
        let k_date = hmac_sha256(self.secret_key.as_bytes(), short_date.as_bytes());
        let k_region = hmac_sha256(&k_date, self.region.as_bytes());
        let k_service = hmac_sha256(&k_region, self.service.as_bytes());
        hmac_sha256(&k_service, b"request")
    }

    /// Signs a POST to `/` on `host` with the given query and JSON body.
    pub fn sign(&self, host: &str, query: &str, body: &[u8], now: DateTime<Utc>) -> SignedHeaders {
        let x_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let short_date = &x_date[..8];
        let payload_hash = sha256_hex(body);

        let canonical_headers = format!(
            "content-type:{}\nhost:{}\nx-content-sha256:{}\nx-date:{}\n",
            CONTENT_TYPE, host, payload_hash, x_date
        );
        let canonical_request = format!(
            "POST\n/\n{}\n{}\n{}\n{}",
            query, canonical_headers, SIGNED_HEADERS, payload_hash
        );

        let scope = format!("{}/{}/{}/request", short_date, self.region, self.service);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            x_date,
            scope,
            sha256_hex(canonical_request.as_bytes())
        );

        let signature = hex::encode(hmac_sha256(
            &self.signing_key(short_date),
            string_to_sign.as_bytes(),
        ));

        SignedHeaders {
            authorization: format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                ALGORITHM, self.access_key, scope, SIGNED_HEADERS, signature
            ),
            x_date,
            x_content_sha256: payload_hash,
        }
    }
}
