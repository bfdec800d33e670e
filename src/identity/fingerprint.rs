//! Deterministic certificate fingerprints.
//!
//! The default digest is lowercase hex SHA-256 over
//! `Aid ContractAddress BlockChainUrl ServerAddress sorted(Claims)
//! sorted(Setting) sorted(VerifyOptions)` concatenated without separators,
//! where `sorted(m)` is `key + json(value)` for each key in UTF-16 code unit
//! order. `CertType` and `Sign` are not covered.
//!
//! Values are written the way `JSON.stringify` writes them so digests agree
//! with the node's reference client: nested objects keep insertion order
//! and integral floats drop their fraction (`1.0` → `1`).

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::identity::cert::AidCert;

/// Maps a certificate to a stable digest string.
pub trait FingerprintStrategy: Send + Sync {
    fn digest(&self, cert: &AidCert) -> String;
}

impl<F> FingerprintStrategy for F
where
    F: Fn(&AidCert) -> String + Send + Sync,
{
    fn digest(&self, cert: &AidCert) -> String {
        self(cert)
    }
}

/// SHA-256 over the canonical field concatenation.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanonicalSha256;

impl FingerprintStrategy for CanonicalSha256 {
    fn digest(&self, cert: &AidCert) -> String {
        let digest = Sha256::digest(canonical_string(cert).as_bytes());
        alloy::primitives::hex::encode(digest)
    }
}

/// Fingerprint `cert` with `strategy`, or the canonical SHA-256 when `None`.
pub fn fingerprint(cert: &AidCert, strategy: Option<&dyn FingerprintStrategy>) -> String {
    match strategy {
        Some(strategy) => strategy.digest(cert),
        None => CanonicalSha256.digest(cert),
    }
}

/// The exact byte string hashed by [`CanonicalSha256`].
pub fn canonical_string(cert: &AidCert) -> String {
    let mut out = String::new();
    out.push_str(&cert.aid);
    out.push_str(&cert.contract_address);
    out.push_str(&cert.blockchain_url);
    out.push_str(&cert.server_address);
    push_sorted(&mut out, &cert.claims);
    push_sorted(&mut out, &cert.setting);
    push_sorted(&mut out, &cert.verify_options);
    out
}

fn push_sorted(out: &mut String, map: &Map<String, Value>) {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort_by(|a, b| a.encode_utf16().cmp(b.encode_utf16()));
    for key in keys {
        out.push_str(key);
        write_json(out, &map[key.as_str()]);
    }
}

fn write_json(out: &mut String, value: &Value) {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => out.push_str(&js_number(f)),
            _ => out.push_str(&n.to_string()),
        },
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_json(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_json(out, item);
            }
            out.push('}');
        }
        other => out.push_str(&other.to_string()),
    }
}

fn js_number(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    if f.fract() == 0.0 && f.abs() < 1e21 {
        return format!("{:.0}", f);
    }
    Value::from(f).to_string()
}
