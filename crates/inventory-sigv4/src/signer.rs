//! AWS Signature Version 4 request signing.
//!
//! - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)

use chrono::{DateTime, Utc};
use inventory_core::{Error, Result};
use percent_encoding::utf8_percent_encode;
use reqwest::header::{HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Method, Request};
use std::collections::BTreeMap;
use std::fmt::Write;
use tracing::debug;
use url::Url;

use crate::constants::{
    ALGORITHM, AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, SCOPE_TERMINATOR, X_AMZ_DATE,
    X_AMZ_SECURITY_TOKEN,
};
use crate::credential::Credential;
use crate::hash::{derive_signing_key, hex_hmac_sha256, hex_sha256};
use crate::time::{format_date, format_iso8601, now};

/// Signs requests for one service in one region.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,
}

impl RequestSigner {
    /// Create a signer for `service` in `region`.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
        }
    }

    /// Signing region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Sign `request` with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SigningError`] if the request cannot be signed.
    pub fn sign(&self, request: &mut Request, credential: &Credential) -> Result<()> {
        self.sign_at(request, credential, now())
    }

    /// Sign `request` as of `time`.
    ///
    /// The buffered body is hashed in place; the request keeps it. Streaming
    /// bodies cannot be hashed and are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SigningError`] if the request cannot be signed.
    pub fn sign_at(
        &self,
        request: &mut Request,
        credential: &Credential,
        time: DateTime<Utc>,
    ) -> Result<()> {
        if self.region.is_empty() {
            return Err(Error::SigningError("signing region is empty".to_string()));
        }

        let payload_hash = match request.body() {
            None => hex_sha256(b""),
            Some(body) => hex_sha256(body.as_bytes().ok_or_else(|| {
                Error::SigningError("streaming request bodies cannot be signed".to_string())
            })?),
        };

        let headers = request.headers_mut();
        headers.remove(AUTHORIZATION);
        headers.insert(X_AMZ_DATE, header_value(&format_iso8601(time))?);
        if let Some(token) = credential.token() {
            let mut value = header_value(token)?;
            value.set_sensitive(true);
            headers.insert(X_AMZ_SECURITY_TOKEN, value);
        } else {
            headers.remove(X_AMZ_SECURITY_TOKEN);
        }

        let canonical_headers = canonical_headers(request)?;
        let signed_headers = signed_header_names(&canonical_headers);
        let creq = canonical_request(
            request.method(),
            request.url(),
            &canonical_headers,
            &payload_hash,
        );

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = format!(
            "{}/{}/{}/{SCOPE_TERMINATOR}",
            format_date(time),
            self.region,
            self.service
        );
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(time, &scope, &creq);
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = derive_signing_key(
            credential.secret(),
            &format_date(time),
            &self.region,
            &self.service,
        )?;
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes())?;

        let mut authorization = header_value(&format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            credential.access_key_id,
        ))?;
        authorization.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, authorization);

        Ok(())
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::SigningError(format!("invalid header value: {e}")))
}

/// Lowercased header name to normalized value, including `host`.
fn canonical_headers(request: &Request) -> Result<BTreeMap<String, String>> {
    let mut headers: BTreeMap<String, String> = BTreeMap::new();

    for (name, value) in request.headers() {
        if name == AUTHORIZATION || name == USER_AGENT {
            continue;
        }
        let value = value.to_str().map_err(|e| {
            Error::SigningError(format!("header `{name}` is not valid ASCII: {e}"))
        })?;
        let value = normalize_header_value(value);
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    if !headers.contains_key("host") {
        headers.insert("host".to_string(), host_header(request.url())?);
    }

    Ok(headers)
}

fn normalize_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn host_header(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::SigningError(format!("URL `{url}` has no host")))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn signed_header_names(headers: &BTreeMap<String, String>) -> String {
    headers.keys().map(String::as_str).collect::<Vec<_>>().join(";")
}

fn canonical_path(url: &Url) -> String {
    // The URL path is already escaped once; non-S3 services expect it escaped again.
    let path = url.path();
    if path.is_empty() {
        return "/".to_string();
    }
    utf8_percent_encode(path, AWS_URI_ENCODE_SET).to_string()
}

fn canonical_query(url: &Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            (
                utf8_percent_encode(&k, AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(&v, AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();
    pairs.sort();

    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn canonical_request(
    method: &Method,
    url: &Url,
    headers: &BTreeMap<String, String>,
    payload_hash: &str,
) -> String {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Writing into a String cannot fail.
    let _ = writeln!(f, "{method}");
    let _ = writeln!(f, "{}", canonical_path(url));
    let _ = writeln!(f, "{}", canonical_query(url));
    for (name, value) in headers {
        let _ = writeln!(f, "{name}:{value}");
    }
    let _ = writeln!(f);
    let _ = writeln!(f, "{}", signed_header_names(headers));
    f.push_str(payload_hash);

    f
}

// StringToSign:
//
// AWS4-HMAC-SHA256
// 20220313T072004Z
// 20220313/<region>/<service>/aws4_request
// <hashed_canonical_request>
fn string_to_sign(time: DateTime<Utc>, scope: &str, canonical_request: &str) -> String {
    format!(
        "{ALGORITHM}\n{}\n{scope}\n{}",
        format_iso8601(time),
        hex_sha256(canonical_request.as_bytes())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const EXAMPLE_KEY_ID: &str = "AKIDEXAMPLE";
    const EXAMPLE_SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

    fn vanilla_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap()
    }

    fn get_request(url: &str) -> Request {
        Request::new(Method::GET, Url::parse(url).unwrap())
    }

    #[test]
    fn test_get_vanilla_canonical_request() {
        let mut request = get_request("https://example.amazonaws.com/");
        request
            .headers_mut()
            .insert(X_AMZ_DATE, HeaderValue::from_static("20150830T123600Z"));

        let headers = canonical_headers(&request).unwrap();
        let creq = canonical_request(
            request.method(),
            request.url(),
            &headers,
            &hex_sha256(b""),
        );
        assert_eq!(
            creq,
            "GET\n/\n\nhost:example.amazonaws.com\nx-amz-date:20150830T123600Z\n\nhost;x-amz-date\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_get_vanilla_signature() {
        let signer = RequestSigner::new("service", "us-east-1");
        let credential = Credential::new(EXAMPLE_KEY_ID, EXAMPLE_SECRET);
        let mut request = get_request("https://example.amazonaws.com/");

        signer
            .sign_at(&mut request, &credential, vanilla_time())
            .unwrap();

        assert_eq!(
            request.headers()[X_AMZ_DATE].to_str().unwrap(),
            "20150830T123600Z"
        );
        assert_eq!(
            request.headers()[AUTHORIZATION].to_str().unwrap(),
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
             SignedHeaders=host;x-amz-date, \
             Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
        );
        assert!(request.headers().get(X_AMZ_SECURITY_TOKEN).is_none());
    }

    #[test]
    fn test_session_token_is_signed() {
        let signer = RequestSigner::new("execute-api", "us-east-2");
        let credential = Credential::new("id", "secret").with_session_token("token");
        let mut request = get_request("https://inventory.api.local/v0/node");

        signer.sign_at(&mut request, &credential, vanilla_time()).unwrap();

        assert_eq!(
            request.headers()[X_AMZ_SECURITY_TOKEN].to_str().unwrap(),
            "token"
        );
        let auth = request.headers()[AUTHORIZATION].to_str().unwrap();
        assert!(auth.contains("SignedHeaders=host;x-amz-date;x-amz-security-token"));
        assert!(auth.contains("Credential=id/20150830/us-east-2/execute-api/aws4_request"));
    }

    #[test]
    fn test_body_is_hashed_and_kept() {
        let signer = RequestSigner::new("execute-api", "us-east-2");
        let credential = Credential::new("id", "secret");

        let mut with_body = Request::new(
            Method::POST,
            Url::parse("https://inventory.api.local/v0/node").unwrap(),
        );
        *with_body.body_mut() = Some(reqwest::Body::from(r#"{"InventoryID":"test-001"}"#));
        signer.sign_at(&mut with_body, &credential, vanilla_time()).unwrap();

        let mut other_body = Request::new(
            Method::POST,
            Url::parse("https://inventory.api.local/v0/node").unwrap(),
        );
        *other_body.body_mut() = Some(reqwest::Body::from(r#"{"InventoryID":"test-002"}"#));
        signer.sign_at(&mut other_body, &credential, vanilla_time()).unwrap();

        assert_eq!(
            with_body.body().and_then(reqwest::Body::as_bytes),
            Some(br#"{"InventoryID":"test-001"}"#.as_slice())
        );
        assert_ne!(
            with_body.headers()[AUTHORIZATION],
            other_body.headers()[AUTHORIZATION]
        );
    }

    #[test]
    fn test_canonical_query_sorted_and_encoded() {
        let url = Url::parse("https://inventory.api.local/v0/ipam/ip?mac=00%3A01%3A02%3A03%3A04%3A05&a=b c")
            .unwrap();
        assert_eq!(
            canonical_query(&url),
            "a=b%20c&mac=00%3A01%3A02%3A03%3A04%3A05"
        );
    }

    #[test]
    fn test_canonical_path_double_encoded() {
        let url = Url::parse("https://inventory.api.local/v0/node/a%20b").unwrap();
        assert_eq!(canonical_path(&url), "/v0/node/a%2520b");

        let url = Url::parse("https://inventory.api.local/v0/ipam/ip/10.0.0.1").unwrap();
        assert_eq!(canonical_path(&url), "/v0/ipam/ip/10.0.0.1");
    }

    #[test]
    fn test_host_includes_non_default_port() {
        let url = Url::parse("http://127.0.0.1:8080/v0/node").unwrap();
        assert_eq!(host_header(&url).unwrap(), "127.0.0.1:8080");

        let url = Url::parse("https://inventory.api.local:443/v0/node").unwrap();
        assert_eq!(host_header(&url).unwrap(), "inventory.api.local");
    }

    #[test]
    fn test_header_values_normalized() {
        assert_eq!(normalize_header_value("  a   b  c "), "a b c");
    }

    #[test]
    fn test_empty_region_rejected() {
        let signer = RequestSigner::new("execute-api", "");
        let credential = Credential::new("id", "secret");
        let mut request = get_request("https://inventory.api.local/v0/node");
        let err = signer.sign(&mut request, &credential).unwrap_err();
        assert!(matches!(err, Error::SigningError(_)));
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_resigning_replaces_authorization() {
        let signer = RequestSigner::new("execute-api", "us-east-2");
        let credential = Credential::new("id", "secret");
        let mut request = get_request("https://inventory.api.local/v0/node");

        signer.sign_at(&mut request, &credential, vanilla_time()).unwrap();
        let later = vanilla_time() + chrono::TimeDelta::minutes(5);
        signer.sign_at(&mut request, &credential, later).unwrap();

        assert_eq!(request.headers().get_all(AUTHORIZATION).iter().count(), 1);
        assert_eq!(
            request.headers()[X_AMZ_DATE].to_str().unwrap(),
            "20150830T124100Z"
        );
    }
}
