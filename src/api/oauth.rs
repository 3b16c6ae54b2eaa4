// OAuth 1.0a HMAC-SHA1 request signing, as required by the v1.1 REST
// endpoints. Form and query parameters participate in the signature base
// string; multipart bodies do not, so upload requests sign only their
// oauth_* parameters.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

// RFC 3986 unreserved characters pass through untouched.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Key material for signing a single request. `token`/`token_secret` are
/// absent only for the initial request-token call of the PIN flow.
#[derive(Debug, Clone, Copy)]
pub struct SigningKeys<'a> {
    pub consumer_key: &'a str,
    pub consumer_secret: &'a str,
    pub token: Option<&'a str>,
    pub token_secret: Option<&'a str>,
}

/// Builds the `Authorization: OAuth …` header value for one request.
///
/// `extra_oauth` carries protocol parameters that belong in the header
/// (`oauth_callback`, `oauth_verifier`); `request_params` are the form or
/// query parameters of the request itself, which are signed but not placed
/// in the header.
pub fn authorization_header(
    method: &str,
    url: &str,
    keys: SigningKeys<'_>,
    extra_oauth: &[(&str, &str)],
    request_params: &[(&str, &str)],
) -> String {
    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        .to_string();

    build_header(method, url, keys, extra_oauth, request_params, &nonce, &timestamp)
}

fn build_header(
    method: &str,
    url: &str,
    keys: SigningKeys<'_>,
    extra_oauth: &[(&str, &str)],
    request_params: &[(&str, &str)],
    nonce: &str,
    timestamp: &str,
) -> String {
    let mut oauth_params: Vec<(String, String)> = vec![
        ("oauth_consumer_key".to_string(), keys.consumer_key.to_string()),
        ("oauth_nonce".to_string(), nonce.to_string()),
        ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
        ("oauth_timestamp".to_string(), timestamp.to_string()),
        ("oauth_version".to_string(), "1.0".to_string()),
    ];
    if let Some(token) = keys.token {
        oauth_params.push(("oauth_token".to_string(), token.to_string()));
    }
    for (key, value) in extra_oauth {
        oauth_params.push((key.to_string(), value.to_string()));
    }

    let mut signed_params: Vec<(String, String)> = oauth_params.clone();
    for (key, value) in request_params {
        signed_params.push((key.to_string(), value.to_string()));
    }

    let signature = signature(
        method,
        url,
        &signed_params,
        keys.consumer_secret,
        keys.token_secret.unwrap_or(""),
    );
    oauth_params.push(("oauth_signature".to_string(), signature));
    oauth_params.sort();

    let fields: Vec<String> = oauth_params
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", percent_encode(key), percent_encode(value)))
        .collect();

    format!("OAuth {}", fields.join(", "))
}

/// Computes the base64 HMAC-SHA1 signature over the normalized parameter
/// string, per RFC 5849 section 3.4.
fn signature(
    method: &str,
    url: &str,
    params: &[(String, String)],
    consumer_secret: &str,
    token_secret: &str,
) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(key, value)| (percent_encode(key), percent_encode(value)))
        .collect();
    encoded.sort();

    let parameter_string = encoded
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&parameter_string)
    );
    let signing_key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );

    // HMAC accepts keys of any length, so new_from_slice cannot fail here.
    let mut mac =
        HmacSha1::new_from_slice(signing_key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(base_string.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}
