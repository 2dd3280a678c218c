use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use serde_json::Value as JsonValue;

/// Decode the payload (second) segment of a dot-separated bearer token.
///
/// The segment is base64url, padded here to a multiple of four with `=`
/// before decoding. The signature segment is NOT verified: the result is only
/// suitable for optimistic personalization and must never back an
/// authorization decision.
///
/// # Returns
/// * `Some(claims)` - payload decoded to JSON
/// * `None` - no payload segment, bad base64url, or bad JSON
pub fn decode_claims(token: &str) -> Option<JsonValue> {
    let segment = token.split('.').nth(1)?;

    let mut padded = segment.to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }

    let bytes = URL_SAFE.decode(padded.as_bytes()).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Non-empty `email` claim of an unverified token, if present.
pub fn email_claim(token: &str) -> Option<String> {
    match decode_claims(token)?.get("email")? {
        JsonValue::String(email) if !email.is_empty() => Some(email.clone()),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) fn encode_unsigned(claims: &JsonValue) -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());
    format!("{}.{}.signature", header, payload)
}
