use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// `AWS4-HMAC-SHA256`, the only algorithm this signer produces.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Last component of a credential scope and of the signing key chain.
pub const SCOPE_TERMINATOR: &str = "aws4_request";

/// Service name for API Gateway endpoints.
pub const EXECUTE_API_SERVICE: &str = "execute-api";

pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";

// Environment fallbacks for credentials and region.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
pub const AWS_REGION: &str = "AWS_REGION";
pub const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
pub const AWS_SHARED_CREDENTIALS_FILE: &str = "AWS_SHARED_CREDENTIALS_FILE";

/// Bytes escaped in canonical query keys and values.
///
/// Only ASCII alphanumerics and `-._~` pass through, so a literal `/` in a
/// value is sent as `%2F`.
pub const AWS_QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Bytes escaped in the canonical path: the query set, with `/` left as the
/// segment separator.
pub const AWS_URI_ENCODE_SET: &AsciiSet = &AWS_QUERY_ENCODE_SET.remove(b'/');
