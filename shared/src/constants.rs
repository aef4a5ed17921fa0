/// Name of the request header that carries the hex encoded HMAC-SHA256 digest of the raw body.
pub const SIGNATURE_HEADER: &str = "X-Signature";

/// Size in bytes of a HMAC-SHA256 digest.
pub const SIGNATURE_LEN: usize = 32;

/// Length of [`SIGNATURE_LEN`] bytes rendered as lowercase hex.
pub const SIGNATURE_HEX_LEN: usize = SIGNATURE_LEN * 2;

pub const JSON_CONTENT_TYPE: &str = "application/json";

pub const DEFAULT_MAX_BODY_SIZE: u64 = 1 << 16; // 64kB

pub const DEFAULT_ROUTE_PATH: &str = "/webhook";
