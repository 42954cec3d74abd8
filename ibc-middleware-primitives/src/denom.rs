use sha2::{Digest, Sha256};

use crate::prelude::*;

/// Prefix of the hashed representation of ICS-20 vouchers.
pub const IBC_DENOM_PREFIX: &str = "ibc/";

/// Hashes a full denom trace (`{port}/{channel}/.../{base}`) into its
/// `ibc/{HASH}` form, where `HASH` is the upper case hex encoded SHA-256 of
/// the trace.
pub fn ibc_denom(full_denom_path: &str) -> String {
    let hash = Sha256::digest(full_denom_path.as_bytes());
    format!("{IBC_DENOM_PREFIX}{}", hex::encode_upper(hash))
}
