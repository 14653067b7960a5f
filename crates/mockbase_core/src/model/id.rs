//! Record identifier generation.

use uuid::Uuid;

/// Field name carrying the record identifier in list collections.
pub const ID_FIELD: &str = "id";

/// Default number of random bytes in a generated identifier.
pub const DEFAULT_ID_BYTES: usize = 2;

const MAX_ID_BYTES: usize = 16;

/// Generates a short lowercase hex token from `bytes` random bytes.
///
/// Tokens are not checked against existing ids. With the default two bytes
/// the space is 65536 values, which is fine for mock data but collides at
/// scale. `bytes` is clamped to `1..=16`.
pub fn random_id(bytes: usize) -> String {
    let width = bytes.clamp(1, MAX_ID_BYTES) * 2;
    let mut id = String::with_capacity(width);
    while id.len() < width {
        let uuid = Uuid::new_v4();
        // Bytes 6 and 8 carry the fixed version and variant bits.
        for (_, byte) in uuid
            .as_bytes()
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != 6 && *index != 8)
        {
            if id.len() == width {
                break;
            }
            id.push_str(&format!("{byte:02x}"));
        }
    }
    id
}
