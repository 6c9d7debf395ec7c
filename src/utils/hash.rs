//! Content fingerprints for output file names.
//!
//! ```ignore
//! let fp = hash::fingerprint("console.log(1)"); // -> "a1b2c3d4"
//! ```

/// Full blake3 hex digest.
#[inline]
pub fn digest<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    hex::encode(blake3::hash(data.as_ref()).as_bytes())
}

/// First 8 hex chars of the blake3 digest.
///
/// Used for cache-busting file names (`main-a1b2c3d4.js`).
#[inline]
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    let mut hex = digest(data);
    hex.truncate(8);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(fingerprint("abc"), fingerprint(b"abc".as_slice()));
        assert_eq!(fingerprint("abc").len(), 8);
        assert_ne!(fingerprint("abc"), fingerprint("abd"));
    }

    #[test]
    fn test_fingerprint_is_digest_prefix() {
        let data = "body { color: red }";
        assert!(digest(data).starts_with(&fingerprint(data)));
        assert_eq!(digest(data).len(), 64);
    }
}
