//! Version string <-> URL token mapping.
//!
//! Versions may contain `+` and `_`, which are escaped as `-plus-` and `-u-`
//! so the token can be used as a single path segment.

const PLUS: &str = "+";
const PLUS_ESCAPED: &str = "-plus-";
const UNDERSCORE: &str = "_";
const UNDERSCORE_ESCAPED: &str = "-u-";

/// Encode a logical version as a URL token, e.g. `v1.2.3+fix6` -> `v1.2.3-plus-fix6`.
pub fn version_to_url(version: &str) -> String {
    version
        .replace(PLUS, PLUS_ESCAPED)
        .replace(UNDERSCORE, UNDERSCORE_ESCAPED)
}

/// Decode a URL token back into the logical version.
pub fn url_to_version(token: &str) -> String {
    token
        .replace(PLUS_ESCAPED, PLUS)
        .replace(UNDERSCORE_ESCAPED, UNDERSCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(version_to_url("v1.2.3+fix6"), "v1.2.3-plus-fix6");
        assert_eq!(version_to_url("v1.2.3_rc1"), "v1.2.3-u-rc1");
        assert_eq!(version_to_url("v1"), "v1");
        assert_eq!(version_to_url(""), "");
    }

    #[test]
    fn test_decode() {
        assert_eq!(url_to_version("v1.2.3-plus-fix6"), "v1.2.3+fix6");
        assert_eq!(url_to_version("v1.2.3-u-rc1+x"), "v1.2.3_rc1+x");
        assert_eq!(url_to_version("v1.2-beta"), "v1.2-beta");
    }

    #[test]
    fn test_round_trip() {
        for version in ["v1.2.3+fix6", "v1.2.3_rc1", "1.0+a_b+c", "plain", "v1-alpha_2"] {
            assert_eq!(url_to_version(&version_to_url(version)), version);
        }
        for token in ["v1.2.3-plus-fix6", "v1.2.3-u-rc1", "v1.2-beta", "rock-solid"] {
            assert_eq!(version_to_url(&url_to_version(token)), token);
        }
    }
}
