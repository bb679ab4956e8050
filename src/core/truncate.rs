//! Address truncation for account badges: "0x1234...345678"

/// Prefix/suffix length used when the caller does not pick one
pub const DEFAULT_TRUNCATE_LEN: usize = 4;

const JOINER: &str = "...";

/// Keep the first `len` and last `len` characters of `address`, joined by
/// `"..."`. Addresses too short to get shorter are returned unchanged.
pub fn truncate_address(address: &str, len: usize) -> String {
    let count = address.chars().count();
    if count <= len.saturating_mul(2).saturating_add(JOINER.len()) {
        return address.to_string();
    }
    let prefix: String = address.chars().take(len).collect();
    let suffix: String = address.chars().skip(count - len).collect();
    format!("{prefix}{JOINER}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVM: &str = "0x1234567890abcdef1234567890abcdef12345678";

    #[test]
    fn wide_and_narrow_widths() {
        assert_eq!(truncate_address(EVM, 6), "0x1234...345678");
        assert_eq!(truncate_address(EVM, 4), "0x12...5678");
    }

    #[test]
    fn default_length_on_base58_key() {
        let key = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";
        assert_eq!(truncate_address(key, DEFAULT_TRUNCATE_LEN), "9xQe...VFin");
    }

    #[test]
    fn short_input_unchanged() {
        assert_eq!(truncate_address("0x1234", 4), "0x1234");
        assert_eq!(truncate_address("abcdefghijk", 4), "abcdefghijk");
        assert_eq!(truncate_address("", 6), "");
        assert_eq!(truncate_address("0x1234", usize::MAX), "0x1234");
    }
}
