/// Shorten a `0x` address to its first and last 4 characters
///
/// Anything that does not start with `0x` is returned unchanged, and an absent
/// address stays absent.
pub fn truncate_address(address: Option<&str>) -> Option<String> {
   let address = address?;
   if !address.starts_with("0x") {
      return Some(address.to_string());
   }

   let chars: Vec<char> = address.chars().collect();
   let len = chars.len();
   // a start of `len - 4` below zero counts back from the end once more
   let start = if len >= 4 { len - 4 } else { (2 * len).saturating_sub(4) };
   let prefix: String = chars.iter().take(4).collect();
   let suffix: String = chars[start..].iter().collect();
   Some(format!("{}...{}", prefix, suffix))
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn truncates_hex_address() {
      let short = truncate_address(Some("0x1234567890abcdef"));
      assert_eq!(short.as_deref(), Some("0x12...cdef"));

      let full = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";
      assert_eq!(
         truncate_address(Some(full)).as_deref(),
         Some("0x74...f44e")
      );
   }

   #[test]
   fn leaves_non_hex_untouched() {
      assert_eq!(
         truncate_address(Some("not-an-address")).as_deref(),
         Some("not-an-address")
      );
      assert_eq!(truncate_address(Some("")).as_deref(), Some(""));
   }

   #[test]
   fn absent_stays_absent() {
      assert_eq!(truncate_address(None), None);
   }

   #[test]
   fn short_prefix_only() {
      assert_eq!(truncate_address(Some("0x")).as_deref(), Some("0x...0x"));
      assert_eq!(truncate_address(Some("0x1")).as_deref(), Some("0x1...1"));
      assert_eq!(truncate_address(Some("0x12")).as_deref(), Some("0x12...0x12"));
   }
}
