//! Small utility helpers used across modules.

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    None => String::new(),
  }
}

/// Ensure a sentence ends with a period.
/// Constraints arrive from the generator as bare fragments more often than not.
pub fn punctuate(s: &str) -> String {
  if s.ends_with('.') {
    s.to_string()
  } else {
    format!("{}.", s)
  }
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let cut = s
    .char_indices()
    .take_while(|(i, _)| *i <= max)
    .last()
    .map(|(i, _)| i)
    .unwrap_or(0);
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn capitalize_first_char_only() {
    assert_eq!(capitalize("the array is sorted"), "The array is sorted");
    assert_eq!(capitalize("N is positive"), "N is positive");
    assert_eq!(capitalize(""), "");
  }

  #[test]
  fn punctuate_appends_only_when_missing() {
    assert_eq!(punctuate("1 <= n <= 100"), "1 <= n <= 100.");
    assert_eq!(punctuate("already terminated."), "already terminated.");
    assert_eq!(punctuate(""), ".");
  }

  #[test]
  fn trunc_keeps_short_strings_verbatim() {
    assert_eq!(trunc_for_log("short", 100), "short");
    assert!(trunc_for_log(&"x".repeat(300), 100).contains("300 bytes total"));
  }
}
