//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Integer year from a loosely formatted field. Unparseable input maps to `0`.
/// Accepts float spellings ("1990.0") as written by some CSV exporters.
/// Values outside the `i32` range map to `0` as well.
pub fn coerce_year(raw: &str) -> i32 {
  let s = raw.trim();
  if let Ok(y) = s.parse::<i32>() {
    return y;
  }
  match s.parse::<f64>() {
    Ok(f) => {
      let t = f.trunc();
      if t >= f64::from(i32::MIN) && t <= f64::from(i32::MAX) {
        t as i32
      } else {
        0
      }
    }
    Err(_) => 0,
  }
}

/// Split a comma-delimited field into exactly `N` positional slots.
/// Values beyond `N` are discarded; missing or empty values leave the slot `None`.
pub fn split_fixed<const N: usize>(raw: &str) -> [Option<String>; N] {
  let mut out: [Option<String>; N] = std::array::from_fn(|_| None);
  for (slot, part) in out.iter_mut().zip(raw.split(',')) {
    let part = part.trim();
    if !part.is_empty() {
      *slot = Some(part.to_string());
    }
  }
  out
}

/// Log-safe truncation for long cell values.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    let head: String = s.chars().take(max).collect();
    format!("{}… ({} chars total)", head, s.chars().count())
  }
}
