// Text helpers shared by the device and topology readers

use once_cell::sync::Lazy;
use regex::Regex;

static PCI_ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{4}:[0-9a-fA-F]{2}:[0-9a-fA-F]{2}\.[0-7]$")
        .expect("PCI address pattern is valid")
});

/// Parse the first whitespace-separated token as a finite float.
///
/// `"16.0 GT/s PCIe"` yields `16.0`; `"Unknown"` and `""` yield `None`.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let token = s.split_whitespace().next()?;
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse the first contiguous run of ASCII digits found anywhere in `s`.
///
/// Accepts `"8"`, `"x8"` and `"width8"` alike.
pub fn parse_first_int(s: &str) -> Option<u64> {
    let s = s.trim();
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

/// Strip one `0x`/`0X` prefix from a sysfs hex attribute.
pub fn trim_hex_prefix(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// Strict `DDDD:BB:DD.F` match (hex digits, function 0-7).
pub fn is_pci_address(s: &str) -> bool {
    PCI_ADDRESS_PATTERN.is_match(s)
}
