// ── MacAddress ──────────────────────────────────────────────────────

use std::fmt;
use std::str::FromStr;

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-separated, dash-separated, or bare hex.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let lowered = raw.as_ref().trim().to_lowercase();

        let octets: Vec<&str> = lowered.split([':', '-']).collect();
        if octets.len() == 6 && octets.iter().all(|o| is_hex_octet(o)) {
            return Self(octets.join(":"));
        }

        if lowered.len() == 12 && lowered.chars().all(|c| c.is_ascii_hexdigit()) {
            let octets: Vec<&str> = (0..12).step_by(2).map(|i| &lowered[i..i + 2]).collect();
            return Self(octets.join(":"));
        }

        Self(lowered)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_hex_octet(s: &str) -> bool {
    s.len() == 2 && s.chars().all(|c| c.is_ascii_hexdigit())
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_dashes_and_case() {
        let mac = MacAddress::new("DE-AD-BE-EF-DE-AD");
        assert_eq!(mac.as_str(), "de:ad:be:ef:de:ad");
    }

    #[test]
    fn expands_bare_hex() {
        let mac: MacAddress = "F09FC2000001".parse().unwrap();
        assert_eq!(mac.to_string(), "f0:9f:c2:00:00:01");
    }

    #[test]
    fn leaves_unrecognized_input_lowercased() {
        assert_eq!(MacAddress::new("Not-A-Mac").as_str(), "not-a-mac");
        assert_eq!(MacAddress::new("aa-bb-cc-dd-ee").as_str(), "aa-bb-cc-dd-ee");
        assert_eq!(MacAddress::new("AA-BB-CC-DD-EE-GG").as_str(), "aa-bb-cc-dd-ee-gg");
    }

    #[test]
    fn colon_form_is_kept() {
        assert_eq!(MacAddress::new(" F0:9F:C2:00:00:01 ").as_str(), "f0:9f:c2:00:00:01");
    }
}
