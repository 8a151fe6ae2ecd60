use std::fmt;

/// Expected length of a `lava@` bech32 account address
pub const ADDRESS_LENGTH: usize = 44;
pub const ADDRESS_PREFIX: &str = "lava@";
pub const NATIVE_DENOM: &str = "ulava";

/// Why an event was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    MissingField(&'static str),
    InvalidAddress { field: &'static str, value: String },
    InvalidNumber { field: &'static str, value: String },
    InvalidCoin { field: &'static str, value: String },
    InvalidScore { field: &'static str, value: String },
    NoChainHeights,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingField(field) => write!(f, "missing required field '{}'", field),
            RejectReason::InvalidAddress { field, value } => {
                write!(f, "invalid address in '{}': {:?}", field, value)
            }
            RejectReason::InvalidNumber { field, value } => {
                write!(f, "invalid integer in '{}': {:?}", field, value)
            }
            RejectReason::InvalidCoin { field, value } => {
                write!(f, "invalid {} amount in '{}': {:?}", NATIVE_DENOM, field, value)
            }
            RejectReason::InvalidScore { field, value } => {
                write!(f, "invalid score in '{}': {:?}", field, value)
            }
            RejectReason::NoChainHeights => write!(f, "block report carries no chain heights"),
        }
    }
}

/// Validates a `lava@` address: fixed length, fixed prefix, lowercase alphanumeric body
pub fn parse_address(value: &str) -> Option<String> {
    let value = value.trim();
    if value.len() != ADDRESS_LENGTH {
        return None;
    }

    let body = value.strip_prefix(ADDRESS_PREFIX)?;
    if body
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
    {
        Some(value.to_string())
    } else {
        None
    }
}

/// Parses a base-10 integer, rejecting anything else
pub fn parse_int(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// Parses a coin string such as `5000ulava` into its ulava amount
pub fn parse_ulava(value: &str) -> Option<i64> {
    let amount = value.trim().strip_suffix(NATIVE_DENOM)?;
    parse_int(amount).filter(|amount| *amount >= 0)
}

/// Parses a decimal score, rejecting NaN and infinities
pub fn parse_score(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite())
}

/// Keeps only ASCII letters and digits, e.g. `"ETH1 "` becomes `"ETH1"`
pub fn alphanumeric_key(key: &str) -> String {
    key.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Splits a comma separated chain id list
pub fn split_chain_ids(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keyed view over an event's attributes.
///
/// The first occurrence of a key wins and blank values count as absent.
pub struct Attributes<'a> {
    pairs: &'a [(String, String)],
}

impl<'a> Attributes<'a> {
    pub fn new(pairs: &'a [(String, String)]) -> Self {
        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn text(&self, key: &'static str) -> Option<String> {
        self.get(key).map(|v| v.trim().to_string())
    }

    pub fn required_text(&self, key: &'static str) -> Result<String, RejectReason> {
        self.text(key).ok_or(RejectReason::MissingField(key))
    }

    pub fn address(&self, key: &'static str) -> Result<Option<String>, RejectReason> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => parse_address(raw)
                .map(Some)
                .ok_or_else(|| RejectReason::InvalidAddress {
                    field: key,
                    value: raw.to_string(),
                }),
        }
    }

    pub fn required_address(&self, key: &'static str) -> Result<String, RejectReason> {
        self.address(key)?.ok_or(RejectReason::MissingField(key))
    }

    pub fn int(&self, key: &'static str) -> Result<Option<i64>, RejectReason> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => parse_int(raw)
                .map(Some)
                .ok_or_else(|| RejectReason::InvalidNumber {
                    field: key,
                    value: raw.to_string(),
                }),
        }
    }

    pub fn required_int(&self, key: &'static str) -> Result<i64, RejectReason> {
        self.int(key)?.ok_or(RejectReason::MissingField(key))
    }

    pub fn ulava(&self, key: &'static str) -> Result<Option<i64>, RejectReason> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => parse_ulava(raw)
                .map(Some)
                .ok_or_else(|| RejectReason::InvalidCoin {
                    field: key,
                    value: raw.to_string(),
                }),
        }
    }

    pub fn required_ulava(&self, key: &'static str) -> Result<i64, RejectReason> {
        self.ulava(key)?.ok_or(RejectReason::MissingField(key))
    }

    pub fn score(&self, key: &'static str) -> Result<Option<f64>, RejectReason> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => parse_score(raw)
                .map(Some)
                .ok_or_else(|| RejectReason::InvalidScore {
                    field: key,
                    value: raw.to_string(),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        let valid = "lava@1wcw0xtpvfrernwhp6qj4v2hph25v78vtjupdly";
        assert_eq!(parse_address(valid), Some(valid.to_string()));
        assert_eq!(parse_address(&format!(" {} ", valid)), Some(valid.to_string()));

        // wrong length
        assert_eq!(parse_address("lava@1wcw0xtpvfrernwhp6qj4v2hph25v78vtjupdl"), None);
        // uppercase body
        assert_eq!(parse_address("lava@1WCW0xtpvfrernwhp6qj4v2hph25v78vtjupdly"), None);
        // wrong prefix
        assert_eq!(parse_address("cosm@1wcw0xtpvfrernwhp6qj4v2hph25v78vtjupdly"), None);
        assert_eq!(parse_address(""), None);
    }

    #[test]
    fn test_parse_int_fails_closed() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int(" 42 "), Some(42));
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int("12abc"), None);
        assert_eq!(parse_int("1.5"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("99999999999999999999"), None);
    }

    #[test]
    fn test_parse_ulava() {
        assert_eq!(parse_ulava("5000ulava"), Some(5000));
        assert_eq!(parse_ulava("0ulava"), Some(0));
        assert_eq!(parse_ulava("5000"), None);
        assert_eq!(parse_ulava("5000uatom"), None);
        assert_eq!(parse_ulava("-5ulava"), None);
        assert_eq!(parse_ulava("ulava"), None);
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("0.995"), Some(0.995));
        assert_eq!(parse_score("1"), Some(1.0));
        assert_eq!(parse_score("NaN"), None);
        assert_eq!(parse_score("inf"), None);
        assert_eq!(parse_score("high"), None);
    }

    #[test]
    fn test_alphanumeric_key_and_chain_ids() {
        assert_eq!(alphanumeric_key("ETH1"), "ETH1");
        assert_eq!(alphanumeric_key(" LAV-1\n"), "LAV1");
        assert_eq!(split_chain_ids("ETH1, NEAR,,LAV1"), vec!["ETH1", "NEAR", "LAV1"]);
        assert!(split_chain_ids("").is_empty());
    }

    #[test]
    fn test_attributes_first_key_wins_and_blank_is_absent() {
        let pairs = vec![
            ("CU".to_string(), "10".to_string()),
            ("CU".to_string(), "20".to_string()),
            ("moniker".to_string(), "  ".to_string()),
        ];
        let attrs = Attributes::new(&pairs);
        assert_eq!(attrs.required_int("CU"), Ok(10));
        assert_eq!(attrs.text("moniker"), None);
        assert_eq!(
            attrs.required_text("moniker"),
            Err(RejectReason::MissingField("moniker"))
        );
    }
}
