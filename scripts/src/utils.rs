use ethers::types::H160;

use crate::error::ConfigError;

pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

pub fn parse_address(label: &'static str, value: &str) -> Result<H160, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidAddress {
        label,
        value: value.to_owned(),
    })
}
