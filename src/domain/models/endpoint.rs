#[cfg(test)]
#[path = "endpoint_test.rs"]
mod tests;

use std::fmt;

pub const BOA_API_ENDPOINT: &str = "https://boa.cs.iastate.edu/boa/?q=boa/api";
pub const BOAC_API_ENDPOINT: &str = "https://boa.cs.iastate.edu/boac/?q=boa/api";

/// Known Boa deployments, or any other API URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Boa,
    Boac,
    Custom(String),
}

impl Endpoint {
    /// Accepts the deployment names `boa` and `boac`, or a full URL.
    pub fn parse(text: &str) -> Option<Endpoint> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        match text {
            "boa" | BOA_API_ENDPOINT => return Some(Endpoint::Boa),
            "boac" | BOAC_API_ENDPOINT => return Some(Endpoint::Boac),
            _ => {}
        }

        if text.starts_with("http://") || text.starts_with("https://") {
            return Some(Endpoint::Custom(text.to_string()));
        }

        return None;
    }

    pub fn url(&self) -> &str {
        match self {
            Endpoint::Boa => return BOA_API_ENDPOINT,
            Endpoint::Boac => return BOAC_API_ENDPOINT,
            Endpoint::Custom(url) => return url,
        }
    }
}

impl Default for Endpoint {
    fn default() -> Endpoint {
        return Endpoint::Boa;
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "{}", self.url());
    }
}
