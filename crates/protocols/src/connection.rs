use crate::ChainError;
use std::fmt;
use std::str::FromStr;

/// A node endpoint, classified by transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Persistent WebSocket connection (`ws://`, `wss://`).
    Ws(String),
    /// HTTP JSON-RPC, events are polled (`http://`, `https://`).
    Http(String),
}

impl Endpoint {
    pub fn url(&self) -> &str {
        match self {
            Self::Ws(url) | Self::Http(url) => url,
        }
    }
}

impl FromStr for Endpoint {
    type Err = ChainError;

    fn from_str(url: &str) -> Result<Self, Self::Err> {
        let url = url.trim();
        let scheme = url
            .split_once("://")
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .ok_or_else(|| ChainError::Endpoint(url.to_string()))?;

        match scheme.as_str() {
            "ws" | "wss" => Ok(Self::Ws(url.to_string())),
            "http" | "https" => Ok(Self::Http(url.to_string())),
            _ => Err(ChainError::Endpoint(url.to_string())),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Provider URLs usually embed an API key in the path.
        let url = self.url();
        match url.split_once("://") {
            Some((scheme, rest)) => {
                let host = rest.split('/').next().unwrap_or(rest);
                write!(f, "{scheme}://{host}")
            }
            None => f.write_str(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schemes() {
        assert_eq!(
            "wss://mainnet.infura.io/ws/v3/key".parse::<Endpoint>().unwrap(),
            Endpoint::Ws("wss://mainnet.infura.io/ws/v3/key".to_string())
        );
        assert!(matches!(
            "HTTPS://rpc.example.org".parse::<Endpoint>().unwrap(),
            Endpoint::Http(_)
        ));
        assert!(matches!(
            "ipc:///tmp/geth.ipc".parse::<Endpoint>(),
            Err(ChainError::Endpoint(_))
        ));
        assert!("localhost:8545".parse::<Endpoint>().is_err());
    }

    #[test]
    fn test_display_hides_path() {
        let endpoint: Endpoint = "wss://mainnet.infura.io/ws/v3/secret".parse().unwrap();
        assert_eq!(endpoint.to_string(), "wss://mainnet.infura.io");
    }
}
