//! RFC 3986 URI recognition.

use serde::Serialize;

use crate::callbacks::UriCaptures;
use crate::message::SiweParser;

/// Components of a valid URI.
///
/// `userinfo`, `host` and `port` are present only when the URI has an
/// authority; `query` and `fragment` only when their delimiter appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UriParts {
    pub uri: String,
    pub scheme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub userinfo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u64>,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
}

impl UriParts {
    pub(crate) fn from_captures(captures: UriCaptures) -> Self {
        Self {
            uri: captures.uri.unwrap_or_default(),
            scheme: captures.scheme.unwrap_or_default(),
            userinfo: captures.userinfo,
            host: captures.host,
            port: captures.port,
            path: captures.path.unwrap_or_default(),
            query: captures.query,
            fragment: captures.fragment,
        }
    }
}

/// Split `text` into URI components, or `None` if it is not a URI.
pub fn is_uri(text: &str) -> Option<UriParts> {
    SiweParser::shared().is_uri(text)
}
