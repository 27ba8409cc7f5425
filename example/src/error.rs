use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    InvalidUrl(String),
    UpstreamFailure,
    HttpError(reqwest::Error),
    JsonDecodeError(serde_json::Error),
    XmlDecodeError(quick_xml::DeError),
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::HttpError(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::JsonDecodeError(e)
    }
}

impl From<quick_xml::DeError> for Error {
    fn from(e: quick_xml::DeError) -> Self {
        Error::XmlDecodeError(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidUrl(url) => write!(f, "Invalid request URL: {}", url),
            Error::UpstreamFailure => write!(f, "upstream failure"),
            Error::HttpError(e) => write!(f, "{}", e.to_string()),
            Error::JsonDecodeError(e) => write!(f, "{}", e.to_string()),
            Error::XmlDecodeError(e) => write!(f, "{}", e.to_string()),
        }
    }
}
