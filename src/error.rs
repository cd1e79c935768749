use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request failed while {activity}")]
    Request {
        activity: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("got {status} while {activity}: {body}")]
    Status {
        activity: String,
        status: StatusCode,
        body: String,
    },
    #[error("could not decode the response while {activity}")]
    Decode {
        activity: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not follow the redirect from {url} to {location}")]
    Redirect { url: String, location: String },
    #[error("server responded with {status} while downloading {url}")]
    Download { url: String, status: StatusCode },
}

pub type Result<T> = std::result::Result<T, Error>;
