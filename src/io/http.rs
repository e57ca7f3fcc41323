use std::io::{self, Read};

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};

use crate::error::{Error, Result, TransportFault};

/// Body of a successful remote GET.
///
/// Read failures come back tagged as transport faults so the row streamer
/// can report them as [`Error::Transport`]. Dropping the body releases the
/// connection.
pub struct RemoteBody {
    response: Response,
    url: String,
}

impl RemoteBody {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Read for RemoteBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.response
            .read(buf)
            .map_err(|e| tag_read_error(&self.url, e))
    }
}

/// Wrap a body read failure as a transport fault. `Interrupted` is left
/// alone so buffered readers retry it.
fn tag_read_error(url: &str, err: io::Error) -> io::Error {
    if err.kind() == io::ErrorKind::Interrupted {
        return err;
    }
    io::Error::other(TransportFault {
        url: url.to_string(),
        source: Box::new(err),
    })
}

/// Issue a GET for `url` and classify the response.
pub(super) fn get(client: &Client, url: &str) -> Result<RemoteBody> {
    let response = client.get(url).send().map_err(|e| Error::Transport {
        url: url.to_string(),
        source: Box::new(e),
    })?;

    match response.status() {
        StatusCode::OK => Ok(RemoteBody {
            response,
            url: url.to_string(),
        }),
        StatusCode::NOT_FOUND => Err(Error::NotFound {
            location: url.to_string(),
        }),
        status => Err(Error::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        }),
    }
}
