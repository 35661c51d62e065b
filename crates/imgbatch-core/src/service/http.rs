//! Minimal blocking HTTP over libcurl: JSON POST and plain GET into memory.

use std::time::Duration;

/// Status and body of a completed transfer (any status code).
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub connect: Duration,
    pub total: Duration,
}

/// Sends `body` as `application/json` with the extra `headers` ("Name: value").
pub(crate) fn post_json(
    url: &str,
    headers: &[String],
    body: &[u8],
    timeouts: Timeouts,
) -> Result<HttpResponse, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.post(true)?;
    easy.post_fields_copy(body)?;
    easy.connect_timeout(timeouts.connect)?;
    easy.timeout(timeouts.total)?;

    let mut list = curl::easy::List::new();
    list.append("Content-Type: application/json")?;
    list.append("Accept: application/json")?;
    for h in headers {
        list.append(h)?;
    }
    easy.http_headers(list)?;

    perform(&mut easy)
}

/// Fetches `url`, following redirects.
pub(crate) fn get(url: &str, timeouts: Timeouts) -> Result<HttpResponse, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(timeouts.connect)?;
    easy.timeout(timeouts.total)?;

    perform(&mut easy)
}

fn perform(easy: &mut curl::easy::Easy) -> Result<HttpResponse, curl::Error> {
    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }
    let status = easy.response_code()?;
    Ok(HttpResponse { status, body })
}
