use linesight_types::Result;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::{source::CapturedFrame, uplink_error};

/// HTTP client for the relay's uploader-facing endpoints.
pub struct UplinkClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct OutageResponse {
    points: Vec<[f64; 2]>,
}

impl UplinkClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| uplink_error(format!("failed to build http client: {err}")))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Post one frame and its ground position to the relay.
    pub async fn upload(&self, frame: &CapturedFrame) -> Result<()> {
        let coords = serde_json::to_string(&[frame.position.x, frame.position.y])
            .map_err(|err| uplink_error(format!("coords encode failed: {err}")))?;
        let part = Part::bytes(frame.jpeg.to_vec())
            .file_name("frame.jpg")
            .mime_str("image/jpeg")
            .map_err(|err| uplink_error(format!("invalid frame mime type: {err}")))?;
        let form = Form::new().part("frame", part).text("camera_coords", coords);

        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|err| uplink_error(format!("upload failed: {err}")))?;
        if !response.status().is_success() {
            return Err(uplink_error(format!(
                "relay rejected upload: {}",
                response.status()
            )));
        }
        debug!("uploaded {} byte frame", frame.jpeg.len());
        Ok(())
    }

    /// Flush the relay's accumulated outage points and return them.
    pub async fn fetch_outage_points(&self) -> Result<Vec<[f64; 2]>> {
        let response = self
            .http
            .post(format!("{}/send_outage", self.base_url))
            .send()
            .await
            .map_err(|err| uplink_error(format!("outage fetch failed: {err}")))?;
        if !response.status().is_success() {
            return Err(uplink_error(format!(
                "relay rejected outage fetch: {}",
                response.status()
            )));
        }
        let body: OutageResponse = response
            .json()
            .await
            .map_err(|err| uplink_error(format!("malformed outage response: {err}")))?;
        Ok(body.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped_from_the_base_url() {
        let client = UplinkClient::new("http://relay.local:5000/").expect("client");
        assert_eq!(client.base_url(), "http://relay.local:5000");
    }
}
