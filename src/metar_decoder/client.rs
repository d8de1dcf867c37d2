// metar_decoder - Decoder and Prometheus exporter for METAR weather reports
//
// Copyright 2022 Nick Pillitteri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode, Url};
use std::error;
use std::fmt;

#[derive(Debug)]
pub enum ClientError {
    Internal(reqwest::Error),
    InvalidUrl(String),
    InvalidStation(String),
    NoData,
    Unexpected(StatusCode, Url),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(e) => write!(f, "{}", e),
            Self::InvalidUrl(s) => write!(f, "invalid API URL {}", s),
            Self::InvalidStation(s) => write!(f, "invalid station {}", s),
            Self::NoData => write!(f, "no reports returned"),
            Self::Unexpected(status, url) => write!(f, "unexpected status {} for {}", status, url),
        }
    }
}

impl error::Error for ClientError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Internal(e) => Some(e),
            _ => None,
        }
    }
}

/// Client for fetching raw METAR bulletins from aviationweather.gov
#[derive(Debug)]
pub struct MetarClient {
    client: Client,
    base_url: Url,
}

impl MetarClient {
    const USER_AGENT: &'static str = "METAR Decoder (https://github.com/56quarters/metar_decoder)";
    const TEXT_RESPONSE: &'static str = "text/plain";

    pub fn new(client: Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|_| ClientError::InvalidUrl(base_url.to_owned()))?;
        Ok(MetarClient { client, base_url })
    }

    /// Fetch the latest raw report for each station, one report per line.
    pub async fn bulletin<S: AsRef<str>>(&self, stations: &[S]) -> Result<String, ClientError> {
        let ids = stations.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(",");
        let request_url = self.bulletin_url(&ids);
        tracing::debug!(message = "making latest METAR request", url = %request_url);

        let res = self.make_request(&ids, request_url).await?;
        let body = res.text().await.map_err(ClientError::Internal)?;
        if body.trim().is_empty() {
            Err(ClientError::NoData)
        } else {
            Ok(body)
        }
    }

    async fn make_request<S: Into<String>>(&self, stations: S, url: Url) -> Result<Response, ClientError> {
        let res = self
            .client
            .get(url.clone())
            .header(USER_AGENT, Self::USER_AGENT)
            .header(ACCEPT, Self::TEXT_RESPONSE)
            .send()
            .await
            .map_err(ClientError::Internal)?;

        let status = res.status();
        if status == StatusCode::OK {
            Ok(res)
        } else if status == StatusCode::NO_CONTENT {
            Err(ClientError::NoData)
        } else if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            Err(ClientError::InvalidStation(stations.into()))
        } else {
            Err(ClientError::Unexpected(status, url))
        }
    }

    fn bulletin_url(&self, ids: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path("/api/data/metar");
        url.query_pairs_mut()
            .clear()
            .append_pair("ids", ids)
            .append_pair("format", "raw")
            .append_pair("hours", "0");

        url
    }
}
