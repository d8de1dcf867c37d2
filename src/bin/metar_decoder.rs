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

use clap::Parser;
use metar_decoder::client::{ClientError, MetarClient};
use metar_decoder::decode::decode_bulletin;
use metar_decoder::display::StationSummary;
use metar_decoder::http::RequestContext;
use metar_decoder::metrics::StationMetrics;
use metar_decoder::report::BatchResult;
use prometheus_client::registry::Registry;
use reqwest::Client;
use std::error::Error;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{self, SignalKind};
use tracing::{Instrument, Level};

const DEFAULT_LOG_LEVEL: Level = Level::INFO;
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 9783);
const DEFAULT_REFERSH_SECS: u64 = 300;
const DEFAULT_TIMEOUT_MILLIS: u64 = 5000;
const DEFAULT_TIMEZONE_OFFSET: i32 = 0;
const DEFAULT_API_URL: &str = "https://aviationweather.gov/";

#[derive(Debug, Parser)]
#[clap(name = "metar_decoder", version = clap::crate_version!())]
struct MetarDecoderApplication {
    /// Station ID to fetch METAR reports for. May be given multiple times
    #[clap(long = "station", required_unless_present = "input")]
    stations: Vec<String>,

    /// Decode reports from this file, one per line, print them, and exit instead of
    /// fetching them from the API
    #[clap(long)]
    input: Option<PathBuf>,

    /// Fetch reports once, print them, and exit instead of running an exporter
    #[clap(long)]
    once: bool,

    /// Base URL for the aviationweather.gov API
    #[clap(long, default_value_t = DEFAULT_API_URL.into())]
    api_url: String,

    /// Logging verbosity. Allowed values are 'trace', 'debug', 'info', 'warn', and 'error'
    /// (case insensitive)
    #[clap(long, default_value_t = DEFAULT_LOG_LEVEL)]
    log_level: Level,

    /// Fetch reports from the API at this interval, in seconds.
    #[clap(long, default_value_t = DEFAULT_REFERSH_SECS)]
    refresh_secs: u64,

    /// Timeout for fetching reports from the API, in milliseconds.
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_MILLIS)]
    timeout_millis: u64,

    /// Offset from UTC, in hours, used when printing report times
    #[clap(long, default_value_t = DEFAULT_TIMEZONE_OFFSET, allow_negative_numbers = true)]
    timezone_offset: i32,

    /// Address to bind to. By default, metar_decoder will bind to public address since
    /// the purpose is to expose metrics to an external system (Prometheus or another
    /// agent for ingestion)
    #[clap(long, default_value_t = DEFAULT_BIND_ADDR.into())]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let opts = MetarDecoderApplication::parse();
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(opts.log_level)
            .finish(),
    )
    .expect("failed to set tracing subscriber");

    if let Some(path) = &opts.input {
        let bulletin = tokio::fs::read_to_string(path).await.unwrap_or_else(|e| {
            tracing::error!(message = "unable to read input", path = %path.display(), error = %e);
            process::exit(1)
        });

        print_summaries(&decode_bulletin(&bulletin), opts.timezone_offset);
        return Ok(());
    }

    let timeout = Duration::from_millis(opts.timeout_millis);
    let http_client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        tracing::error!(message = "unable to initialize HTTP client", error = %e);
        process::exit(1)
    });

    let client = MetarClient::new(http_client, &opts.api_url).unwrap_or_else(|e| {
        tracing::error!(message = "unable to initialize METAR client", error = %e);
        process::exit(1)
    });

    // Make an initial request for the stations. This allows us to verify that the stations
    // the user provided are valid and the API is available before starting the HTTP server
    // and running indefinitely.
    let initial = match client.bulletin(opts.stations.as_slice()).await {
        Err(ClientError::InvalidStation(stations)) => {
            tracing::error!(message = "invalid station provided", stations = %stations);
            process::exit(1)
        }
        Err(e) => {
            tracing::warn!(message = "failed to fetch initial reports", error = %e);
            None
        }
        Ok(bulletin) => {
            let batch = decode_bulletin(&bulletin);
            tracing::debug!(message = "verified station reports", stations = ?batch.station_ids());
            Some(batch)
        }
    };

    if opts.once {
        match initial {
            Some(batch) => {
                print_summaries(&batch, opts.timezone_offset);
                return Ok(());
            }
            None => process::exit(1),
        }
    }

    let mut registry = Registry::default();
    let metrics = StationMetrics::new(&mut registry);
    if let Some(batch) = &initial {
        batch.iter().for_each(|r| metrics.observe(r));
    }

    let mut interval = tokio::time::interval(Duration::from_secs(opts.refresh_secs));
    let stations = opts.stations.clone();
    let api_url = opts.api_url.clone();

    tokio::spawn(async move {
        tracing::info!(message = "report polling started", api_url = %api_url, stations = ?stations);

        loop {
            let _ = interval.tick().await;
            match client
                .bulletin(stations.as_slice())
                .instrument(tracing::span!(Level::DEBUG, "metar_bulletin"))
                .await
            {
                Ok(bulletin) => {
                    let batch = decode_bulletin(&bulletin);
                    for record in &batch {
                        metrics.observe(record);
                    }
                    tracing::info!(message = "fetched new reports", stations = batch.len());
                }
                Err(e) => {
                    tracing::error!(message = "failed to fetch reports", error = %e);
                }
            }
        }
    });

    let context = Arc::new(RequestContext::new(registry));
    let app = metar_decoder::http::router(context);
    let server = axum::Server::try_bind(&opts.bind).unwrap_or_else(|e| {
        tracing::error!(message = "error binding to address", address = %opts.bind, error = %e);
        process::exit(1)
    });

    tracing::info!(message = "server started", address = %opts.bind);
    server
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            // Wait for either SIGTERM or SIGINT to shutdown
            tokio::select! {
                _ = sigterm() => {}
                _ = sigint() => {}
            }
        })
        .await?;

    tracing::info!("server shutdown");
    Ok(())
}

/// Print a summary of each station, or log an error and exit if there are none.
fn print_summaries(batch: &BatchResult, offset_hours: i32) {
    if batch.is_empty() {
        tracing::error!(message = "no station reports decoded");
        process::exit(1)
    }

    for record in batch {
        println!("{}", StationSummary::from_record(record, offset_hours));
    }
}

/// Return after the first SIGTERM signal received by this process
async fn sigterm() -> io::Result<()> {
    unix::signal(SignalKind::terminate())?.recv().await;
    Ok(())
}

/// Return after the first SIGINT signal received by this process
async fn sigint() -> io::Result<()> {
    unix::signal(SignalKind::interrupt())?.recv().await;
    Ok(())
}
