//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use geo_redirect::config::{RedirectConfig, RegionConfig};
use geo_redirect::geo::{AddressFamily, CityRecord, GeoLocator, LookupError, RecordSource};
use geo_redirect::http::HttpServer;
use geo_redirect::lifecycle::Shutdown;

/// In-memory city records keyed by address.
#[derive(Default)]
pub struct FixedRecords {
    records: HashMap<IpAddr, CityRecord>,
}

impl FixedRecords {
    pub fn with(mut self, ip: &str, latitude: f64, longitude: f64, city: &str) -> Self {
        self.records.insert(
            ip.parse().unwrap(),
            CityRecord {
                city: Some(city.to_string()),
                country_code: Some("ZZ".to_string()),
                state1: Some(String::new()),
                timezone: Some("UTC".to_string()),
                latitude: Some(latitude),
                longitude: Some(longitude),
            },
        );
        self
    }

    pub fn with_record(mut self, ip: &str, record: CityRecord) -> Self {
        self.records.insert(ip.parse().unwrap(), record);
        self
    }
}

impl RecordSource for FixedRecords {
    fn record(
        &self,
        _family: AddressFamily,
        ip: IpAddr,
    ) -> Result<Option<CityRecord>, LookupError> {
        Ok(self.records.get(&ip).cloned())
    }
}

pub fn region(name: &str, endpoint: &str, latitude: f64, longitude: f64) -> RegionConfig {
    RegionConfig {
        name: name.to_string(),
        endpoint: endpoint.to_string(),
        city: None,
        latitude,
        longitude,
    }
}

/// A running server bound to an ephemeral loopback port.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub async fn start(regions: Vec<RegionConfig>, records: FixedRecords) -> Self {
        let config = RedirectConfig {
            regions,
            ..Default::default()
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();
        let server = HttpServer::new(config, GeoLocator::new(records));
        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        Self { addr, shutdown }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Client that reports redirects instead of following them.
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()
            .unwrap()
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}
