//! Shared fixtures for the integration tests.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use asset_mask::config::{parse_config, AppConfig};
use asset_mask::{AssetPipeline, HttpServer, Shutdown};
use tokio::net::TcpListener;

/// A resource map exercising every mask kind plus a bare reference.
pub const RESOURCES: &str = r##"
[resources]
"/" = ["home.js"]
"/assets/*" = ["assets.css"]
"/user/:id" = ["user.js", { path = "user.less" }]
"#\\.html$#" = [{ path = "page.js", version = "3", type = "module" }]
"base" = "base.css"
"##;

/// Write `contents` to `dir/relative`, creating parent directories.
#[allow(dead_code)]
pub fn write_file(dir: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

/// Config with [`RESOURCES`] and the given template roots.
pub fn config_with_roots(roots: &[&Path]) -> AppConfig {
    let paths = roots
        .iter()
        .map(|root| format!("{:?}", root.display().to_string()))
        .collect::<Vec<_>>()
        .join(", ");

    parse_config(&format!(
        r#"
[server]
scan_timeout_secs = 5

[templates]
paths = [{paths}]
{RESOURCES}"#
    ))
    .unwrap()
}

#[allow(dead_code)]
pub fn pipeline_with_roots(roots: &[&Path]) -> AssetPipeline {
    AssetPipeline::from_config(&config_with_roots(roots)).unwrap()
}

/// A server bound to an ephemeral port, stopped through the returned handle.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

#[allow(dead_code)]
impl TestServer {
    pub async fn spawn(config: AppConfig) -> Self {
        let pipeline = Arc::new(AssetPipeline::from_config(&config).unwrap());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server = HttpServer::new(&config.server, pipeline);
        let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

        Self {
            addr,
            shutdown,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn stop(self) {
        self.shutdown.trigger();
        self.handle.await.unwrap().unwrap();
    }
}
