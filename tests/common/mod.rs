//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use v_router::config::{I18nMode, RouterConfig};
use v_router::{HttpServer, ManifestStore, Shutdown};

pub const CHANNELS_YAML: &str = r#"
groups:
  - name: "v1"
    channels:
      - name: beta
        version: v1.46.0+fix2
      - name: stable
        version: v1.45.3
  - name: "v1.2"
    channels:
      - name: alpha
        version: v1.2.5
      - name: rock-solid
        version: v1.2.1
"#;

pub const VERSION_MENU: &str = "{{ current_group }}:{{ current_channel }}:{{ current_version }}|\
{% for item in version_items %}{{ item.channel }}={{ item.version_url }};{% endfor %}";

pub const GROUP_MENU: &str = "{% for item in version_items %}{{ item.group }}{% if item.is_current %}*{% endif %};{% endfor %}";

pub const NOT_FOUND_EN: &str = "<h1>en: not found</h1>";

/// A router serving a temporary static root.
pub struct TestRouter {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub dir: TempDir,
}

impl TestRouter {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn channels_file(&self) -> std::path::PathBuf {
        self.dir.path().join("channels.yaml")
    }
}

impl Drop for TestRouter {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Lay out a static root with templates, 404 pages and the channels file.
pub fn write_site(dir: &Path) {
    let root = dir.join("root");
    write(&dir.join("channels.yaml"), CHANNELS_YAML);
    write(&root.join("index.html"), "<h1>home</h1>");
    write(&root.join("en/404.html"), NOT_FOUND_EN);
    write(&root.join("ru/404.html"), "<h1>ru: not found</h1>");
    for lang in ["", "en/", "ru/"] {
        write(&root.join(format!("{lang}includes/version-menu.html")), VERSION_MENU);
        write(&root.join(format!("{lang}includes/group-menu.html")), GROUP_MENU);
    }
}

/// Start a router in location mode on an ephemeral port; `configure` may adjust the config.
pub async fn start_router<F>(configure: F) -> TestRouter
where
    F: FnOnce(&mut RouterConfig),
{
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());

    let mut config = RouterConfig::default();
    config.versions.i18n = I18nMode::Location;
    config.paths.static_root = dir.path().join("root");
    config.paths.channels_file = dir.path().join("channels.yaml");
    configure(&mut config);

    let manifest = Arc::new(ManifestStore::open(&config.paths.channels_file).unwrap());
    let server = HttpServer::new(config, manifest).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestRouter { addr, shutdown, dir }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Start a mock backend on an ephemeral port answering `f(path)` as
/// `(status, location header)`.
pub async fn start_programmable_backend<F>(f: F) -> SocketAddr
where
    F: Fn(&str) -> (u16, Option<String>) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]);
                        let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();

                        let (status, location) = f(&path);
                        let status_text = match status {
                            200 => "200 OK",
                            301 => "301 Moved Permanently",
                            302 => "302 Found",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };
                        let location = location
                            .map(|l| format!("Location: {}\r\n", l))
                            .unwrap_or_default();

                        let response_str = format!(
                            "HTTP/1.1 {}\r\n{}Content-Length: 0\r\nConnection: close\r\n\r\n",
                            status_text, location
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
