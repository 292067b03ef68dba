use std::net::SocketAddr;
use std::path::Path;

use eco_codes::models::Config;
use eco_codes::repository::OpeningRepository;
use eco_codes::server;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

const PAGE: &str = "<html><body><table>\
    <tr><td><font>A00</font></td><td><font><b>Polish (Sokolsky) opening</b><br><font>1 b4</font></font></td></tr>\
    <tr><td><font>B00</font></td><td><font><b>King's pawn opening</b><br><font>1 e4 e5 2 Nf3 Nc6</font></font></td></tr>\
    </table></body></html>";

fn config_for(path: &Path) -> Config {
    let mut config = Config::default();
    config.source.url = Url::from_file_path(path).unwrap().to_string();
    config
}

async fn spawn_server(config: &Config) -> SocketAddr {
    let repo = OpeningRepository::from_config(config).expect("repository");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(server::serve(listener, repo, std::future::pending()));
    addr
}

async fn get(addr: SocketAddr, path: &str) -> (String, String) {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream
        .write_all(request.as_bytes())
        .await
        .expect("write request");

    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response.split_once("\r\n\r\n").expect("http response");
    (head.to_string(), body.to_string())
}

async fn serve_page() -> (SocketAddr, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let page = dir.path().join("eco.html");
    std::fs::write(&page, PAGE).expect("write page");
    (spawn_server(&config_for(&page)).await, dir)
}

#[tokio::test]
async fn root_lists_openings_in_page_order() {
    let (addr, _dir) = serve_page().await;
    let (head, body) = get(addr, "/").await;

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    let openings: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(openings[0]["code"], "A00");
    assert_eq!(openings[1]["code"], "B00");
    assert_eq!(openings[1]["moveSequence"], "1 e4 e5 2 Nf3 Nc6");
}

#[tokio::test]
async fn code_route_returns_opening_or_null() {
    let (addr, _dir) = serve_page().await;

    let (head, body) = get(addr, "/B00").await;
    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    let opening: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(opening["author"], "King's pawn opening");

    let (head, body) = get(addr, "/ZZ9").await;
    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(body, "null");
}

#[tokio::test]
async fn next_route_walks_move_path() {
    let (addr, _dir) = serve_page().await;

    assert_eq!(get(addr, "/next/B00/e4").await.1, "\"e5\"");
    assert_eq!(get(addr, "/next/B00/e4/e5").await.1, "\"Nf3\"");
    assert_eq!(get(addr, "/next/B00/e4/e5/Nf3/Nc6").await.1, "\"\"");
}

#[tokio::test]
async fn next_route_accepts_empty_path() {
    let (addr, _dir) = serve_page().await;

    let (head, body) = get(addr, "/next/").await;
    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(body, "\"\"");
}

#[tokio::test]
async fn unreadable_source_is_server_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = spawn_server(&config_for(&dir.path().join("missing.html"))).await;

    let (head, body) = get(addr, "/").await;
    assert!(head.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
    assert_eq!(body, "error scraping site for data");
}
