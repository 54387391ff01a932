use std::fs;

use spidey::config::Config;
use spidey::handler::RequestHandler;
use spidey::http::mime::MimeTypes;
use spidey::server::listener::serve;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn fetch(addr: std::net::SocketAddr, raw: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8(response).unwrap()
}

#[tokio::test]
async fn test_serves_requests_one_after_another() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("hello.txt"), "hello\n").unwrap();

    let config = Config {
        root: dir.path().to_path_buf(),
        ..Config::default()
    };
    let handler = RequestHandler::new(config, MimeTypes::parse("text/plain txt", "text/plain"));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move { serve(listener, &handler).await });

    let first = fetch(addr, b"GET /hello.txt HTTP/1.0\r\nHost: localhost\r\n\r\n").await;
    assert_eq!(first, "HTTP/1.0 200 OK\r\nContent-Type: text/plain\r\n\r\nhello\n");

    let second = fetch(addr, b"GET /nope.txt HTTP/1.0\r\n\r\n").await;
    assert!(second.starts_with("HTTP/1.0 404 Not Found\r\n"));

    server.abort();
}
