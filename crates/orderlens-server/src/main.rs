//! orderlens-server — HTTP/SSE server for the order lookup view
//!
//! Serves the SSR page, streams DOM snapshots over SSE, and accepts user
//! events as POST actions. The submit action triggers the backend lookup
//! in a detached thread; when it completes, the result is written into the
//! view state and a fresh snapshot is broadcast. In-flight lookups are
//! never cancelled, and overlapping ones apply in completion order.
//!
//! Usage:
//!   orderlens-server --port 3000 --backend http://localhost:3001/
//!   orderlens-server --public public/ --cors '*'

mod fetch;

use orderlens_render_html::{render_page, PageOptions};
use orderlens_view::{reduce, render_snapshot, Action, ViewState};

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

/// Client runtime — embedded at compile time, served from the binary.
const EMBEDDED_CLIENT_JS: &str = include_str!("../assets/client.js");

/// Default stylesheet — embedded at compile time.
const EMBEDDED_STYLE_CSS: &str = include_str!("../assets/style.css");

struct Server {
    view: Mutex<ViewState>,
    /// SSE clients: TcpStream clones we write snapshots to.
    sse_clients: Mutex<Vec<TcpStream>>,
    static_dir: String,
    backend: String,
    cors_origin: String,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let port = find_arg(&args, "--port").unwrap_or_else(|| "3000".to_string());
    let static_dir = find_arg(&args, "--public").unwrap_or_else(|| "public".to_string());
    let backend = find_arg(&args, "--backend")
        .unwrap_or_else(|| env_or("ORDERLENS_BACKEND", "http://localhost:3001/"));
    let cors_origin = find_arg(&args, "--cors").unwrap_or_else(|| "*".to_string());

    let server = Arc::new(Server {
        view: Mutex::new(ViewState::new()),
        sse_clients: Mutex::new(Vec::new()),
        static_dir,
        backend,
        cors_origin,
    });

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).expect("Failed to bind");
    eprintln!("[orderlens] http://localhost:{}", port);
    eprintln!("[orderlens] backend: {}", server.backend);

    for stream in listener.incoming() {
        let stream = match stream {
            Ok(s) => s,
            Err(e) => {
                eprintln!("[err] accept: {}", e);
                continue;
            }
        };
        let server = Arc::clone(&server);
        thread::spawn(move || {
            if let Err(e) = handle_connection(stream, &server) {
                // Connection closed — expected for SSE clients
                let _ = e;
            }
        });
    }
}

pub fn find_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn handle_connection(mut stream: TcpStream, server: &Arc<Server>) -> std::io::Result<()> {
    let start = Instant::now();
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    let parts: Vec<&str> = request_line.trim().split_whitespace().collect();
    if parts.len() < 2 {
        return Ok(());
    }
    let method = parts[0].to_string();
    let path = parts[1].to_string();

    let mut headers = HashMap::new();
    let mut content_length: usize = 0;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        if let Some((k, v)) = trimmed.split_once(':') {
            let key = k.trim().to_lowercase();
            let val = v.trim().to_string();
            if key == "content-length" {
                content_length = val.parse().unwrap_or(0);
            }
            headers.insert(key, val);
        }
    }

    let result = match (method.as_str(), path.as_str()) {
        ("GET", "/sse") => handle_sse(stream, server),
        ("POST", p) if p.starts_with("/actions/") => {
            let mut body = vec![0u8; content_length];
            if content_length > 0 {
                reader.read_exact(&mut body)?;
            }
            handle_action(&mut stream, server, p, &body)
        }
        ("GET", "/") | ("GET", "/index.html") => serve_ssr(&mut stream, server),
        ("GET", "/client.js") => {
            serve_asset(&mut stream, server, "application/javascript", EMBEDDED_CLIENT_JS)
        }
        ("GET", "/style.css") => serve_asset(&mut stream, server, "text/css", EMBEDDED_STYLE_CSS),
        ("GET", p) => serve_static(&mut stream, server, p),
        ("OPTIONS", _) => {
            let resp = format!(
                "HTTP/1.1 204 No Content\r\n{}\r\n",
                cors_headers(&server.cors_origin)
            );
            stream.write_all(resp.as_bytes())
        }
        _ => stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n"),
    };

    if path != "/sse" {
        let ms = start.elapsed().as_millis();
        eprintln!("[orderlens] {} {} ({}ms)", method, path, ms);
    }
    result
}

fn cors_headers(origin: &str) -> String {
    format!(
        "Access-Control-Allow-Origin: {}\r\n\
        Access-Control-Allow-Headers: Content-Type\r\n\
        Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n",
        origin
    )
}

fn handle_sse(mut stream: TcpStream, server: &Arc<Server>) -> std::io::Result<()> {
    let header = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\n\
        Cache-Control: no-cache\r\nConnection: keep-alive\r\n{}\r\n",
        cors_headers(&server.cors_origin)
    );
    stream.write_all(header.as_bytes())?;

    // Initial snapshot so new clients paint immediately
    let snapshot = {
        let view = server.view.lock().unwrap();
        render_snapshot(&view).to_json()
    };
    write_sse_event(&mut stream, snapshot.as_bytes())?;

    let client = stream.try_clone()?;
    let client_count = {
        let mut clients = server.sse_clients.lock().unwrap();
        clients.push(client);
        clients.len()
    };
    eprintln!("[orderlens] SSE client connected (total={})", client_count);

    // SSE is long-lived; a failed keepalive write means the client is gone
    loop {
        thread::sleep(std::time::Duration::from_secs(30));
        if stream.write_all(b": keepalive\n\n").is_err() {
            eprintln!("[orderlens] SSE client disconnected");
            break;
        }
    }
    Ok(())
}

fn handle_action(
    stream: &mut TcpStream,
    server: &Arc<Server>,
    url_path: &str,
    body: &[u8],
) -> std::io::Result<()> {
    let action_name = urlencoding_decode(url_path.strip_prefix("/actions/").unwrap_or(""));

    // Body format: {"payload":{...}} — bare payloads are accepted too
    let payload = serde_json::from_slice::<serde_json::Value>(body)
        .map(|v| v.get("payload").cloned().unwrap_or(v))
        .unwrap_or(serde_json::Value::Null);

    let action = Action::parse(&action_name, &payload);

    let snapshot = {
        let mut view = server.view.lock().unwrap();
        reduce(&mut view, &action);
        render_snapshot(&view).to_json()
    };

    // Submit: the lookup runs detached so the view never blocks and no
    // loading state exists. The result lands via SSE when it lands.
    if action == Action::FetchOrder {
        spawn_lookup(Arc::clone(server));
    } else {
        eprintln!("[orderlens] action: {}", action_name);
    }

    let resp = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
        Content-Length: {}\r\n{}\r\n",
        snapshot.len(),
        cors_headers(&server.cors_origin)
    );
    stream.write_all(resp.as_bytes())?;
    stream.write_all(snapshot.as_bytes())?;

    broadcast_snapshot(server, snapshot.as_bytes());
    Ok(())
}

/// Run one backend lookup in its own thread and apply the outcome.
/// Overlapping lookups race; whichever completes last overwrites the panel.
fn spawn_lookup(server: Arc<Server>) {
    let order_uid = server.view.lock().unwrap().input_text().to_string();
    thread::spawn(move || {
        match fetch::fetch_order(&server.backend, &order_uid) {
            Ok(text) => {
                let snapshot = {
                    let mut view = server.view.lock().unwrap();
                    view.set_result(text);
                    render_snapshot(&view).to_json()
                };
                broadcast_snapshot(&server, snapshot.as_bytes());
            }
            // Failed lookups stay invisible to the user: log, panel unchanged
            Err(e) => eprintln!("[lookup] error: {}", e),
        }
    });
}

fn serve_ssr(stream: &mut TcpStream, server: &Arc<Server>) -> std::io::Result<()> {
    let root = {
        let view = server.view.lock().unwrap();
        render_snapshot(&view).root
    };

    let page = render_page(&PageOptions {
        root,
        title: "Order data".to_string(),
        inline_css: Some(EMBEDDED_STYLE_CSS.to_string()),
        scripts: vec!["/client.js".to_string()],
        sse_url: Some("/sse".to_string()),
        mount_selector: "#app".to_string(),
    });

    let resp = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\n\
        Content-Length: {}\r\n{}\r\n",
        page.len(),
        cors_headers(&server.cors_origin)
    );
    stream.write_all(resp.as_bytes())?;
    stream.write_all(page.as_bytes())
}

fn serve_asset(
    stream: &mut TcpStream,
    server: &Arc<Server>,
    content_type: &str,
    data: &str,
) -> std::io::Result<()> {
    let resp = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\n\
        Cache-Control: public, max-age=300, must-revalidate\r\n{}\r\n",
        content_type,
        data.len(),
        cors_headers(&server.cors_origin)
    );
    stream.write_all(resp.as_bytes())?;
    stream.write_all(data.as_bytes())
}

fn serve_static(stream: &mut TcpStream, server: &Arc<Server>, path: &str) -> std::io::Result<()> {
    let file_path = format!("{}{}", server.static_dir, path);

    // Security: prevent path traversal
    let canonical = std::fs::canonicalize(&file_path);
    let base = std::fs::canonicalize(&server.static_dir);
    if let (Ok(canon), Ok(base_canon)) = (canonical, base) {
        if !canon.starts_with(&base_canon) {
            return stream.write_all(b"HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\n\r\n");
        }
    }

    match std::fs::read(&file_path) {
        Ok(data) => {
            let resp = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\n{}\r\n",
                guess_content_type(path),
                data.len(),
                cors_headers(&server.cors_origin)
            );
            stream.write_all(resp.as_bytes())?;
            stream.write_all(&data)
        }
        Err(_) => stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n"),
    }
}

fn broadcast_snapshot(server: &Server, snapshot: &[u8]) {
    let mut clients = server.sse_clients.lock().unwrap();
    let mut alive = Vec::new();
    for mut client in clients.drain(..) {
        if write_sse_event(&mut client, snapshot).is_ok() {
            alive.push(client);
        }
        // Dead clients are dropped
    }
    *clients = alive;
}

fn write_sse_event(stream: &mut TcpStream, data: &[u8]) -> std::io::Result<()> {
    stream.write_all(b"event: message\ndata: ")?;
    stream.write_all(data)?;
    stream.write_all(b"\n\n")?;
    stream.flush()
}

fn guess_content_type(path: &str) -> &str {
    if path.ends_with(".html") {
        "text/html; charset=utf-8"
    } else if path.ends_with(".js") {
        "application/javascript"
    } else if path.ends_with(".css") {
        "text/css"
    } else if path.ends_with(".json") {
        "application/json"
    } else if path.ends_with(".png") {
        "image/png"
    } else if path.ends_with(".svg") {
        "image/svg+xml"
    } else if path.ends_with(".ico") {
        "image/x-icon"
    } else {
        "application/octet-stream"
    }
}

pub fn urlencoding_decode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '%' {
            let hex: String = chars.by_ref().take(2).collect();
            if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                result.push(byte as char);
            }
        } else if c == '+' {
            result.push(' ');
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_arg() {
        let args: Vec<String> = ["bin", "--port", "4000", "--cors", "*"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(find_arg(&args, "--port").as_deref(), Some("4000"));
        assert_eq!(find_arg(&args, "--backend"), None);
    }

    #[test]
    fn test_urlencoding_decode() {
        assert_eq!(urlencoding_decode("fetch_order"), "fetch_order");
        assert_eq!(urlencoding_decode("a%20b%26c"), "a b&c");
        assert_eq!(urlencoding_decode("a+b"), "a b");
    }
}
