use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::{AppError, AppResult, HttpError};

const MAX_REQUEST_BYTES: usize = 1024 * 1024;

pub(super) struct MockRequest {
    pub(super) method: String,
    pub(super) path: String,
}

#[derive(Debug)]
pub(super) struct RequestError {
    pub(super) status: u16,
    pub(super) message: String,
}

impl RequestError {
    fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Reads the request line and headers, then discards any declared body.
pub(super) async fn read_request(socket: &mut TcpStream) -> Result<MockRequest, RequestError> {
    let mut buffer: Vec<u8> = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|err| RequestError::new(400, format!("Failed to read request: {}", err)))?;
        if bytes == 0 {
            return Err(RequestError::new(400, "Empty request"));
        }
        let read_slice = chunk
            .get(..bytes)
            .ok_or_else(|| RequestError::new(400, "Invalid read length"))?;
        buffer.extend_from_slice(read_slice);
        if buffer.len() > MAX_REQUEST_BYTES {
            return Err(RequestError::new(413, "Request too large"));
        }
        if let Some(pos) = find_header_end(&buffer) {
            break pos;
        }
    };

    let header_bytes = buffer
        .get(..header_end)
        .ok_or_else(|| RequestError::new(400, "Malformed request headers"))?;
    let header_text = std::str::from_utf8(header_bytes)
        .map_err(|err| RequestError::new(400, format!("Invalid request encoding: {}", err)))?;
    let mut lines = header_text.split("\r\n");
    let request_line = lines
        .next()
        .ok_or_else(|| RequestError::new(400, "Missing request line"))?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| RequestError::new(400, "Missing HTTP method"))?;
    let target = parts
        .next()
        .ok_or_else(|| RequestError::new(400, "Missing request path"))?;

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    if content_length > MAX_REQUEST_BYTES {
        return Err(RequestError::new(413, "Request body too large"));
    }

    let body_start = header_end.saturating_add(4);
    let mut body_read = buffer.len().saturating_sub(body_start);
    while body_read < content_length {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|err| RequestError::new(400, format!("Failed to read body: {}", err)))?;
        if bytes == 0 {
            break;
        }
        body_read = body_read.saturating_add(bytes);
    }

    let path = target.split_once('?').map_or(target, |(path, _)| path);
    Ok(MockRequest {
        method: method.to_owned(),
        path: path.to_owned(),
    })
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

const fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

#[derive(Serialize)]
struct StatusBody<'msg> {
    status: &'msg str,
}

#[derive(Serialize)]
struct ErrorBody<'msg> {
    error: &'msg str,
}

pub(super) async fn write_status_response(
    socket: &mut TcpStream,
    code: u16,
    status: &str,
) -> AppResult<()> {
    let body = serde_json::to_vec(&StatusBody { status })
        .map_err(|err| AppError::http(HttpError::SerializeMockResponse { source: err }))?;
    write_response(socket, code, &body).await
}

pub(super) async fn write_error_response(
    socket: &mut TcpStream,
    code: u16,
    message: &str,
) -> AppResult<()> {
    let body = serde_json::to_vec(&ErrorBody { error: message })
        .map_err(|err| AppError::http(HttpError::SerializeMockResponse { source: err }))?;
    write_response(socket, code, &body).await
}

async fn write_response(socket: &mut TcpStream, status: u16, body: &[u8]) -> AppResult<()> {
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        status_text(status),
        body.len()
    );
    socket
        .write_all(head.as_bytes())
        .await
        .map_err(|err| AppError::http(HttpError::WriteMockResponse { source: err }))?;
    socket
        .write_all(body)
        .await
        .map_err(|err| AppError::http(HttpError::WriteMockResponse { source: err }))?;
    socket
        .flush()
        .await
        .map_err(|err| AppError::http(HttpError::WriteMockResponse { source: err }))?;
    Ok(())
}
