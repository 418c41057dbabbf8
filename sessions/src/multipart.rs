const CRLF: &[u8] = b"\r\n";

/// Encodes the single `file` part of a `multipart/form-data` upload body.
///
/// The service expects exactly one part named `file` whose filename carries
/// the destination path inside the session, declared as an octet stream.
/// The layout is pinned by the service contract, so the body is assembled
/// by hand rather than through reqwest's multipart support.
pub(crate) fn encode_multipart(contents: &[u8], remote_file_path: &str, boundary: &str) -> Vec<u8> {
    let mut body = Vec::with_capacity(contents.len() + boundary.len() * 2 + 160);
    body.extend_from_slice(format!("--{boundary}").as_bytes());
    body.extend_from_slice(CRLF);
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{remote_file_path}\"")
            .as_bytes(),
    );
    body.extend_from_slice(CRLF);
    body.extend_from_slice(b"Content-Type: application/octet-stream");
    body.extend_from_slice(CRLF);
    body.extend_from_slice(CRLF);
    body.extend_from_slice(contents);
    body.extend_from_slice(CRLF);
    body.extend_from_slice(format!("--{boundary}--").as_bytes());
    body.extend_from_slice(CRLF);
    body
}
