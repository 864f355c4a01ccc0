use crate::foundation::error::{VideoBookError, VideoBookResult};
use std::path::{Path, PathBuf};
use url::Url;

/// Source of caption file text.
pub trait CaptionFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> VideoBookResult<String>;
}

impl<F: CaptionFetcher + ?Sized> CaptionFetcher for std::sync::Arc<F> {
    fn fetch(&self, url: &str) -> VideoBookResult<String> {
        (**self).fetch(url)
    }
}

/// Resolves URLs against a directory of static files.
///
/// `file://` URLs are read directly. For `http(s)://` URLs only the path is used and it is looked
/// up under `root`, the way a static file server would serve it.
#[derive(Clone, Debug)]
pub struct StaticDirFetcher {
    root: PathBuf,
}

impl StaticDirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path a URL resolves to.
    pub fn resolve(&self, url: &str) -> VideoBookResult<PathBuf> {
        let parsed = Url::parse(url)
            .map_err(|e| VideoBookError::fetch(format!("invalid URL {url:?}: {e}")))?;

        match parsed.scheme() {
            "file" => parsed
                .to_file_path()
                .map_err(|()| VideoBookError::fetch(format!("not a local file URL: {url:?}"))),
            "http" | "https" => {
                let decoded = decoded_url_path(&parsed)?;
                let decoded = decoded.to_str().ok_or_else(|| {
                    VideoBookError::fetch(format!("URL path is not UTF-8: {url:?}"))
                })?;
                Ok(self.root.join(normalize_rel_path(decoded)?))
            }
            other => Err(VideoBookError::fetch(format!(
                "unsupported URL scheme {other:?} for static files"
            ))),
        }
    }
}

/// Percent-decoded path of an http(s) URL, as an absolute local path.
fn decoded_url_path(url: &Url) -> VideoBookResult<PathBuf> {
    if url.path_segments().is_none_or(|mut s| s.all(str::is_empty)) {
        return Err(VideoBookError::fetch(format!("URL must name a file: {url}")));
    }
    let mut local = Url::parse("file:///")
        .map_err(|e| VideoBookError::fetch(format!("build file URL: {e}")))?;
    local.set_path(url.path());
    local
        .to_file_path()
        .map_err(|()| VideoBookError::fetch(format!("URL path is not a local path: {url}")))
}

impl CaptionFetcher for StaticDirFetcher {
    fn fetch(&self, url: &str) -> VideoBookResult<String> {
        let path = self.resolve(url)?;
        std::fs::read_to_string(&path)
            .map_err(|e| VideoBookError::fetch(format!("read '{}': {e}", path.display())))
    }
}

/// Normalize a URL path into a root-relative path.
///
/// Leading `/` and `.` segments are dropped; `..` is rejected.
pub(crate) fn normalize_rel_path(source: &str) -> VideoBookResult<String> {
    let mut out = Vec::<&str>::new();
    for part in source.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(VideoBookError::fetch("asset paths must not contain '..'"));
        }
        out.push(part);
    }
    if out.is_empty() {
        return Err(VideoBookError::fetch("asset path must contain a file name"));
    }
    Ok(out.join("/"))
}

/// Network fetcher backed by blocking reqwest.
#[cfg(feature = "http")]
#[derive(Clone, Debug, Default)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "http")]
impl CaptionFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> VideoBookResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| VideoBookError::fetch(format!("request {url}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(VideoBookError::fetch(format!(
                "failed to fetch caption file {url}: HTTP {status}"
            )));
        }
        response
            .text()
            .map_err(|e| VideoBookError::fetch(format!("read body of {url}: {e}")))
    }
}


#[cfg(all(test, feature = "http"))]
mod http_tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;

    /// Serve one canned response on a local port and return the URL to request.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
        });
        format!("http://{addr}/captions.srt")
    }

    #[test]
    fn success_status_returns_body() {
        let url = serve_once("200 OK", "1\n00:00:00,000 --> 00:00:01,000\nhi\n");
        let text = HttpFetcher::new().fetch(&url).unwrap();
        assert!(text.ends_with("hi\n"));
    }

    #[test]
    fn error_status_is_a_fetch_error() {
        let url = serve_once("404 Not Found", "missing");
        let err = HttpFetcher::new().fetch(&url).unwrap_err();
        assert!(matches!(err, VideoBookError::Fetch(_)));
        assert!(err.to_string().contains("404"));
    }
}
