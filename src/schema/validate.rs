use crate::schema::props::VideoBookProps;
use std::fmt;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SchemaError {
    pub(crate) field: &'static str,
    pub(crate) message: String,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$.{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SchemaErrors {
    pub(crate) errors: Vec<SchemaError>,
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

/// Check that `s` parses as an absolute URL.
pub(crate) fn check_url(s: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("must be a non-empty URL".to_string());
    }
    Url::parse(s).map(drop).map_err(|e| format!("invalid URL: {e}"))
}

pub(crate) fn validate_props(props: &VideoBookProps) -> Result<(), SchemaErrors> {
    let fields = [
        ("videoUrl", props.video_url.as_str()),
        ("srtUrl", props.srt_url.as_str()),
        ("illustrationSrtUrl", props.illustration_srt_url.as_str()),
    ];

    let errors: Vec<SchemaError> = fields
        .into_iter()
        .filter_map(|(field, value)| {
            check_url(value)
                .err()
                .map(|message| SchemaError { field, message })
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaErrors { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_absolute_urls() {
        for ok in [
            "https://cdn.example.com/a.srt",
            "http://localhost:3000/test-video/demo.srt",
            "file:///srv/static/demo.srt",
            "file://host/demo.srt",
            "s3+custom://bucket/key",
            "data:text/plain,hello",
        ] {
            assert!(check_url(ok).is_ok(), "{ok}");
        }
    }

    #[test]
    fn rejects_relative_or_malformed_urls() {
        for bad in [
            "",
            "/test-video/demo.srt",
            "demo.srt",
            "https:",
            "1http://host/x",
            "https://host:99999/x.srt",
            "http://[::1/x.srt",
            "https://ho^st/x.srt",
            "https://a%zz.com/x",
        ] {
            assert!(check_url(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn collects_every_invalid_field() {
        let props = VideoBookProps {
            video_url: "nope".to_string(),
            srt_url: "https://a.b/c.srt".to_string(),
            illustration_srt_url: "".to_string(),
        };
        let errs = validate_props(&props).unwrap_err();
        let fields: Vec<_> = errs.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["videoUrl", "illustrationSrtUrl"]);
        assert!(errs.to_string().starts_with("$.videoUrl:"));
    }
}
