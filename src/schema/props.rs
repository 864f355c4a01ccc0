use crate::foundation::error::{VideoBookError, VideoBookResult};
use crate::schema::validate::validate_props;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Input properties of a video book page.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VideoBookProps {
    pub video_url: String,
    /// Spoken caption file.
    pub srt_url: String,
    /// Illustration timing file; entry text is an asset path.
    pub illustration_srt_url: String,
}

impl VideoBookProps {
    pub fn from_reader<R: std::io::Read>(r: R) -> VideoBookResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| VideoBookError::validation(format!("parse props JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> VideoBookResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            VideoBookError::validation(format!("open props JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> VideoBookResult<()> {
        validate_props(self)
            .map_err(|e| VideoBookError::validation(format!("props validation failed: {e}")))
    }
}
