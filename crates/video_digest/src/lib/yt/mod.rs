pub mod ytdlp;

use std::{fmt, future::Future};

use reqwest::Url;
use serde::Deserialize;

use crate::error::ValidationError;

pub trait TranscriptFetcher {
    fn fetch_transcript(&self, video: &VideoRef)
        -> impl Future<Output = anyhow::Result<String>> + Send;
}

pub trait VideoInfoFetcher {
    fn fetch_video_info(
        &self,
        video: &VideoRef,
    ) -> impl Future<Output = anyhow::Result<VideoInfo>> + Send;
}

/// A YouTube video identified from a user-supplied URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    pub id: String,
    /// The URL exactly as submitted.
    pub url: String,
}

impl VideoRef {
    const WATCH_URL: &str = "https://www.youtube.com/watch";

    /// Accepts `youtu.be/<id>` and `youtube.com` `/watch?v=<id>`,
    /// `/embed/<id>`, `/v/<id>` and `/shorts/<id>` forms.
    pub fn parse(url: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidUrl(url.to_string());
        let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;
        let host = parsed.host_str().ok_or_else(invalid)?.to_ascii_lowercase();

        let id = match host.as_str() {
            "youtu.be" | "www.youtu.be" => parsed
                .path_segments()
                .and_then(|mut segs| segs.next())
                .map(str::to_string),
            "youtube.com" | "www.youtube.com" | "m.youtube.com" | "music.youtube.com" => {
                let mut segs = parsed.path_segments().ok_or_else(invalid)?;
                match segs.next() {
                    Some("watch") => parsed
                        .query_pairs()
                        .find(|(k, _)| k == "v")
                        .map(|(_, v)| v.into_owned()),
                    Some("embed" | "v" | "shorts" | "live") => segs.next().map(str::to_string),
                    _ => None,
                }
            }
            _ => None,
        };

        id.filter(|id| is_video_id(id))
            .map(|id| VideoRef {
                id,
                url: url.trim().to_string(),
            })
            .ok_or_else(invalid)
    }

    pub fn watch_url(&self) -> String {
        format!("{}?v={}", Self::WATCH_URL, self.id)
    }
}

impl fmt::Display for VideoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

fn is_video_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Metadata shown alongside a summary.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VideoInfo {
    pub title: Option<String>,
    /// Seconds.
    pub duration: Option<f64>,
    pub thumbnail: Option<String>,
    pub channel: Option<String>,
}

impl VideoInfo {
    pub fn formatted_duration(&self) -> Option<String> {
        self.duration
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(|secs| format_duration(secs.round() as u64))
    }
}

/// `M:SS` below an hour, `H:MM:SS` above.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
