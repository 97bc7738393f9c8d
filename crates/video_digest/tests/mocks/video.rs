use std::sync::{Arc, Mutex};

use video_digest::yt::{TranscriptFetcher, VideoInfo, VideoInfoFetcher, VideoRef};

#[derive(Clone)]
pub struct MockTranscriptFetcher {
    pub transcript: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockTranscriptFetcher {
    pub fn new(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("")
        }
    }
}

impl TranscriptFetcher for MockTranscriptFetcher {
    async fn fetch_transcript(&self, video: &VideoRef) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push(video.id.clone());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.transcript.clone())
    }
}

#[derive(Clone, Default)]
pub struct MockVideoInfoFetcher {
    pub info: VideoInfo,
    pub fail_with: Option<String>,
}

impl MockVideoInfoFetcher {
    pub fn new(title: &str, duration_secs: f64) -> Self {
        Self {
            info: VideoInfo {
                title: Some(title.to_string()),
                duration: Some(duration_secs),
                thumbnail: Some("https://i.ytimg.com/vi/mock/hqdefault.jpg".to_string()),
                channel: Some("Mock Channel".to_string()),
            },
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl VideoInfoFetcher for MockVideoInfoFetcher {
    async fn fetch_video_info(&self, _video: &VideoRef) -> anyhow::Result<VideoInfo> {
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.info.clone())
    }
}
