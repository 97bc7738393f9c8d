use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use tokio::process::Command;

use crate::{
    parser::vtt_to_text,
    yt::{TranscriptFetcher, VideoInfo, VideoInfoFetcher, VideoRef},
};

/// Drives the `yt-dlp` executable for captions and metadata.
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    cookies_path: Option<PathBuf>,
    workdir: PathBuf,
    sub_langs: String,
}

impl YtDlp {
    pub const DEFAULT_SUB_LANGS: &str = "en.*,en";

    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            binary: PathBuf::from("yt-dlp"),
            cookies_path: None,
            workdir: workdir.into(),
            sub_langs: Self::DEFAULT_SUB_LANGS.into(),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_cookies(mut self, cookies_path: Option<PathBuf>) -> Self {
        self.cookies_path = cookies_path;
        self
    }

    pub fn with_sub_langs(mut self, sub_langs: impl Into<String>) -> Self {
        self.sub_langs = sub_langs.into();
        self
    }

    fn subs_dir(&self) -> PathBuf {
        self.workdir.join("subs")
    }

    async fn run<I, S>(&self, args: I) -> anyhow::Result<Vec<u8>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.binary);
        if let Some(cookies) = &self.cookies_path {
            cmd.arg("--cookies").arg(cookies);
        }
        cmd.args(args);

        let output = cmd
            .output()
            .await
            .inspect_err(|e| tracing::error!(error = %e, binary = ?self.binary, "Failed to spawn yt-dlp"))
            .with_context(|| format!("Failed to run {}", self.binary.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp exited with {}: {}", output.status, stderr.trim());
        }

        Ok(output.stdout)
    }
}

/// Subtitle files written for `video_id`, e.g. `<id>.en.vtt`, sorted so that
/// the choice is stable when several languages were downloaded.
fn find_subtitle_files(dir: &Path, video_id: &str) -> std::io::Result<Vec<PathBuf>> {
    let prefix = format!("{video_id}.");
    let mut files = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            let name = p.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            name.starts_with(&prefix) && name.ends_with(".vtt")
        })
        .collect::<Vec<_>>();
    files.sort();
    Ok(files)
}

impl TranscriptFetcher for YtDlp {
    #[tracing::instrument(skip(self))]
    async fn fetch_transcript(&self, video: &VideoRef) -> anyhow::Result<String> {
        let subs_dir = self.subs_dir();
        tokio::fs::create_dir_all(&subs_dir)
            .await
            .with_context(|| format!("Failed to create {}", subs_dir.display()))?;

        remove_files(&find_subtitle_files(&subs_dir, &video.id)?).await;
        let output_template = subs_dir.join(format!("{}.%(ext)s", video.id));

        self.run([
            OsStr::new("--skip-download"),
            OsStr::new("--no-warnings"),
            OsStr::new("--write-subs"),
            OsStr::new("--write-auto-subs"),
            OsStr::new("--sub-langs"),
            OsStr::new(&self.sub_langs),
            OsStr::new("--sub-format"),
            OsStr::new("vtt"),
            OsStr::new("-o"),
            output_template.as_os_str(),
            OsStr::new(&video.watch_url()),
        ])
        .await
        .context("Failed to download subtitles")?;

        let files = find_subtitle_files(&subs_dir, &video.id)?;
        if files.is_empty() {
            anyhow::bail!("No subtitles available for video {video}");
        }

        let vtt = take_subtitles(&files).await?;

        let transcript = vtt_to_text(&vtt);
        tracing::info!(
            file = ?files[0],
            transcript_len = transcript.len(),
            "Extracted transcript"
        );

        Ok(transcript)
    }
}

/// Reads the first subtitle file. Every file is removed afterwards, including
/// when the read fails.
async fn take_subtitles(files: &[PathBuf]) -> anyhow::Result<String> {
    let vtt = match files.first() {
        Some(first) => tokio::fs::read_to_string(first)
            .await
            .with_context(|| format!("Failed to read {}", first.display())),
        None => Err(anyhow::anyhow!("No subtitle files")),
    };
    remove_files(files).await;
    vtt
}

async fn remove_files(files: &[PathBuf]) {
    for file in files {
        if let Err(e) = tokio::fs::remove_file(file).await {
            tracing::warn!(error = ?e, path = ?file, "Failed to clean up subtitle file");
        }
    }
}

impl VideoInfoFetcher for YtDlp {
    #[tracing::instrument(skip(self))]
    async fn fetch_video_info(&self, video: &VideoRef) -> anyhow::Result<VideoInfo> {
        let stdout = self
            .run([
                "--dump-single-json",
                "--skip-download",
                "--no-warnings",
                video.watch_url().as_str(),
            ])
            .await
            .context("Failed to fetch video metadata")?;

        serde_json::from_slice::<VideoInfo>(&stdout).context("Failed to parse yt-dlp metadata")
    }
}
