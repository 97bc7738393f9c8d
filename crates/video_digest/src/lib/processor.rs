pub mod builder;

use digest_datastore::{DataStore, HistoryRecord, NewHistoryRecord};

use crate::{
    error::ProcessError,
    llm::registry::SummarizerFactory,
    yt::{TranscriptFetcher, VideoInfo, VideoInfoFetcher, VideoRef},
    SummaryLength, SummaryService,
};

/// Turns a YouTube URL into a stored transcript + summary.
#[derive(Debug)]
pub struct VideoProcessor<D, F, T, I>
where
    D: DataStore + Send + Sync + 'static,
    F: SummarizerFactory + Send + Sync + 'static,
    T: TranscriptFetcher + Send + Sync + 'static,
    I: VideoInfoFetcher + Send + Sync + 'static,
{
    service: SummaryService<D, F>,
    transcript_fetcher: T,
    info_fetcher: I,
}

impl<D, F, T, I> VideoProcessor<D, F, T, I>
where
    D: DataStore + Send + Sync + 'static,
    F: SummarizerFactory + Send + Sync + 'static,
    T: TranscriptFetcher + Send + Sync + 'static,
    I: VideoInfoFetcher + Send + Sync + 'static,
{
    pub fn service(&self) -> &SummaryService<D, F> {
        &self.service
    }

    /// Metadata is cosmetic: a lookup failure is logged and the record is
    /// stored without it.
    #[tracing::instrument(skip(self))]
    async fn fetch_video_info(&self, video: &VideoRef) -> VideoInfo {
        self.info_fetcher
            .fetch_video_info(video)
            .await
            .inspect_err(|e| tracing::warn!(error = ?e, "Failed to fetch video metadata"))
            .unwrap_or_default()
    }

    #[tracing::instrument(skip(self))]
    pub async fn process(
        &self,
        url: &str,
        length: SummaryLength,
    ) -> Result<HistoryRecord, ProcessError> {
        let video = VideoRef::parse(url)?;

        let transcript = self
            .transcript_fetcher
            .fetch_transcript(&video)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to fetch transcript"))
            .map_err(ProcessError::Transcript)?;

        let info = self.fetch_video_info(&video).await;

        let summary = self.service.generate_summary(&transcript, length).await?;

        let record = NewHistoryRecord {
            video_url: video.url.clone(),
            duration: info.formatted_duration(),
            title: info.title,
            thumbnail_url: info.thumbnail,
            transcript,
            summary,
            summary_length: length.to_string(),
        };

        let saved = self
            .service
            .store()
            .insert_history(&record)
            .await
            .map_err(ProcessError::Store)?;

        tracing::info!(id = saved.id, video_id = %video.id, "Processed video");
        Ok(saved)
    }

    pub async fn history(&self, limit: i64) -> anyhow::Result<Vec<HistoryRecord>> {
        self.service.store().list_history(limit).await
    }

    pub async fn history_record(&self, id: i64) -> anyhow::Result<Option<HistoryRecord>> {
        self.service.store().get_history(id).await
    }

    pub async fn latest(&self) -> anyhow::Result<Option<HistoryRecord>> {
        self.service.store().latest_history().await
    }
}
