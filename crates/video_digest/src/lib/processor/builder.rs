use digest_datastore::DataStore;

use crate::{
    llm::registry::SummarizerFactory,
    yt::{TranscriptFetcher, VideoInfoFetcher},
    SummaryService, VideoProcessor,
};

pub struct VideoProcessorBuilder<D = (), F = (), T = (), I = ()> {
    store: D,
    factory: F,
    transcript_fetcher: T,
    info_fetcher: I,
}

impl VideoProcessorBuilder {
    pub fn new() -> Self {
        Self {
            store: (),
            factory: (),
            transcript_fetcher: (),
            info_fetcher: (),
        }
    }
}

impl Default for VideoProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, F, T, I> VideoProcessorBuilder<D, F, T, I> {
    pub fn store<D2: DataStore + Send + Sync + 'static>(
        self,
        store: D2,
    ) -> VideoProcessorBuilder<D2, F, T, I> {
        VideoProcessorBuilder {
            store,
            factory: self.factory,
            transcript_fetcher: self.transcript_fetcher,
            info_fetcher: self.info_fetcher,
        }
    }

    pub fn summarizers<F2: SummarizerFactory + Send + Sync + 'static>(
        self,
        factory: F2,
    ) -> VideoProcessorBuilder<D, F2, T, I> {
        VideoProcessorBuilder {
            store: self.store,
            factory,
            transcript_fetcher: self.transcript_fetcher,
            info_fetcher: self.info_fetcher,
        }
    }

    pub fn transcript_fetcher<T2: TranscriptFetcher + Send + Sync + 'static>(
        self,
        transcript_fetcher: T2,
    ) -> VideoProcessorBuilder<D, F, T2, I> {
        VideoProcessorBuilder {
            store: self.store,
            factory: self.factory,
            transcript_fetcher,
            info_fetcher: self.info_fetcher,
        }
    }

    pub fn info_fetcher<I2: VideoInfoFetcher + Send + Sync + 'static>(
        self,
        info_fetcher: I2,
    ) -> VideoProcessorBuilder<D, F, T, I2> {
        VideoProcessorBuilder {
            store: self.store,
            factory: self.factory,
            transcript_fetcher: self.transcript_fetcher,
            info_fetcher,
        }
    }
}

impl<D, F, T, I> VideoProcessorBuilder<D, F, T, I>
where
    D: DataStore + Send + Sync + 'static,
    F: SummarizerFactory + Send + Sync + 'static,
    T: TranscriptFetcher + Send + Sync + 'static,
    I: VideoInfoFetcher + Send + Sync + 'static,
{
    pub fn build(self) -> VideoProcessor<D, F, T, I> {
        VideoProcessor {
            service: SummaryService::new(self.store, self.factory),
            transcript_fetcher: self.transcript_fetcher,
            info_fetcher: self.info_fetcher,
        }
    }
}
