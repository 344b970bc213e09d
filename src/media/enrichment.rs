use super::{LookupError, TrackMatch, TrackSearch, VideoMatch, VideoSearch};
use crate::extraction::SongSuggestion;
use crate::server::metrics;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Counters of a single `enrich` call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub lookups_issued: usize,
    pub lookups_failed: usize,
}

/// Attaches video and track links to song suggestions.
///
/// Services left unconfigured are skipped; their fields stay empty.
pub struct EnrichmentDispatcher {
    video: Option<Arc<dyn VideoSearch>>,
    tracks: Option<Arc<dyn TrackSearch>>,
    lookup_timeout: Duration,
    video_query_suffix: String,
}

struct RecordOutcome {
    song: SongSuggestion,
    issued: usize,
    failed: usize,
}

impl EnrichmentDispatcher {
    pub fn new(
        video: Option<Arc<dyn VideoSearch>>,
        tracks: Option<Arc<dyn TrackSearch>>,
        lookup_timeout: Duration,
        video_query_suffix: impl Into<String>,
    ) -> Self {
        Self {
            video,
            tracks,
            lookup_timeout,
            video_query_suffix: video_query_suffix.into(),
        }
    }

    /// A dispatcher that never looks anything up.
    pub fn disabled() -> Self {
        Self::new(None, None, Duration::ZERO, "")
    }

    pub fn video_query(&self, song: &SongSuggestion) -> String {
        let base = self.track_query(song);
        if self.video_query_suffix.is_empty() {
            base
        } else {
            format!("{} {}", base, self.video_query_suffix)
        }
    }

    pub fn track_query(&self, song: &SongSuggestion) -> String {
        format!("{} {}", song.artist, song.song_name)
    }

    /// Look up the missing media fields of every song.
    ///
    /// All records and both lookups of each record run concurrently. A
    /// failed or timed out lookup only leaves its own field empty; the
    /// batch itself never fails. Output order matches input order.
    pub async fn enrich(
        &self,
        songs: Vec<SongSuggestion>,
    ) -> (Vec<SongSuggestion>, EnrichmentReport) {
        let outcomes = join_all(songs.into_iter().map(|song| self.enrich_one(song))).await;

        let mut report = EnrichmentReport::default();
        let songs = outcomes
            .into_iter()
            .map(|outcome| {
                report.lookups_issued += outcome.issued;
                report.lookups_failed += outcome.failed;
                outcome.song
            })
            .collect();

        debug!(
            issued = report.lookups_issued,
            failed = report.lookups_failed,
            "Enrichment finished"
        );
        (songs, report)
    }

    async fn enrich_one(&self, mut song: SongSuggestion) -> RecordOutcome {
        let video_query = self
            .video
            .as_ref()
            .filter(|_| song.youtube_url.is_none())
            .map(|service| (service.clone(), self.video_query(&song)));
        let track_query = self
            .tracks
            .as_ref()
            .filter(|_| song.spotify_url.is_none())
            .map(|service| (service.clone(), self.track_query(&song)));

        let issued = video_query.is_some() as usize + track_query.is_some() as usize;
        if issued == 0 {
            return RecordOutcome {
                song,
                issued: 0,
                failed: 0,
            };
        }

        let video_lookup = async {
            match video_query {
                Some((service, query)) => Some(self.lookup_video(service.as_ref(), &query).await),
                None => None,
            }
        };
        let track_lookup = async {
            match track_query {
                Some((service, query)) => Some(self.lookup_track(service.as_ref(), &query).await),
                None => None,
            }
        };
        let (video, track) = tokio::join!(video_lookup, track_lookup);

        let mut failed = 0;
        match video {
            Some(Ok(found)) => {
                song.youtube_url = Some(found.url);
                song.youtube_thumbnail = Some(found.thumbnail);
            }
            Some(Err(_)) => failed += 1,
            None => {}
        }
        match track {
            Some(Ok(Some(found))) => {
                song.spotify_url = Some(found.url);
                song.spotify_thumbnail = found.thumbnail;
            }
            Some(Ok(None)) => {}
            Some(Err(_)) => failed += 1,
            None => {}
        }

        RecordOutcome {
            song,
            issued,
            failed,
        }
    }

    async fn lookup_video(
        &self,
        service: &dyn VideoSearch,
        query: &str,
    ) -> Result<VideoMatch, LookupError> {
        let result = tokio::time::timeout(self.lookup_timeout, service.search_video(query))
            .await
            .unwrap_or(Err(LookupError::Timeout { service: "youtube" }));
        record_lookup("youtube", query, &result);
        result
    }

    async fn lookup_track(
        &self,
        service: &dyn TrackSearch,
        query: &str,
    ) -> Result<Option<TrackMatch>, LookupError> {
        let result = tokio::time::timeout(self.lookup_timeout, service.search_track(query))
            .await
            .unwrap_or(Err(LookupError::Timeout { service: "spotify" }));
        record_lookup("spotify", query, &result);
        result
    }
}

fn record_lookup<T>(service: &'static str, query: &str, result: &Result<T, LookupError>) {
    match result {
        Ok(_) => metrics::record_media_lookup(service, "ok"),
        Err(e) => {
            warn!(service, query, error = %e, "LookupFailed");
            metrics::record_media_lookup(service, e.kind());
        }
    }
}
