use eyre::{Result, bail};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{fallback_title, watch_url};

const OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";

/// Public metadata YouTube exposes for a video without an API key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMeta {
    pub title: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Fetch oEmbed metadata for a video
pub async fn fetch_metadata(client: &reqwest::Client, video_id: &str) -> Result<VideoMeta> {
    fetch_metadata_from(client, OEMBED_ENDPOINT, video_id).await
}

async fn fetch_metadata_from(client: &reqwest::Client, endpoint: &str, video_id: &str) -> Result<VideoMeta> {
    let target = watch_url(video_id);
    debug!("Fetching oEmbed metadata for {target}");

    let resp = client
        .get(endpoint)
        .query(&[("url", target.as_str()), ("format", "json")])
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        bail!("oEmbed returned {status} for video {video_id}");
    }

    let body = resp.text().await?;
    parse_metadata(&body)
}

fn parse_metadata(body: &str) -> Result<VideoMeta> {
    let meta: VideoMeta = serde_json::from_str(body)?;
    if meta.title.trim().is_empty() {
        bail!("oEmbed response has an empty title");
    }
    Ok(meta)
}

/// Best-effort title: the oEmbed title, or the placeholder when the lookup fails
pub async fn resolve_title(client: &reqwest::Client, video_id: &str) -> String {
    resolve_title_from(client, OEMBED_ENDPOINT, video_id).await
}

async fn resolve_title_from(client: &reqwest::Client, endpoint: &str, video_id: &str) -> String {
    match fetch_metadata_from(client, endpoint, video_id).await {
        Ok(meta) => meta.title,
        Err(e) => {
            debug!("Could not fetch video title for {video_id}: {e}");
            fallback_title(video_id)
        }
    }
}
