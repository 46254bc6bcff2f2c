//! View models decoded from the V-Song backend.
//!
//! Every type here is owned by the backend: the client only decodes, displays and
//! replaces them wholesale on refetch. List fields tolerate both a missing key and an
//! explicit `null`, which the backend emits for empty sections.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

const THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";
const EMBED_BASE: &str = "https://www.youtube.com/embed";
const WATCH_BASE: &str = "https://www.youtube.com/watch?v=";
const CHANNEL_BASE: &str = "https://www.youtube.com/channel";

/// A single song or short as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub vtuber_name: String,
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub published_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub view_count: u64,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Song {
    pub fn thumbnail_url(&self) -> String {
        format!("{}/{}/0.jpg", THUMBNAIL_BASE, self.video_id)
    }

    pub fn embed_url(&self) -> String {
        embed_url(&self.video_id)
    }

    pub fn watch_url(&self) -> String {
        format!("{}{}", WATCH_BASE, self.video_id)
    }
}

/// Builds the embeddable player URL for a video id.
pub fn embed_url(video_id: &str) -> String {
    format!("{}/{}", EMBED_BASE, video_id)
}

/// Builds the public channel page URL for a channel id.
pub fn channel_url(channel_id: &str) -> String {
    format!("{}/{}", CHANNEL_BASE, channel_id)
}

/// A subscriber count as sent by the backend.
///
/// The search endpoint and the details endpoint disagree on whether this is a number
/// or a preformatted string, so both are accepted and kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayCount {
    Number(u64),
    Text(String),
}

impl Default for DisplayCount {
    fn default() -> Self {
        DisplayCount::Number(0)
    }
}

impl fmt::Display for DisplayCount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DisplayCount::Number(n) => {
                write!(f, "{}", crate::foundation::utils::format_count(*n))
            }
            DisplayCount::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A VTuber channel as listed in search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VtuberSummary {
    pub channel_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub channel_img: String,
    #[serde(default)]
    pub subscribers: DisplayCount,
}

/// Gender classification of a VTuber channel.
///
/// Anything other than `"female"` or `"male"`, including `null`, is a mixed group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Gender {
    Female,
    Male,
    #[default]
    Mixed,
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref() {
            Some("female") => Gender::Female,
            Some("male") => Gender::Male,
            _ => Gender::Mixed,
        })
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
            Gender::Mixed => "Mixed",
        };
        write!(f, "{}", label)
    }
}

/// Full profile of a VTuber channel.
///
/// The details endpoint does not echo the channel id back, so `channel_id` is filled in
/// by the client from the request path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VtuberDetail {
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub channel_img: String,
    #[serde(default)]
    pub subscribers: DisplayCount,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default, deserialize_with = "null_as_default")]
    pub song_count: u64,
}

/// The identity of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub name: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultSet {
    #[serde(default, deserialize_with = "null_as_default")]
    pub songs: Vec<Song>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vtubers: Vec<VtuberSummary>,
}

/// Parameters of a search request.
///
/// At least one of `query` and `channel_id` must be non-blank for a search to be issued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub query: Option<String>,
    pub channel_id: Option<String>,
}

impl SearchParams {
    pub fn by_query(query: &str) -> Self {
        Self {
            query: Some(query.to_string()),
            channel_id: None,
        }
    }

    pub fn query_text(&self) -> &str {
        self.query.as_deref().unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        blank(&self.query) && blank(&self.channel_id)
    }

    /// Flat key/value pairs for the search endpoint.
    ///
    /// `query` is always sent, as an empty string when absent; `channelId` only when set.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("query", self.query_text().to_string())];
        if let Some(channel_id) = self.channel_id.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("channelId", channel_id.to_string()));
        }
        pairs
    }
}

/// Every section of the landing page and the chart sidebar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainPageData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub random_songs: Vec<Song>,
    #[serde(default, rename = "top10RecentSongs", deserialize_with = "null_as_default")]
    pub top10_recent_songs: Vec<Song>,
    #[serde(default, rename = "top10DailySongs", deserialize_with = "null_as_default")]
    pub top10_daily_songs: Vec<Song>,
    #[serde(default, rename = "top10WeeklySongs", deserialize_with = "null_as_default")]
    pub top10_weekly_songs: Vec<Song>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub random_shorts: Vec<Song>,
    #[serde(default, rename = "top10WeeklyShorts", deserialize_with = "null_as_default")]
    pub top10_weekly_shorts: Vec<Song>,
    #[serde(default, rename = "top9RecentShorts", deserialize_with = "null_as_default")]
    pub top9_recent_shorts: Vec<Song>,
}

/// The content filter shared by every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderFilter {
    #[default]
    All,
    Male,
    Female,
}

impl GenderFilter {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            GenderFilter::All => "all",
            GenderFilter::Male => "male",
            GenderFilter::Female => "female",
        }
    }
}

impl fmt::Display for GenderFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_query_value())
    }
}

impl FromStr for GenderFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(GenderFilter::All),
            "male" => Ok(GenderFilter::Male),
            "female" => Ok(GenderFilter::Female),
            other => Err(format!("unknown gender filter '{}'", other)),
        }
    }
}

/// Which ranking the chart sidebar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Weekly,
    Daily,
    Shorts,
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(ChartKind::Weekly),
            "daily" => Ok(ChartKind::Daily),
            "shorts" => Ok(ChartKind::Shorts),
            other => Err(format!("unknown chart '{}'", other)),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_decodes_backend_entity() {
        let json = r#"{
            "id": 7,
            "channelId": "UC123",
            "videoId": "abc123",
            "title": "Idol",
            "vtuberName": "Suisei",
            "publishedAt": "2024-03-01T12:30:00",
            "viewCount": 123456,
            "classification": "video",
            "lastWeekViewCount": 100
        }"#;

        let song: Song = serde_json::from_str(json).unwrap();
        assert_eq!(song.id, 7);
        assert_eq!(song.vtuber_name, "Suisei");
        assert_eq!(song.view_count, 123456);
        assert!(song.published_at.is_some());
        assert_eq!(song.thumbnail_url(), "https://img.youtube.com/vi/abc123/0.jpg");
        assert_eq!(song.embed_url(), "https://www.youtube.com/embed/abc123");
    }

    #[test]
    fn test_song_tolerates_null_view_count() {
        let song: Song =
            serde_json::from_str(r#"{"id": 1, "videoId": "x", "viewCount": null}"#).unwrap();
        assert_eq!(song.view_count, 0);
        assert!(song.published_at.is_none());
    }

    #[test]
    fn test_main_page_null_sections_become_empty() {
        let json = r#"{"randomSongs": null, "top10WeeklySongs": [{"id": 1}]}"#;
        let data: MainPageData = serde_json::from_str(json).unwrap();

        assert!(data.random_songs.is_empty());
        assert!(data.top9_recent_shorts.is_empty());
        assert_eq!(data.top10_weekly_songs.len(), 1);
    }

    #[test]
    fn test_gender_decoding() {
        let detail: VtuberDetail =
            serde_json::from_str(r#"{"name": "A", "gender": "female", "songCount": 3}"#).unwrap();
        assert_eq!(detail.gender, Gender::Female);

        let detail: VtuberDetail =
            serde_json::from_str(r#"{"name": "B", "gender": null}"#).unwrap();
        assert_eq!(detail.gender, Gender::Mixed);

        let detail: VtuberDetail = serde_json::from_str(r#"{"name": "C"}"#).unwrap();
        assert_eq!(detail.gender, Gender::Mixed);
    }

    #[test]
    fn test_subscribers_accepts_number_or_text() {
        let a: VtuberSummary =
            serde_json::from_str(r#"{"channelId": "a", "subscribers": 1500000}"#).unwrap();
        assert_eq!(a.subscribers.to_string(), "1,500,000");

        let b: VtuberSummary =
            serde_json::from_str(r#"{"channelId": "b", "subscribers": "1.5M"}"#).unwrap();
        assert_eq!(b.subscribers.to_string(), "1.5M");
    }

    #[test]
    fn test_search_params_omit_missing_channel() {
        let params = SearchParams::by_query("abc");
        assert_eq!(params.to_query_pairs(), vec![("query", "abc".to_string())]);

        let params = SearchParams {
            query: None,
            channel_id: Some("UC1".to_string()),
        };
        assert_eq!(
            params.to_query_pairs(),
            vec![("query", String::new()), ("channelId", "UC1".to_string())]
        );
        assert!(!params.is_blank());
        assert!(SearchParams::default().is_blank());
        assert!(SearchParams::by_query("  ").is_blank());
    }

    #[test]
    fn test_gender_filter_parsing() {
        assert_eq!("male".parse::<GenderFilter>(), Ok(GenderFilter::Male));
        assert_eq!(" ALL ".parse::<GenderFilter>(), Ok(GenderFilter::All));
        assert!("other".parse::<GenderFilter>().is_err());
        assert_eq!(GenderFilter::Female.as_query_value(), "female");
    }
}
