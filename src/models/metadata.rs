/// Video information returned by the external metadata source, already
/// normalized to the catalog's formats (`M:SS` runtime, `YYYY-MM-DD` date).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub runtime: Option<String>,
    pub publish_date: Option<String>,
    pub thumbnail_url: Option<String>,
}
