use crate::errors::FetchError;
use crate::models::{GifRecord, GifResultSet};
use async_trait::async_trait;
use serde::Serialize;

/// Display height of every tile, in pixels.
pub const TILE_HEIGHT_PX: u32 = 200;

/// What the user asked for: nothing (trending) or a trimmed search term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery(Option<String>);

/// Which endpoint a query resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode<'a> {
    Trending,
    Search(&'a str),
}

impl SearchQuery {
    pub fn trending() -> Self {
        Self(None)
    }

    /// Trims the raw input; empty or whitespace-only input means trending.
    pub fn parse(raw: Option<&str>) -> Self {
        let term = raw.map(str::trim).filter(|t| !t.is_empty()).map(str::to_owned);
        Self(term)
    }

    pub fn term(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn mode(&self) -> FetchMode<'_> {
        match self.term() {
            Some(term) => FetchMode::Search(term),
            None => FetchMode::Trending,
        }
    }
}

impl FetchMode<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            FetchMode::Trending => "trending",
            FetchMode::Search(_) => "search",
        }
    }
}

/// One rendered thumbnail inside a display region.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub src: String,
    pub alt: String,
    pub height: u32,
}

impl Tile {
    pub fn from_record(record: &GifRecord) -> Self {
        Self {
            src: record.fixed_height_url().to_owned(),
            alt: record.title.clone(),
            height: TILE_HEIGHT_PX,
        }
    }
}

/// Identifies the newest fetch issued for a region. Later tokens compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(pub u64);

/// Trait for anything that queries the GIF service.
#[async_trait]
pub trait GifSource: Send + Sync + 'static { // Send+Sync+'static required for Arc<dyn>
    /// Issues exactly one request for the given query and returns the `data`
    /// array of the response.
    async fn fetch(&self, query: &SearchQuery) -> Result<GifResultSet, FetchError>;
}

/// A surface holding zero or more tiles.
pub trait DisplayRegion: Send + Sync {
    fn name(&self) -> &str;

    /// Current tiles, in display order.
    fn tiles(&self) -> Vec<Tile>;

    /// Drops all current tiles and shows `tiles` instead.
    fn replace_tiles(&self, tiles: Vec<Tile>);

    /// Hands out the token for a new fetch targeting this region.
    fn issue_token(&self) -> RequestToken;

    /// Like [`replace_tiles`](Self::replace_tiles), but only while `token` is
    /// still the newest issued. Returns whether the tiles were applied.
    fn replace_tiles_if_current(&self, token: RequestToken, tiles: Vec<Tile>) -> bool;
}
