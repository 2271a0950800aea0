use crate::{
    domain::{DisplayRegion, RequestToken, Tile},
    models::GifRecord,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, PoisonError, RwLock,
};
use tracing::debug;

// Stable element ids of the host page.
pub const TRENDING_WRAPPER_ID: &str = "trending-gifs";
pub const TRENDING_REGION_ID: &str = "trending-results";
pub const SEARCH_REGION_ID: &str = "gif-results";

#[derive(Debug, Default)]
struct RegionState {
    tiles: Vec<Tile>,
    newest_token: u64,
}

/// In-memory display region. Clones share the same contents.
#[derive(Debug, Clone)]
pub struct TileRegion {
    id: &'static str,
    state: Arc<RwLock<RegionState>>,
}

impl TileRegion {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            state: Arc::new(RwLock::new(RegionState::default())),
        }
    }
}

impl DisplayRegion for TileRegion {
    fn name(&self) -> &str {
        self.id
    }

    fn tiles(&self) -> Vec<Tile> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .tiles
            .clone()
    }

    fn replace_tiles(&self, tiles: Vec<Tile>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.tiles = tiles;
    }

    fn issue_token(&self) -> RequestToken {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.newest_token += 1;
        RequestToken(state.newest_token)
    }

    fn replace_tiles_if_current(&self, token: RequestToken, tiles: Vec<Tile>) -> bool {
        // Check and swap under one lock so a newer render cannot slip in between.
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if token.0 != state.newest_token {
            return false;
        }
        state.tiles = tiles;
        true
    }
}

/// A container that can be hidden, such as the wrapper around trending results.
#[derive(Debug, Clone)]
pub struct Wrapper {
    id: &'static str,
    hidden: Arc<AtomicBool>,
}

impl Wrapper {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            hidden: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn hide(&self) {
        self.hidden.store(true, Ordering::SeqCst);
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.load(Ordering::SeqCst)
    }
}

/// Handles to everything the triggers touch on one page.
#[derive(Debug, Clone)]
pub struct Page {
    pub trending_wrapper: Wrapper,
    pub trending: TileRegion,
    pub search: TileRegion,
}

impl Page {
    pub fn new() -> Self {
        Self {
            trending_wrapper: Wrapper::new(TRENDING_WRAPPER_ID),
            trending: TileRegion::new(TRENDING_REGION_ID),
            search: TileRegion::new(SEARCH_REGION_ID),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

fn tiles_for(results: &[GifRecord]) -> Vec<Tile> {
    results.iter().map(Tile::from_record).collect()
}

/// Replaces the contents of `target` with one tile per record, in order.
pub fn render_gifs(results: &[GifRecord], target: &dyn DisplayRegion) {
    debug!(region = target.name(), count = results.len(), "Rendering GIFs");
    target.replace_tiles(tiles_for(results));
}

/// Renders only if `token` is still the newest fetch issued for `target`.
pub fn render_gifs_if_current(
    results: &[GifRecord],
    target: &dyn DisplayRegion,
    token: RequestToken,
) -> bool {
    let applied = target.replace_tiles_if_current(token, tiles_for(results));
    if applied {
        debug!(region = target.name(), count = results.len(), "Rendering GIFs");
    }
    applied
}
