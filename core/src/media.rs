//! Photo URL resolution.
//!
//! Photo fields come in three shapes: an absolute URL, a path from the site
//! root (`/photos/x.jpg`), or a bare filename (`x.jpg`) that lives in the
//! kind's photo directory on the media host. Each resolved image also
//! carries the placeholder to swap in if it fails to load.

use crate::config::ClientConfig;
use crate::types::parse_datetime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Product,
    Shop,
    Activity,
}

impl MediaKind {
    fn directory(self) -> &'static str {
        match self {
            MediaKind::Product | MediaKind::Shop => "photos",
            MediaKind::Activity => "photos/activities",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            MediaKind::Product | MediaKind::Activity => "/assets/default-food.jpg",
            MediaKind::Shop => "/assets/default-store.jpg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    pub src: String,
    pub fallback: &'static str,
}

impl ImageSource {
    /// Swap to the placeholder after a load failure.
    pub fn on_error(&mut self) {
        self.src = self.fallback.to_string();
    }

    pub fn is_placeholder(&self) -> bool {
        self.src == self.fallback
    }
}

#[derive(Debug, Clone)]
pub struct MediaResolver {
    host: String,
}

impl MediaResolver {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.media_host)
    }

    pub fn resolve(&self, photo: Option<&str>, kind: MediaKind) -> ImageSource {
        let fallback = kind.placeholder();
        let src = match photo.map(str::trim).filter(|p| !p.is_empty()) {
            None => fallback.to_string(),
            Some(p) if p.starts_with("http://") || p.starts_with("https://") => p.to_string(),
            Some(p) if p.starts_with('/') => format!("{}{p}", self.host),
            Some(p) => format!("{}/{}/{p}", self.host, kind.directory()),
        };
        ImageSource { src, fallback }
    }

    /// Like [`MediaResolver::resolve`], with `?v=<updated millis>` appended
    /// so an edited photo is not served from a stale cache.
    pub fn resolve_versioned(
        &self,
        photo: Option<&str>,
        kind: MediaKind,
        updated_at: Option<&str>,
    ) -> ImageSource {
        let mut image = self.resolve(photo, kind);
        if image.is_placeholder() {
            return image;
        }
        if let Some(updated) = updated_at.and_then(parse_datetime) {
            let sep = if image.src.contains('?') { '&' } else { '?' };
            image.src = format!("{}{sep}v={}", image.src, updated.timestamp_millis());
        }
        image
    }
}
