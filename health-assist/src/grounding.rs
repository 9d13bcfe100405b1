//! Grounding citations returned alongside a provider search.
//!
//! The remote service reports each retrieved source as a loosely shaped
//! "grounding chunk". Chunks are resolved into [`Citation`] once, when the
//! response is parsed; nothing downstream touches raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::wire::{GroundingChunk, MapsChunk, WebChunk};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WebCitation {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaceCitation {
    pub uri: Option<String>,
    pub title: Option<String>,
    pub place_id: Option<String>,
    pub review_snippets: Vec<String>,
}

/// A source cited by a grounded response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Citation {
    Web(WebCitation),
    Place(PlaceCitation),
    /// Neither a web nor a maps source; kept for diagnostics only
    Unknown { raw: Value },
}

/// A citation that carries everything needed to render a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayCitation {
    pub uri: String,
    pub title: String,
    pub snippet: Option<String>,
    pub is_place: bool,
}

impl Citation {
    pub fn uri(&self) -> Option<&str> {
        match self {
            Citation::Web(web) => web.uri.as_deref(),
            Citation::Place(place) => place.uri.as_deref(),
            Citation::Unknown { .. } => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Citation::Web(web) => web.title.as_deref(),
            Citation::Place(place) => place.title.as_deref(),
            Citation::Unknown { .. } => None,
        }
    }

    /// `Some` only when both uri and title are present and non-empty
    pub fn to_display(&self) -> Option<DisplayCitation> {
        let uri = non_empty(self.uri())?;
        let title = non_empty(self.title())?;
        let (snippet, is_place) = match self {
            Citation::Place(place) => (place.review_snippets.first().cloned(), true),
            _ => (None, false),
        };
        Some(DisplayCitation {
            uri: uri.to_string(),
            title: title.to_string(),
            snippet,
            is_place,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Keep the displayable citations, in order
pub fn displayable_citations(citations: &[Citation]) -> Vec<DisplayCitation> {
    citations.iter().filter_map(Citation::to_display).collect()
}

impl From<WebChunk> for WebCitation {
    fn from(chunk: WebChunk) -> Self {
        Self {
            uri: chunk.uri,
            title: chunk.title,
        }
    }
}

impl From<MapsChunk> for PlaceCitation {
    fn from(chunk: MapsChunk) -> Self {
        let review_snippets = chunk
            .place_answer_sources
            .map(|sources| {
                sources
                    .review_snippets
                    .into_iter()
                    .filter_map(|review| review.snippet)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            uri: chunk.uri,
            title: chunk.title,
            place_id: chunk.place_id,
            review_snippets,
        }
    }
}

/// First value that is present and not blank
fn first_present(preferred: Option<String>, fallback: Option<String>) -> Option<String> {
    preferred
        .filter(|v| !v.trim().is_empty())
        .or(fallback)
}

impl From<GroundingChunk> for Citation {
    fn from(chunk: GroundingChunk) -> Self {
        match (chunk.web, chunk.maps) {
            // Both halves present: merge per field, web values first.
            (Some(web), Some(maps)) => {
                let place = PlaceCitation::from(maps);
                Citation::Place(PlaceCitation {
                    uri: first_present(web.uri, place.uri),
                    title: first_present(web.title, place.title),
                    ..place
                })
            }
            (Some(web), None) => Citation::Web(web.into()),
            (None, Some(maps)) => Citation::Place(maps.into()),
            (None, None) => Citation::Unknown {
                raw: Value::Object(chunk.other),
            },
        }
    }
}
