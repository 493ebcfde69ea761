//! Route segment parsing.
//!
//! Routes carry their output format as a file suffix: `/bills.json`,
//! `/bills/search.xml`.

use crate::error::{RestError, RestResult};
use crate::responses::ResponseFormat;

/// The action segment of the searchable path.
const SEARCH_ACTION: &str = "search";

/// A collection and output format parsed from the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
    /// The plural collection name (`bills`).
    pub collection: String,
    /// The output format.
    pub format: ResponseFormat,
}

impl RouteTarget {
    /// Parses a queryable segment such as `bills.json`.
    ///
    /// A segment without a suffix is not a route (404); a suffix other than
    /// `json` or `xml` is an unsupported format (415).
    pub fn queryable(segment: &str) -> RestResult<Self> {
        let (collection, format) = split_format(segment)?;
        Ok(Self {
            collection: collection.to_string(),
            format,
        })
    }

    /// Parses the segments of a searchable path such as `bills` + `search.json`.
    pub fn searchable(collection: &str, action: &str) -> RestResult<Self> {
        let (name, format) = split_format(action).map_err(|err| match err {
            RestError::NotFound { .. } => not_found(collection, action),
            other => other,
        })?;
        if name != SEARCH_ACTION || collection.is_empty() {
            return Err(not_found(collection, action));
        }
        Ok(Self {
            collection: collection.to_string(),
            format,
        })
    }
}

/// Best-effort format for reporting an error on a malformed route.
///
/// Falls back to JSON when the suffix is missing or unknown.
pub fn fallback_format(segment: &str) -> ResponseFormat {
    segment
        .rsplit_once('.')
        .and_then(|(_, ext)| ResponseFormat::from_extension(ext))
        .unwrap_or_default()
}

fn split_format(segment: &str) -> RestResult<(&str, ResponseFormat)> {
    let Some((stem, ext)) = segment.rsplit_once('.') else {
        return Err(RestError::NotFound {
            path: format!("/{}", segment),
        });
    };
    if stem.is_empty() {
        return Err(RestError::NotFound {
            path: format!("/{}", segment),
        });
    }
    let format = ResponseFormat::from_extension(ext).ok_or_else(|| RestError::UnsupportedFormat {
        format: ext.to_string(),
    })?;
    Ok((stem, format))
}

fn not_found(collection: &str, action: &str) -> RestError {
    RestError::NotFound {
        path: format!("/{}/{}", collection, action),
    }
}
