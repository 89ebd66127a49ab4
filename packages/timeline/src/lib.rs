#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Location-history ingestion.
//!
//! Turns raw export documents into [`ExtractedPoint`]s: documents are split
//! into [`TimelineEvent`] records ([`document`]), each record yields at most
//! one point ([`extract`]), and `geo:` URIs are parsed by a dedicated
//! parser ([`geo_uri`]). Timestamps are converted to calendar days by
//! [`day`].

pub mod day;
pub mod document;
pub mod extract;
pub mod geo_uri;

pub use day::parse_day_key;
pub use document::{DocumentError, ParsedDocument, parse_document};
pub use extract::extract;
pub use geo_uri::{GeoCoordinate, GeoUriError, parse_geo_uri};
pub use residency_timeline_models::{ExtractedPoint, TimelineEvent};
