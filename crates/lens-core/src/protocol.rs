//! Presentation boundary message protocol
//!
//! The selector client script runs inside a sandboxed frame and talks
//! to the embedding page with `postMessage`. These types pin down the
//! wire shapes on both directions so the two sides cannot drift.

use serde::{Deserialize, Serialize};

/// Element picked by the user inside the proxied frame
///
/// Produced once per click and consumed once by the presentation
/// layer; the engine never stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedElement {
    /// Computed CSS selector for the element
    pub selector: String,

    /// Trimmed text content
    pub text: String,

    /// Outer HTML of the element
    pub html: String,

    /// Lowercase tag name
    #[serde(rename = "tagName")]
    pub tag_name: String,
}

/// Messages emitted from the frame to the embedding page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    #[serde(rename = "ELEMENT_SELECTED")]
    ElementSelected { data: SelectedElement },
}

/// Commands sent from the embedding page into the frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InboundMessage {
    /// Show the highlight overlay on the first match of `selector`
    #[serde(rename = "HIGHLIGHT_SELECTOR")]
    HighlightSelector { selector: String },

    /// Hide the highlight overlay
    #[serde(rename = "CLEAR_HIGHLIGHT")]
    ClearHighlight,
}
