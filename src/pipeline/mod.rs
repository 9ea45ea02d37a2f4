//! Pipeline stages for title-to-image generation.
//!
//! Each submodule implements one transformation step. The first two stages
//! are pure functions over text; only `select` and `fetch` touch the
//! network, and only `compose` touches pixels.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ plan ──▶ select ──▶ fetch ──▶ compose ──▶ encode
//! (title)    (slots)  (search)   (bytes)   (canvas)    (JPEG)
//! ```
//!
//! 1. [`extract`]: tag the title into people, locations, objects, general terms
//! 2. [`plan`]:    map those terms onto main / secondary / background queries
//! 3. [`select`]:  one photo search per slot, plus the background fallback
//! 4. [`fetch`]:   download the chosen photos; failures drop the slot
//! 5. [`compose`]: pick a mode, darken the base photo, draw the caption band;
//!    layout math lives in [`caption`]
//! 6. [`encode`]:  JPEG-encode the finished canvas

pub mod caption;
pub mod compose;
pub mod encode;
pub mod extract;
pub mod fetch;
pub mod plan;
pub mod select;
