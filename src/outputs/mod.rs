//! Output writers for generated digests.
//!
//! - [`json`]: Writes the digest the page loader fetches
//!
//! # Output Structure
//!
//! ```text
//! <site root>/
//! ├── index.html                       # host page (not generated)
//! └── data/
//!     └── paymentsdive-newsletter.json
//! ```

pub mod json;
