#![forbid(unsafe_code)]

//! Appearance type: the discriminant selecting which variant is active.
//!
//! Applications usually model it as a fieldless enum:
//!
//! ```
//! use designable::{AppearanceType, ImageRef};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
//! #[serde(rename_all = "lowercase")]
//! enum Theme {
//!     Light,
//!     Dark,
//! }
//!
//! impl AppearanceType for Theme {
//!     fn name(&self) -> Option<&str> {
//!         Some(match self {
//!             Theme::Light => "Light",
//!             Theme::Dark => "Dark",
//!         })
//!     }
//!
//!     fn image(&self) -> Option<ImageRef> {
//!         Some(ImageRef::new(match self {
//!             Theme::Light => "settings/appearance/light",
//!             Theme::Dark => "settings/appearance/dark",
//!         }))
//!     }
//! }
//!
//! assert_eq!(Theme::Dark.name(), Some("Dark"));
//! ```

use std::borrow::Cow;
use std::fmt;

/// Reference to an image asset describing an appearance type.
///
/// The registry never loads the asset; it only carries the identifier for
/// UI components that list every available appearance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(Cow<'static, str>);

impl ImageRef {
    pub fn new(asset: impl Into<Cow<'static, str>>) -> Self {
        Self(asset.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminant of a named appearance variant (light, dark, graphite, ...).
///
/// Equality decides whether two values name the same variant. Persistence
/// goes through an [`AppearanceCodec`](crate::codec::AppearanceCodec); the
/// default [`JsonCodec`](crate::codec::JsonCodec) additionally requires
/// `serde::Serialize + serde::de::DeserializeOwned`.
pub trait AppearanceType: Clone + PartialEq + fmt::Debug + 'static {
    /// Human readable name for pickers listing every appearance.
    /// Default is `None`.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Preview image for pickers listing every appearance.
    /// Default is `None`.
    fn image(&self) -> Option<ImageRef> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Plain;

    impl AppearanceType for Plain {}

    #[test]
    fn name_and_image_default_to_none() {
        assert_eq!(Plain.name(), None);
        assert_eq!(Plain.image(), None);
    }

    #[test]
    fn image_ref_accepts_owned_and_static_names() {
        let static_ref = ImageRef::new("appearance/dark");
        let owned_ref = ImageRef::new(String::from("appearance/dark"));
        assert_eq!(static_ref, owned_ref);
        assert_eq!(static_ref.to_string(), "appearance/dark");
    }
}
