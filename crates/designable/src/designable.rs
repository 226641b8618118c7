#![forbid(unsafe_code)]

//! Consumer side of the registry: objects that apply an appearance to
//! themselves.
//!
//! Implement [`Designable`] with the exact sub-appearance the object cares
//! about. The registry stores every consumer behind the object-safe
//! [`DesignableProtocol`], which every `Designable` gets for free.
//!
//! ```
//! use std::cell::Cell;
//! use designable::Designable;
//!
//! struct BadgeAppearance {
//!     tint: u32,
//! }
//!
//! #[derive(Default)]
//! struct Badge {
//!     tint: Cell<u32>,
//! }
//!
//! impl Designable for Badge {
//!     type Appearance = BadgeAppearance;
//!
//!     fn design(&self, appearance: &BadgeAppearance) {
//!         self.tint.set(appearance.tint);
//!     }
//! }
//! ```

use std::any::Any;

/// An object that can be styled with one specific sub-appearance.
///
/// `design` takes `&self`: consumers are shared UI objects (held in `Rc`)
/// and keep their styled state in `Cell`/`RefCell`.
pub trait Designable: 'static {
    /// The sub-appearance this object is styled with.
    type Appearance: 'static;

    /// Apply `appearance` to this object.
    fn design(&self, appearance: &Self::Appearance);
}

/// Type-erased entry point used by the registry.
pub trait DesignableProtocol {
    /// Apply `appearance` if it is of the type this object expects;
    /// otherwise do nothing.
    fn design_any(&self, appearance: &dyn Any);
}

impl<D: Designable> DesignableProtocol for D {
    fn design_any(&self, appearance: &dyn Any) {
        if let Some(appearance) = appearance.downcast_ref::<D::Appearance>() {
            self.design(appearance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    struct LabelAppearance {
        color: &'static str,
    }

    #[derive(Default)]
    struct Label {
        applied: RefCell<Vec<&'static str>>,
    }

    impl Designable for Label {
        type Appearance = LabelAppearance;

        fn design(&self, appearance: &LabelAppearance) {
            self.applied.borrow_mut().push(appearance.color);
        }
    }

    #[test]
    fn matching_payload_is_applied() {
        let label = Label::default();
        label.design_any(&LabelAppearance { color: "#252525" });
        assert_eq!(*label.applied.borrow(), vec!["#252525"]);
    }

    #[test]
    fn mismatched_payload_is_ignored() {
        let label = Label::default();
        label.design_any(&"#252525");
        label.design_any(&42_u32);
        assert!(label.applied.borrow().is_empty());
    }

    #[test]
    fn works_through_trait_object() {
        let label = std::rc::Rc::new(Label::default());
        let erased: std::rc::Rc<dyn DesignableProtocol> = label.clone();
        erased.design_any(&LabelAppearance { color: "#F8F5F1" });
        assert_eq!(*label.applied.borrow(), vec!["#F8F5F1"]);
    }
}
