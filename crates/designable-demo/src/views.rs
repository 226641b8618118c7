#![forbid(unsafe_code)]

//! Views of the reference application.
//!
//! Both views keep their styled state in `Cell`s and register themselves
//! with the shared designer the way a UI toolkit view would: the custom
//! view on construction, the view controller when it is about to appear.

use std::cell::Cell;
use std::rc::Rc;

use clap::ValueEnum;
use designable::{DesignManipulator, Designable, Designer};
use tracing::debug;

use crate::appearance::{AppAppearanceType, Appearance, CustomViewAppearance, Rgb, ViewControllerAppearance};

/// Designer type shared by every view of the application.
pub type AppDesigner = Designer<AppAppearanceType, Appearance>;

/// Platform light/dark setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SystemStyle {
    Light,
    Dark,
}

#[derive(Debug, Default)]
pub struct CustomView {
    background_color: Cell<Option<Rgb>>,
}

impl CustomView {
    /// Create the view and register it for its appearance.
    pub fn new(designer: &AppDesigner) -> Rc<Self> {
        let view = Rc::new(Self::default());
        designer.add(&view, |appearance: &Appearance| appearance.custom_view);
        view
    }

    /// Last applied background, `None` before the first design pass.
    #[must_use]
    pub fn background_color(&self) -> Option<Rgb> {
        self.background_color.get()
    }
}

impl Designable for CustomView {
    type Appearance = CustomViewAppearance;

    fn design(&self, appearance: &CustomViewAppearance) {
        self.background_color.set(Some(appearance.background_color));
    }
}

/// Root screen: a background and one [`CustomView`].
#[derive(Debug)]
pub struct ViewController {
    designer: AppDesigner,
    custom_view: Rc<CustomView>,
    background_color: Cell<Option<Rgb>>,
}

impl ViewController {
    pub fn new(designer: AppDesigner) -> Rc<Self> {
        let custom_view = CustomView::new(&designer);
        Rc::new(Self {
            designer,
            custom_view,
            background_color: Cell::new(None),
        })
    }

    pub fn view_will_appear(self: &Rc<Self>) {
        self.designer
            .add(self, |appearance: &Appearance| appearance.view_controller);
    }

    /// Tapping the custom view switches to graphite.
    pub fn custom_view_tapped(&self) {
        self.designer.set(AppAppearanceType::Graphite);
    }

    /// Follow the platform setting unless the designer opted out.
    pub fn system_style_changed(&self, style: SystemStyle) {
        if !self.designer.is_system_appearance_enabled() {
            debug!(?style, "system appearance disabled, ignoring style change");
            return;
        }
        let kind = match style {
            SystemStyle::Dark => AppAppearanceType::Dark,
            SystemStyle::Light => AppAppearanceType::Light,
        };
        self.designer.set(kind);
    }

    #[must_use]
    pub fn background_color(&self) -> Option<Rgb> {
        self.background_color.get()
    }

    #[must_use]
    pub fn custom_view(&self) -> &Rc<CustomView> {
        &self.custom_view
    }
}

impl Designable for ViewController {
    type Appearance = ViewControllerAppearance;

    fn design(&self, appearance: &ViewControllerAppearance) {
        self.background_color.set(Some(appearance.background_color));
    }
}
