//! One processing view: the photo being edited and what is on screen.
//!
//! A [`Session`] keeps three images:
//!
//! | Field | Set by | Changed by filtering |
//! |---|---|---|
//! | `original` | [`load`](Session::load) | never |
//! | `source` | [`load`](Session::load), shrunk to the working size | never |
//! | `derived` | [`apply`](Session::apply), [`apply_effect`](Session::apply_effect) | replaced |
//!
//! Filter selections are always re-run from `source`, so moving a slider back
//! undoes its effect. [`revert`](Session::revert) drops `derived` and hands
//! back the original untouched.

use crate::imaging::{self, CodecError, Effect, FilterSet, Image};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Default)]
pub struct Session {
    original: Option<Image>,
    source: Option<Image>,
    derived: Option<Image>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing `image`. `working_size` bounds the filtered copy;
    /// `None` filters at full resolution.
    pub fn load(&mut self, image: Image, working_size: Option<(u32, u32)>) {
        let source = imaging::working_copy(&image, working_size);
        debug!(
            original = ?image.dimensions(),
            working = ?source.dimensions(),
            "session loaded"
        );
        self.source = Some(source);
        self.original = Some(image);
        self.derived = None;
    }

    /// Decode `path` and [`load`](Self::load) it. The session is untouched on error.
    pub fn load_file(
        &mut self,
        path: &Path,
        working_size: Option<(u32, u32)>,
    ) -> Result<(), CodecError> {
        let image = imaging::decode(path)?;
        self.load(image, working_size);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.original.is_some()
    }

    pub fn original(&self) -> Option<&Image> {
        self.original.as_ref()
    }

    pub fn source(&self) -> Option<&Image> {
        self.source.as_ref()
    }

    /// What the view shows: the last derived image, else the source.
    pub fn displayed(&self) -> Option<&Image> {
        self.derived.as_ref().or(self.source.as_ref())
    }

    /// Re-run `specs` over the source and show the result.
    pub fn apply(&mut self, specs: &FilterSet) -> Option<&Image> {
        self.derived = imaging::apply(self.source.as_ref(), specs);
        self.derived.as_ref()
    }

    /// Transform whatever is displayed with a one-shot effect.
    pub fn apply_effect(&mut self, effect: Effect) -> Option<&Image> {
        let next = effect.apply(self.displayed()?);
        debug!(?effect, "effect applied");
        self.derived = Some(next);
        self.derived.as_ref()
    }

    /// Forget every filter and effect and return the image as first loaded.
    pub fn revert(&mut self) -> Option<&Image> {
        self.derived = None;
        self.original.as_ref()
    }
}
