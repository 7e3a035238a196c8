//! Scripted drawable for dimension tracker tests.

use common::types::Dimension;
use gallery_renderer::dimension::Drawable;
use gallery_renderer::errors::SurfaceError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Drawable with a settable layout size that records pixel assignments.
#[derive(Debug)]
pub struct ScriptedDrawable {
    size: Mutex<Dimension>,
    assigned: Mutex<Vec<Dimension>>,
    offscreen: AtomicBool,
}

impl ScriptedDrawable {
    /// Drawable whose layout box measures `size`.
    #[must_use]
    pub fn new(size: Dimension) -> Arc<Self> {
        Arc::new(Self {
            size: Mutex::new(size),
            assigned: Mutex::new(Vec::new()),
            offscreen: AtomicBool::new(false),
        })
    }

    /// Drawable already handed to the engine; pixel assignment fails.
    #[must_use]
    pub fn offscreen(size: Dimension) -> Arc<Self> {
        let drawable = Self::new(size);
        drawable.offscreen.store(true, Ordering::SeqCst);
        drawable
    }

    /// Change what `measure` returns.
    pub fn set_size(&self, size: Dimension) {
        *self.size.lock().unwrap() = size;
    }

    /// Successful pixel size assignments, in order.
    pub fn assigned(&self) -> Vec<Dimension> {
        self.assigned.lock().unwrap().clone()
    }
}

impl Drawable for ScriptedDrawable {
    fn measure(&self) -> Dimension {
        *self.size.lock().unwrap()
    }

    fn set_pixel_size(&self, dimension: Dimension) -> Result<(), SurfaceError> {
        if self.offscreen.load(Ordering::SeqCst) {
            return Err(SurfaceError::Unsupported(
                "drawable transferred offscreen".to_string(),
            ));
        }
        self.assigned.lock().unwrap().push(dimension);
        Ok(())
    }
}
