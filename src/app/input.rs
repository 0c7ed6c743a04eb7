//! Winit key translation
//!
//! Maps physical keys to [`MotionKey`]s. Everything not bound is ignored.

use rustc_hash::FxHashMap;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::motion::MotionKey;

/// Physical key to motion key table.
///
/// The default layout is W/S/A/D for Forward/Backward/Left/Right and Space
/// for Jump.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: FxHashMap<KeyCode, MotionKey>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings
            .bind(KeyCode::KeyW, MotionKey::Forward)
            .bind(KeyCode::KeyS, MotionKey::Backward)
            .bind(KeyCode::KeyA, MotionKey::Left)
            .bind(KeyCode::KeyD, MotionKey::Right)
            .bind(KeyCode::Space, MotionKey::Jump);
        bindings
    }
}

impl KeyBindings {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    /// Binds `code` to `key`, replacing any previous binding of `code`.
    pub fn bind(&mut self, code: KeyCode, key: MotionKey) -> &mut Self {
        self.map.insert(code, key);
        self
    }

    #[must_use]
    pub fn lookup(&self, code: KeyCode) -> Option<MotionKey> {
        self.map.get(&code).copied()
    }

    #[must_use]
    pub fn translate_key(&self, physical_key: PhysicalKey) -> Option<MotionKey> {
        let PhysicalKey::Code(code) = physical_key else {
            return None;
        };
        self.lookup(code)
    }

    /// Translates a keyboard event into a key transition. OS auto-repeat
    /// events yield `None`.
    #[must_use]
    pub fn translate_event(&self, event: &KeyEvent) -> Option<(MotionKey, bool)> {
        if event.repeat {
            return None;
        }
        let key = self.translate_key(event.physical_key)?;
        Some((key, event.state == ElementState::Pressed))
    }
}
