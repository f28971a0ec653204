//! OS input injection via the `enigo` crate.
//!
//! `enigo` wraps the native synthetic-input APIs (SendInput on Windows,
//! XTest/uinput on Linux, CoreGraphics on macOS) behind one portable
//! interface, which covers every primitive the executor needs: absolute
//! pointer moves, button press/release, key press/release, and the current
//! pointer position query.
//!
//! All `enigo` calls require `&mut self`, so the handle lives behind a
//! `Mutex`. Contention is not a concern: the relay processes one command at
//! a time by design.
//!
//! Operators should keep the OS-level emergency stop in mind: yanking the
//! pointer into a screen corner aborts pending synthetic input on platforms
//! that support it. That convention belongs to the OS layer, not to this
//! adapter.

use std::sync::Mutex;

use enigo::{Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};

use crate::application::execute::{InjectionError, InputInjector};
use relay_core::{ArrowKey, ClickKind};

fn platform_err(e: impl std::fmt::Display) -> InjectionError {
    InjectionError::Platform(e.to_string())
}

fn arrow_to_key(key: ArrowKey) -> Key {
    match key {
        ArrowKey::Up => Key::UpArrow,
        ArrowKey::Down => Key::DownArrow,
        ArrowKey::Left => Key::LeftArrow,
        ArrowKey::Right => Key::RightArrow,
    }
}

fn click_to_button(kind: ClickKind) -> Button {
    match kind {
        ClickKind::Left => Button::Left,
        ClickKind::Right => Button::Right,
    }
}

/// Real input injector backed by `enigo`.
pub struct EnigoInjector {
    enigo: Mutex<Enigo>,
}

impl EnigoInjector {
    /// Opens a connection to the OS input system.
    ///
    /// # Errors
    ///
    /// Fails when the platform input API is unavailable, e.g. no X11/Wayland
    /// session on Linux or missing accessibility permission on macOS.
    pub fn new() -> Result<Self, InjectionError> {
        let enigo = Enigo::new(&Settings::default()).map_err(platform_err)?;
        Ok(Self {
            enigo: Mutex::new(enigo),
        })
    }

    fn with_enigo<T>(
        &self,
        f: impl FnOnce(&mut Enigo) -> Result<T, InjectionError>,
    ) -> Result<T, InjectionError> {
        let mut guard = self.enigo.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

impl InputInjector for EnigoInjector {
    fn pointer_position(&self) -> Result<(i32, i32), InjectionError> {
        self.with_enigo(|e| e.location().map_err(platform_err))
    }

    fn move_to(&self, x: i32, y: i32) -> Result<(), InjectionError> {
        self.with_enigo(|e| e.move_mouse(x, y, Coordinate::Abs).map_err(platform_err))
    }

    fn click(&self, kind: ClickKind) -> Result<(), InjectionError> {
        self.with_enigo(|e| {
            e.button(click_to_button(kind), Direction::Click)
                .map_err(platform_err)
        })
    }

    fn button_down(&self, kind: ClickKind) -> Result<(), InjectionError> {
        self.with_enigo(|e| {
            e.button(click_to_button(kind), Direction::Press)
                .map_err(platform_err)
        })
    }

    fn button_up(&self, kind: ClickKind) -> Result<(), InjectionError> {
        self.with_enigo(|e| {
            e.button(click_to_button(kind), Direction::Release)
                .map_err(platform_err)
        })
    }

    fn press_key(&self, key: ArrowKey) -> Result<(), InjectionError> {
        self.with_enigo(|e| e.key(arrow_to_key(key), Direction::Press).map_err(platform_err))
    }

    fn release_key(&self, key: ArrowKey) -> Result<(), InjectionError> {
        self.with_enigo(|e| {
            e.key(arrow_to_key(key), Direction::Release)
                .map_err(platform_err)
        })
    }
}
