//! New Year Wish core crate.
//!
//! A decorative single-page "Happy New Year" greeting compiled to wasm:
//! animated canvas background, countdown to the next calendar new year,
//! typewriter wish message, confetti celebration button and recipient
//! personalization via the `for` URL parameter. `start_greeting()` mounts
//! the whole page; `stop_greeting()` tears the session down again.

use wasm_bindgen::prelude::*;

pub mod countdown;
pub mod effects;
mod page;
pub mod share;
mod timer;
pub mod typewriter;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Shared text datasets (rotated by the page sections)
// -----------------------------------------------------------------------------

/// Rotating hero quotes (4 s cadence).
pub const POWER_QUOTES: &[&str] = &[
    "New Year. New Beginnings.",
    "The best chapters are yet to be written.",
    "Every ending makes space for a brighter beginning.",
    "Dream big. Start fresh. Shine bright.",
    "This is your year to bloom.",
];

/// Rotating lines under the countdown (5 s cadence).
pub const MOTIVATIONAL_LINES: &[&str] = &[
    "Every second brings a new opportunity.",
    "Let go of yesterday, welcome tomorrow.",
    "This is your time to begin again.",
    "The countdown to your best year yet.",
    "New beginnings are just moments away.",
];

/// Cycled by the celebration button, one step per click.
pub const CELEBRATION_MESSAGES: &[&str] = &[
    "Cheers to the people who make every year special.",
    "Here's to happiness and bright futures.",
    "Let's celebrate new beginnings.",
    "Wishing you joy all year long.",
    "May your days be filled with wonder.",
];

/// Static bullet list inside the message card.
pub const ADDITIONAL_QUOTES: &[&str] = &[
    "Progress over perfection.",
    "Small steps today create big wins tomorrow.",
    "Believe in growth, embrace change.",
    "Your potential is limitless.",
    "Every sunrise brings new hope.",
];

pub const TOGETHERNESS_MESSAGES: &[&str] = &[
    "Life feels better when shared with good people.",
    "Connections make every celebration brighter.",
    "Some moments become memories because of the people in them.",
];

pub const GRATITUDE_MESSAGES: &[&str] = &[
    "Thank you for being part of this journey.",
    "Grateful for the lessons, memories, and people of the past year.",
    "With gratitude for what was, and hope for what's coming.",
];

/// Revealed character by character by the typewriter.
pub const WISH_MESSAGE: &str = "May this year bring smiles that last longer, \
dreams that grow stronger, and moments that truly matter.";

// -----------------------------------------------------------------------------
// Unified entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_greeting() -> Result<(), JsValue> {
    page::mount_page()
}

/// Idempotent session teardown: cancels every timer and animation loop and
/// removes the mounted DOM.
#[wasm_bindgen]
pub fn stop_greeting() {
    page::unmount_page();
}

pub(crate) fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
