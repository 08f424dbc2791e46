//! DOM shell of the greeting page. Mounts hero, personalization, countdown,
//! message, togetherness, celebration, gratitude and footer sections as
//! overlay elements, wires the fixed controls (share / mode toggle), and owns
//! every timer of the session inside `PageState`.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Datelike, Local};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement, KeyboardEvent, MouseEvent, window};

use crate::countdown::{CountdownLoop, Remaining};
use crate::effects::{
    BurstOptions, Effects, GOLD_CONFETTI_COLORS, HEART_CONFETTI_COLORS, Mode,
};
use crate::share;
use crate::timer::Interval;
use crate::typewriter::{CURSOR_BLINK_MS, CURSOR_LINGER_MS, TYPE_TICK_MS, Typewriter};
use crate::{
    ADDITIONAL_QUOTES, CELEBRATION_MESSAGES, GRATITUDE_MESSAGES, MOTIVATIONAL_LINES, POWER_QUOTES,
    TOGETHERNESS_MESSAGES, WISH_MESSAGE, performance_now,
};

const HERO_QUOTE_PERIOD_MS: i32 = 4_000;
const MOTIVATION_PERIOD_MS: i32 = 5_000;
/// Midnight volley: side bursts every 150 ms for 5 s.
const VOLLEY_PERIOD_MS: i32 = 150;
const VOLLEY_DURATION_MS: f64 = 5_000.0;
const SHARE_RESET_MS: f64 = 3_000.0;

pub(crate) struct PageState {
    recipient: Option<String>,
    effects: Effects,
    countdown: Option<CountdownLoop>,
    // Quote rotations, typewriter and cursor ticks.
    intervals: Vec<Interval>,
    // Rebuilt on mode switch (cadence differs per mode).
    fireworks_timer: Option<Interval>,
    volley: Option<Interval>,
    volley_end_ms: f64,
    hero_quote_idx: usize,
    motivation_idx: usize,
    celebration_idx: usize,
    celebrate_clicks: u32,
    typewriter: Typewriter,
    typewriter_done_ms: Option<f64>,
    cursor_retired: bool,
    cursor_on: bool,
    share_reset_ms: Option<f64>,
}

thread_local! {
    static PAGE_STATE: RefCell<Option<PageState>> = RefCell::new(None);
}

// --- Mounting -----------------------------------------------------------------

pub(crate) fn mount_page() -> Result<(), JsValue> {
    let already = PAGE_STATE.with(|cell| cell.borrow().is_some());
    if already {
        return Ok(());
    }

    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let now = performance_now();
    let year = Local::now().year() + 1;
    let recipient = win
        .location()
        .search()
        .ok()
        .and_then(|q| share::recipient_from_query(&q));

    let effects = Effects::mount(&doc, Mode::Party, now)?;
    build_dom(&doc, year, recipient.as_deref())?;

    let state = PageState {
        recipient,
        effects,
        countdown: None,
        intervals: Vec::new(),
        fireworks_timer: None,
        volley: None,
        volley_end_ms: 0.0,
        hero_quote_idx: 0,
        motivation_idx: 0,
        celebration_idx: 0,
        celebrate_clicks: 0,
        typewriter: Typewriter::new(WISH_MESSAGE),
        typewriter_done_ms: None,
        cursor_retired: false,
        cursor_on: true,
        share_reset_ms: None,
    };
    PAGE_STATE.with(|cell| cell.replace(Some(state)));

    install_listeners(&doc)?;
    start_session_timers(year)?;
    start_frame_loop();

    web_sys::console::log_1(&format!("new-year-wish: session started, counting to {year}").into());
    Ok(())
}

fn el(
    doc: &Document,
    tag: &str,
    id: &str,
    style: &str,
    text: Option<&str>,
) -> Result<Element, JsValue> {
    let e = doc.create_element(tag)?;
    if !id.is_empty() {
        e.set_id(id);
    }
    if !style.is_empty() {
        e.set_attribute("style", style).ok();
    }
    if let Some(t) = text {
        e.set_text_content(Some(t));
    }
    Ok(e)
}

const CARD_STYLE: &str = "background:rgba(255,255,255,0.06); border:1px solid rgba(251,191,36,0.25); border-radius:18px; padding:24px; margin:18px auto; max-width:720px; backdrop-filter:blur(6px);";
const DIGIT_STYLE: &str = "display:inline-block; min-width:86px; margin:0 8px; padding:18px 10px; background:rgba(255,255,255,0.07); border:1px solid rgba(251,191,36,0.35); border-radius:16px;";
const DIGIT_VALUE_STYLE: &str = "font-size:44px; font-weight:bold; color:#fbbf24; text-shadow:0 0 18px rgba(251,191,36,0.6);";
const LABEL_STYLE: &str = "display:block; margin-top:8px; font-size:12px; letter-spacing:3px; text-transform:uppercase; color:rgba(245,236,215,0.6);";

fn build_dom(doc: &Document, year: i32, recipient: Option<&str>) -> Result<(), JsValue> {
    if doc.get_element_by_id("nyw-root").is_some() {
        return Ok(());
    }
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
    let root = el(
        doc,
        "div",
        "nyw-root",
        "position:relative; z-index:10; font-family:Georgia,'Times New Roman',serif; color:#f5ecd7; text-align:center; max-width:980px; margin:0 auto; padding:48px 16px;",
        None,
    )?;

    // Hero
    {
        let hero = el(doc, "section", "nyw-hero", "padding:40px 0 24px;", None)?;
        hero.append_child(&el(doc, "div", "", "font-size:44px;", Some("🎉 🎊 🎉"))?.into())?;
        hero.append_child(&el(
            doc,
            "h1",
            "nyw-hero-title",
            "font-size:64px; margin:16px 0 4px; color:#fbbf24; text-shadow:0 0 30px rgba(251,191,36,0.7);",
            Some("Happy New Year"),
        )?.into())?;
        hero.append_child(&el(
            doc,
            "div",
            "nyw-hero-year",
            "font-size:88px; font-weight:bold; color:#fbbf24; text-shadow:0 0 40px rgba(251,191,36,0.8);",
            Some(&year.to_string()),
        )?.into())?;
        let greeting_style = if recipient.is_some() {
            "font-size:22px; color:#f472b6; margin:10px 0;"
        } else {
            "font-size:22px; color:#f472b6; margin:10px 0; display:none;"
        };
        hero.append_child(&el(
            doc,
            "p",
            "nyw-hero-greeting",
            greeting_style,
            Some(&greeting_text(recipient.unwrap_or(""))),
        )?.into())?;
        hero.append_child(&el(
            doc,
            "p",
            "",
            "font-size:20px; color:rgba(245,236,215,0.8); max-width:640px; margin:16px auto;",
            Some("Wishing you happiness, success, and meaningful moments in the year ahead."),
        )?.into())?;
        hero.append_child(&el(
            doc,
            "blockquote",
            "nyw-hero-quote",
            "font-style:italic; font-size:20px; margin:24px auto; padding:14px 28px; display:inline-block; background:rgba(255,255,255,0.06); border-radius:16px;",
            Some(&quoted(POWER_QUOTES[0])),
        )?.into())?;
        root.append_child(&hero)?;
    }

    // Personalization
    {
        let card = el(doc, "section", "nyw-personalize", CARD_STYLE, None)?;
        card.append_child(&el(
            doc,
            "p",
            "",
            "margin:0 0 12px; font-weight:bold;",
            Some("✨ Make it Personal ❤"),
        )?.into())?;
        let input = el(
            doc,
            "input",
            "nyw-name-input",
            "padding:12px 16px; width:60%; max-width:320px; border-radius:12px; border:1px solid rgba(251,191,36,0.4); background:rgba(0,0,0,0.35); color:#f5ecd7; font-size:16px;",
            None,
        )?;
        input.set_attribute("type", "text").ok();
        input.set_attribute("placeholder", "Enter a name...").ok();
        card.append_child(&input)?;
        card.append_child(&el(
            doc,
            "p",
            "",
            "margin:10px 0 0; font-size:13px; color:rgba(245,236,215,0.55);",
            Some("Press Enter to personalize this wish"),
        )?.into())?;
        root.append_child(&card)?;
    }

    // Countdown
    {
        let section = el(doc, "section", "nyw-countdown", "padding:32px 0;", None)?;
        section.append_child(&el(
            doc,
            "h2",
            "nyw-countdown-title",
            "font-size:36px; margin:0 0 6px;",
            Some(&format!("Countdown to {year}")),
        )?.into())?;
        section.append_child(&el(
            doc,
            "p",
            "nyw-countdown-sub",
            "color:rgba(245,236,215,0.6); margin:0 0 28px;",
            Some("A new chapter awaits..."),
        )?.into())?;
        let row = el(doc, "div", "", "", None)?;
        for (value_id, label) in [
            ("nyw-days", "Days"),
            ("nyw-hours", "Hours"),
            ("nyw-minutes", "Minutes"),
            ("nyw-seconds", "Seconds"),
        ] {
            let card = el(doc, "div", "", DIGIT_STYLE, None)?;
            card.append_child(&el(doc, "span", value_id, DIGIT_VALUE_STYLE, Some("00"))?.into())?;
            card.append_child(&el(doc, "span", "", LABEL_STYLE, Some(label))?.into())?;
            row.append_child(&card)?;
        }
        section.append_child(&row)?;
        section.append_child(&el(
            doc,
            "p",
            "nyw-motivation",
            "margin-top:28px; font-style:italic; font-size:19px; color:rgba(245,236,215,0.75);",
            Some(&sparkled(MOTIVATIONAL_LINES[0])),
        )?.into())?;
        root.append_child(&section)?;
    }

    // Typewriter message card
    {
        let card = el(doc, "section", "nyw-message-card", CARD_STYLE, None)?;
        let line = el(doc, "p", "", "font-size:24px; min-height:64px; margin:0;", None)?;
        line.append_child(&el(doc, "span", "nyw-message", "", Some(""))?.into())?;
        line.append_child(&el(
            doc,
            "span",
            "nyw-cursor",
            "display:inline-block; width:3px; height:26px; background:#fbbf24; margin-left:4px; vertical-align:middle;",
            None,
        )?.into())?;
        card.append_child(&line)?;
        let list = el(doc, "div", "", "margin-top:24px;", None)?;
        for quote in ADDITIONAL_QUOTES {
            list.append_child(&el(
                doc,
                "p",
                "",
                "color:rgba(245,236,215,0.7); font-size:17px; margin:10px 0;",
                Some(&format!("• {quote}")),
            )?.into())?;
        }
        card.append_child(&list)?;
        root.append_child(&card)?;
    }

    // Togetherness
    {
        let section = el(doc, "section", "nyw-togetherness", "padding:24px 0;", None)?;
        section.append_child(&el(
            doc,
            "h2",
            "",
            "font-size:30px;",
            Some("Better Together"),
        )?.into())?;
        for msg in TOGETHERNESS_MESSAGES {
            section.append_child(&el(doc, "p", "", CARD_STYLE, Some(&quoted(msg)))?.into())?;
        }
        root.append_child(&section)?;
    }

    // Celebration
    {
        let section = el(doc, "section", "nyw-celebration", "padding:24px 0;", None)?;
        section.append_child(&el(
            doc,
            "h2",
            "",
            "font-size:32px;",
            Some("Time to Celebrate!"),
        )?.into())?;
        section.append_child(&el(
            doc,
            "p",
            "",
            "color:rgba(245,236,215,0.6);",
            Some("Click the button below and let the celebration begin! 🎊"),
        )?.into())?;
        section.append_child(&el(
            doc,
            "button",
            "nyw-celebrate-btn",
            "font-size:22px; padding:16px 36px; margin:18px 0; border:none; border-radius:999px; cursor:pointer; color:#1a1205; font-weight:bold; background:linear-gradient(90deg,#fbbf24,#f59e0b); box-shadow:0 4px 24px rgba(251,191,36,0.5);",
            Some("🎉 Celebrate Together 🎊"),
        )?.into())?;
        section.append_child(&el(
            doc,
            "p",
            "nyw-celebrate-count",
            "color:rgba(245,236,215,0.6); min-height:20px;",
            Some(""),
        )?.into())?;
        section.append_child(&el(
            doc,
            "p",
            "nyw-celebration-message",
            CARD_STYLE,
            Some(&sparkled(CELEBRATION_MESSAGES[0])),
        )?.into())?;
        section.append_child(&el(doc, "div", "", "font-size:28px;", Some("🎆 🎇 🎉 🎊 ✨"))?.into())?;
        root.append_child(&section)?;
    }

    // Gratitude
    {
        let section = el(doc, "section", "nyw-gratitude", "padding:24px 0;", None)?;
        section.append_child(&el(doc, "h2", "", "font-size:30px;", Some("With Gratitude"))?.into())?;
        for msg in GRATITUDE_MESSAGES {
            section.append_child(&el(doc, "p", "", CARD_STYLE, Some(&format!("🙏 \u{201c}{msg}\u{201d}")))?.into())?;
        }
        root.append_child(&section)?;
    }

    // Footer
    root.append_child(&el(
        doc,
        "footer",
        "",
        "padding:32px 0 16px; color:rgba(245,236,215,0.45); font-size:14px;",
        Some(&format!("Made with ❤ for the new year — {year}")),
    )?.into())?;

    body.append_child(&root)?;

    // Fixed controls: share (top right), mode toggle (bottom right).
    body.append_child(&el(
        doc,
        "button",
        "nyw-share-btn",
        "position:fixed; top:18px; right:18px; z-index:60; padding:10px 18px; border-radius:999px; border:1px solid rgba(251,191,36,0.4); background:rgba(0,0,0,0.45); color:#f5ecd7; cursor:pointer; font-size:14px;",
        Some("🔗 Share"),
    )?.into())?;
    let toggle = el(
        doc,
        "div",
        "nyw-mode-toggle",
        "position:fixed; bottom:18px; right:18px; z-index:60; display:flex; flex-direction:column; gap:10px;",
        None,
    )?;
    toggle.append_child(&el(doc, "button", "nyw-mode-party", mode_button_style(true), Some("🎉"))?.into())?;
    toggle.append_child(&el(doc, "button", "nyw-mode-warm", mode_button_style(false), Some("❤"))?.into())?;
    body.append_child(&toggle)?;

    Ok(())
}

fn mode_button_style(active: bool) -> &'static str {
    if active {
        "font-size:20px; padding:12px; border-radius:999px; cursor:pointer; border:2px solid #fbbf24; background:rgba(251,191,36,0.25);"
    } else {
        "font-size:20px; padding:12px; border-radius:999px; cursor:pointer; border:1px solid rgba(255,255,255,0.25); background:rgba(0,0,0,0.45);"
    }
}

fn greeting_text(name: &str) -> String {
    format!("Dear {name}, this wish is for you ❤")
}

fn quoted(text: &str) -> String {
    format!("\u{201c}{text}\u{201d}")
}

fn sparkled(text: &str) -> String {
    format!("✨ {text} ✨")
}

fn set_text(id: &str, text: &str) {
    if let Some(doc) = window().and_then(|w| w.document()) {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }
}

fn set_style(id: &str, style: &str) {
    if let Some(doc) = window().and_then(|w| w.document()) {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_attribute("style", style).ok();
        }
    }
}

// --- Session timers -----------------------------------------------------------

fn start_session_timers(year: i32) -> Result<(), JsValue> {
    // Countdown refresh loop with the one-shot midnight celebration.
    let on_tick = move |rem: Remaining, _completed: bool| {
        set_text("nyw-days", &format!("{:02}", rem.days));
        set_text("nyw-hours", &format!("{:02}", rem.hours));
        set_text("nyw-minutes", &format!("{:02}", rem.minutes));
        set_text("nyw-seconds", &format!("{:02}", rem.seconds));
    };
    let on_complete = move || {
        set_text("nyw-countdown-title", &format!("🎉 Happy New Year {year}! 🎉"));
        set_text(
            "nyw-countdown-sub",
            "The celebration has begun! Welcome to a year of endless possibilities.",
        );
        web_sys::console::log_1(&"new-year-wish: countdown complete".into());
        start_midnight_volley();
    };
    let countdown = CountdownLoop::start(on_tick, on_complete)?;
    PAGE_STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            st.countdown = Some(countdown);
        }
    });

    // Hero quote rotation.
    let hero = Interval::new(HERO_QUOTE_PERIOD_MS, || {
        PAGE_STATE.with(|cell| {
            if let Some(st) = cell.borrow_mut().as_mut() {
                st.hero_quote_idx = (st.hero_quote_idx + 1) % POWER_QUOTES.len();
                set_text("nyw-hero-quote", &quoted(POWER_QUOTES[st.hero_quote_idx]));
            }
        });
    })?;

    // Motivational line under the timer.
    let motivation = Interval::new(MOTIVATION_PERIOD_MS, || {
        PAGE_STATE.with(|cell| {
            if let Some(st) = cell.borrow_mut().as_mut() {
                st.motivation_idx = (st.motivation_idx + 1) % MOTIVATIONAL_LINES.len();
                set_text(
                    "nyw-motivation",
                    &sparkled(MOTIVATIONAL_LINES[st.motivation_idx]),
                );
            }
        });
    })?;

    // Typewriter reveal.
    let typing = Interval::new(TYPE_TICK_MS, || {
        PAGE_STATE.with(|cell| {
            if let Some(st) = cell.borrow_mut().as_mut() {
                if st.typewriter.advance() {
                    set_text("nyw-message", &st.typewriter.visible());
                } else if st.typewriter_done_ms.is_none() {
                    st.typewriter_done_ms = Some(performance_now());
                }
            }
        });
    })?;

    // Cursor blink; retired by the frame loop after the post-reveal linger.
    let cursor = Interval::new(CURSOR_BLINK_MS, || {
        PAGE_STATE.with(|cell| {
            if let Some(st) = cell.borrow_mut().as_mut() {
                if st.cursor_retired {
                    return;
                }
                st.cursor_on = !st.cursor_on;
                let opacity = if st.cursor_on { "1" } else { "0" };
                set_style(
                    "nyw-cursor",
                    &format!(
                        "display:inline-block; width:3px; height:26px; background:#fbbf24; margin-left:4px; vertical-align:middle; opacity:{opacity};"
                    ),
                );
            }
        });
    })?;

    PAGE_STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            st.intervals.extend([hero, motivation, typing, cursor]);
            st.fireworks_timer = schedule_fireworks(Mode::Party).ok();
            st.effects.launch_firework(performance_now());
        }
    });

    Ok(())
}

/// Ambient firework scheduler; cadence depends on the mode, so a mode switch
/// replaces this interval.
fn schedule_fireworks(mode: Mode) -> Result<Interval, JsValue> {
    Interval::new(mode.firework_period_ms(), || {
        PAGE_STATE.with(|cell| {
            if let Some(st) = cell.borrow_mut().as_mut() {
                st.effects.launch_firework(performance_now());
            }
        });
    })
}

/// Five seconds of side-angled bursts once the countdown completes. Fired by
/// the completion latch, so at most once per session.
fn start_midnight_volley() {
    let tick = || {
        PAGE_STATE.with(|cell| {
            if let Some(st) = cell.borrow_mut().as_mut() {
                if performance_now() > st.volley_end_ms {
                    return;
                }
                st.effects.burst(&BurstOptions {
                    particle_count: 3,
                    angle_deg: 60.0,
                    spread_deg: 55.0,
                    origin: (0.0, 0.7),
                    colors: GOLD_CONFETTI_COLORS,
                    ..BurstOptions::default()
                });
                st.effects.burst(&BurstOptions {
                    particle_count: 3,
                    angle_deg: 120.0,
                    spread_deg: 55.0,
                    origin: (1.0, 0.7),
                    colors: GOLD_CONFETTI_COLORS,
                    ..BurstOptions::default()
                });
            }
        });
    };
    if let Ok(interval) = Interval::new(VOLLEY_PERIOD_MS, tick) {
        PAGE_STATE.with(|cell| {
            if let Some(st) = cell.borrow_mut().as_mut() {
                st.volley_end_ms = performance_now() + VOLLEY_DURATION_MS;
                st.volley = Some(interval);
            }
        });
    }
}

// --- Event listeners ----------------------------------------------------------

fn install_listeners(doc: &Document) -> Result<(), JsValue> {
    // Celebration button: layered confetti, click counter, message cycle.
    if let Some(btn) = doc.get_element_by_id("nyw-celebrate-btn") {
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            PAGE_STATE.with(|cell| {
                if let Some(st) = cell.borrow_mut().as_mut() {
                    trigger_celebration(st);
                }
            });
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Share button: build the personalized link and copy it.
    if let Some(btn) = doc.get_element_by_id("nyw-share-btn") {
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            share_current_page();
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Mode toggle buttons.
    for (id, mode) in [("nyw-mode-party", Mode::Party), ("nyw-mode-warm", Mode::Warm)] {
        if let Some(btn) = doc.get_element_by_id(id) {
            let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
                switch_mode(mode);
            }) as Box<dyn FnMut(_)>);
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
    }

    // Recipient input: Enter applies the name.
    if let Some(input) = doc.get_element_by_id("nyw-name-input") {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            if evt.key() != "Enter" {
                return;
            }
            let value = window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("nyw-name-input"))
                .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
                .map(|i| i.value())
                .unwrap_or_default();
            let trimmed = value.trim().to_owned();
            PAGE_STATE.with(|cell| {
                if let Some(st) = cell.borrow_mut().as_mut() {
                    st.recipient = if trimmed.is_empty() {
                        None
                    } else {
                        Some(trimmed.clone())
                    };
                    apply_recipient(st.recipient.as_deref());
                }
            });
        }) as Box<dyn FnMut(_)>);
        input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

fn apply_recipient(name: Option<&str>) {
    match name {
        Some(n) => {
            set_text("nyw-hero-greeting", &greeting_text(n));
            set_style(
                "nyw-hero-greeting",
                "font-size:22px; color:#f472b6; margin:10px 0;",
            );
        }
        None => {
            set_style(
                "nyw-hero-greeting",
                "font-size:22px; color:#f472b6; margin:10px 0; display:none;",
            );
        }
    }
}

/// The layered explosion from the celebration button: five gold bursts with
/// different spreads plus a delayed heart-colored one.
fn trigger_celebration(st: &mut PageState) {
    st.celebrate_clicks += 1;
    st.celebration_idx = (st.celebration_idx + 1) % CELEBRATION_MESSAGES.len();

    let count = 200.0;
    let base = BurstOptions {
        origin: (0.5, 0.7),
        colors: GOLD_CONFETTI_COLORS,
        ..BurstOptions::default()
    };
    let layers = [
        BurstOptions {
            particle_count: (count * 0.25) as usize,
            spread_deg: 26.0,
            start_velocity: 55.0,
            ..base.clone()
        },
        BurstOptions {
            particle_count: (count * 0.2) as usize,
            spread_deg: 60.0,
            ..base.clone()
        },
        BurstOptions {
            particle_count: (count * 0.35) as usize,
            spread_deg: 100.0,
            decay: 0.91,
            scalar: 0.8,
            ..base.clone()
        },
        BurstOptions {
            particle_count: (count * 0.1) as usize,
            spread_deg: 120.0,
            start_velocity: 25.0,
            decay: 0.92,
            scalar: 1.2,
            ..base.clone()
        },
        BurstOptions {
            particle_count: (count * 0.1) as usize,
            spread_deg: 120.0,
            start_velocity: 45.0,
            ..base.clone()
        },
        // Hearts trail in shortly after the main explosion.
        BurstOptions {
            particle_count: 30,
            spread_deg: 60.0,
            origin: (0.5, 0.6),
            colors: HEART_CONFETTI_COLORS,
            scalar: 2.0,
            delay_ms: 200.0,
            ..BurstOptions::default()
        },
    ];
    for opts in &layers {
        st.effects.burst(opts);
    }

    set_text(
        "nyw-celebrate-count",
        &format!("🎉 Celebrations: {}", st.celebrate_clicks),
    );
    set_text(
        "nyw-celebration-message",
        &sparkled(CELEBRATION_MESSAGES[st.celebration_idx]),
    );
}

fn share_current_page() {
    let Some(win) = window() else { return };
    let loc = win.location();
    let base = format!(
        "{}{}",
        loc.origin().unwrap_or_default(),
        loc.pathname().unwrap_or_default()
    );
    PAGE_STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            let url = share::share_url(&base, st.recipient.as_deref());
            // Fire and forget; the button label is optimistic feedback.
            let _ = win.navigator().clipboard().write_text(&url);
            st.share_reset_ms = Some(performance_now() + SHARE_RESET_MS);
            set_text("nyw-share-btn", "✓ Copied!");
        }
    });
}

fn switch_mode(mode: Mode) {
    PAGE_STATE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            if st.effects.mode() == mode {
                return;
            }
            st.effects.set_mode(mode);
            if let Some(mut old) = st.fireworks_timer.take() {
                old.cancel();
            }
            st.fireworks_timer = schedule_fireworks(mode).ok();
            st.effects.launch_firework(performance_now());
            set_style(
                "nyw-mode-party",
                mode_button_style(mode == Mode::Party),
            );
            set_style("nyw-mode-warm", mode_button_style(mode == Mode::Warm));
        }
    });
}

// --- Frame loop ----------------------------------------------------------------

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let live = PAGE_STATE.with(|cell| match cell.borrow_mut().as_mut() {
            Some(state) => {
                page_frame(state, ts);
                true
            }
            None => false,
        });
        // Stop rescheduling once the session is torn down.
        if live {
            if let Some(w) = window() {
                let _ = w
                    .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
            }
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

fn page_frame(state: &mut PageState, now: f64) {
    state.effects.frame(now);

    // Retire the midnight volley after its five seconds.
    if state.volley.is_some() && now > state.volley_end_ms {
        if let Some(mut v) = state.volley.take() {
            v.cancel();
        }
    }

    // Revert the share button label.
    if let Some(reset) = state.share_reset_ms {
        if now > reset {
            state.share_reset_ms = None;
            set_text("nyw-share-btn", "🔗 Share");
        }
    }

    // Hide the cursor for good once the reveal has lingered long enough.
    if let Some(done) = state.typewriter_done_ms {
        if !state.cursor_retired && now - done > CURSOR_LINGER_MS {
            state.cursor_retired = true;
            set_style("nyw-cursor", "display:none;");
        }
    }
}

// --- Teardown -----------------------------------------------------------------

pub(crate) fn unmount_page() {
    PAGE_STATE.with(|cell| {
        if let Some(mut st) = cell.borrow_mut().take() {
            if let Some(mut c) = st.countdown.take() {
                c.stop();
            }
            for interval in &mut st.intervals {
                interval.cancel();
            }
            if let Some(mut t) = st.fireworks_timer.take() {
                t.cancel();
            }
            if let Some(mut v) = st.volley.take() {
                v.cancel();
            }
            st.effects.unmount();
        }
    });
    if let Some(doc) = window().and_then(|w| w.document()) {
        for id in ["nyw-root", "nyw-share-btn", "nyw-mode-toggle"] {
            if let Some(el) = doc.get_element_by_id(id) {
                el.remove();
            }
        }
    }
    web_sys::console::log_1(&"new-year-wish: session stopped".into());
}
