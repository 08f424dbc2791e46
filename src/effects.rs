//! Canvas effects: twinkling particle field, ambient fireworks and
//! click-triggered confetti. Two full-viewport canvases bracket the page
//! content: the background layer sits under it, the confetti layer floats
//! above it (pointer-events disabled on both).
//!
//! Everything that decides *what* to animate (particle generation, firework
//! geometry, confetti physics) is pure and unit-tested natively; only
//! `Effects` itself talks to the browser.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, window};

pub(crate) const BG_CANVAS_ID: &str = "nyw-bg-canvas";
pub(crate) const CONFETTI_CANVAS_ID: &str = "nyw-confetti-canvas";

pub const PARTY_FIREWORK_COLORS: &[&str] =
    &["#fbbf24", "#f59e0b", "#ef4444", "#ec4899", "#8b5cf6", "#06b6d4"];
pub const WARM_FIREWORK_COLORS: &[&str] = &["#fbbf24", "#f472b6", "#fcd34d", "#fb7185"];
pub const GOLD_CONFETTI_COLORS: &[&str] = &["#fbbf24", "#f59e0b", "#ec4899", "#8b5cf6"];
pub const HEART_CONFETTI_COLORS: &[&str] = &["#ec4899", "#f472b6", "#fb7185"];

// --- Display mode ------------------------------------------------------------

/// Visual register of the page: lively fireworks or a softer, heart-heavy
/// field. Switching regenerates the particle field and firework cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Party,
    Warm,
}

impl Mode {
    pub fn particle_count(self) -> usize {
        match self {
            Mode::Party => 80,
            Mode::Warm => 50,
        }
    }

    pub fn firework_period_ms(self) -> i32 {
        match self {
            Mode::Party => 1_500,
            Mode::Warm => 3_000,
        }
    }

    pub fn firework_colors(self) -> &'static [&'static str] {
        match self {
            Mode::Party => PARTY_FIREWORK_COLORS,
            Mode::Warm => WARM_FIREWORK_COLORS,
        }
    }

    // Warm mode leans on hearts, party mode on stars.
    fn kind_bias(self) -> [ParticleKind; 5] {
        use ParticleKind::*;
        match self {
            Mode::Party => [Star, Sparkle, Star, Sparkle, Star],
            Mode::Warm => [Star, Sparkle, Heart, Heart, Sparkle],
        }
    }
}

// --- Deterministic RNG --------------------------------------------------------

/// Small linear congruential generator; decorative randomness only.
pub struct Lcg(u32);

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self(seed)
    }

    pub(crate) fn from_clock() -> Self {
        Self(crate::performance_now() as u32 | 1)
    }

    fn next(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.0
    }

    /// Uniform in [0, 1).
    pub fn unit(&mut self) -> f64 {
        f64::from(self.next()) / (f64::from(u32::MAX) + 1.0)
    }

    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }

    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.next() as usize % len
    }
}

// --- Background particle field ------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    Star,
    Sparkle,
    Heart,
}

/// One twinkling background element. Position is a viewport fraction so the
/// field survives window resizes without regeneration.
#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub opacity: f64,
    pub period_ms: f64,
    pub delay_ms: f64,
    pub kind: ParticleKind,
}

impl Particle {
    /// Position inside the particle's twinkle loop, in [0, 1).
    pub fn phase(&self, elapsed_ms: f64) -> f64 {
        ((elapsed_ms - self.delay_ms) / self.period_ms).rem_euclid(1.0)
    }
}

pub fn generate_particles(rng: &mut Lcg, mode: Mode) -> Vec<Particle> {
    let kinds = mode.kind_bias();
    (0..mode.particle_count())
        .map(|_| Particle {
            x: rng.unit(),
            y: rng.unit(),
            size: rng.range(2.0, 6.0),
            opacity: rng.range(0.3, 0.8),
            period_ms: rng.range(3_000.0, 7_000.0),
            delay_ms: rng.range(0.0, 5_000.0),
            kind: kinds[rng.index(kinds.len())],
        })
        .collect()
}

// --- Ambient fireworks ---------------------------------------------------------

pub const FIREWORK_SPOKES: usize = 12;
pub const FIREWORK_LIFE_MS: f64 = 1_500.0;
/// Only the most recent bursts are kept alive.
pub const MAX_FIREWORKS: usize = 6;

#[derive(Clone, Debug)]
pub struct FireworkSpoke {
    pub angle: f64,
    pub distance: f64,
    pub delay_ms: f64,
}

#[derive(Clone, Debug)]
pub struct Firework {
    pub x: f64,
    pub y: f64,
    pub color: &'static str,
    pub spokes: Vec<FireworkSpoke>,
    pub born_ms: f64,
}

impl Firework {
    pub fn expired(&self, now_ms: f64) -> bool {
        now_ms - self.born_ms >= FIREWORK_LIFE_MS + 200.0
    }
}

/// A burst in the upper half of the viewport: 12 spokes at 30° steps with
/// randomized reach and a small per-spoke stagger.
pub fn spawn_firework(rng: &mut Lcg, mode: Mode, now_ms: f64) -> Firework {
    let colors = mode.firework_colors();
    Firework {
        x: rng.range(0.10, 0.90),
        y: rng.range(0.10, 0.50),
        color: colors[rng.index(colors.len())],
        spokes: (0..FIREWORK_SPOKES)
            .map(|i| FireworkSpoke {
                angle: (i as f64) * 30.0_f64.to_radians(),
                distance: rng.range(40.0, 100.0),
                delay_ms: rng.range(0.0, 200.0),
            })
            .collect(),
        born_ms: now_ms,
    }
}

// --- Confetti ------------------------------------------------------------------

/// Downward acceleration, in px per 60 fps frame².
pub const CONFETTI_GRAVITY: f64 = 0.5;
/// Lifetime in 60 fps-equivalent frames (~2 s).
pub const CONFETTI_LIFE_FRAMES: f64 = 120.0;

#[derive(Clone, Debug)]
pub struct ConfettiParticle {
    pub x: f64,
    pub y: f64,
    vx: f64,
    vy: f64,
    decay: f64,
    pub scalar: f64,
    pub color: &'static str,
    /// 1.0 at spawn, dead at 0.
    pub life: f64,
    delay_ms: f64,
    wobble: f64,
    wobble_speed: f64,
}

impl ConfettiParticle {
    /// Advances physics by `dt_ms` of wall time, scaled to 60 fps frames.
    /// Delayed particles sit still until their delay is consumed.
    pub fn step(&mut self, dt_ms: f64) {
        if self.delay_ms > 0.0 {
            self.delay_ms -= dt_ms;
            return;
        }
        let k = dt_ms / (1_000.0 / 60.0);
        self.x += self.vx * k;
        self.y += self.vy * k;
        let drag = self.decay.powf(k);
        self.vx *= drag;
        self.vy = self.vy * drag + CONFETTI_GRAVITY * k;
        self.wobble += self.wobble_speed * k;
        self.life -= k / CONFETTI_LIFE_FRAMES;
    }

    pub fn alive(&self) -> bool {
        self.life > 0.0
    }
}

/// One confetti explosion, canvas-confetti style.
#[derive(Clone, Debug)]
pub struct BurstOptions {
    pub particle_count: usize,
    /// 90° fires straight up.
    pub angle_deg: f64,
    pub spread_deg: f64,
    pub start_velocity: f64,
    pub decay: f64,
    pub scalar: f64,
    /// Viewport fractions.
    pub origin: (f64, f64),
    pub colors: &'static [&'static str],
    pub delay_ms: f64,
}

impl Default for BurstOptions {
    fn default() -> Self {
        Self {
            particle_count: 50,
            angle_deg: 90.0,
            spread_deg: 45.0,
            start_velocity: 45.0,
            decay: 0.9,
            scalar: 1.0,
            origin: (0.5, 0.7),
            colors: GOLD_CONFETTI_COLORS,
            delay_ms: 0.0,
        }
    }
}

pub fn spawn_burst(
    rng: &mut Lcg,
    opts: &BurstOptions,
    width: f64,
    height: f64,
) -> Vec<ConfettiParticle> {
    let spread = opts.spread_deg.to_radians();
    (0..opts.particle_count)
        .map(|_| {
            let angle = opts.angle_deg.to_radians() + rng.range(-0.5, 0.5) * spread;
            let speed = opts.start_velocity * rng.range(0.5, 1.0);
            ConfettiParticle {
                x: opts.origin.0 * width,
                y: opts.origin.1 * height,
                vx: angle.cos() * speed,
                // Screen y grows downward.
                vy: -angle.sin() * speed,
                decay: opts.decay,
                scalar: opts.scalar,
                color: opts.colors[rng.index(opts.colors.len())],
                life: 1.0,
                delay_ms: opts.delay_ms,
                wobble: rng.range(0.0, std::f64::consts::TAU),
                wobble_speed: rng.range(0.05, 0.15),
            }
        })
        .collect()
}

// --- Browser-side effects layer -------------------------------------------------

pub(crate) struct Effects {
    bg_canvas: HtmlCanvasElement,
    bg_ctx: CanvasRenderingContext2d,
    fx_canvas: HtmlCanvasElement,
    fx_ctx: CanvasRenderingContext2d,
    mode: Mode,
    rng: Lcg,
    particles: Vec<Particle>,
    fireworks: Vec<Firework>,
    confetti: Vec<ConfettiParticle>,
    started_ms: f64,
    last_frame_ms: f64,
}

fn mount_canvas(
    doc: &Document,
    id: &str,
    z_index: i32,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(id) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(id);
        c.set_attribute(
            "style",
            &format!(
                "position:fixed; left:0; top:0; width:100vw; height:100vh; \
                 pointer-events:none; z-index:{z_index};"
            ),
        )
        .ok();
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    let (w, h) = viewport_size();
    canvas.set_width(w);
    canvas.set_height(h);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    Ok((canvas, ctx))
}

fn viewport_size() -> (u32, u32) {
    let win = window();
    let dim = |v: Result<JsValue, JsValue>, fallback: f64| {
        v.ok().and_then(|j| j.as_f64()).unwrap_or(fallback)
    };
    match win {
        Some(w) => (
            dim(w.inner_width(), 1280.0) as u32,
            dim(w.inner_height(), 720.0) as u32,
        ),
        None => (1280, 720),
    }
}

impl Effects {
    pub fn mount(doc: &Document, mode: Mode, now: f64) -> Result<Self, JsValue> {
        let (bg_canvas, bg_ctx) = mount_canvas(doc, BG_CANVAS_ID, 0)?;
        let (fx_canvas, fx_ctx) = mount_canvas(doc, CONFETTI_CANVAS_ID, 50)?;
        let mut rng = Lcg::from_clock();
        let particles = generate_particles(&mut rng, mode);
        Ok(Self {
            bg_canvas,
            bg_ctx,
            fx_canvas,
            fx_ctx,
            mode,
            rng,
            particles,
            fireworks: Vec::new(),
            confetti: Vec::new(),
            started_ms: now,
            last_frame_ms: now,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switches palette and regenerates the particle field.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.particles = generate_particles(&mut self.rng, mode);
    }

    pub fn launch_firework(&mut self, now: f64) {
        let fw = spawn_firework(&mut self.rng, self.mode, now);
        self.fireworks.push(fw);
        if self.fireworks.len() > MAX_FIREWORKS {
            let excess = self.fireworks.len() - MAX_FIREWORKS;
            self.fireworks.drain(..excess);
        }
    }

    pub fn burst(&mut self, opts: &BurstOptions) {
        let w = f64::from(self.fx_canvas.width());
        let h = f64::from(self.fx_canvas.height());
        let batch = spawn_burst(&mut self.rng, opts, w, h);
        self.confetti.extend(batch);
    }

    /// One animation frame: advances and redraws both layers.
    pub fn frame(&mut self, now: f64) {
        let dt = (now - self.last_frame_ms).clamp(0.0, 100.0);
        self.last_frame_ms = now;

        self.draw_background(now);
        self.draw_fireworks(now);

        for p in &mut self.confetti {
            p.step(dt);
        }
        let floor = f64::from(self.fx_canvas.height()) + 50.0;
        self.confetti.retain(|p| p.alive() && p.y < floor);
        self.fireworks.retain(|f| !f.expired(now));
        self.draw_confetti();
    }

    pub fn unmount(&mut self) {
        self.bg_canvas.remove();
        self.fx_canvas.remove();
    }

    fn draw_background(&mut self, now: f64) {
        let ctx = &self.bg_ctx;
        let w = f64::from(self.bg_canvas.width());
        let h = f64::from(self.bg_canvas.height());
        let elapsed = now - self.started_ms;

        let (base, glow) = match self.mode {
            Mode::Party => ("#0d0a1e", "rgba(88,28,135,0.25)"),
            Mode::Warm => ("#1a0f14", "rgba(244,114,182,0.12)"),
        };
        ctx.set_fill_style_str(base);
        ctx.fill_rect(0.0, 0.0, w, h);
        // Soft glow pooled near the top of the page.
        ctx.set_fill_style_str(glow);
        ctx.begin_path();
        ctx.arc(w / 2.0, h * 0.2, h * 0.6, 0.0, std::f64::consts::TAU)
            .ok();
        ctx.fill();

        for p in &self.particles {
            let phase = p.phase(elapsed);
            let pulse = (phase * std::f64::consts::TAU).sin() * 0.5 + 0.5;
            let px = p.x * w;
            let py = p.y * h;
            match p.kind {
                ParticleKind::Star => {
                    ctx.set_global_alpha(p.opacity * (0.3 + 0.7 * pulse));
                    ctx.set_shadow_color("#fbbf24");
                    ctx.set_shadow_blur(p.size * 2.0);
                    ctx.set_fill_style_str("#ffe9a3");
                    ctx.begin_path();
                    ctx.arc(px, py, p.size / 2.0, 0.0, std::f64::consts::TAU).ok();
                    ctx.fill();
                    ctx.set_shadow_blur(0.0);
                }
                ParticleKind::Sparkle => {
                    // Four-point star, spinning and breathing with its phase.
                    let scale = (phase * std::f64::consts::PI).sin();
                    if scale <= 0.0 {
                        continue;
                    }
                    let s = p.size * 2.0 * scale;
                    ctx.set_global_alpha(p.opacity * scale);
                    ctx.set_fill_style_str("#fbbf24");
                    ctx.save();
                    ctx.translate(px, py).ok();
                    ctx.rotate(phase * std::f64::consts::TAU).ok();
                    ctx.begin_path();
                    ctx.move_to(0.0, -s);
                    ctx.line_to(s * 0.22, -s * 0.22);
                    ctx.line_to(s, 0.0);
                    ctx.line_to(s * 0.22, s * 0.22);
                    ctx.line_to(0.0, s);
                    ctx.line_to(-s * 0.22, s * 0.22);
                    ctx.line_to(-s, 0.0);
                    ctx.line_to(-s * 0.22, -s * 0.22);
                    ctx.close_path();
                    ctx.fill();
                    ctx.restore();
                }
                ParticleKind::Heart => {
                    ctx.set_global_alpha(p.opacity * (0.4 + 0.6 * pulse));
                    ctx.set_font(&format!("{}px serif", (p.size * 3.0) as i32));
                    ctx.set_text_align("center");
                    ctx.fill_text("❤", px, py).ok();
                }
            }
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_fireworks(&mut self, now: f64) {
        let ctx = &self.bg_ctx;
        let w = f64::from(self.bg_canvas.width());
        let h = f64::from(self.bg_canvas.height());

        for fw in &self.fireworks {
            let cx = fw.x * w;
            let cy = fw.y * h;
            let age = now - fw.born_ms;

            // Center flash over the first 500 ms.
            let flash = (age / 500.0).clamp(0.0, 1.0);
            if flash < 1.0 {
                ctx.set_global_alpha(1.0 - flash);
                ctx.set_fill_style_str(fw.color);
                ctx.begin_path();
                ctx.arc(cx, cy, 4.0 + 8.0 * flash, 0.0, std::f64::consts::TAU).ok();
                ctx.fill();
            }

            ctx.set_shadow_color(fw.color);
            ctx.set_shadow_blur(10.0);
            ctx.set_fill_style_str(fw.color);
            for spoke in &fw.spokes {
                let p = ((age - spoke.delay_ms) / FIREWORK_LIFE_MS).clamp(0.0, 1.0);
                if p >= 1.0 {
                    continue;
                }
                let ease = 1.0 - (1.0 - p).powi(2);
                let sx = cx + spoke.angle.cos() * spoke.distance * ease;
                let sy = cy + spoke.angle.sin() * spoke.distance * ease;
                ctx.set_global_alpha(1.0 - p);
                ctx.begin_path();
                ctx.arc(sx, sy, 2.5 * (1.0 - p * 0.5), 0.0, std::f64::consts::TAU).ok();
                ctx.fill();
            }
            ctx.set_shadow_blur(0.0);
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_confetti(&mut self) {
        let ctx = &self.fx_ctx;
        let w = f64::from(self.fx_canvas.width());
        let h = f64::from(self.fx_canvas.height());
        ctx.clear_rect(0.0, 0.0, w, h);

        for p in &self.confetti {
            if p.delay_ms > 0.0 {
                continue;
            }
            ctx.set_global_alpha(p.life.clamp(0.0, 1.0));
            ctx.set_fill_style_str(p.color);
            ctx.save();
            ctx.translate(p.x, p.y).ok();
            ctx.rotate(p.wobble).ok();
            ctx.fill_rect(-4.0 * p.scalar, -2.0 * p.scalar, 8.0 * p.scalar, 4.0 * p.scalar);
            ctx.restore();
        }
        ctx.set_global_alpha(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lcg_is_deterministic_and_bounded() {
        let mut a = Lcg::new(7);
        let mut b = Lcg::new(7);
        for _ in 0..100 {
            let ua = a.unit();
            assert_eq!(ua, b.unit());
            assert!((0.0..1.0).contains(&ua));
        }
        let mut c = Lcg::new(42);
        for _ in 0..100 {
            let v = c.range(-1.0, 3.0);
            assert!((-1.0..3.0).contains(&v));
            assert!(c.index(5) < 5);
        }
        assert_eq!(Lcg::new(1).index(0), 0);
    }

    #[test]
    fn particle_counts_follow_mode() {
        let mut rng = Lcg::new(1);
        assert_eq!(generate_particles(&mut rng, Mode::Party).len(), 80);
        assert_eq!(generate_particles(&mut rng, Mode::Warm).len(), 50);
    }

    #[test]
    fn warm_mode_has_hearts_party_does_not() {
        let mut rng = Lcg::new(99);
        let warm = generate_particles(&mut rng, Mode::Warm);
        assert!(warm.iter().any(|p| p.kind == ParticleKind::Heart));
        let party = generate_particles(&mut rng, Mode::Party);
        assert!(party.iter().all(|p| p.kind != ParticleKind::Heart));
    }

    #[test]
    fn particle_phase_wraps() {
        let p = Particle {
            x: 0.5,
            y: 0.5,
            size: 3.0,
            opacity: 0.5,
            period_ms: 1_000.0,
            delay_ms: 250.0,
            kind: ParticleKind::Star,
        };
        assert!((p.phase(250.0) - 0.0).abs() < 1e-9);
        assert!((p.phase(750.0) - 0.5).abs() < 1e-9);
        assert!((p.phase(1_250.0) - 0.0).abs() < 1e-9);
        // Before the delay the phase is still well-defined (wraps negatively).
        assert!((0.0..1.0).contains(&p.phase(0.0)));
    }

    #[test]
    fn firework_spokes_cover_the_circle() {
        let mut rng = Lcg::new(3);
        let fw = spawn_firework(&mut rng, Mode::Party, 1_000.0);
        assert_eq!(fw.spokes.len(), FIREWORK_SPOKES);
        for (i, spoke) in fw.spokes.iter().enumerate() {
            assert!((spoke.angle - (i as f64) * 30.0_f64.to_radians()).abs() < 1e-9);
            assert!((40.0..100.0).contains(&spoke.distance));
            assert!((0.0..200.0).contains(&spoke.delay_ms));
        }
        assert!((0.10..0.90).contains(&fw.x));
        assert!((0.10..0.50).contains(&fw.y));
        assert!(!fw.expired(1_000.0 + FIREWORK_LIFE_MS));
        assert!(fw.expired(1_000.0 + FIREWORK_LIFE_MS + 200.0));
    }

    #[test]
    fn burst_spawns_requested_count_at_origin() {
        let mut rng = Lcg::new(5);
        let opts = BurstOptions {
            particle_count: 30,
            origin: (0.25, 0.5),
            ..BurstOptions::default()
        };
        let batch = spawn_burst(&mut rng, &opts, 800.0, 600.0);
        assert_eq!(batch.len(), 30);
        for p in &batch {
            assert_eq!(p.x, 200.0);
            assert_eq!(p.y, 300.0);
            assert!(p.alive());
        }
    }

    #[test]
    fn confetti_physics_gravity_and_decay() {
        let mut rng = Lcg::new(8);
        let opts = BurstOptions {
            particle_count: 1,
            angle_deg: 90.0,
            spread_deg: 0.0,
            ..BurstOptions::default()
        };
        let mut p = spawn_burst(&mut rng, &opts, 100.0, 100.0).remove(0);
        let (vx0, vy0) = (p.vx, p.vy);
        assert!(vy0 < 0.0); // fired upward
        p.step(1_000.0 / 60.0);
        // Gravity pulls vy toward positive, drag shrinks |vx|.
        assert!(p.vy > vy0);
        assert!(p.vx.abs() <= vx0.abs());
        assert!(p.life < 1.0);
    }

    #[test]
    fn confetti_dies_within_its_lifetime() {
        let mut rng = Lcg::new(8);
        let mut p = spawn_burst(&mut rng, &BurstOptions::default(), 100.0, 100.0).remove(0);
        for _ in 0..(CONFETTI_LIFE_FRAMES as usize + 1) {
            p.step(1_000.0 / 60.0);
        }
        assert!(!p.alive());
    }

    #[test]
    fn delayed_confetti_waits_before_moving() {
        let mut rng = Lcg::new(8);
        let opts = BurstOptions {
            particle_count: 1,
            delay_ms: 200.0,
            ..BurstOptions::default()
        };
        let mut p = spawn_burst(&mut rng, &opts, 100.0, 100.0).remove(0);
        let (x0, y0) = (p.x, p.y);
        p.step(100.0);
        assert_eq!((p.x, p.y), (x0, y0));
        assert_eq!(p.life, 1.0);
        p.step(150.0); // consumes the rest of the delay
        p.step(16.7);
        assert!((p.x, p.y) != (x0, y0));
    }

    #[test]
    fn mode_parameters() {
        assert_eq!(Mode::Party.firework_period_ms(), 1_500);
        assert_eq!(Mode::Warm.firework_period_ms(), 3_000);
        assert_eq!(Mode::Party.firework_colors().len(), 6);
        assert_eq!(Mode::Warm.firework_colors().len(), 4);
    }
}
