//! Color resolution for selection reports
//!
//! Colors come from inline styles first, then from Tailwind utility classes.
//! Background does not inherit; text color does. Results are reported the
//! way a computed style would be: `rgb(r, g, b)` or `rgba(r, g, b, a)`.

use livepage_dom::NodeRef;
use livepage_protocol::ElementColors;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Parse a CSS color value: hex, `rgb()`/`rgba()`, or a common keyword
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb_args(args);
        }
        named(&value)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            let alpha = (self.a * 1000.0).round() / 1000.0;
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Rgba::new(nibble(0)?, nibble(1)?, nibble(2)?, 1.0)),
        4 => Some(Rgba::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)? as f32 / 255.0)),
        6 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, 1.0)),
        8 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)? as f32 / 255.0)),
        _ => None,
    }
}

/// `r, g, b[, a]` or the space form `r g b [/ a]`
fn parse_rgb_args(args: &str) -> Option<Rgba> {
    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |s: &str| -> Option<u8> {
        match s.strip_suffix('%') {
            Some(pct) => number(pct).map(|p| (p.clamp(0.0, 100.0) * 2.55).round() as u8),
            None => number(s).map(|v| v.clamp(0.0, 255.0).round() as u8),
        }
    };
    let alpha = match parts.get(3) {
        Some(s) => match s.strip_suffix('%') {
            Some(pct) => number(pct)? / 100.0,
            None => number(s)?,
        },
        None => 1.0,
    };

    Some(Rgba::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, 1.0).with_alpha(alpha))
}

/// `f32::from_str` also accepts `nan` and `inf`
fn number(s: &str) -> Option<f32> {
    s.parse::<f32>().ok().filter(|v| v.is_finite())
}

fn named(value: &str) -> Option<Rgba> {
    let rgb = match value {
        "transparent" => return Some(Rgba::TRANSPARENT),
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "pink" => (255, 192, 203),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "navy" => (0, 0, 128),
        "teal" => (0, 128, 128),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "aqua" | "cyan" => (0, 255, 255),
        "fuchsia" | "magenta" => (255, 0, 255),
        _ => return None,
    };
    Some(Rgba::new(rgb.0, rgb.1, rgb.2, 1.0))
}

// ── Tailwind palette ────────────────────────────────────────────────────

const SHADES: [u16; 10] = [50, 100, 200, 300, 400, 500, 600, 700, 800, 900];

const PALETTE: &[(&str, [&str; 10])] = &[
    ("slate", ["#f8fafc", "#f1f5f9", "#e2e8f0", "#cbd5e1", "#94a3b8", "#64748b", "#475569", "#334155", "#1e293b", "#0f172a"]),
    ("gray", ["#f9fafb", "#f3f4f6", "#e5e7eb", "#d1d5db", "#9ca3af", "#6b7280", "#4b5563", "#374151", "#1f2937", "#111827"]),
    ("zinc", ["#fafafa", "#f4f4f5", "#e4e4e7", "#d4d4d8", "#a1a1aa", "#71717a", "#52525b", "#3f3f46", "#27272a", "#18181b"]),
    ("neutral", ["#fafafa", "#f5f5f5", "#e5e5e5", "#d4d4d4", "#a3a3a3", "#737373", "#525252", "#404040", "#262626", "#171717"]),
    ("stone", ["#fafaf9", "#f5f5f4", "#e7e5e4", "#d6d3d1", "#a8a29e", "#78716c", "#57534e", "#44403c", "#292524", "#1c1917"]),
    ("red", ["#fef2f2", "#fee2e2", "#fecaca", "#fca5a5", "#f87171", "#ef4444", "#dc2626", "#b91c1c", "#991b1b", "#7f1d1d"]),
    ("orange", ["#fff7ed", "#ffedd5", "#fed7aa", "#fdba74", "#fb923c", "#f97316", "#ea580c", "#c2410c", "#9a3412", "#7c2d12"]),
    ("amber", ["#fffbeb", "#fef3c7", "#fde68a", "#fcd34d", "#fbbf24", "#f59e0b", "#d97706", "#b45309", "#92400e", "#78350f"]),
    ("yellow", ["#fefce8", "#fef9c3", "#fef08a", "#fde047", "#facc15", "#eab308", "#ca8a04", "#a16207", "#854d0e", "#713f12"]),
    ("lime", ["#f7fee7", "#ecfccb", "#d9f99d", "#bef264", "#a3e635", "#84cc16", "#65a30d", "#4d7c0f", "#3f6212", "#365314"]),
    ("green", ["#f0fdf4", "#dcfce7", "#bbf7d0", "#86efac", "#4ade80", "#22c55e", "#16a34a", "#15803d", "#166534", "#14532d"]),
    ("emerald", ["#ecfdf5", "#d1fae5", "#a7f3d0", "#6ee7b7", "#34d399", "#10b981", "#059669", "#047857", "#065f46", "#064e3b"]),
    ("teal", ["#f0fdfa", "#ccfbf1", "#99f6e4", "#5eead4", "#2dd4bf", "#14b8a6", "#0d9488", "#0f766e", "#115e59", "#134e4a"]),
    ("cyan", ["#ecfeff", "#cffafe", "#a5f3fc", "#67e8f9", "#22d3ee", "#06b6d4", "#0891b2", "#0e7490", "#155e75", "#164e63"]),
    ("sky", ["#f0f9ff", "#e0f2fe", "#bae6fd", "#7dd3fc", "#38bdf8", "#0ea5e9", "#0284c7", "#0369a1", "#075985", "#0c4a6e"]),
    ("blue", ["#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6", "#2563eb", "#1d4ed8", "#1e40af", "#1e3a8a"]),
    ("indigo", ["#eef2ff", "#e0e7ff", "#c7d2fe", "#a5b4fc", "#818cf8", "#6366f1", "#4f46e5", "#4338ca", "#3730a3", "#312e81"]),
    ("violet", ["#f5f3ff", "#ede9fe", "#ddd6fe", "#c4b5fd", "#a78bfa", "#8b5cf6", "#7c3aed", "#6d28d9", "#5b21b6", "#4c1d95"]),
    ("purple", ["#faf5ff", "#f3e8ff", "#e9d5ff", "#d8b4fe", "#c084fc", "#a855f7", "#9333ea", "#7e22ce", "#6b21a8", "#581c87"]),
    ("fuchsia", ["#fdf4ff", "#fae8ff", "#f5d0fe", "#f0abfc", "#e879f9", "#d946ef", "#c026d3", "#a21caf", "#86198f", "#701a75"]),
    ("pink", ["#fdf2f8", "#fce7f3", "#fbcfe8", "#f9a8d4", "#f472b6", "#ec4899", "#db2777", "#be185d", "#9d174d", "#831843"]),
    ("rose", ["#fff1f2", "#ffe4e6", "#fecdd3", "#fda4af", "#fb7185", "#f43f5e", "#e11d48", "#be123c", "#9f1239", "#881337"]),
];

/// Resolve a Tailwind color utility such as `bg-blue-500`, `text-white`,
/// `bg-red-500/50` or `bg-[#123456]` for the given prefix (`bg-`, `text-`).
pub fn tailwind_color(class: &str, prefix: &str) -> Option<Rgba> {
    let value = class.strip_prefix(prefix)?;
    let (value, opacity) = match value.rsplit_once('/') {
        Some((v, o)) if !v.starts_with('[') || v.ends_with(']') => {
            (v, Some(o.parse::<f32>().ok()? / 100.0))
        }
        _ => (value, None),
    };

    let color = if let Some(arbitrary) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        Rgba::parse(arbitrary)?
    } else {
        match value {
            "transparent" => Rgba::TRANSPARENT,
            "black" => Rgba::BLACK,
            "white" => Rgba::new(255, 255, 255, 1.0),
            _ => {
                let (family, shade) = value.rsplit_once('-')?;
                let shade: u16 = shade.parse().ok()?;
                let index = SHADES.iter().position(|s| *s == shade)?;
                let (_, shades) = PALETTE.iter().find(|(name, _)| *name == family)?;
                Rgba::parse(shades[index])?
            }
        }
    };

    Some(match opacity {
        Some(a) => color.with_alpha(a),
        None => color,
    })
}

// ── Element resolution ──────────────────────────────────────────────────

/// First color token of a `background` shorthand
fn background_shorthand(value: &str) -> Option<Rgba> {
    let mut depth = 0usize;
    let mut start = 0;
    let mut tokens = Vec::new();
    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                tokens.push(&value[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    tokens.push(&value[start..]);
    tokens.into_iter().filter(|t| !t.is_empty()).find_map(Rgba::parse)
}

fn class_color(node: &NodeRef, prefix: &str) -> Option<Rgba> {
    node.classes()
        .iter()
        .rev()
        .find_map(|class| tailwind_color(class, prefix))
}

pub fn background_color(node: &NodeRef) -> Rgba {
    let style = node.style();
    style
        .get("background-color")
        .and_then(Rgba::parse)
        .or_else(|| style.get("background").and_then(background_shorthand))
        .or_else(|| class_color(node, "bg-"))
        .unwrap_or(Rgba::TRANSPARENT)
}

/// Text color, inherited from the nearest ancestor that sets one
pub fn text_color(node: &NodeRef) -> Rgba {
    std::iter::once(node.clone())
        .chain(node.ancestors())
        .filter(|n| n.is_element())
        .find_map(|n| {
            n.style()
                .get("color")
                .and_then(Rgba::parse)
                .or_else(|| class_color(&n, "text-"))
        })
        .unwrap_or(Rgba::BLACK)
}

pub fn resolve_colors(node: &NodeRef) -> ElementColors {
    ElementColors {
        background: background_color(node).to_string(),
        text: text_color(node).to_string(),
    }
}
