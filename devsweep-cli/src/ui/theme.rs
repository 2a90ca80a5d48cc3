use devsweep_core::ArtifactKind;
use ratatui::style::Color;

/// Dark palette keyed by what each color marks on screen
pub struct Theme {
    pub bg: Color,
    pub surface: Color,
    pub border: Color,

    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,

    pub accent: Color,
    pub ok: Color,
    pub warn: Color,
    pub danger: Color,

    /// Row marker for `node_modules`
    pub node: Color,
    /// Row marker for CocoaPods `Pods`
    pub pods: Color,

    pub cursor_bg: Color,
    pub cursor_fg: Color,

    /// Share bar stops from a tiny item to one that is most of the total
    share_stops: [Color; 3],
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::Rgb(26, 27, 38),
            surface: Color::Rgb(41, 46, 66),
            border: Color::Rgb(65, 72, 104),

            text: Color::Rgb(192, 202, 245),
            text_dim: Color::Rgb(154, 165, 206),
            text_muted: Color::Rgb(86, 95, 137),

            accent: Color::Rgb(122, 162, 247),
            ok: Color::Rgb(158, 206, 106),
            warn: Color::Rgb(224, 175, 104),
            danger: Color::Rgb(247, 118, 142),

            node: Color::Rgb(115, 218, 202),
            pods: Color::Rgb(187, 154, 247),

            cursor_bg: Color::Rgb(122, 162, 247),
            cursor_fg: Color::Rgb(26, 27, 38),

            share_stops: [
                Color::Rgb(158, 206, 106),
                Color::Rgb(224, 175, 104),
                Color::Rgb(247, 118, 142),
            ],
        }
    }
}

impl Theme {
    /// Bar color for an item's fraction of the listed total (0.0 to 1.0).
    /// Anything at or above half the total is drawn fully hot.
    pub fn share_color(&self, fraction: f64) -> Color {
        let [low, mid, high] = self.share_stops;
        let t = (fraction * 2.0).clamp(0.0, 1.0);
        if t < 0.5 {
            blend(low, mid, t * 2.0)
        } else {
            blend(mid, high, (t - 0.5) * 2.0)
        }
    }

    pub fn kind_color(&self, kind: ArtifactKind) -> Color {
        match kind {
            ArtifactKind::NodeModules => self.node,
            ArtifactKind::Pods => self.pods,
        }
    }

    /// Color for a ledger outcome
    pub fn outcome_color(&self, success: bool) -> Color {
        if success { self.ok } else { self.danger }
    }
}

fn blend(from: Color, to: Color, t: f64) -> Color {
    let (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) = (from, to) else {
        return to;
    };
    let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    Color::Rgb(channel(r1, r2), channel(g1, g2), channel(b1, b2))
}
