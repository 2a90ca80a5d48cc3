use std::path::{Component, Path};
use std::time::{Duration, Instant};

/// Nominal walk rate used when no live counters are available (dirs/s)
const BASELINE_SPEED: f64 = 800.0;

/// Relative amplitude of the synthetic speed wobble
const SPEED_WOBBLE: f64 = 0.05;

/// Weight given to the previous speed when smoothing
const SPEED_SMOOTHING: f64 = 0.8;

/// Path fragments that suggest a development workspace
const DEV_PATTERNS: &[&str] = &[
    "projects",
    "code",
    "development",
    "dev",
    "workspace",
    "repos",
    "repositories",
    "src",
    "source",
    "github",
    "gitlab",
    "bitbucket",
];

/// Coarse classification of where a scan starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Home,
    Projects,
    Documents,
    Downloads,
    Other,
}

impl Zone {
    pub fn label(&self) -> &'static str {
        match self {
            Zone::Home => "Home",
            Zone::Projects => "Projects",
            Zone::Documents => "Documents",
            Zone::Downloads => "Downloads",
            Zone::Other => "Other",
        }
    }
}

/// Whether progress numbers come from the walk or from a time model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Measured,
    Estimated,
}

/// The part of `start` below `home`, or all of `start` outside it
fn relative_to_home<'a>(start: &'a Path, home: Option<&Path>) -> &'a Path {
    home.and_then(|h| start.strip_prefix(h).ok())
        .unwrap_or(start)
}

fn depth_below_home(start: &Path, home: Option<&Path>) -> usize {
    relative_to_home(start, home)
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count()
}

pub fn classify_zone(start: &Path, home: Option<&Path>) -> Zone {
    if home.is_some_and(|h| h == start) {
        return Zone::Home;
    }

    let lower = relative_to_home(start, home)
        .to_string_lossy()
        .to_lowercase();

    if DEV_PATTERNS.iter().any(|p| lower.contains(p)) {
        Zone::Projects
    } else if lower.contains("documents") || lower.contains("desktop") {
        Zone::Documents
    } else if lower.contains("downloads") {
        Zone::Downloads
    } else {
        Zone::Other
    }
}

/// Rough number of directories a scan from `start` will visit.
///
/// Only feeds the progress bar. Deeper starting points get smaller numbers.
pub fn estimate_total(start: &Path, home: Option<&Path>) -> u64 {
    if home.is_none() {
        return 5000;
    }

    let depth = depth_below_home(start, home);
    let tiered = |shallow, middle, deep| match depth {
        0..=2 => shallow,
        3..=4 => middle,
        _ => deep,
    };

    match classify_zone(start, home) {
        Zone::Home => 15000,
        Zone::Projects => tiered(3000, 1500, 500),
        Zone::Documents => tiered(5000, 2000, 800),
        Zone::Downloads => 2000,
        Zone::Other => tiered(3000, 1500, 500),
    }
}

/// What the progress view shows for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub directories_scanned: u64,
    pub estimated_total: u64,
    /// In `[0, 1]`
    pub percent: f64,
    /// Directories per second, smoothed
    pub speed: f64,
    pub eta: Option<Duration>,
    pub precision: Precision,
    pub zone: Zone,
    pub elapsed: Duration,
}

/// Smoothed, monotonic progress for one scan session
#[derive(Debug, Clone)]
pub struct ProgressEstimator {
    start: Instant,
    zone: Zone,
    estimated_total: u64,
    directories_scanned: u64,
    speed: f64,
    precision: Precision,
    last_sample: Option<(Instant, u64)>,
    last_tick: Instant,
}

impl ProgressEstimator {
    pub fn new(start: Instant, root: &Path, home: Option<&Path>) -> Self {
        Self {
            start,
            zone: classify_zone(root, home),
            estimated_total: estimate_total(root, home),
            directories_scanned: 0,
            speed: 0.0,
            precision: Precision::Estimated,
            last_sample: None,
            last_tick: start,
        }
    }

    /// Advance to `now`. Pass the walk's live directory count when there is
    /// one; without it the count is interpolated from elapsed time.
    pub fn tick(&mut self, now: Instant, live: Option<u64>) -> ProgressSnapshot {
        self.last_tick = now;
        match live {
            Some(count) => self.observe(now, count),
            None if self.precision == Precision::Measured => {}
            None => self.interpolate(now),
        }
        self.snapshot()
    }

    fn observe(&mut self, now: Instant, count: u64) {
        if self.precision == Precision::Estimated {
            // Synthetic speed says nothing about the real walk
            self.precision = Precision::Measured;
            self.speed = 0.0;
            self.directories_scanned = count;
        }

        let (since, base) = self.last_sample.unwrap_or((self.start, 0));
        let dt = now.saturating_duration_since(since).as_secs_f64();
        if dt > 0.0 {
            let instantaneous = count.saturating_sub(base) as f64 / dt;
            self.smooth_speed(instantaneous);
            self.last_sample = Some((now, count));
        }
        self.directories_scanned = self.directories_scanned.max(count);
    }

    fn interpolate(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.start).as_secs_f64();
        let instantaneous = BASELINE_SPEED * (1.0 + SPEED_WOBBLE * (elapsed * 0.5).sin());
        self.smooth_speed(instantaneous);

        let projected = (elapsed * self.speed) as u64;
        self.directories_scanned = self
            .directories_scanned
            .max(projected)
            .min(self.estimated_total);
    }

    fn smooth_speed(&mut self, instantaneous: f64) {
        self.speed = if self.speed == 0.0 {
            instantaneous
        } else {
            SPEED_SMOOTHING * self.speed + (1.0 - SPEED_SMOOTHING) * instantaneous
        };
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let percent = if self.estimated_total == 0 {
            0.0
        } else {
            (self.directories_scanned as f64 / self.estimated_total as f64).clamp(0.0, 1.0)
        };

        let remaining = self.estimated_total.saturating_sub(self.directories_scanned);
        let eta = (self.speed > 0.0 && remaining > 0)
            .then(|| Duration::from_secs_f64(remaining as f64 / self.speed));

        ProgressSnapshot {
            directories_scanned: self.directories_scanned,
            estimated_total: self.estimated_total,
            percent,
            speed: self.speed,
            eta,
            precision: self.precision,
            zone: self.zone,
            elapsed: self.last_tick.saturating_duration_since(self.start),
        }
    }

    pub fn start(&self) -> Instant {
        self.start
    }
}
