//! # Composition Timeline
//!
//! Pure timing math for a composition run. Given the narration duration and
//! the number of slides, the planner fixes the phase boundaries once; the
//! compositor and scheduler then derive everything else from a timestamp.
//!
//! The output is split into two phases:
//!
//! - **Intro**: the first six seconds, sourced from an intro clip or a
//!   fallback thumbnail.
//! - **Slideshow**: the remaining duration, divided into equal per-slide
//!   windows of at least four seconds each.

/// Length of the intro phase in seconds
pub const INTRO_DURATION_SECS: f64 = 6.0;

/// Per-slide window never shrinks below this
pub const MIN_SLIDE_SECS: f64 = 4.0;

/// Per-slide window used when there are no slides at all
pub const FALLBACK_SLIDE_SECS: f64 = 8.0;

/// Extra tail rendered past the end of the narration
pub const TAIL_SECS: f64 = 0.5;

/// Which phase of the composition a timestamp falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Intro,
    Slideshow,
}

/// Immutable timing plan for one composition run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    /// Duration of the narration track in seconds
    pub audio_duration: f64,

    /// Length of the intro phase in seconds
    pub intro_duration: f64,

    /// Total rendered duration (narration plus tail) in seconds
    pub total_duration: f64,

    /// Display window per slide in seconds
    pub slide_duration: f64,

    /// Number of slides in the slideshow phase
    pub slide_count: usize,
}

impl Timeline {
    /// Plan the timeline for a run.
    ///
    /// A narration shorter than the intro yields a negative slideshow window;
    /// the per-slide floor still applies and the slides are simply never
    /// reached before the run stops.
    pub fn plan(audio_duration: f64, slide_count: usize) -> Self {
        let slideshow_duration = audio_duration - INTRO_DURATION_SECS;

        let slide_duration = if slide_count > 0 {
            (slideshow_duration / slide_count as f64).max(MIN_SLIDE_SECS)
        } else {
            FALLBACK_SLIDE_SECS
        };

        Self {
            audio_duration,
            intro_duration: INTRO_DURATION_SECS,
            total_duration: audio_duration + TAIL_SECS,
            slide_duration,
            slide_count,
        }
    }

    /// Phase the given timestamp falls into
    pub fn phase_at(&self, elapsed: f64) -> Phase {
        if elapsed < self.intro_duration {
            Phase::Intro
        } else {
            Phase::Slideshow
        }
    }

    /// Slide shown at the given timestamp, clamped to the last slide.
    ///
    /// Returns `None` when there are no slides; the slideshow phase then
    /// renders nothing beyond a black background.
    pub fn slide_index_at(&self, elapsed: f64) -> Option<usize> {
        if self.slide_count == 0 {
            return None;
        }

        let relative = (elapsed - self.intro_duration).max(0.0);
        let index = (relative / self.slide_duration).floor() as usize;
        Some(index.min(self.slide_count - 1))
    }

    /// Number of frames needed to cover the total duration at the given rate
    pub fn frame_count(&self, fps: f64) -> u64 {
        (self.total_duration * fps).ceil() as u64
    }
}
