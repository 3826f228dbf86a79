use tracing::{debug, info};

use crate::assets::types::ResolvedAssets;
use crate::encode::FrameSink;
use crate::error::Result;
use crate::render::compositor::FrameCompositor;
use crate::render::frame::Frame;
use crate::timeline::Timeline;

/// Deterministic frame-pacing loop
///
/// Every frame is rendered from its index (`elapsed = index / fps`), so the
/// same inputs always produce the same frame sequence and the run proceeds
/// at encode speed rather than wall-clock speed. The loop bound covers the
/// narration duration plus the half-second tail; ticks are strictly
/// sequential by construction.
pub struct FrameScheduler {
    fps: f64,
}

impl FrameScheduler {
    pub fn new(fps: f64) -> Self {
        Self { fps }
    }

    /// Render the whole timeline into `sink`, returning the frame count
    pub fn run(
        &self,
        timeline: &Timeline,
        assets: &ResolvedAssets,
        surface: &mut Frame,
        compositor: &mut FrameCompositor,
        sink: &mut dyn FrameSink,
    ) -> Result<u64> {
        let total_frames = timeline.frame_count(self.fps);
        info!(
            "Rendering {} frames at {:.0} fps ({:.1}s total)",
            total_frames, self.fps, timeline.total_duration
        );

        // One progress line per rendered second keeps verbose logs readable
        let stride = (self.fps.round() as u64).max(1);

        for frame_index in 0..total_frames {
            let elapsed = frame_index as f64 / self.fps;
            compositor.render(surface, elapsed, timeline, assets);
            sink.write_frame(surface)?;

            if frame_index % stride == 0 {
                debug!(
                    "Rendered frame {}/{} ({:.1}s)",
                    frame_index, total_frames, elapsed
                );
            }
        }

        Ok(total_frames)
    }
}
