//! Highlight transitions stepped frame by frame on a worker thread.

mod gate;
mod label;

pub use gate::FrameGate;
pub use label::{FixedAdvanceLabels, LabelRenderer, RenderedLabel};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::{FeatureFlags, LayoutSettings};
use crate::queue::LatestOnlyQueue;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Highlight movement from one row to another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub start: Point,
    pub target: Point,
    /// Where the destination label is drawn on the final frame.
    pub text_target: Point,
    pub width: i32,
    /// Interpolated frames after the starting one.
    pub frames: u32,
    /// Travel beyond this distance snaps instead of sliding.
    pub snap_distance: i32,
    pub label: String,
    pub label_width: i32,
}

impl Transition {
    /// Transition for a selection moving between two visible rows.
    pub fn between_rows(
        from_row: usize,
        to_row: usize,
        label: &str,
        layout: &LayoutSettings,
        features: FeatureFlags,
    ) -> Self {
        let row_y = |row: usize| layout.origin_y + row as i32 * layout.row_height;
        let target = Point::new(layout.origin_x, row_y(to_row));
        Self {
            start: Point::new(layout.origin_x, row_y(from_row)),
            target,
            text_target: Point::new(target.x + layout.label_padding, target.y),
            width: layout.row_width,
            frames: if features.menu_animations {
                layout.animation_frames
            } else {
                0
            },
            snap_distance: layout.row_height,
            label: label.to_string(),
            label_width: layout.row_width - 2 * layout.label_padding,
        }
    }

    /// Frames actually stepped: none when the highlight jumps further than one row.
    pub fn frame_count(&self) -> u32 {
        if (self.target.y - self.start.y).abs() > self.snap_distance {
            0
        } else {
            self.frames
        }
    }

    /// Highlight position for `frame` of `total`.
    pub fn position_at(&self, frame: u32, total: u32) -> Point {
        let t = if total == 0 {
            1.0
        } else {
            (frame as f32 / total as f32).min(1.0)
        };
        let lerp = |from: i32, to: i32| from + ((to - from) as f32 * t).round() as i32;
        Point::new(
            lerp(self.start.x, self.target.x),
            lerp(self.start.y, self.target.y),
        )
    }
}

/// One published animation step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightFrame {
    pub position: Point,
    pub width: i32,
    pub index: u32,
    pub last: bool,
    /// Destination label and its position; final frame only.
    pub label: Option<(Point, RenderedLabel)>,
}

struct Task {
    seq: u64,
    transition: Transition,
}

/// Runs one transition at a time; a newer transition replaces one not yet started.
pub struct AnimationSequencer {
    queue: Arc<LatestOnlyQueue<Task>>,
    gate: Arc<FrameGate>,
    submitted: AtomicU64,
    finished: Arc<AtomicU64>,
    published: Arc<AtomicU64>,
    acknowledged: AtomicU64,
    worker: Option<JoinHandle<()>>,
}

impl AnimationSequencer {
    /// Start the worker. `publish` runs on the worker thread for every frame.
    pub fn spawn(
        renderer: impl LabelRenderer,
        mut publish: impl FnMut(HighlightFrame) + Send + 'static,
    ) -> std::io::Result<Self> {
        let queue: Arc<LatestOnlyQueue<Task>> = Arc::new(LatestOnlyQueue::new());
        let gate = Arc::new(FrameGate::new());
        let finished = Arc::new(AtomicU64::new(0));
        let published = Arc::new(AtomicU64::new(0));
        let worker = {
            let queue = Arc::clone(&queue);
            let gate = Arc::clone(&gate);
            let finished = Arc::clone(&finished);
            let published = Arc::clone(&published);
            let mut publish = move |frame: HighlightFrame| {
                publish(frame);
                published.fetch_add(1, Ordering::AcqRel);
            };
            thread::Builder::new()
                .name("highlight-animation".to_string())
                .spawn(move || {
                    while let Some(task) = queue.take_blocking() {
                        if !run_task(&task.transition, &renderer, &gate, &mut publish) {
                            break;
                        }
                        finished.store(task.seq, Ordering::Release);
                    }
                    tracing::debug!("Animation worker stopped");
                })?
        };
        Ok(Self {
            queue,
            gate,
            submitted: AtomicU64::new(0),
            finished,
            published,
            acknowledged: AtomicU64::new(0),
            worker: Some(worker),
        })
    }

    pub fn submit(&self, transition: Transition) {
        let seq = self.submitted.fetch_add(1, Ordering::AcqRel) + 1;
        if self.queue.send(Task { seq, transition }).is_some() {
            tracing::trace!("Replaced pending highlight transition");
        }
    }

    /// Render loop: the last frame received is now on screen.
    pub fn acknowledge_frame(&self) {
        let published = self.published.load(Ordering::Acquire);
        self.acknowledged.store(published, Ordering::Release);
        self.gate.acknowledge();
    }

    /// Run `present` and acknowledge when a frame was published since the last
    /// acknowledgement. False when there was nothing new to show.
    pub fn present_pending(&self, present: impl FnOnce()) -> bool {
        if self.published.load(Ordering::Acquire) == self.acknowledged.load(Ordering::Acquire) {
            return false;
        }
        // The worker cannot publish again until this acknowledgement.
        present();
        self.acknowledge_frame();
        true
    }

    /// Present and acknowledge frames until the sequencer is idle, polling every `tick`.
    pub fn run_until_idle(&self, tick: Duration, mut present: impl FnMut()) {
        while !self.is_idle() {
            if self.worker.as_ref().is_none_or(JoinHandle::is_finished) {
                tracing::warn!("Animation worker gone with frames outstanding");
                return;
            }
            if !self.present_pending(&mut present) {
                thread::sleep(tick);
            }
        }
    }

    /// Every submitted transition has finished and its last frame was acknowledged.
    pub fn is_idle(&self) -> bool {
        self.finished.load(Ordering::Acquire) == self.submitted.load(Ordering::Acquire)
            && self.published.load(Ordering::Acquire) == self.acknowledged.load(Ordering::Acquire)
    }

    pub fn shutdown(mut self) {
        self.stop();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            tracing::warn!("Animation worker panicked");
        }
    }

    fn stop(&self) {
        self.queue.close();
        self.gate.close();
    }
}

impl Drop for AnimationSequencer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_task(
    transition: &Transition,
    renderer: &impl LabelRenderer,
    gate: &FrameGate,
    publish: &mut impl FnMut(HighlightFrame),
) -> bool {
    let total = transition.frame_count();
    for index in 0..=total {
        if !gate.wait() {
            return false;
        }
        let last = index == total;
        let label = last.then(|| {
            (
                transition.text_target,
                renderer.render(&transition.label, transition.label_width),
            )
        });
        publish(HighlightFrame {
            position: transition.position_at(index, total),
            width: transition.width,
            index,
            last,
            label,
        });
    }
    true
}
