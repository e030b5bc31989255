use std::sync::{Condvar, Mutex};

struct GateState {
    ready: bool,
    closed: bool,
}

/// One-frame rendezvous between the animation worker and the render loop.
///
/// The worker may publish a frame only after the render loop acknowledged the
/// one before it. Starts open so the first frame goes out immediately.
pub struct FrameGate {
    state: Mutex<GateState>,
    acknowledged: Condvar,
}

impl Default for FrameGate {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState {
                ready: true,
                closed: false,
            }),
            acknowledged: Condvar::new(),
        }
    }

    /// Render loop: the last published frame is on screen.
    pub fn acknowledge(&self) {
        let mut state = self.state.lock().expect("frame gate poisoned");
        state.ready = true;
        self.acknowledged.notify_one();
    }

    /// Worker: wait for the acknowledgement and consume it. False once closed.
    pub fn wait(&self) -> bool {
        let mut state = self.state.lock().expect("frame gate poisoned");
        while !state.ready && !state.closed {
            state = self
                .acknowledged
                .wait(state)
                .expect("frame gate poisoned");
        }
        if state.closed {
            return false;
        }
        state.ready = false;
        true
    }

    pub fn close(&self) {
        let mut state = self.state.lock().expect("frame gate poisoned");
        state.closed = true;
        self.acknowledged.notify_all();
    }
}
