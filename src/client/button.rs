use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Presentation states of the like button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    Animating,
    ConfettiShown,
    Liked,
}

impl ButtonState {
    /// CSS classes present on the element in this state
    pub fn classes(self) -> &'static [&'static str] {
        match self {
            ButtonState::Idle => &[],
            ButtonState::Animating => &["animation"],
            ButtonState::ConfettiShown => &["animation", "confetti"],
            ButtonState::Liked => &["animation", "confetti", "liked"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ButtonState::Liked => "Saved",
            _ => "",
        }
    }
}

/// The element the state machine draws into
pub trait ButtonView: Send + Sync + 'static {
    fn render(&self, state: ButtonState);
}

/// Delays between the staged "liked" transitions
#[derive(Debug, Clone, Copy)]
pub struct StageTimings {
    /// From `Animating` to `ConfettiShown`
    pub confetti_after: Duration,
    /// From `ConfettiShown` to `Liked`
    pub liked_after: Duration,
}

impl Default for StageTimings {
    fn default() -> Self {
        Self {
            confetti_after: Duration::from_millis(260),
            liked_after: Duration::from_millis(400),
        }
    }
}

struct Shared {
    state: ButtonState,
    /// Bumped on every transition request; a staged step only applies if
    /// the generation it was scheduled under is still current.
    generation: u64,
}

/// Click-driven state machine for one like button
///
/// Entering `Liked` is staged over timers; leaving it is immediate. A new
/// request cancels the timers of the previous one, so a late stage can
/// never overwrite a newer state. Staged transitions need a Tokio runtime.
pub struct LikeButtonMachine<V: ButtonView> {
    view: Arc<V>,
    shared: Arc<Mutex<Shared>>,
    pending: Option<JoinHandle<()>>,
    timings: StageTimings,
}

impl<V: ButtonView> LikeButtonMachine<V> {
    pub fn new(view: Arc<V>) -> Self {
        Self::with_timings(view, StageTimings::default())
    }

    pub fn with_timings(view: Arc<V>, timings: StageTimings) -> Self {
        Self {
            view,
            shared: Arc::new(Mutex::new(Shared {
                state: ButtonState::Idle,
                generation: 0,
            })),
            pending: None,
            timings,
        }
    }

    pub fn state(&self) -> ButtonState {
        lock(&self.shared).state
    }

    /// Page-load rendering: jump straight to the final state, no animation
    pub fn restore(&mut self, liked: bool) {
        let target = if liked { ButtonState::Liked } else { ButtonState::Idle };
        let generation = self.begin_transition();
        apply(&self.shared, self.view.as_ref(), generation, target);
    }

    /// Click rendering
    pub fn render_liked(&mut self, liked: bool) {
        let generation = self.begin_transition();

        if !liked {
            apply(&self.shared, self.view.as_ref(), generation, ButtonState::Idle);
            return;
        }

        apply(&self.shared, self.view.as_ref(), generation, ButtonState::Animating);

        let shared = Arc::clone(&self.shared);
        let view = Arc::clone(&self.view);
        let timings = self.timings;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(timings.confetti_after).await;
            if !apply(&shared, view.as_ref(), generation, ButtonState::ConfettiShown) {
                return;
            }
            tokio::time::sleep(timings.liked_after).await;
            apply(&shared, view.as_ref(), generation, ButtonState::Liked);
        }));
    }

    /// Cancels in-flight timers and claims a new generation
    fn begin_transition(&mut self) -> u64 {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        let mut shared = lock(&self.shared);
        shared.generation += 1;
        shared.generation
    }
}

impl<V: ButtonView> Drop for LikeButtonMachine<V> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

fn lock(shared: &Mutex<Shared>) -> std::sync::MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Moves to `state` if `generation` is still current. Rendering happens
/// under the lock so views observe transitions in order.
fn apply<V: ButtonView>(
    shared: &Mutex<Shared>,
    view: &V,
    generation: u64,
    state: ButtonState,
) -> bool {
    let mut shared = lock(shared);
    if shared.generation != generation {
        return false;
    }
    shared.state = state;
    view.render(state);
    true
}
