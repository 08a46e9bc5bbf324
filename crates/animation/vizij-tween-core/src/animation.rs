//! Animation: subject bindings, playback state machine and step executor.
//!
//! Lifecycle:
//! - `new` normalizes keyframes, resolves options and binds configured subjects
//! - `play` subscribes to the clock; every delivered signal runs `on_signal`
//! - `on_signal` consumes delay, advances frames, steps, and on completion
//!   resets and either replays (repeat) or emits `end`

use std::fmt;
use std::rc::Rc;

use crate::clock::{Channel, Clock, ClockSignal};
use crate::config::{AnimationConfig, Repeat, TimeSpec};
use crate::easing::Easing;
use crate::events::{EventHub, EventKind, Observable};
use crate::gap_fill::{ensure_anchor_complete, fill_gaps};
use crate::ids::SubscriberId;
use crate::playback::{PlaybackPhase, PlaybackState};
use crate::schedule::{Keyframe, KeyframeSpec, Schedule};
use crate::segments::{build_segments, ensure_same_layout, Segment};
use crate::subject::{Strategy, SubjectRef};
use crate::Result;

/// A subject paired with its own segments and get/set strategy.
struct SubjectBinding {
    subject: SubjectRef,
    strategy: Strategy,
    segments: Vec<Segment>,
}

pub struct Animation {
    clock: Rc<dyn Clock>,
    subscriber: SubscriberId,
    schedule: Schedule,
    easing: Option<Easing>,
    default_strategy: Strategy,
    delay: u32,
    repeat: Repeat,
    timeline_bound: bool,
    bindings: Vec<SubjectBinding>,
    state: PlaybackState,
    phase: PlaybackPhase,
    has_begun: bool,
    events: EventHub<Animation>,
}

impl Animation {
    /// Create an animation over `duration` (frames or a time label) from
    /// declared keyframes. Subjects listed in `config` are bound immediately.
    pub fn new<I>(
        duration: impl Into<TimeSpec>,
        keyframes: I,
        config: AnimationConfig,
        clock: Rc<dyn Clock>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = KeyframeSpec>,
    {
        let duration: TimeSpec = duration.into();
        let duration = duration.resolve(clock.as_ref())?;
        let schedule = Schedule::normalize(duration, keyframes, clock.as_ref())?;
        let delay = config.options.delay.resolve(clock.as_ref())?;
        let repeat = config.options.repeat;
        let easing = config.resolved_easing();
        let default_strategy = config.resolved_strategy();
        let subscriber = clock.register();

        let mut anim = Self {
            clock,
            subscriber,
            schedule,
            easing,
            default_strategy,
            delay,
            repeat,
            timeline_bound: config.options.is_timeline_bound,
            bindings: Vec::new(),
            state: PlaybackState::new(delay, repeat_count(repeat)),
            phase: PlaybackPhase::Stopped,
            has_begun: false,
            events: EventHub::new(),
        };

        for (name, handler) in config.handlers {
            anim.events.on(&name, handler);
        }
        for subject in config.subjects {
            anim.add_subject(subject)?;
        }
        log::debug!(
            "animation {:?}: duration={} keys={:?} delay={} repeat={:?}",
            anim.subscriber,
            anim.schedule.duration(),
            anim.schedule.sorted_keys(),
            anim.delay,
            anim.repeat
        );
        Ok(anim)
    }

    // ---- subject bindings ----

    /// Bind a subject with the animation's configured strategy.
    pub fn add_subject(&mut self, subject: SubjectRef) -> Result<()> {
        let strategy = self.default_strategy.clone();
        self.add_subject_with(subject, strategy)
    }

    /// Bind a subject with an explicit strategy.
    ///
    /// The first binding gap-fills the shared schedule from this subject's
    /// snapshot. Later bindings must produce the same segment windows.
    pub fn add_subject_with(&mut self, subject: SubjectRef, strategy: Strategy) -> Result<()> {
        let mut anchor = {
            let s = subject.borrow();
            strategy.get(&*s, self.schedule.tracked_properties())
        };
        if let Some(overrides) = self.schedule.initial_overrides() {
            anchor.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        let filled = if self.schedule.is_filled() {
            None
        } else {
            let mut filled = self.schedule.clone();
            fill_gaps(&mut filled, &anchor)?;
            Some(filled)
        };
        let schedule = filled.as_ref().unwrap_or(&self.schedule);

        ensure_anchor_complete(schedule, &anchor)?;
        let segments = build_segments(schedule, &anchor);
        if let Some(reference) = self.bindings.first() {
            ensure_same_layout(&reference.segments, &segments)?;
        }
        if let Some(filled) = filled {
            self.schedule = filled;
        }
        log::debug!(
            "animation {:?}: bound subject #{} ({} segments, {:?})",
            self.subscriber,
            self.bindings.len(),
            segments.len(),
            strategy
        );
        self.bindings.push(SubjectBinding {
            subject,
            strategy,
            segments,
        });
        Ok(())
    }

    /// Unbind every binding of `subject`. Returns whether anything was removed.
    pub fn remove_subject(&mut self, subject: &SubjectRef) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| !Rc::ptr_eq(&b.subject, subject));
        let removed = before != self.bindings.len();
        if removed {
            log::debug!("animation {:?}: removed subject", self.subscriber);
        }
        removed
    }

    // ---- playback ----

    pub fn play(&mut self) {
        if self.state.is_playing {
            return;
        }
        if self.state.frame == 0 {
            if let Some(initial) = self.schedule.initial_overrides() {
                for b in &self.bindings {
                    b.strategy.set(&mut *b.subject.borrow_mut(), initial);
                }
            }
            if !self.has_begun {
                self.has_begun = true;
                self.notify(EventKind::Begin);
            }
        }
        self.clock.subscribe(self.channel(), self.subscriber);
        self.state.is_playing = true;
        self.set_phase(PlaybackPhase::Playing);
        log::debug!(
            "animation {:?}: play at frame {} on {}",
            self.subscriber,
            self.state.frame,
            self.channel().name()
        );
        self.notify(EventKind::Play);
    }

    /// Stop receiving signals, keeping the current position.
    pub fn pause(&mut self) {
        if !self.state.is_playing {
            return;
        }
        self.clock.unsubscribe(self.channel(), self.subscriber);
        self.state.is_playing = false;
        self.set_phase(PlaybackPhase::Paused);
        log::debug!(
            "animation {:?}: pause at frame {}",
            self.subscriber,
            self.state.frame
        );
        self.notify(EventKind::Pause);
    }

    /// Rewind to frame 0 and stop receiving signals. Keyframes and bindings persist.
    pub fn reset(&mut self) {
        self.clock.unsubscribe(self.channel(), self.subscriber);
        self.state.frame = 0;
        self.state.prev_frame = None;
        self.state.current_tween = 0;
        self.state.is_playing = false;
        self.set_phase(PlaybackPhase::Stopped);
        log::debug!("animation {:?}: reset", self.subscriber);
    }

    /// Pause, then reset with the configured delay restored.
    pub fn stop(&mut self) {
        self.pause();
        self.reset();
        self.state.current_delay = self.delay;
    }

    /// Handle one delivered clock signal.
    pub fn on_signal(&mut self, signal: ClockSignal) {
        if !self.state.is_playing {
            return;
        }
        if self.state.current_delay > 0 {
            self.state.current_delay -= 1;
            log::trace!(
                "animation {:?}: delay, {} left",
                self.subscriber,
                self.state.current_delay
            );
            return;
        }

        let (reported, finished, elapsed) = match signal {
            ClockSignal::Advance { frame, finished } if self.timeline_bound => {
                (frame, finished, self.state.elapsed_since(frame))
            }
            ClockSignal::Advance { frame, finished } => (frame, finished, 1),
            ClockSignal::Tick { frame } => (frame, false, 1),
        };

        let duration = self.schedule.duration();
        self.state.frame = self.state.frame.saturating_add(elapsed).min(duration);
        self.step(self.progress());

        if finished || self.state.frame >= duration {
            self.complete_cycle();
        } else {
            self.state.prev_frame = Some(reported);
        }
    }

    fn complete_cycle(&mut self) {
        log::debug!("animation {:?}: cycle complete", self.subscriber);
        self.state.current_delay = self.delay;
        self.reset();

        let replay = match self.repeat {
            Repeat::Unlimited => true,
            Repeat::Count(_) if self.state.repeat_counter > 0 => {
                self.state.repeat_counter -= 1;
                true
            }
            Repeat::Count(_) => false,
        };

        if replay {
            log::debug!(
                "animation {:?}: repeat ({:?} left)",
                self.subscriber,
                self.repeat_remaining()
            );
            self.play();
        } else {
            self.set_phase(PlaybackPhase::Completed);
            self.has_begun = false;
            self.state.repeat_counter = repeat_count(self.repeat);
            log::debug!("animation {:?}: end", self.subscriber);
            self.notify(EventKind::End);
        }
    }

    // ---- stepping ----

    /// Apply the interpolated values for whole-timeline `progress` to every subject.
    ///
    /// The active segment is chosen on the first subject's segments and the same
    /// index is used for all subjects.
    ///
    /// Local segment progress is clamped to `[0,1]`, so an easing that
    /// overshoots (back or elastic curves) holds at the first or last keyframe
    /// instead of extrapolating past it.
    pub fn step(&mut self, progress: f32) {
        let eased = match &self.easing {
            Some(easing) => easing.apply(progress),
            None => progress,
        };
        let Some(reference) = self.bindings.first() else {
            return;
        };
        let segments = &reference.segments;
        if segments.is_empty() {
            return;
        }

        let mut idx = self.state.current_tween.min(segments.len() - 1);
        while idx > 0 && eased < segments[idx].start_progress {
            idx -= 1;
        }
        let local = loop {
            match segments[idx].local_progress(eased) {
                Some(p) if p <= 1.0 => break p,
                _ if idx + 1 < segments.len() => idx += 1,
                Some(p) => break p,
                None => break 1.0,
            }
        };
        let local = local.clamp(0.0, 1.0);
        self.state.current_tween = idx;

        for b in &self.bindings {
            let values = b.segments[idx].at(local);
            b.strategy.set(&mut *b.subject.borrow_mut(), &values);
        }
        log::trace!(
            "animation {:?}: step progress={progress} segment={idx} local={local}",
            self.subscriber
        );
    }

    fn set_phase(&mut self, phase: PlaybackPhase) {
        if self.phase != phase {
            log::trace!(
                "animation {:?}: {} -> {}",
                self.subscriber,
                self.phase.name(),
                phase.name()
            );
        }
        self.phase = phase;
    }

    fn notify(&mut self, kind: EventKind) {
        let mut events = std::mem::take(&mut self.events);
        events.emit(kind.name(), self);
        self.events = events;
    }

    #[inline]
    fn channel(&self) -> Channel {
        if self.timeline_bound {
            Channel::Advance
        } else {
            Channel::Tick
        }
    }

    // ---- inspection ----

    #[inline]
    pub fn subscriber_id(&self) -> SubscriberId {
        self.subscriber
    }

    #[inline]
    pub fn duration(&self) -> u32 {
        self.schedule.duration()
    }

    #[inline]
    pub fn frame(&self) -> u32 {
        self.state.frame
    }

    /// Fraction of the duration elapsed in the current cycle.
    pub fn progress(&self) -> f32 {
        self.schedule.progress_of(self.state.frame)
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    #[inline]
    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    #[inline]
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    #[inline]
    pub fn is_timeline_bound(&self) -> bool {
        self.timeline_bound
    }

    pub fn sorted_keys(&self) -> Vec<u32> {
        self.schedule.sorted_keys()
    }

    pub fn keyframe(&self, frame: u32) -> Option<&Keyframe> {
        self.schedule.keyframe(frame)
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn subject_count(&self) -> usize {
        self.bindings.len()
    }

    /// Segments of the `index`-th bound subject.
    pub fn segments(&self, index: usize) -> Option<&[Segment]> {
        self.bindings.get(index).map(|b| b.segments.as_slice())
    }

    /// Finite repeats left; `None` when repeating without limit.
    pub fn repeat_remaining(&self) -> Option<u32> {
        match self.repeat {
            Repeat::Unlimited => None,
            Repeat::Count(_) => Some(self.state.repeat_counter),
        }
    }
}

impl Observable for Animation {
    fn events_mut(&mut self) -> &mut EventHub<Self> {
        &mut self.events
    }
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("subscriber", &self.subscriber)
            .field("schedule", &self.schedule)
            .field("easing", &self.easing)
            .field("delay", &self.delay)
            .field("repeat", &self.repeat)
            .field("timeline_bound", &self.timeline_bound)
            .field("subjects", &self.bindings.len())
            .field("state", &self.state)
            .field("phase", &self.phase)
            .field("events", &self.events)
            .finish()
    }
}

fn repeat_count(repeat: Repeat) -> u32 {
    match repeat {
        Repeat::Count(n) => n,
        Repeat::Unlimited => 0,
    }
}
