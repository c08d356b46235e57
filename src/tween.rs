//! Timed property transitions over scene channels.
//!
//! Every track is keyed by `(entity, channel)`. Registering a new request for a
//! key drops whatever track was stored there before, whether it had started or
//! was still waiting out its delay, so the most recent call always decides the
//! final value regardless of which transition would have finished first.

use crate::ecs::{read_channel, write_channel, Channel};
use bevy_ecs::prelude::{Entity, World};
use log::trace;
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Slack used when comparing scheduler time against start/due times, so that
/// accumulated frame deltas still land on boundaries like 1.5 s.
pub const TIME_EPSILON: f64 = 1e-4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    Linear,
    #[default]
    OutQuad,
    InOutQuad,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) * 0.5
                }
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct TweenRequest {
    pub target: Entity,
    pub deltas: SmallVec<[(Channel, f32); 6]>,
    pub duration: f32,
    pub delay: f32,
    pub ease: Ease,
}

impl TweenRequest {
    pub fn new(target: Entity, duration: f32) -> Self {
        Self { target, deltas: SmallVec::new(), duration, delay: 0.0, ease: Ease::default() }
    }

    pub fn to(mut self, channel: Channel, value: f32) -> Self {
        self.deltas.push((channel, value));
        self
    }

    pub fn to_all(mut self, deltas: impl IntoIterator<Item = (Channel, f32)>) -> Self {
        self.deltas.extend(deltas);
        self
    }

    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenHandle(u64);

#[derive(Clone, Debug)]
struct Track {
    handle: TweenHandle,
    start: f64,
    duration: f32,
    from: Option<f32>,
    to: f32,
    ease: Ease,
}

#[derive(Clone, Debug)]
struct PendingCall<A> {
    due: f64,
    seq: u64,
    action: A,
}

pub struct TweenScheduler<A> {
    now: f64,
    next_id: u64,
    tracks: BTreeMap<(Entity, Channel), Track>,
    calls: Vec<PendingCall<A>>,
}

impl<A> Default for TweenScheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> TweenScheduler<A> {
    pub fn new() -> Self {
        Self { now: 0.0, next_id: 1, tracks: BTreeMap::new(), calls: Vec::new() }
    }

    pub fn elapsed(&self) -> f64 {
        self.now
    }

    pub fn animate(&mut self, request: TweenRequest) -> TweenHandle {
        let handle = TweenHandle(self.bump_id());
        let start = self.now + f64::from(request.delay.max(0.0));
        let duration = request.duration.max(0.0);
        for (channel, to) in request.deltas {
            let track = Track { handle, start, duration, from: None, to, ease: request.ease };
            if let Some(previous) = self.tracks.insert((request.target, channel), track) {
                trace!(
                    "[tween] {:?} {:?}: track {:?} superseded by {:?}",
                    request.target,
                    channel,
                    previous.handle,
                    handle
                );
            }
        }
        handle
    }

    pub fn delayed_call(&mut self, delay: f32, action: A) {
        let seq = self.bump_id();
        self.calls.push(PendingCall { due: self.now + f64::from(delay.max(0.0)), seq, action });
    }

    /// Cancels any track on the key and writes the value immediately.
    pub fn set_now(&mut self, world: &mut World, entity: Entity, channel: Channel, value: f32) -> bool {
        self.tracks.remove(&(entity, channel));
        write_channel(world, entity, channel, value)
    }

    pub fn is_active(&self, handle: TweenHandle) -> bool {
        self.tracks.values().any(|track| track.handle == handle)
    }

    /// Final value the key is heading to, if a track is stored for it.
    pub fn target_of(&self, entity: Entity, channel: Channel) -> Option<f32> {
        self.tracks.get(&(entity, channel)).map(|track| track.to)
    }

    pub fn active_tracks(&self) -> usize {
        self.tracks.len()
    }

    pub fn pending_calls(&self) -> usize {
        self.calls.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tracks.is_empty() && self.calls.is_empty()
    }

    /// Moves the clock by `dt`, writes every started track and returns the
    /// delayed actions that came due, oldest first.
    pub fn advance(&mut self, world: &mut World, dt: f32) -> Vec<A> {
        if dt.is_finite() && dt > 0.0 {
            self.now += f64::from(dt);
        }
        let now = self.now;

        let mut retired: SmallVec<[(Entity, Channel); 16]> = SmallVec::new();
        for (&(entity, channel), track) in self.tracks.iter_mut() {
            if now + TIME_EPSILON < track.start {
                continue;
            }
            let from = match track.from {
                Some(value) => value,
                None => match read_channel(world, entity, channel) {
                    Some(value) => {
                        track.from = Some(value);
                        value
                    }
                    None => {
                        retired.push((entity, channel));
                        continue;
                    }
                },
            };
            let done = track.duration <= 0.0 || now + TIME_EPSILON >= track.start + f64::from(track.duration);
            let value = if done {
                track.to
            } else {
                let progress = ((now - track.start) / f64::from(track.duration)) as f32;
                from + (track.to - from) * track.ease.apply(progress)
            };
            let written = write_channel(world, entity, channel, value);
            if done || !written {
                retired.push((entity, channel));
            }
        }
        for key in retired {
            self.tracks.remove(&key);
        }

        let (mut ready, waiting): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.calls).into_iter().partition(|call| call.due <= now + TIME_EPSILON);
        self.calls = waiting;
        ready.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        ready.into_iter().map(|call| call.action).collect()
    }

    fn bump_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
