//! Keyframe timelines with an explicit timing graph.
//!
//! A timeline is authored with [`TimelineBuilder`]: every [`Keyframe`] is
//! anchored either at the timeline origin, at the start/end of the previous
//! keyframe, at the start/end of any other keyframe, or at a label, plus a
//! signed delay. [`TimelineBuilder::build`] resolves the anchors once into
//! absolute start times and rejects cycles, unknown references and negative
//! starts.
//!
//! Playback is driven either by wall-clock (`play`/`reverse` + `advance`) or
//! directly by a scroll position (`seek`). Start values are captured from the
//! live field the first time a keyframe renders, so a keyframe always
//! animates from wherever its field was when the playhead reached it.

use crate::core::ease::Ease;
use crate::core::error::TimelineError;
use crate::core::scene::{Animatable, Target};
use crate::core::viewport::Viewport;
use fnv::FnvHashMap;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyId(pub usize);

/// Target value of one field, optionally proportional to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Fixed(f32),
    Width(f32),
    Height(f32),
}

impl Value {
    pub fn resolve(&self, viewport: &Viewport) -> f32 {
        match *self {
            Value::Fixed(v) => v,
            Value::Width(f) => f * viewport.width(),
            Value::Height(f) => f * viewport.height(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Origin,
    /// Resolved by the builder to the keyframe pushed just before this one.
    Previous(Edge),
    Key(KeyId, Edge),
    Label(&'static str, Edge),
}

/// Side effect requested when a keyframe finishes playing forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    UnlockScroll,
}

#[derive(Debug, Clone)]
pub struct Keyframe {
    fields: SmallVec<[(Target, Value); 3]>,
    duration: f32,
    ease: Ease,
    anchor: Anchor,
    delay: f32,
    cue: Option<Cue>,
}

impl Keyframe {
    /// A keyframe appended after the end of the previous one.
    pub fn new(duration: f32) -> Self {
        Self {
            fields: SmallVec::new(),
            duration,
            ease: Ease::default(),
            anchor: Anchor::Previous(Edge::End),
            delay: 0.0,
            cue: None,
        }
    }

    pub fn to(mut self, target: Target, value: Value) -> Self {
        self.fields.push((target, value));
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Start together with the previous keyframe.
    pub fn with_previous(self) -> Self {
        self.anchor(Anchor::Previous(Edge::Start))
    }

    pub fn at(self, seconds: f32) -> Self {
        self.anchor(Anchor::Origin).delay(seconds)
    }

    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn cue(mut self, cue: Cue) -> Self {
        self.cue = Some(cue);
        self
    }
}

pub struct TimelineBuilder {
    name: &'static str,
    keys: Vec<Keyframe>,
    labels: FnvHashMap<&'static str, KeyId>,
}

impl TimelineBuilder {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            keys: Vec::new(),
            labels: FnvHashMap::default(),
        }
    }

    pub fn push(&mut self, mut key: Keyframe) -> KeyId {
        if let Anchor::Previous(edge) = key.anchor {
            key.anchor = match self.keys.len() {
                0 => Anchor::Origin,
                n => Anchor::Key(KeyId(n - 1), edge),
            };
        }
        self.keys.push(key);
        KeyId(self.keys.len() - 1)
    }

    /// Push `keys` so that the i-th starts `i * each` seconds after the first.
    pub fn stagger(
        &mut self,
        keys: impl IntoIterator<Item = Keyframe>,
        each: f32,
    ) -> SmallVec<[KeyId; 8]> {
        let mut ids = SmallVec::new();
        let mut first = None;
        for (i, key) in keys.into_iter().enumerate() {
            let id = match first {
                None => {
                    let id = self.push(key);
                    first = Some(id);
                    id
                }
                Some(first) => self.push(
                    key.anchor(Anchor::Key(first, Edge::Start))
                        .delay(i as f32 * each),
                ),
            };
            ids.push(id);
        }
        ids
    }

    pub fn label(&mut self, name: &'static str, key: KeyId) {
        self.labels.insert(name, key);
    }

    /// Re-anchor an already pushed keyframe. May introduce forward references.
    pub fn retime(&mut self, key: KeyId, anchor: Anchor, delay: f32) -> Result<(), TimelineError> {
        let len = self.keys.len();
        let k = self
            .keys
            .get_mut(key.0)
            .ok_or(TimelineError::UnknownKey(key.0, key.0))?;
        k.anchor = match anchor {
            Anchor::Previous(edge) if key.0 > 0 => Anchor::Key(KeyId(key.0 - 1), edge),
            Anchor::Previous(_) => Anchor::Origin,
            Anchor::Key(other, _) if other.0 >= len => {
                return Err(TimelineError::UnknownKey(key.0, other.0))
            }
            other => other,
        };
        k.delay = delay;
        Ok(())
    }

    pub fn build(self, viewport: &Viewport) -> Result<Timeline, TimelineError> {
        let starts = self.resolve_starts()?;
        let mut keys = Vec::with_capacity(self.keys.len());
        for (kf, start) in self.keys.into_iter().zip(starts) {
            keys.push(ResolvedKey {
                start,
                duration: kf.duration,
                ease: kf.ease,
                cue: kf.cue,
                initialized: false,
                last_progress: None,
                tracks: kf
                    .fields
                    .into_iter()
                    .map(|(target, spec)| Track {
                        target,
                        spec,
                        to: spec.resolve(viewport),
                        from: 0.0,
                    })
                    .collect(),
            });
        }
        let mut order: Vec<usize> = (0..keys.len()).collect();
        order.sort_by(|&a, &b| keys[a].start.total_cmp(&keys[b].start));
        let duration = keys
            .iter()
            .map(|k| k.start + k.duration)
            .fold(0.0_f32, f32::max);
        log::debug!(
            "[timeline] {} built: {} keyframes, {:.2}s",
            self.name,
            keys.len(),
            duration
        );
        Ok(Timeline {
            name: self.name,
            keys,
            order,
            duration,
            time: 0.0,
            direction: Direction::Forward,
            playing: false,
        })
    }

    fn resolve_starts(&self) -> Result<Vec<f32>, TimelineError> {
        for (i, k) in self.keys.iter().enumerate() {
            if !k.duration.is_finite() || k.duration < 0.0 {
                return Err(TimelineError::InvalidDuration(i, k.duration));
            }
        }
        let mut marks = vec![Mark::Unvisited; self.keys.len()];
        let mut starts = vec![0.0_f32; self.keys.len()];
        for i in 0..self.keys.len() {
            self.visit(i, &mut marks, &mut starts)?;
        }
        Ok(starts)
    }

    fn visit(&self, i: usize, marks: &mut [Mark], starts: &mut [f32]) -> Result<f32, TimelineError> {
        match marks[i] {
            Mark::Done => return Ok(starts[i]),
            Mark::Visiting => return Err(TimelineError::Cycle(i)),
            Mark::Unvisited => {}
        }
        marks[i] = Mark::Visiting;
        let key = &self.keys[i];
        let base = match key.anchor {
            Anchor::Origin | Anchor::Previous(_) => 0.0,
            Anchor::Key(other, edge) => self.edge_time(i, other, edge, marks, starts)?,
            Anchor::Label(name, edge) => {
                let other = *self
                    .labels
                    .get(name)
                    .ok_or_else(|| TimelineError::UnknownLabel(name.to_string()))?;
                self.edge_time(i, other, edge, marks, starts)?
            }
        };
        let start = base + key.delay;
        if start < -1e-6 {
            return Err(TimelineError::NegativeStart(i, start));
        }
        starts[i] = start.max(0.0);
        marks[i] = Mark::Done;
        Ok(starts[i])
    }

    fn edge_time(
        &self,
        from: usize,
        other: KeyId,
        edge: Edge,
        marks: &mut [Mark],
        starts: &mut [f32],
    ) -> Result<f32, TimelineError> {
        if other.0 >= self.keys.len() {
            return Err(TimelineError::UnknownKey(from, other.0));
        }
        let s = self.visit(other.0, marks, starts)?;
        Ok(match edge {
            Edge::Start => s,
            Edge::End => s + self.keys[other.0].duration,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

#[derive(Debug, Clone)]
struct Track {
    target: Target,
    spec: Value,
    to: f32,
    from: f32,
}

#[derive(Debug, Clone)]
struct ResolvedKey {
    start: f32,
    duration: f32,
    ease: Ease,
    cue: Option<Cue>,
    initialized: bool,
    last_progress: Option<f32>,
    tracks: SmallVec<[Track; 3]>,
}

impl ResolvedKey {
    fn end(&self) -> f32 {
        self.start + self.duration
    }

    fn apply(&self, p: f32, target: &mut impl Animatable) {
        let eased = self.ease.apply(p);
        for track in &self.tracks {
            let value = if p >= 1.0 {
                track.to
            } else if p <= 0.0 {
                track.from
            } else {
                track.from + (track.to - track.from) * eased
            };
            target.write(track.target, value);
        }
    }

    fn progress(&self, time: f32) -> f32 {
        if self.duration <= 0.0 {
            if time >= self.start {
                1.0
            } else {
                0.0
            }
        } else {
            ((time - self.start) / self.duration).clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

#[derive(Debug, Clone)]
pub struct Timeline {
    name: &'static str,
    keys: Vec<ResolvedKey>,
    order: Vec<usize>,
    duration: f32,
    time: f32,
    direction: Direction,
    playing: bool,
}

impl Timeline {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn key_start(&self, key: KeyId) -> Option<f32> {
        self.keys.get(key.0).map(|k| k.start)
    }

    pub fn play(&mut self) {
        self.direction = Direction::Forward;
        self.playing = self.time < self.duration;
    }

    pub fn reverse(&mut self) {
        self.direction = Direction::Reverse;
        self.playing = self.time > 0.0;
    }

    /// Move the playhead by `dt` seconds in the current direction.
    pub fn advance(&mut self, dt: f32, target: &mut impl Animatable, cues: &mut Vec<Cue>) {
        if !self.playing {
            return;
        }
        let step = match self.direction {
            Direction::Forward => dt,
            Direction::Reverse => -dt,
        };
        let next = (self.time + step).clamp(0.0, self.duration);
        self.render(next, target, cues);
        let done = match self.direction {
            Direction::Forward => next >= self.duration,
            Direction::Reverse => next <= 0.0,
        };
        if done {
            self.playing = false;
        }
    }

    /// Jump the playhead to `time`, rendering everything in between in one step.
    pub fn seek(&mut self, time: f32, target: &mut impl Animatable, cues: &mut Vec<Cue>) {
        self.render(time.clamp(0.0, self.duration), target, cues);
    }

    /// Re-resolve viewport-relative targets. Already captured start values are kept.
    pub fn rescale(&mut self, viewport: &Viewport) {
        for key in &mut self.keys {
            for track in &mut key.tracks {
                track.to = track.spec.resolve(viewport);
            }
        }
    }

    /// Re-write every started keyframe at the current playhead, e.g. after `rescale`.
    pub fn reapply(&mut self, target: &mut impl Animatable) {
        let time = self.time;
        for &i in &self.order {
            let key = &mut self.keys[i];
            if !key.initialized {
                continue;
            }
            let p = key.progress(time);
            key.last_progress = Some(p);
            key.apply(p, target);
        }
    }

    fn render(&mut self, next: f32, target: &mut impl Animatable, cues: &mut Vec<Cue>) {
        let prev = self.time;
        if next == prev {
            return;
        }
        let forward = next > prev;
        let mut visit = |key: &mut ResolvedKey| {
            if !key.initialized {
                if next < key.start {
                    return;
                }
                for track in &mut key.tracks {
                    track.from = target.read(track.target);
                }
                key.initialized = true;
            }
            let p = key.progress(next);
            if key.last_progress == Some(p) {
                return;
            }
            key.last_progress = Some(p);
            key.apply(p, target);
            if forward && prev < key.end() && next >= key.end() {
                if let Some(cue) = key.cue {
                    cues.push(cue);
                }
            }
        };
        if forward {
            for &i in &self.order {
                visit(&mut self.keys[i]);
            }
        } else {
            for &i in self.order.iter().rev() {
                visit(&mut self.keys[i]);
            }
        }
        self.time = next;
    }
}
