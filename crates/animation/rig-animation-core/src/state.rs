//! Crossfading controller on top of [`Animation::apply`] / [`Animation::mix`].
//!
//! [`AnimationStateData`] owns the registered animations and the mix durations between
//! pairs of them. [`AnimationState`] tracks the current animation and, while a
//! crossfade is running, the previous one: each tick the previous animation is applied
//! at full weight and the current one is mixed over it with a weight that ramps from
//! 0 to 1 across the mix duration.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::animation::Animation;
use crate::config::Config;
use crate::error::{AnimationError, Result};
use crate::skeleton::SkeletonPose;

/// Registered animations and (from, to) crossfade durations.
#[derive(Debug, Default)]
pub struct AnimationStateData {
    config: Config,
    animations: HashMap<String, Arc<Animation>>,
    /// from name -> to name -> seconds
    mixes: HashMap<String, HashMap<String, f32>>,
}

impl AnimationStateData {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            animations: HashMap::new(),
            mixes: HashMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register an animation under its name, replacing any previous one with the same
    /// name. Validates first when `Config::validate_on_load` is set.
    pub fn add_animation(&mut self, animation: Animation) -> Result<Arc<Animation>> {
        if self.config.validate_on_load {
            animation.validate()?;
        }
        let animation = Arc::new(animation);
        if self
            .animations
            .insert(animation.name().to_string(), Arc::clone(&animation))
            .is_some()
        {
            log::debug!("animation '{}' replaced", animation.name());
        }
        Ok(animation)
    }

    pub fn animation(&self, name: &str) -> Option<Arc<Animation>> {
        self.animations.get(name).cloned()
    }

    pub fn animation_names(&self) -> impl Iterator<Item = &str> {
        self.animations.keys().map(String::as_str)
    }

    /// Crossfade `duration` seconds when switching from `from` to `to`.
    pub fn set_mix(&mut self, from: &Animation, to: &Animation, duration: f32) {
        self.insert_mix(from.name(), to.name(), duration);
    }

    /// Like [`AnimationStateData::set_mix`] but by name; both animations must be
    /// registered.
    pub fn set_mix_by_name(&mut self, from: &str, to: &str, duration: f32) -> Result<()> {
        for name in [from, to] {
            if !self.animations.contains_key(name) {
                log::warn!("set_mix: animation '{name}' is not registered");
                return Err(AnimationError::AnimationNotFound {
                    name: name.to_string(),
                });
            }
        }
        self.insert_mix(from, to, duration);
        Ok(())
    }

    fn insert_mix(&mut self, from: &str, to: &str, duration: f32) {
        debug_assert!(duration >= 0.0, "mix duration must not be negative");
        log::debug!("mix '{from}' -> '{to}': {duration}s");
        self.mixes
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string(), duration);
    }

    /// Crossfade duration for the pair, or `Config::default_mix` when unset.
    pub fn mix_duration(&self, from: &str, to: &str) -> f32 {
        self.mixes
            .get(from)
            .and_then(|targets| targets.get(to))
            .copied()
            .unwrap_or(self.config.default_mix)
    }
}

#[derive(Clone, Debug)]
struct Playing {
    animation: Arc<Animation>,
    time: f32,
    looping: bool,
}

/// Current/previous animation pair with automatic crossfades.
#[derive(Debug)]
pub struct AnimationState {
    data: Arc<AnimationStateData>,
    current: Option<Playing>,
    previous: Option<Playing>,
    mix_time: f32,
    mix_duration: f32,
}

impl AnimationState {
    pub fn new(data: Arc<AnimationStateData>) -> Self {
        Self {
            data,
            current: None,
            previous: None,
            mix_time: 0.0,
            mix_duration: 0.0,
        }
    }

    pub fn data(&self) -> &AnimationStateData {
        &self.data
    }

    /// Switch to `animation` from its start.
    pub fn set_animation(&mut self, animation: Arc<Animation>, looping: bool) {
        self.set_animation_at(animation, looping, 0.0);
    }

    /// Switch to `animation` starting at `time`. If an animation is already playing
    /// and the pair has a positive mix duration, it keeps playing underneath while
    /// the new one fades in.
    pub fn set_animation_at(&mut self, animation: Arc<Animation>, looping: bool, time: f32) {
        self.previous = None;
        if let Some(current) = self.current.take() {
            let duration = self
                .data
                .mix_duration(current.animation.name(), animation.name());
            if duration > 0.0 {
                log::debug!(
                    "crossfade '{}' -> '{}' over {duration}s",
                    current.animation.name(),
                    animation.name()
                );
                self.mix_duration = duration;
                self.mix_time = 0.0;
                self.previous = Some(current);
            }
        }
        self.current = Some(Playing {
            animation,
            time,
            looping,
        });
    }

    /// Switch to a registered animation by name.
    pub fn set_animation_by_name(&mut self, name: &str, looping: bool) -> Result<()> {
        let animation = self.data.animation(name).ok_or_else(|| {
            log::warn!("set_animation: animation '{name}' is not registered");
            AnimationError::AnimationNotFound {
                name: name.to_string(),
            }
        })?;
        self.set_animation(animation, looping);
        Ok(())
    }

    /// Stop playback; `apply` becomes a no-op.
    pub fn clear(&mut self) {
        self.current = None;
        self.previous = None;
    }

    /// Advance playback and crossfade clocks by `delta` seconds.
    pub fn update(&mut self, delta: f32) {
        if let Some(current) = &mut self.current {
            current.time += delta;
        }
        if let Some(previous) = &mut self.previous {
            previous.time += delta;
        }
        self.mix_time += delta;
    }

    /// Pose `pose` for the current tick.
    pub fn apply<P: SkeletonPose + ?Sized>(&mut self, pose: &mut P) {
        let Some(current) = &self.current else {
            return;
        };
        let Some(previous) = &self.previous else {
            current
                .animation
                .apply(pose, current.time, current.looping);
            return;
        };
        previous
            .animation
            .apply(pose, previous.time, previous.looping);
        let alpha = if self.mix_duration > 0.0 {
            (self.mix_time / self.mix_duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        current
            .animation
            .mix(pose, current.time, current.looping, alpha);
        if alpha >= 1.0 {
            log::debug!("crossfade into '{}' complete", current.animation.name());
            self.previous = None;
        }
    }

    /// Animation currently fading in or playing.
    pub fn animation(&self) -> Option<&Arc<Animation>> {
        self.current.as_ref().map(|p| &p.animation)
    }

    /// Playback time of the current animation (0 when idle).
    pub fn time(&self) -> f32 {
        self.current.as_ref().map_or(0.0, |p| p.time)
    }

    pub fn is_mixing(&self) -> bool {
        self.previous.is_some()
    }
}
