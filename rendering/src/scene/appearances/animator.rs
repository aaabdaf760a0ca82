use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::types::{AnimationDescriptor, LoopType, SpritePhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhaseDirection {
    Forward,
    Backward,
}

/// Phase state machine of one frame group.
///
/// Built from a single group's descriptor and never re-pointed at another
/// group, so its phase count always matches the sprites it indexes.
#[derive(Debug, Clone)]
pub struct Animator {
    phases: Vec<SpritePhase>,
    loop_type: LoopType,
    start_phase: u32,
    random_start_phase: bool,
    synchronized: bool,
    phase: u32,
    direction: PhaseDirection,
    current_loop: u32,
    current_phase_duration: u64,
    last_animation_tick: u64,
    finished: bool,
    rng: SmallRng,
}

impl Animator {
    pub fn new(descriptor: &AnimationDescriptor, ticks: u64) -> Self {
        let mut animator = Self {
            phases: descriptor.phases.clone(),
            loop_type: descriptor.loop_type,
            start_phase: descriptor.start_phase,
            random_start_phase: descriptor.random_start_phase,
            synchronized: descriptor.synchronized,
            phase: 0,
            direction: PhaseDirection::Forward,
            current_loop: 0,
            current_phase_duration: 0,
            last_animation_tick: ticks,
            finished: false,
            rng: SmallRng::seed_from_u64(ticks),
        };
        animator.reset();
        animator
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }

    pub fn phase_count(&self) -> u32 {
        self.phases.len() as u32
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn last_animation_tick(&self) -> u64 {
        self.last_animation_tick
    }

    /// Advances to the phase matching `ticks`. `delay` is added to the
    /// duration of each phase entered during this call.
    pub fn animate(&mut self, ticks: u64, delay: u64) {
        if ticks == self.last_animation_tick || self.finished || self.phases.len() < 2 {
            return;
        }

        if self.synchronized && self.loop_type == LoopType::Infinite {
            self.synchronize(ticks);
            self.last_animation_tick = ticks;
            return;
        }

        let elapsed = ticks.saturating_sub(self.last_animation_tick);
        if elapsed >= self.current_phase_duration {
            let next_phase = self.next_phase();
            if next_phase != self.phase {
                let overshoot = elapsed - self.current_phase_duration;
                let duration = self.phase_duration(next_phase) + delay;
                self.phase = next_phase;
                self.current_phase_duration = duration.saturating_sub(overshoot);
            } else {
                self.finished = true;
            }
        } else {
            self.current_phase_duration -= elapsed;
        }

        self.last_animation_tick = ticks;
    }

    pub fn reset(&mut self) {
        let count = self.phases.len() as u32;
        self.phase = if count == 0 {
            0
        } else if self.random_start_phase {
            self.rng.random_range(0..count)
        } else {
            self.start_phase.min(count - 1)
        };
        self.direction = PhaseDirection::Forward;
        self.current_loop = 0;
        self.finished = false;
        self.current_phase_duration = self.phase_duration(self.phase);
    }

    fn next_phase(&mut self) -> u32 {
        let count = self.phases.len() as u32;
        match self.loop_type {
            LoopType::PingPong => {
                let forward = match self.direction {
                    PhaseDirection::Forward => self.phase + 1 < count,
                    PhaseDirection::Backward => self.phase == 0,
                };
                self.direction = if forward {
                    PhaseDirection::Forward
                } else {
                    PhaseDirection::Backward
                };
                if forward {
                    self.phase + 1
                } else {
                    self.phase - 1
                }
            }
            LoopType::Infinite => (self.phase + 1) % count,
            LoopType::Counted(loops) => {
                if self.phase + 1 < count {
                    self.phase + 1
                } else if self.current_loop + 1 < loops {
                    self.current_loop += 1;
                    0
                } else {
                    self.phase
                }
            }
        }
    }

    fn phase_duration(&mut self, phase: u32) -> u64 {
        match self.phases.get(phase as usize) {
            Some(p) if p.min_duration < p.max_duration => {
                self.rng.random_range(p.min_duration..=p.max_duration) as u64
            }
            Some(p) => p.min_duration as u64,
            None => 0,
        }
    }

    fn synchronize(&mut self, ticks: u64) {
        let total: u64 = self
            .phases
            .iter()
            .map(|p| p.min_duration as u64)
            .sum();
        if total == 0 {
            return;
        }

        let mut offset = ticks % total;
        for (phase, p) in self.phases.iter().enumerate() {
            let duration = p.min_duration as u64;
            if offset < duration {
                self.phase = phase as u32;
                self.current_phase_duration = duration - offset;
                return;
            }
            offset -= duration;
        }
    }
}
