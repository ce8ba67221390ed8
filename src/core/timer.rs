//! Day/night cycle driven by walking.
//!
//! Steps feed a counter; once it reaches the lap window the next tick
//! completes a lap. Laps dim the sky, hold it dark, brighten it again and
//! wrap around. A lap also advances the `cycle` scalar fed to the sun.

use log::debug;

use crate::config::DayCycleConfig;
use crate::math::ClearColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPhase {
    Day,
    Dimming,
    Night,
    Brightening,
}

#[derive(Debug, Clone)]
pub struct DayCycleTimer {
    config: DayCycleConfig,
    tick_count: u32,
    lap_count: u32,
    brightening: bool,
    day_channel: f32,
    night_channel: f32,
    cycle: f32,
    clear_color: ClearColor,
    snow_enabled: bool,
}

impl DayCycleTimer {
    pub fn new(config: DayCycleConfig) -> Self {
        Self {
            tick_count: 0,
            lap_count: 0,
            brightening: false,
            day_channel: config.day_start,
            night_channel: config.night_start,
            cycle: 0.0,
            clear_color: ClearColor::from_array(config.initial_clear_color),
            snow_enabled: false,
            config,
        }
    }

    /// Advance the timer. `steps` is the number of movement keys acted on
    /// this frame. Returns the new clear color when a lap changed it.
    pub fn tick(&mut self, dt: f32, steps: u32) -> Option<ClearColor> {
        let (lo, hi) = self.config.lap_window;
        let mut emitted = None;

        // The window check sees the counter left by earlier frames
        if self.tick_count >= lo && self.tick_count <= hi {
            self.cycle += dt;
            self.lap_count += 1;
            self.tick_count = 0;
            emitted = self.complete_lap();
        }

        self.tick_count += steps * self.config.step_increment;
        emitted
    }

    fn complete_lap(&mut self) -> Option<ClearColor> {
        let c = &self.config;
        let lap = self.lap_count;
        let before = (self.day_channel, self.night_channel);

        if lap >= c.dim_start_lap && !self.brightening {
            self.day_channel = (self.day_channel - c.channel_step).max(c.day_floor);
            self.night_channel = (self.night_channel - c.channel_step).max(c.night_floor);
        }
        if lap == c.floor_lap {
            self.day_channel = c.day_floor;
            self.night_channel = c.night_floor;
        }
        if lap > c.brighten_after_lap {
            self.brightening = true;
            self.day_channel = (self.day_channel + c.channel_step).min(c.day_start);
            self.night_channel = (self.night_channel + c.channel_step).min(c.night_start);
        }
        if lap == c.reset_lap {
            debug!("day cycle wrapped after {} laps", lap);
            self.lap_count = 0;
            self.brightening = false;
        }

        if lap > c.snow_after_lap && !self.snow_enabled {
            debug!("snow starts at lap {}", lap);
            self.snow_enabled = true;
        }

        if (self.day_channel, self.night_channel) != before {
            self.clear_color = ClearColor::new(0.0, self.day_channel, self.night_channel, 0.0);
            Some(self.clear_color)
        } else {
            None
        }
    }

    pub fn phase(&self) -> DayPhase {
        let c = &self.config;
        if self.brightening {
            DayPhase::Brightening
        } else if self.lap_count >= c.floor_lap {
            DayPhase::Night
        } else if self.lap_count >= c.dim_start_lap {
            DayPhase::Dimming
        } else {
            DayPhase::Day
        }
    }

    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    pub fn lap_count(&self) -> u32 {
        self.lap_count
    }

    pub fn day_channel(&self) -> f32 {
        self.day_channel
    }

    pub fn night_channel(&self) -> f32 {
        self.night_channel
    }

    /// Monotonic accumulator for the sun shader
    pub fn cycle(&self) -> f32 {
        self.cycle
    }

    pub fn clear_color(&self) -> ClearColor {
        self.clear_color
    }

    /// Latched once the cycle passes the snow lap; never cleared
    pub fn snow_enabled(&self) -> bool {
        self.snow_enabled
    }
}
