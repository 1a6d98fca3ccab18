use crate::config::PursuerConfig;

/// Pursuer speed as a function of elapsed time and collected items.
///
/// `base + floor(t / interval) * increment + floor(items / per_bump) * item_increment`,
/// capped at `max`. Both inputs only ever grow, so the result is non-decreasing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedModel {
    base: f32,
    max: f32,
    interval: f32,
    increment: f32,
    items_per_bump: u32,
    item_increment: f32,
    elapsed: f32,
    items: u32,
}

impl SpeedModel {
    pub fn new(config: &PursuerConfig) -> Self {
        Self {
            base: config.base_speed,
            max: config.max_speed,
            interval: config.speed_interval,
            increment: config.speed_increment,
            items_per_bump: config.items_per_bump.max(1),
            item_increment: config.item_speed_increment,
            elapsed: 0.0,
            items: 0,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn items(&self) -> u32 {
        self.items
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    /// Records the player's running item total. Lower totals are ignored.
    pub fn record_items(&mut self, total: u32) {
        self.items = self.items.max(total);
    }

    pub fn speed(&self) -> f32 {
        self.evaluate(self.elapsed, self.items)
    }

    /// Speed for an arbitrary `(elapsed, items)` pair under this model's tuning.
    pub fn evaluate(&self, elapsed: f32, items: u32) -> f32 {
        let time_steps = (elapsed / self.interval).floor();
        let item_steps = (items / self.items_per_bump) as f32;
        (self.base + time_steps * self.increment + item_steps * self.item_increment).min(self.max)
    }
}
