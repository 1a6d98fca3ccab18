//! Collectible produce scattered over the farm.
//!
//! Items are placed once, after the map, and only feed back into the chase
//! through the running collected total (pursuer speed bonus, goal unlock).
use crate::config::GameConfig;
use crate::env::{RngSource, TileGrid, TileKind};
use crate::geometry::Vec2;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ItemKind {
    Apple,
    Carrot,
    Blueberries,
    Lettuce,
    Banana,
}

impl ItemKind {
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Apple,
        ItemKind::Carrot,
        ItemKind::Blueberries,
        ItemKind::Lettuce,
        ItemKind::Banana,
    ];

    pub fn points(self) -> u32 {
        match self {
            ItemKind::Apple => 1,
            ItemKind::Carrot => 2,
            ItemKind::Blueberries => 3,
            ItemKind::Lettuce => 4,
            ItemKind::Banana => 5,
        }
    }

    /// Relative draw weight; rarer items are worth more.
    pub fn rarity(self) -> u32 {
        match self {
            ItemKind::Apple => 30,
            ItemKind::Carrot => 25,
            ItemKind::Blueberries => 20,
            ItemKind::Lettuce => 15,
            ItemKind::Banana => 10,
        }
    }

    pub fn draw<R: RngSource + ?Sized>(rng: &mut R) -> Self {
        let total: u32 = Self::ALL.iter().map(|kind| kind.rarity()).sum();
        let mut roll = rng.below(total);
        for kind in Self::ALL {
            if roll < kind.rarity() {
                return kind;
            }
            roll -= kind.rarity();
        }
        ItemKind::Apple
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub position: Vec2,
    pub kind: ItemKind,
    pub collected: bool,
}

impl Item {
    pub fn points(&self) -> u32 {
        self.kind.points()
    }
}

/// How item placement went; a shortfall means the attempt budget ran out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementReport {
    pub requested: u32,
    pub placed: u32,
    pub attempts: u32,
}

impl PlacementReport {
    pub fn shortfall(&self) -> u32 {
        self.requested.saturating_sub(self.placed)
    }
}

/// All items of a session and their collection state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemField {
    items: Vec<Item>,
    /// Player-centre distance below which an item is picked up.
    collect_radius: f32,
}

impl ItemField {
    pub fn new(items: Vec<Item>, collect_radius: f32) -> Self {
        Self {
            items,
            collect_radius,
        }
    }

    /// Rejection-samples item positions over `grid`.
    ///
    /// Candidates must sit on ground, clear of the spawn and of every item
    /// already placed. Sampling stops after `total * attempts_per_item` draws.
    pub fn scatter<R: RngSource + ?Sized>(
        config: &GameConfig,
        grid: &TileGrid,
        rng: &mut R,
    ) -> (Self, PlacementReport) {
        let items_config = &config.items;
        let map = &config.map;
        let budget = items_config
            .total
            .saturating_mul(items_config.attempts_per_item);
        let span = Vec2::new(
            (map.width - items_config.padding * 2.0).max(0.0),
            (map.height - items_config.padding * 2.0).max(0.0),
        );

        let mut items: Vec<Item> = Vec::with_capacity(items_config.total as usize);
        let mut attempts = 0;
        while (items.len() as u32) < items_config.total && attempts < budget {
            attempts += 1;
            let candidate = Vec2::new(
                items_config.padding + rng.next_f32() * span.x,
                items_config.padding + rng.next_f32() * span.y,
            );
            if grid.tile_at(candidate) != TileKind::Ground {
                continue;
            }
            if candidate.distance_to(grid.spawn()) < items_config.spawn_clearance {
                continue;
            }
            if items
                .iter()
                .any(|item| item.position.distance_to(candidate) < items_config.min_spacing)
            {
                continue;
            }
            items.push(Item {
                position: candidate,
                kind: ItemKind::draw(rng),
                collected: false,
            });
        }

        let report = PlacementReport {
            requested: items_config.total,
            placed: items.len() as u32,
            attempts,
        };
        let collect_radius = config.player.size / 2.0 + items_config.size / 2.0;
        (Self::new(items, collect_radius), report)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn total(&self) -> u32 {
        self.items.len() as u32
    }

    pub fn collected_count(&self) -> u32 {
        self.items.iter().filter(|item| item.collected).count() as u32
    }

    pub fn remaining_count(&self) -> u32 {
        self.total() - self.collected_count()
    }

    pub fn all_collected(&self) -> bool {
        self.items.iter().all(|item| item.collected)
    }

    /// Marks every uncollected item within reach of `point` as collected and
    /// returns them in placement order.
    pub fn collect_near(&mut self, point: Vec2) -> Vec<Item> {
        let radius = self.collect_radius;
        self.items
            .iter_mut()
            .filter(|item| !item.collected && item.position.distance_to(point) < radius)
            .map(|item| {
                item.collected = true;
                *item
            })
            .collect()
    }
}
