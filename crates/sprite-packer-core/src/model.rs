use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Inclusive right edge coordinate (`x + w - 1`).
    pub fn right(&self) -> u32 {
        self.x + self.w.saturating_sub(1)
    }
    /// Inclusive bottom edge coordinate (`y + h - 1`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h.saturating_sub(1)
    }
    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
    /// Returns true if `r` is fully inside `self` (inclusive edges).
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
    /// Returns true if the two rectangles share at least one pixel.
    pub fn intersects(&self, r: &Rect) -> bool {
        let a_x2 = self.x + self.w;
        let a_y2 = self.y + self.h;
        let b_x2 = r.x + r.w;
        let b_y2 = r.y + r.h;
        !(self.x >= b_x2 || r.x >= a_x2 || self.y >= b_y2 || r.y >= a_y2)
    }
    /// Shrinks the rectangle by `n` pixels on every side.
    pub fn shrink(&self, n: u32) -> Rect {
        Rect::new(
            self.x + n,
            self.y + n,
            self.w.saturating_sub(n * 2),
            self.h.saturating_sub(n * 2),
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.w, self.h)
    }
}

/// Final position of one sprite inside a container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement<K = String> {
    /// Sprite key (usually the source file reference).
    pub key: K,
    /// Name of the container texture holding the sprite.
    pub container: String,
    /// Interior rectangle, padding excluded.
    pub frame: Rect,
}

/// A single container texture (logical record).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container<K = String> {
    pub id: usize,
    pub name: String,
    /// Width and height of the square texture.
    pub size: u32,
    pub placements: Vec<Placement<K>>,
}

/// A named list of sprite references that are packed together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpriteGroup {
    pub name: String,
    #[serde(default)]
    pub sprites: Vec<String>,
}

/// Descriptor listing every group of a build.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpriteManifest {
    #[serde(default)]
    pub groups: Vec<SpriteGroup>,
}

impl SpriteManifest {
    /// Rejects unnamed or duplicated groups.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SpritePackerError;
        let mut seen = std::collections::HashSet::new();
        for g in &self.groups {
            if g.name.trim().is_empty() {
                return Err(SpritePackerError::InvalidInput(
                    "sprite group without a name".into(),
                ));
            }
            if !seen.insert(g.name.as_str()) {
                return Err(SpritePackerError::InvalidInput(format!(
                    "duplicate sprite group '{}'",
                    g.name
                )));
            }
        }
        Ok(())
    }
}

/// Terminal state of one group's packing loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PackOutcome {
    /// Every sprite was placed.
    Done,
    /// The container budget ran out; `dropped` sprites were left out.
    BudgetExceeded { dropped: usize },
}

/// Recoverable problems reported while packing a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PackWarning {
    BudgetExceeded {
        group: String,
        max_containers: usize,
        dropped: usize,
    },
}

impl fmt::Display for PackWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackWarning::BudgetExceeded {
                group,
                max_containers,
                dropped,
            } => write!(
                f,
                "group '{}' exceeds its budget of {} containers; {} sprites were not packed",
                group, max_containers, dropped
            ),
        }
    }
}

/// Containers and placements produced for one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackedGroup<K = String> {
    pub name: String,
    pub containers: Vec<Container<K>>,
    /// Keys of sprites left out because the container budget was exhausted.
    pub dropped: Vec<K>,
    pub outcome: PackOutcome,
    pub warnings: Vec<PackWarning>,
}

impl<K> PackedGroup<K> {
    /// Iterates over every placement across all containers.
    pub fn placements(&self) -> impl Iterator<Item = &Placement<K>> {
        self.containers.iter().flat_map(|c| c.placements.iter())
    }

    /// Computes packing statistics for this group.
    pub fn stats(&self) -> PackStats {
        let num_containers = self.containers.len();
        let mut num_sprites = 0;
        let mut total_container_area = 0u64;
        let mut used_sprite_area = 0u64;
        for c in &self.containers {
            total_container_area += (c.size as u64) * (c.size as u64);
            for p in &c.placements {
                num_sprites += 1;
                used_sprite_area += p.frame.area();
            }
        }
        let occupancy = if total_container_area > 0 {
            used_sprite_area as f64 / total_container_area as f64
        } else {
            0.0
        };
        PackStats {
            num_containers,
            num_sprites,
            num_dropped: self.dropped.len(),
            total_container_area,
            used_sprite_area,
            occupancy,
        }
    }
}

/// Statistics about packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    pub num_containers: usize,
    pub num_sprites: usize,
    pub num_dropped: usize,
    /// Sum of `size * size` over all containers.
    pub total_container_area: u64,
    /// Sum of interior sprite areas (padding excluded).
    pub used_sprite_area: u64,
    /// used_sprite_area / total_container_area (0.0 to 1.0).
    pub occupancy: f64,
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Containers: {}, Sprites: {}, Dropped: {}, Occupancy: {:.2}%, Total Area: {} px², Used Area: {} px²",
            self.num_containers,
            self.num_sprites,
            self.num_dropped,
            self.occupancy * 100.0,
            self.total_container_area,
            self.used_sprite_area,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.total_container_area.saturating_sub(self.used_sprite_area)
    }
}
