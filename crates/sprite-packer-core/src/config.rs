use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SpritePackerError;

/// Allowed container edge lengths.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u32", into = "u32")]
pub enum ContainerSize {
    S256,
    S512,
    S1024,
    S2048,
    S4096,
}

impl ContainerSize {
    pub const ALL: [ContainerSize; 5] = [
        ContainerSize::S256,
        ContainerSize::S512,
        ContainerSize::S1024,
        ContainerSize::S2048,
        ContainerSize::S4096,
    ];

    /// Edge length in pixels.
    pub fn pixels(self) -> u32 {
        match self {
            ContainerSize::S256 => 256,
            ContainerSize::S512 => 512,
            ContainerSize::S1024 => 1024,
            ContainerSize::S2048 => 2048,
            ContainerSize::S4096 => 4096,
        }
    }
}

impl TryFrom<u32> for ContainerSize {
    type Error = SpritePackerError;
    fn try_from(v: u32) -> Result<Self, Self::Error> {
        ContainerSize::ALL
            .into_iter()
            .find(|s| s.pixels() == v)
            .ok_or(SpritePackerError::InvalidContainerSize(v))
    }
}

impl From<ContainerSize> for u32 {
    fn from(s: ContainerSize) -> u32 {
        s.pixels()
    }
}

impl FromStr for ContainerSize {
    type Err = SpritePackerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v: u32 = s.trim().parse().map_err(|_| {
            SpritePackerError::InvalidConfig(format!("container size is not a number: {}", s))
        })?;
        ContainerSize::try_from(v)
    }
}

impl fmt::Display for ContainerSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pixels())
    }
}

/// Order in which sprites are offered to the packer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Smallest area first; ties keep group order.
    AreaAsc,
    AreaDesc,
    MaxSideDesc,
    NameAsc,
    None,
}

impl FromStr for SortOrder {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "area_asc" => Ok(Self::AreaAsc),
            "area_desc" => Ok(Self::AreaDesc),
            "max_side_desc" => Ok(Self::MaxSideDesc),
            "name_asc" => Ok(Self::NameAsc),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerConfig {
    /// Edge length of every container texture.
    #[serde(default = "default_container_size")]
    pub container_size: ContainerSize,
    /// Maximum number of containers a single group may produce.
    #[serde(default = "default_max_containers")]
    pub max_containers: usize,
    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            container_size: default_container_size(),
            max_containers: default_max_containers(),
            sort_order: default_sort_order(),
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if `max_containers` is zero.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.max_containers == 0 {
            return Err(SpritePackerError::InvalidConfig(
                "max_containers must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}

fn default_container_size() -> ContainerSize {
    ContainerSize::S1024
}
fn default_max_containers() -> usize {
    20
}
fn default_sort_order() -> SortOrder {
    SortOrder::AreaAsc
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn container_size(mut self, v: ContainerSize) -> Self {
        self.cfg.container_size = v;
        self
    }
    pub fn max_containers(mut self, v: usize) -> Self {
        self.cfg.max_containers = v;
        self
    }
    pub fn sort_order(mut self, v: SortOrder) -> Self {
        self.cfg.sort_order = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}
