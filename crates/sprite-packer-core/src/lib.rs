//! Core library for packing sprite groups into square container textures.
//!
//! - Packer: binary space-partition tree, one tree per container, 1-texel padding per sprite
//! - Compositing: sources are blitted into the container and their edge texels replicated
//!   into the padding so filtering never samples a neighbouring sprite
//! - Pipeline: `pack_group` loops over containers until a group is placed or its container
//!   budget runs out; `pack_layout` does the same with sizes only
//! - Stubs: binary placement records for the runtime loader (`stub`)
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use sprite_packer_core::{InputImage, PackerConfig, pack_group};
//! # fn main() -> anyhow::Result<()> {
//! let inputs = vec![
//!   InputImage { key: "hero.png".into(), image: ImageReader::open("hero.png")?.decode()? },
//!   InputImage { key: "coin.png".into(), image: ImageReader::open("coin.png")?.decode()? },
//! ];
//! let out = pack_group("Items", inputs, &PackerConfig::default())?;
//! println!("containers: {}", out.containers.len());
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod stub;

pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;
pub use stub::*;

/// Convenience prelude for common types and functions.
/// Importing `sprite_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{ContainerSize, PackerConfig, PackerConfigBuilder, SortOrder};
    pub use crate::model::{
        Container, PackOutcome, PackStats, PackWarning, PackedGroup, Placement, Rect,
        SpriteGroup, SpriteManifest,
    };
    pub use crate::packer::{LayoutItem, PADDING, PackItem, Packer, TreePacker, pack_container};
    pub use crate::stub::{SpriteStub, read_stub, write_stub};
    pub use crate::{
        InputImage, OutputContainer, PackOutput, SingleSprite, pack_group, pack_layout,
        pack_single,
    };
}
