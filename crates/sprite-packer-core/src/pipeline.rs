use crate::compositing::build_container;
use crate::config::PackerConfig;
use crate::error::{Result, SpritePackerError};
use crate::model::{Container, PackOutcome, PackStats, PackWarning, PackedGroup, Placement, Rect};
use crate::packer::{LayoutItem, PADDING, PackItem, pack_container};
use image::{DynamicImage, RgbaImage};
use tracing::{debug, info, instrument, warn};

/// In-memory image to pack (key + decoded image).
pub struct InputImage {
    pub key: String,
    pub image: DynamicImage,
}

/// Composited container texture and its logical record.
pub struct OutputContainer {
    pub container: Container,
    pub rgba: RgbaImage,
}

/// Output of packing one group: placement records and container textures.
pub struct PackOutput {
    pub group: PackedGroup,
    pub containers: Vec<OutputContainer>,
}

impl PackOutput {
    /// Convenience method that delegates to `group.stats()`.
    pub fn stats(&self) -> PackStats {
        self.group.stats()
    }
}

/// A sprite that owns a whole texture of its own.
pub struct SingleSprite {
    pub placement: Placement,
    pub rgba: RgbaImage,
}

/// Asset name of container `index` of `group`.
pub fn container_name(group: &str, index: usize) -> String {
    format!("{}Texture{}", group, index)
}

struct Prep {
    key: String,
    rgba: RgbaImage,
}

impl PackItem for Prep {
    fn key(&self) -> &str {
        &self.key
    }
    fn dimensions(&self) -> (u32, u32) {
        self.rgba.dimensions()
    }
}

struct PackedContainer<T> {
    container: Container,
    slots: Vec<(T, Rect)>,
}

struct GroupRun<T> {
    containers: Vec<PackedContainer<T>>,
    dropped: Vec<T>,
    outcome: PackOutcome,
    warnings: Vec<PackWarning>,
}

fn run_group<T: PackItem>(group: &str, items: Vec<T>, cfg: &PackerConfig) -> Result<GroupRun<T>> {
    cfg.validate()?;
    let size = cfg.container_size.pixels();
    let mut working = items;
    let mut containers: Vec<PackedContainer<T>> = Vec::new();

    while !working.is_empty() && containers.len() < cfg.max_containers {
        let id = containers.len();
        let name = container_name(group, id);
        let pack = pack_container(size, working, &cfg.sort_order)?;
        // every sprite fits an empty container, so each attempt places at least one
        debug_assert!(!pack.placements.is_empty(), "empty container attempt");

        let placements: Vec<Placement> = pack
            .placements
            .iter()
            .map(|(item, slot)| Placement {
                key: item.key().to_string(),
                container: name.clone(),
                frame: slot.shrink(PADDING),
            })
            .collect();
        for p in &placements {
            info!(
                sprite = %p.key,
                container = %p.container,
                rect = %p.frame,
                "packed sprite"
            );
        }
        debug!(
            container = %name,
            placed = placements.len(),
            overflow = pack.overflow.len(),
            "container packed"
        );

        containers.push(PackedContainer {
            container: Container {
                id,
                name,
                size,
                placements,
            },
            slots: pack.placements,
        });
        working = pack.overflow;
    }

    let (outcome, warnings) = if working.is_empty() {
        (PackOutcome::Done, Vec::new())
    } else {
        let w = PackWarning::BudgetExceeded {
            group: group.to_string(),
            max_containers: cfg.max_containers,
            dropped: working.len(),
        };
        warn!(dropped = working.len(), "{}", w);
        (
            PackOutcome::BudgetExceeded {
                dropped: working.len(),
            },
            vec![w],
        )
    };

    Ok(GroupRun {
        containers,
        dropped: working,
        outcome,
        warnings,
    })
}

fn into_packed_group<T: PackItem>(
    group: &str,
    containers: Vec<Container>,
    dropped: &[T],
    outcome: PackOutcome,
    warnings: Vec<PackWarning>,
) -> PackedGroup {
    PackedGroup {
        name: group.to_string(),
        containers,
        dropped: dropped.iter().map(|t| t.key().to_string()).collect(),
        outcome,
        warnings,
    }
}

/// Packs the images of one group into as many containers as needed, up to
/// `cfg.max_containers`, and composites every container texture.
///
/// Sprites that do not fit within the budget are dropped and reported through
/// `PackedGroup::dropped` and a `PackWarning`; an image that cannot fit even an empty
/// container fails the whole call.
#[instrument(skip_all, fields(group = %group))]
pub fn pack_group(group: &str, inputs: Vec<InputImage>, cfg: &PackerConfig) -> Result<PackOutput> {
    if inputs.is_empty() {
        debug!("empty group");
    }
    let prepared: Vec<Prep> = inputs
        .into_iter()
        .map(|inp| Prep {
            key: inp.key,
            rgba: inp.image.to_rgba8(),
        })
        .collect();

    let run = run_group(group, prepared, cfg)?;
    let mut records = Vec::with_capacity(run.containers.len());
    let mut outputs = Vec::with_capacity(run.containers.len());
    for packed in run.containers {
        let sources: Vec<(&RgbaImage, Rect)> = packed
            .slots
            .iter()
            .map(|(prep, slot)| (&prep.rgba, *slot))
            .collect();
        let rgba = build_container(packed.container.size, &sources);
        records.push(packed.container.clone());
        outputs.push(OutputContainer {
            container: packed.container,
            rgba,
        });
    }

    Ok(PackOutput {
        group: into_packed_group(group, records, &run.dropped, run.outcome, run.warnings),
        containers: outputs,
    })
}

/// Packs sizes into containers without compositing pixel data.
#[instrument(skip_all, fields(group = %group))]
pub fn pack_layout(group: &str, items: Vec<LayoutItem>, cfg: &PackerConfig) -> Result<PackedGroup> {
    let run = run_group(group, items, cfg)?;
    let containers = run.containers.into_iter().map(|c| c.container).collect();
    Ok(into_packed_group(
        group,
        containers,
        &run.dropped,
        run.outcome,
        run.warnings,
    ))
}

/// Gives `image` a texture of its own named `<key>Texture`; the placement covers the
/// whole texture without padding.
pub fn pack_single(key: &str, image: &DynamicImage) -> Result<SingleSprite> {
    let rgba = image.to_rgba8();
    let (w, h) = rgba.dimensions();
    if w == 0 || h == 0 {
        return Err(SpritePackerError::InvalidDimensions {
            key: key.to_string(),
            width: w,
            height: h,
        });
    }
    let placement = Placement {
        key: key.to_string(),
        container: format!("{}Texture", key),
        frame: Rect::new(0, 0, w, h),
    };
    info!(sprite = %key, rect = %placement.frame, "single sprite");
    Ok(SingleSprite { placement, rgba })
}
