use crate::config::SortOrder;
use crate::error::{Result, SpritePackerError};
use crate::model::Rect;
use tracing::debug;

pub mod tree;

pub use tree::TreePacker;

/// Texels reserved on every side of a sprite for edge replication.
pub const PADDING: u32 = 1;

/// A packer reserves slots inside one container.
///
/// Implementations must never hand out overlapping slots or slots outside the container.
/// `insert` returns `None` when the slot cannot be placed in the current container.
pub trait Packer {
    fn can_pack(&self, w: u32, h: u32) -> bool;
    fn insert(&mut self, w: u32, h: u32) -> Option<Rect>;
}

/// Anything that can be offered to the packer.
pub trait PackItem {
    fn key(&self) -> &str;
    fn dimensions(&self) -> (u32, u32);
}

/// Size-only item, used when no pixels are available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutItem {
    pub key: String,
    pub w: u32,
    pub h: u32,
}

impl LayoutItem {
    pub fn new(key: impl Into<String>, w: u32, h: u32) -> Self {
        Self {
            key: key.into(),
            w,
            h,
        }
    }
}

impl PackItem for LayoutItem {
    fn key(&self) -> &str {
        &self.key
    }
    fn dimensions(&self) -> (u32, u32) {
        (self.w, self.h)
    }
}

/// Result of one container attempt.
///
/// `placements` hold padded slots; `overflow` keeps the sorted order of the items that
/// were not attempted or did not fit.
#[derive(Debug, Clone)]
pub struct ContainerPack<T> {
    pub placements: Vec<(T, Rect)>,
    pub overflow: Vec<T>,
}

/// Slot size for a sprite of `w x h`, padding included.
pub fn padded_size(w: u32, h: u32) -> (u32, u32) {
    (
        w.saturating_add(PADDING * 2),
        h.saturating_add(PADDING * 2),
    )
}

/// Checks that `item` is non-empty and that its padded slot can fit a container of `size`.
pub fn check_fits<T: PackItem>(item: &T, size: u32) -> Result<()> {
    let (w, h) = item.dimensions();
    if w == 0 || h == 0 {
        return Err(SpritePackerError::InvalidDimensions {
            key: item.key().to_string(),
            width: w,
            height: h,
        });
    }
    let (pw, ph) = padded_size(w, h);
    if pw > size || ph > size {
        return Err(SpritePackerError::ImageTooLarge {
            key: item.key().to_string(),
            width: w,
            height: h,
            container_size: size,
        });
    }
    Ok(())
}

/// Stable sort per `order`.
pub fn sort_items<T: PackItem>(items: &mut [T], order: &SortOrder) {
    let area = |t: &T| {
        let (w, h) = t.dimensions();
        (w as u64) * (h as u64)
    };
    match order {
        SortOrder::None => {}
        SortOrder::AreaAsc => items.sort_by_key(|t| area(t)),
        SortOrder::AreaDesc => items.sort_by(|a, b| area(b).cmp(&area(a))),
        SortOrder::MaxSideDesc => items.sort_by(|a, b| {
            let (aw, ah) = a.dimensions();
            let (bw, bh) = b.dimensions();
            bw.max(bh).cmp(&aw.max(ah))
        }),
        SortOrder::NameAsc => items.sort_by(|a, b| a.key().cmp(b.key())),
    }
}

/// Packs as many `items` as fit into one `container_size` square container.
///
/// Items are sorted per `order`, then inserted one by one with their padded size. The
/// first insert that fails ends the attempt: that item and every item after it are
/// returned as overflow.
pub fn pack_container<T: PackItem>(
    container_size: u32,
    items: Vec<T>,
    order: &SortOrder,
) -> Result<ContainerPack<T>> {
    if container_size == 0 {
        return Err(SpritePackerError::InvalidContainerSize(container_size));
    }
    for item in &items {
        check_fits(item, container_size)?;
    }
    let mut items = items;
    sort_items(&mut items, order);

    let mut packer = TreePacker::new(container_size);
    let mut placements: Vec<(T, Rect)> = Vec::with_capacity(items.len());
    let mut overflow: Vec<T> = Vec::new();
    let mut iter = items.into_iter();
    while let Some(item) = iter.next() {
        let (w, h) = item.dimensions();
        let (pw, ph) = padded_size(w, h);
        match packer.insert(pw, ph) {
            Some(slot) => placements.push((item, slot)),
            None => {
                debug!(key = item.key(), w, h, "container full");
                overflow.push(item);
                overflow.extend(iter.by_ref());
                break;
            }
        }
    }

    debug_assert!(
        slots_are_valid(placements.iter().map(|(_, r)| r), container_size),
        "packer produced overlapping or out-of-bounds slots"
    );
    debug!(
        container_size,
        placed = placements.len(),
        overflow = overflow.len(),
        nodes = packer.node_count(),
        "container attempt finished"
    );
    Ok(ContainerPack {
        placements,
        overflow,
    })
}

fn slots_are_valid<'a>(slots: impl Iterator<Item = &'a Rect>, size: u32) -> bool {
    let bounds = Rect::new(0, 0, size, size);
    let slots: Vec<&Rect> = slots.collect();
    for (i, a) in slots.iter().enumerate() {
        if !bounds.contains(a) {
            return false;
        }
        if slots[i + 1..].iter().any(|b| a.intersects(b)) {
            return false;
        }
    }
    true
}
