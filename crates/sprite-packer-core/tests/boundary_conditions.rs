use image::{DynamicImage, RgbaImage};
use sprite_packer_core::error::SpritePackerError;
use sprite_packer_core::prelude::*;
use sprite_packer_core::{InputImage, pack_group, pack_layout, pack_single};

fn s256() -> PackerConfig {
    PackerConfig::builder()
        .container_size(ContainerSize::S256)
        .build()
}

/// Test zero-sized sprites
#[test]
fn test_zero_width_sprite() {
    let items = vec![LayoutItem::new("ok", 4, 4), LayoutItem::new("flat", 0, 10)];
    match pack_layout("G", items, &s256()) {
        Err(SpritePackerError::InvalidDimensions { key, width, height }) => {
            assert_eq!(key, "flat");
            assert_eq!(width, 0);
            assert_eq!(height, 10);
        }
        other => panic!("Expected InvalidDimensions error, got {:?}", other.map(|g| g.name)),
    }
}

#[test]
fn test_zero_sized_image() {
    let inputs = vec![InputImage {
        key: "empty".into(),
        image: DynamicImage::ImageRgba8(RgbaImage::new(0, 0)),
    }];
    let result = pack_group("G", inputs, &s256());
    assert!(matches!(
        result,
        Err(SpritePackerError::InvalidDimensions { .. })
    ));
}

/// Largest sprite that fits: 254 + 2 texels of padding == 256.
#[test]
fn test_largest_sprite_fits() {
    let group = pack_layout("G", vec![LayoutItem::new("max", 254, 254)], &s256()).expect("pack");
    assert_eq!(group.containers.len(), 1);
    assert_eq!(group.containers[0].placements[0].frame, Rect::new(1, 1, 254, 254));
}

#[test]
fn test_sprite_too_large_with_padding() {
    for (w, h) in [(255, 10), (10, 255), (256, 256), (1000, 1)] {
        let result = pack_layout("G", vec![LayoutItem::new("big", w, h)], &s256());
        match result {
            Err(SpritePackerError::ImageTooLarge {
                key,
                width,
                height,
                container_size,
            }) => {
                assert_eq!(key, "big");
                assert_eq!((width, height), (w, h));
                assert_eq!(container_size, 256);
            }
            _ => panic!("Expected ImageTooLarge for {}x{}", w, h),
        }
    }
}

#[test]
fn test_too_large_fails_before_any_container() {
    // one bad sprite among good ones fails the group
    let items = vec![
        LayoutItem::new("a", 8, 8),
        LayoutItem::new("b", 300, 8),
        LayoutItem::new("c", 8, 8),
    ];
    assert!(matches!(
        pack_layout("G", items, &s256()),
        Err(SpritePackerError::ImageTooLarge { .. })
    ));
}

#[test]
fn test_zero_container_size() {
    let result = pack_container(0, vec![LayoutItem::new("a", 1, 1)], &SortOrder::AreaAsc);
    assert!(matches!(
        result,
        Err(SpritePackerError::InvalidContainerSize(0))
    ));
}

#[test]
fn test_empty_group() {
    let group = pack_layout("Nothing", Vec::new(), &s256()).expect("pack");
    assert!(group.containers.is_empty());
    assert!(group.dropped.is_empty());
    assert!(group.warnings.is_empty());
    assert_eq!(group.outcome, PackOutcome::Done);

    let out = pack_group("Nothing", Vec::new(), &s256()).expect("pack");
    assert!(out.containers.is_empty());
    assert_eq!(out.stats().occupancy, 0.0);
}

#[test]
fn test_single_pixel_sprite() {
    let group = pack_layout("G", vec![LayoutItem::new("px", 1, 1)], &s256()).expect("pack");
    assert_eq!(group.containers[0].placements[0].frame, Rect::new(1, 1, 1, 1));
}

#[test]
fn test_pack_single_rejects_empty_image() {
    let img = DynamicImage::ImageRgba8(RgbaImage::new(0, 5));
    assert!(matches!(
        pack_single("nothing", &img),
        Err(SpritePackerError::InvalidDimensions { .. })
    ));
}
