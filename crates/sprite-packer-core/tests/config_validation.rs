use sprite_packer_core::error::SpritePackerError;
use sprite_packer_core::prelude::*;

#[test]
fn container_sizes_are_the_five_powers_of_two() {
    let px: Vec<u32> = ContainerSize::ALL.iter().map(|s| s.pixels()).collect();
    assert_eq!(px, vec![256, 512, 1024, 2048, 4096]);
    for s in ContainerSize::ALL {
        assert_eq!(ContainerSize::try_from(s.pixels()).expect("size"), s);
    }
}

#[test]
fn other_sizes_are_rejected() {
    for v in [0, 255, 300, 1000, 8192] {
        match ContainerSize::try_from(v) {
            Err(SpritePackerError::InvalidContainerSize(got)) => assert_eq!(got, v),
            other => panic!("expected InvalidContainerSize for {}, got {:?}", v, other),
        }
    }
    assert!("abc".parse::<ContainerSize>().is_err());
    assert_eq!("2048".parse::<ContainerSize>().expect("parse"), ContainerSize::S2048);
}

#[test]
fn container_size_serializes_as_number() {
    let json = serde_json::to_string(&ContainerSize::S512).expect("ser");
    assert_eq!(json, "512");
    let back: ContainerSize = serde_json::from_str("4096").expect("de");
    assert_eq!(back, ContainerSize::S4096);
    assert!(serde_json::from_str::<ContainerSize>("300").is_err());
}

#[test]
fn defaults() {
    let cfg = PackerConfig::default();
    assert_eq!(cfg.container_size, ContainerSize::S1024);
    assert_eq!(cfg.max_containers, 20);
    assert_eq!(cfg.sort_order, SortOrder::AreaAsc);
    assert!(cfg.validate().is_ok());

    let partial: PackerConfig =
        serde_json::from_str(r#"{ "max_containers": 3 }"#).expect("partial config");
    assert_eq!(partial.container_size, ContainerSize::S1024);
    assert_eq!(partial.max_containers, 3);
}

#[test]
fn zero_budget_is_invalid() {
    let cfg = PackerConfig::builder().max_containers(0).build();
    assert!(matches!(
        cfg.validate(),
        Err(SpritePackerError::InvalidConfig(_))
    ));
    let items = vec![LayoutItem::new("a", 4, 4)];
    assert!(matches!(
        pack_layout("G", items, &cfg),
        Err(SpritePackerError::InvalidConfig(_))
    ));
}

#[test]
fn sort_order_names() {
    assert_eq!("area_asc".parse::<SortOrder>(), Ok(SortOrder::AreaAsc));
    assert_eq!("AREA_DESC".parse::<SortOrder>(), Ok(SortOrder::AreaDesc));
    assert_eq!("max_side_desc".parse::<SortOrder>(), Ok(SortOrder::MaxSideDesc));
    assert_eq!("name_asc".parse::<SortOrder>(), Ok(SortOrder::NameAsc));
    assert_eq!("none".parse::<SortOrder>(), Ok(SortOrder::None));
    assert!("biggest".parse::<SortOrder>().is_err());
}
