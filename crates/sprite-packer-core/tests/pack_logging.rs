use std::io::Write;
use std::sync::{Arc, Mutex};

use sprite_packer_core::prelude::*;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("lock").extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().expect("lock").clone();
        String::from_utf8(bytes)
            .expect("utf8")
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<String> {
    let out = Captured::default();
    let writer = out.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    out.lines()
}

#[test]
fn each_packed_sprite_is_logged_with_its_container_and_rect() {
    let cfg = PackerConfig::builder()
        .container_size(ContainerSize::S256)
        .build();
    let items = vec![LayoutItem::new("coin", 10, 10), LayoutItem::new("gem", 20, 20)];
    let lines = capture(|| {
        pack_layout("Items", items, &cfg).expect("pack");
    });

    let packed: Vec<&String> = lines.iter().filter(|l| l.contains("packed sprite")).collect();
    assert_eq!(packed.len(), 2, "{:#?}", lines);
    assert!(packed[0].contains("INFO"));
    assert!(packed[0].contains("sprite=coin"));
    assert!(packed[0].contains("container=ItemsTexture0"));
    assert!(packed[0].contains("rect=(1, 1, 10, 10)"));
    assert!(packed[1].contains("sprite=gem"));
    assert!(!lines.iter().any(|l| l.contains("WARN")));
}

#[test]
fn over_budget_group_logs_a_single_warning() {
    let cfg = PackerConfig::builder()
        .container_size(ContainerSize::S256)
        .max_containers(1)
        .build();
    let items = vec![
        LayoutItem::new("a", 200, 200),
        LayoutItem::new("b", 200, 200),
        LayoutItem::new("c", 200, 200),
    ];
    let lines = capture(|| {
        let group = pack_layout("Heroes", items, &cfg).expect("pack");
        assert_eq!(group.dropped.len(), 2);
    });

    let warnings: Vec<&String> = lines.iter().filter(|l| l.contains("WARN")).collect();
    assert_eq!(warnings.len(), 1, "{:#?}", lines);
    assert!(warnings[0].contains("group 'Heroes' exceeds its budget of 1 containers"));
    assert!(warnings[0].contains("dropped=2"));
    assert_eq!(lines.iter().filter(|l| l.contains("packed sprite")).count(), 1);
}
