use catalog_virtualizer::{CatalogVirtualizer, FlattenOptions, VirtualizerOptions, group_by_initial};
use catalog_virtualizer_adapter::{Controller, Easing, FrameGate};

fn main() {
    // Example: an A-Z jump bar driving animated scroll-to-group without holding any UI objects.
    //
    // An adapter would:
    // - call scroll_to_group (or set_scroll_target from a reactive prop) on a jump bar click
    // - call tick(now_ms) from its frame loop, gated to the target frame rate
    // - apply the returned offset to the real scroll container
    let mut names: Vec<String> = (0..2_000)
        .map(|i| format!("{}lbum {i:04}", (b'A' + (i % 26) as u8) as char))
        .collect();
    names.sort();

    let v = CatalogVirtualizer::with_groups(
        VirtualizerOptions::new(FlattenOptions::list(56).with_header_height(40)),
        group_by_initial(names, |n| n.as_str()),
    );
    let mut c = Controller::from_virtualizer(v).with_scroll_animation(240, Easing::EaseInOutCubic);
    c.on_resize(400, 720, 0);

    let target = c.set_scroll_target(Some('R'), 0);
    println!("target_offset={target:?}");

    let mut gate = FrameGate::from_fps(30);
    let mut now_ms = 0u64;
    while c.is_animating() {
        now_ms += 8;
        if !gate.should_run(now_ms) {
            continue;
        }
        if let Some(off) = c.tick(now_ms) {
            println!("t={now_ms} off={off} range={:?}", c.virtualizer().visible_range());
        }
    }

    println!(
        "done: off={} active={:?}",
        c.virtualizer().scroll_top(),
        c.virtualizer().active_group().map(|g| g.id)
    );

    // Unknown groups (e.g. filtered out) are a silent no-op.
    println!("scroll to missing: {:?}", c.scroll_to_group(&'#', now_ms));
}
