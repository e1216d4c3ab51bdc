// Example: a sticky group header drawn above the scrolled list.
use catalog_virtualizer::{CatalogVirtualizer, FlattenOptions, Group, VirtualizerOptions};

fn main() {
    let groups: Vec<Group<usize, u32>> = (0..20)
        .map(|g| Group::new(g, (0..25).collect()).with_header(format!("Playlist {g}")))
        .collect();
    let mut v = CatalogVirtualizer::with_groups(
        VirtualizerOptions::new(FlattenOptions::list(40).with_header_height(32)),
        groups,
    );
    v.set_container_size(400, 320);

    for scroll_top in [0u64, 16, 1_200, 2_064, 9_000] {
        v.set_scroll_top_clamped(scroll_top);
        let sticky = v
            .pinned_header()
            .and_then(|h| v.groups().get(h.group))
            .and_then(|g| g.header_label());
        println!(
            "scroll_top={} active={:?} sticky={sticky:?}",
            v.scroll_top(),
            v.active_group().map(|g| g.id)
        );
    }
}
