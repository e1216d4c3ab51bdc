// Example: an A-Z artist list, rendering only what the viewport shows.
use catalog_virtualizer::{
    CatalogVirtualizer, FlattenOptions, ItemView, Viewport, VirtualizerOptions, group_by_initial,
};

fn main() {
    let mut names: Vec<String> = (0..5_000)
        .map(|i| {
            let initial = (b'A' + (i % 26) as u8) as char;
            format!("{initial}rtist {i:04}")
        })
        .collect();
    names.push("2Pac".to_string());
    names.sort();

    let groups = group_by_initial(names, |n| n.as_str());
    let options = VirtualizerOptions::new(FlattenOptions::list(56).with_header_height(40))
        .with_buffer(3)
        .with_initial_viewport(Viewport::new(0, 600, 360));
    let mut v = CatalogVirtualizer::with_groups(options, groups);

    println!("items={} total_height={}", v.layout().len(), v.total_height());

    v.set_scroll_top(12_345);
    println!("visible_range={:?}", v.visible_range());
    v.for_each_visible(&mut |view: ItemView<'_, char, String>, top: u64, height: u32| {
        match view {
            ItemView::Header { label, .. } => println!("{top:>7} [{label}] h={height}"),
            ItemView::Record { record, .. } => println!("{top:>7} {record}"),
            _ => {}
        }
    });

    let off = v.scroll_to_group(&'M');
    println!("jump to M: offset={off:?} active={:?}", v.active_group().map(|g| g.id));
}
