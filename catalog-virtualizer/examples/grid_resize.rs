// Example: an album grid whose column count follows the container width.
use catalog_virtualizer::{
    CatalogVirtualizer, GridOptions, Group, ItemView, VirtualizerOptions,
};

fn main() {
    let groups: Vec<Group<u32, String>> = (0..40u32)
        .map(|year| {
            let albums = (0..(year % 9 + 3)).map(|i| format!("Album {year}-{i}")).collect();
            Group::new(1980 + year, albums).with_header(format!("{}", 1980 + year))
        })
        .collect();

    let options = VirtualizerOptions::grid(220, GridOptions::new(160, 16)).with_header_height(40);
    let mut v = CatalogVirtualizer::with_groups(options, groups);

    for width in [360u32, 720, 1280, 1920] {
        v.set_container_size(width, 900);
        println!(
            "width={width} columns={} rows+headers={} total_height={} generation={}",
            v.columns(),
            v.layout().len(),
            v.total_height(),
            v.layout_generation()
        );
    }

    v.set_scroll_top(2_000);
    let mut rows = 0usize;
    v.for_each_visible(&mut |view: ItemView<'_, u32, String>, _top: u64, _height: u32| {
        if let ItemView::Row { records } = view {
            rows += 1;
            if rows == 1 {
                println!("first visible row: {records:?}");
            }
        }
    });
    println!("visible rows={rows} pinned_header={:?}", v.pinned_header());
}
