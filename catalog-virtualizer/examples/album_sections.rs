// Example: a two-disc album rendered with "Disc N" section headers.
use catalog_virtualizer::{
    CatalogVirtualizer, FlattenOptions, Group, ItemView, Viewport, VirtualizerOptions,
    split_sections,
};

#[derive(Debug)]
struct Track {
    disc: u32,
    number: u32,
    title: String,
}

fn main() {
    let tracks: Vec<Track> = (1..=2)
        .flat_map(|disc| {
            (1..=12).map(move |number| Track {
                disc,
                number,
                title: format!("Track {number}"),
            })
        })
        .collect();

    let sections = split_sections(tracks, |t| t.disc, |disc| format!("Disc {disc}"));
    let album = Group::with_sections("album-42", sections).with_header("Greatest Hits");

    let options = VirtualizerOptions::new(
        FlattenOptions::list(48)
            .with_header_height(64)
            .with_section_header_height(32),
    )
    .with_initial_viewport(Viewport::new(0, 480, 400));
    let v = CatalogVirtualizer::with_groups(options, vec![album]);

    println!("items={} total_height={}", v.layout().len(), v.total_height());
    v.for_each_visible(&mut |view: ItemView<'_, &str, Track>, top: u64, _height: u32| {
        match view {
            ItemView::Header { label, .. } => println!("{top:>5} == {label} =="),
            ItemView::SectionHeader { label } => println!("{top:>5} -- {label} --"),
            ItemView::Record { record, .. } => {
                println!("{top:>5} {}.{:02} {}", record.disc, record.number, record.title)
            }
            ItemView::Row { .. } => {}
        }
    });
}
